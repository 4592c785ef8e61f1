use bevy::prelude::*;
use tracing::{info, warn};

use crate::health::{DamageOutcome, DeathHook, DefaultDeathHook, HealthController, UiHealth};

/// Health systems for the player character. Runs in `Update`: the frame's regeneration is
/// applied first, then this frame's damage.
pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DeathHandler>()
            .add_event::<DamageEvent>()
            .add_event::<PlayerDied>()
            .add_event::<ReloadLevel>()
            .add_systems(
                Update,
                (
                    advance_health.in_set(HealthSet::Regenerate),
                    apply_damage.in_set(HealthSet::Damage),
                ),
            )
            .configure_sets(Update, HealthSet::Regenerate.before(HealthSet::Damage));
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum HealthSet {
    Regenerate,
    Damage,
}

#[derive(Component, Debug, Default)]
pub struct Player;

#[derive(Component, Debug, Deref, DerefMut)]
pub struct PlayerHealth(pub HealthController);

impl PlayerHealth {
    pub fn ui(&self) -> UiHealth {
        self.0.ui_value()
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: i32,
}

#[derive(Event, Debug, Clone)]
pub struct PlayerDied {
    pub entity: Entity,
    pub notice: Option<String>,
    pub notice_seconds: f32,
}

/// Asks the game mode to reset the current level.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReloadLevel;

/// The death hook in use. Replace the resource to change what a death does.
#[derive(Resource)]
pub struct DeathHandler(pub Box<dyn DeathHook>);

impl DeathHandler {
    pub fn new(hook: impl DeathHook + 'static) -> Self {
        Self(Box::new(hook))
    }
}

impl Default for DeathHandler {
    fn default() -> Self {
        Self::new(DefaultDeathHook)
    }
}

fn advance_health(time: Res<Time>, mut players: Query<(Entity, &mut PlayerHealth)>) {
    let dt = time.delta_secs();
    for (entity, mut health) in players.iter_mut() {
        if let Err(err) = health.advance(dt) {
            warn!(target: "warriors_core.health", ?entity, %err, "skipped regen step");
        }
    }
}

fn apply_damage(
    mut damage: EventReader<DamageEvent>,
    mut players: Query<&mut PlayerHealth>,
    mut handler: ResMut<DeathHandler>,
    mut deaths: EventWriter<PlayerDied>,
    mut reloads: EventWriter<ReloadLevel>,
) {
    for event in damage.read() {
        let Ok(mut health) = players.get_mut(event.target) else {
            warn!(
                target: "warriors_core.health",
                target_entity = ?event.target,
                "damage aimed at an entity without health"
            );
            continue;
        };
        match health.apply_damage(event.amount, &mut *handler.0) {
            Ok(DamageOutcome::Wounded { .. }) => {}
            Ok(DamageOutcome::Died(response)) => {
                info!(
                    target: "warriors_core.health",
                    entity = ?event.target,
                    reload = response.reload_level,
                    "player death handled"
                );
                deaths.send(PlayerDied {
                    entity: event.target,
                    notice: response.notice,
                    notice_seconds: response.notice_seconds,
                });
                if response.reload_level {
                    reloads.send(ReloadLevel);
                }
            }
            Err(err) => {
                warn!(
                    target: "warriors_core.health",
                    entity = ?event.target,
                    %err,
                    "rejected damage"
                );
            }
        }
    }
}
