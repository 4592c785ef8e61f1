use bevy::prelude::*;
use tracing::{error, info};

use crate::config::GameConfig;
use crate::health::HealthController;
use crate::player::{HealthSet, Player, PlayerHealth, ReloadLevel};

/// Spawns the default pawn into the configured level and resets the level on request.
pub struct GameModePlugin;

impl Plugin for GameModePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(GameConfig::default().with_env_overrides());
        }

        app.add_event::<ReloadLevel>()
            .add_systems(Startup, (init_level, spawn_default_pawn).chain())
            .add_systems(Update, reload_level.after(HealthSet::Damage));
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct CurrentLevel {
    pub name: String,
    /// Number of reloads since startup.
    pub generation: u32,
}

/// Everything tagged with this is torn down on reload.
#[derive(Component, Debug, Default)]
pub struct LevelEntity;

fn init_level(mut commands: Commands, config: Res<GameConfig>) {
    info!(target: "warriors_core.level", level = %config.level.name, "opening level");
    commands.insert_resource(CurrentLevel {
        name: config.level.name.clone(),
        generation: 0,
    });
}

fn spawn_default_pawn(mut commands: Commands, config: Res<GameConfig>) {
    spawn_player(&mut commands, &config);
}

pub fn spawn_player(commands: &mut Commands, config: &GameConfig) -> Option<Entity> {
    let controller = match HealthController::new(config.health) {
        Ok(controller) => controller,
        Err(err) => {
            error!(target: "warriors_core.level", %err, "cannot spawn player");
            return None;
        }
    };
    let entity = commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerHealth(controller),
            Transform::default(),
            LevelEntity,
        ))
        .id();
    Some(entity)
}

fn reload_level(
    mut requests: EventReader<ReloadLevel>,
    mut commands: Commands,
    mut level: ResMut<CurrentLevel>,
    config: Res<GameConfig>,
    owned: Query<Entity, With<LevelEntity>>,
) {
    // Several deaths in one frame still mean a single reload.
    if requests.read().count() == 0 {
        return;
    }

    for entity in owned.iter() {
        commands.entity(entity).despawn_recursive();
    }
    level.generation += 1;
    info!(
        target: "warriors_core.level",
        level = %level.name,
        generation = level.generation,
        "reloading level"
    );
    spawn_player(&mut commands, &config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelSettings;
    use crate::player::HealthPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.insert_resource(GameConfig {
            level: LevelSettings {
                name: "TestMap".into(),
            },
            ..Default::default()
        });
        app.add_plugins((HealthPlugin, GameModePlugin));
        app.update();
        app
    }

    fn players(app: &mut App) -> Vec<Entity> {
        let world = app.world_mut();
        let mut query = world.query_filtered::<Entity, With<Player>>();
        query.iter(world).collect()
    }

    #[test]
    fn startup_spawns_one_player_in_named_level() {
        let mut app = app();
        assert_eq!(1, players(&mut app).len());
        let level = app.world().resource::<CurrentLevel>();
        assert_eq!("TestMap", level.name);
        assert_eq!(0, level.generation);
    }

    #[test]
    fn reload_replaces_player_once_per_frame() {
        let mut app = app();
        let before = players(&mut app);
        app.world_mut().send_event(ReloadLevel);
        app.world_mut().send_event(ReloadLevel);
        app.update();

        let after = players(&mut app);
        assert_eq!(1, after.len());
        assert_ne!(before, after);
        assert_eq!(1, app.world().resource::<CurrentLevel>().generation);
    }
}
