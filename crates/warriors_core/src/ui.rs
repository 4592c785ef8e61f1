use std::time::Duration;

use bevy::prelude::*;
use tracing::warn;

use crate::health::{UiHealth, UI_SCALE};
use crate::player::{HealthSet, Player, PlayerDied, PlayerHealth};

const BAR_WIDTH: f32 = 240.0;
const BAR_HEIGHT: f32 = 14.0;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(5, 6, 16)))
            .init_resource::<DeathNotice>()
            .add_event::<PlayerDied>()
            .add_systems(Startup, (spawn_camera, spawn_hud))
            .add_systems(
                Update,
                (update_health_bar, show_death_notice, expire_death_notice)
                    .chain()
                    .after(HealthSet::Damage),
            );
    }
}

#[derive(Component)]
struct HealthBar;

#[derive(Component)]
struct DeathBanner;

/// Remaining on-screen time of the last death notice.
#[derive(Resource, Default)]
struct DeathNotice {
    timer: Option<Timer>,
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Px(16.0),
                width: Val::Px(BAR_WIDTH),
                height: Val::Px(BAR_HEIGHT),
                ..default()
            },
            BackgroundColor(Color::srgba(0.1, 0.1, 0.14, 0.8)),
        ))
        .with_children(|frame| {
            frame.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(bar_color(1.0)),
                HealthBar,
            ));
        });

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::srgb(0.93, 0.16, 0.18)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(48.0),
            left: Val::Px(16.0),
            ..default()
        },
        DeathBanner,
    ));
}

fn bar_color(active: f32) -> Color {
    // Dimmed while nothing is regenerating.
    let alpha = 0.35 + 0.65 * active.clamp(0.0, 1.0);
    Color::srgba(0.26, 0.86, 0.45, alpha)
}

pub fn bar_fill_percent(ui: UiHealth) -> f32 {
    (ui.value * 100.0 / UI_SCALE).clamp(0.0, 100.0)
}

fn update_health_bar(
    players: Query<&PlayerHealth, With<Player>>,
    mut bars: Query<(&mut Node, &mut BackgroundColor), With<HealthBar>>,
) {
    let Ok(health) = players.get_single() else {
        return;
    };
    let ui = health.ui();
    for (mut node, mut color) in bars.iter_mut() {
        node.width = Val::Percent(bar_fill_percent(ui));
        color.0 = bar_color(ui.active);
    }
}

fn show_death_notice(
    mut deaths: EventReader<PlayerDied>,
    mut notice: ResMut<DeathNotice>,
    mut banner: Query<&mut Text, With<DeathBanner>>,
) {
    let Some(death) = deaths.read().last() else {
        return;
    };
    let Some(message) = death.notice.as_deref() else {
        return;
    };
    let duration = match Duration::try_from_secs_f32(death.notice_seconds) {
        Ok(duration) => duration,
        Err(err) => {
            warn!(
                target: "warriors_core.hud",
                seconds = death.notice_seconds,
                %err,
                "death notice skipped"
            );
            return;
        }
    };
    if let Ok(mut text) = banner.get_single_mut() {
        message.clone_into(&mut **text);
    }
    notice.timer = Some(Timer::new(duration, TimerMode::Once));
}

fn expire_death_notice(
    time: Res<Time>,
    mut notice: ResMut<DeathNotice>,
    mut banner: Query<&mut Text, With<DeathBanner>>,
) {
    let Some(timer) = notice.timer.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).finished() {
        notice.timer = None;
        if let Ok(mut text) = banner.get_single_mut() {
            text.clear();
        }
    }
}
