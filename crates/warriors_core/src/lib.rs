//! Gameplay core: the player's health/regeneration state machine plus the Bevy glue that
//! drives it each frame, reloads the level on death and draws the HUD.

use bevy::prelude::*;

pub mod config;
pub mod game_mode;
pub mod health;
pub mod player;
pub mod ui;

pub use config::{ConfigError, GameConfig, LevelSettings};
pub use game_mode::{CurrentLevel, GameModePlugin, LevelEntity};
pub use health::{
    DamageOutcome, Death, DeathHook, DeathResponse, DefaultDeathHook, HealthConfig,
    HealthController, HealthError, HealthSnapshot, RegenStep, UiHealth,
};
pub use player::{
    DamageEvent, DeathHandler, HealthPlugin, HealthSet, Player, PlayerDied, PlayerHealth,
    ReloadLevel,
};
pub use ui::HudPlugin;

/// Headless gameplay: health systems and the game mode. Add [`HudPlugin`] on top when a
/// window is available.
pub struct WarriorsPlugin;

impl Plugin for WarriorsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((HealthPlugin, GameModePlugin));
    }
}
