//! Health and regeneration state machine for the player character.
//!
//! The controller is engine-agnostic: the frame driver calls [`HealthController::advance`]
//! once per frame, damage sources call [`HealthController::apply_damage`], and the HUD polls
//! [`HealthController::ui_value`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const DEFAULT_MAX_HEALTH: i32 = 100;
const DEFAULT_MAX_REGEN_TIMER: f32 = 10.0;
const DEFAULT_MAX_COUNTDOWN_UNTIL_REGEN: f32 = 20.0;
const DEFAULT_HEALTH_PER_REGEN_TICK: i32 = 10;

/// Full-scale value of the HUD health indicator.
pub const UI_SCALE: f32 = 5.0;
/// Health that maps to a full indicator. Fixed, independent of `max_health`.
pub const UI_REFERENCE_HEALTH: f32 = 100.0;

const DEFAULT_DEATH_NOTICE: &str = "You died!";
const DEFAULT_DEATH_NOTICE_SECONDS: f32 = 5.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HealthError {
    #[error("damage must be positive, got {0}")]
    NonPositiveDamage(i32),
    #[error("frame delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),
    #[error("invalid health config: {0}")]
    InvalidConfig(String),
}

/// Construction constants of a [`HealthController`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub max_health: i32,
    /// Seconds between regen ticks once regeneration is running.
    pub max_regen_timer: f32,
    /// Seconds of calm after the last hit before regeneration starts.
    pub max_countdown_until_regen: f32,
    pub health_per_regen_tick: i32,
}

impl HealthConfig {
    pub fn validate(&self) -> Result<(), HealthError> {
        if self.max_health <= 0 {
            return Err(HealthError::InvalidConfig(format!(
                "max_health must be positive, got {}",
                self.max_health
            )));
        }
        if self.health_per_regen_tick <= 0 {
            return Err(HealthError::InvalidConfig(format!(
                "health_per_regen_tick must be positive, got {}",
                self.health_per_regen_tick
            )));
        }
        for (label, value) in [
            ("max_regen_timer", self.max_regen_timer),
            ("max_countdown_until_regen", self.max_countdown_until_regen),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HealthError::InvalidConfig(format!(
                    "{label} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: DEFAULT_MAX_HEALTH,
            max_regen_timer: DEFAULT_MAX_REGEN_TIMER,
            max_countdown_until_regen: DEFAULT_MAX_COUNTDOWN_UNTIL_REGEN,
            health_per_regen_tick: DEFAULT_HEALTH_PER_REGEN_TICK,
        }
    }
}

/// Result of a single [`HealthController::apply_damage`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DamageOutcome {
    /// Survived; the regen countdown was (re)started.
    Wounded { health: i32 },
    /// Health ran out. The controller is already back at full health.
    Died(DeathResponse),
}

/// What a single [`HealthController::advance`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenStep {
    Idle,
    Waiting,
    Ticked { health: i32 },
    Restored,
}

/// Values the HUD reads each frame. `active` is `1.0` while regenerating, `0.0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UiHealth {
    pub value: f32,
    pub active: f32,
}

/// Details handed to a [`DeathHook`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Death {
    pub damage: i32,
    /// Health right after the lethal hit, zero or below.
    pub remaining: i32,
    pub max_health: i32,
}

/// Side effects the host should perform after a death.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathResponse {
    pub notice: Option<String>,
    pub notice_seconds: f32,
    pub reload_level: bool,
}

impl Default for DeathResponse {
    fn default() -> Self {
        Self {
            notice: Some(DEFAULT_DEATH_NOTICE.to_string()),
            notice_seconds: DEFAULT_DEATH_NOTICE_SECONDS,
            reload_level: true,
        }
    }
}

/// Overridable death behaviour. The controller restores its own state before calling the
/// hook; implementations only decide on the notice and whether the level reloads.
pub trait DeathHook: Send + Sync {
    fn on_death(&mut self, death: &Death) -> DeathResponse {
        warn!(
            target: "warriors_core.health",
            damage = death.damage,
            remaining = death.remaining,
            "player died, reloading level"
        );
        DeathResponse::default()
    }
}

/// Shows the stock notice and reloads the current level.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDeathHook;

impl DeathHook for DefaultDeathHook {}

/// Serializable view of the controller, used for logs and regression traces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub health: i32,
    pub max_health: i32,
    pub is_regenerating: bool,
    pub regen_timer: f32,
    pub countdown_until_regen: f32,
}

#[derive(Debug, Clone)]
pub struct HealthController {
    config: HealthConfig,
    health: i32,
    is_regenerating: bool,
    regen_timer: f32,
    countdown_until_regen: f32,
}

impl HealthController {
    pub fn new(config: HealthConfig) -> Result<Self, HealthError> {
        config.validate()?;
        Ok(Self {
            config,
            health: config.max_health,
            is_regenerating: false,
            regen_timer: 0.0,
            countdown_until_regen: config.max_countdown_until_regen,
        })
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.config.max_health
    }

    pub fn is_regenerating(&self) -> bool {
        self.is_regenerating
    }

    pub fn regen_timer(&self) -> f32 {
        self.regen_timer
    }

    pub fn countdown_until_regen(&self) -> f32 {
        self.countdown_until_regen
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            health: self.health,
            max_health: self.config.max_health,
            is_regenerating: self.is_regenerating,
            regen_timer: self.regen_timer,
            countdown_until_regen: self.countdown_until_regen,
        }
    }

    /// Subtracts `amount`. Every non-lethal hit restarts the wait before regeneration; a
    /// lethal one restores full health and asks `hook` what the host should do about it.
    pub fn apply_damage(
        &mut self,
        amount: i32,
        hook: &mut dyn DeathHook,
    ) -> Result<DamageOutcome, HealthError> {
        if amount <= 0 {
            return Err(HealthError::NonPositiveDamage(amount));
        }

        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            let death = Death {
                damage: amount,
                remaining: self.health,
                max_health: self.config.max_health,
            };
            self.reset();
            return Ok(DamageOutcome::Died(hook.on_death(&death)));
        }

        self.is_regenerating = true;
        self.countdown_until_regen = self.config.max_countdown_until_regen;
        self.regen_timer = 0.0;
        info!(
            target: "warriors_core.health",
            damage = amount,
            current = self.health,
            max = self.config.max_health,
            "player damaged"
        );
        Ok(DamageOutcome::Wounded {
            health: self.health,
        })
    }

    /// Per-frame update.
    ///
    /// The frame whose delta runs the countdown out also subtracts that whole delta from the
    /// regen timer, so the first tick can land in the same frame regeneration starts.
    pub fn advance(&mut self, delta: f32) -> Result<RegenStep, HealthError> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(HealthError::InvalidDelta(delta));
        }
        if !self.is_regenerating {
            return Ok(RegenStep::Idle);
        }
        if delta == 0.0 {
            return Ok(RegenStep::Waiting);
        }

        self.countdown_until_regen -= delta;
        if self.countdown_until_regen > 0.0 {
            return Ok(RegenStep::Waiting);
        }

        self.regen_timer -= delta;
        if self.regen_timer > 0.0 {
            return Ok(RegenStep::Waiting);
        }

        self.health = self.health.saturating_add(self.config.health_per_regen_tick);
        self.regen_timer = self.config.max_regen_timer;
        if self.health >= self.config.max_health {
            self.reset();
            info!(
                target: "warriors_core.health",
                max = self.config.max_health,
                "health fully regenerated"
            );
            return Ok(RegenStep::Restored);
        }

        debug!(
            target: "warriors_core.health",
            current = self.health,
            max = self.config.max_health,
            "regen tick"
        );
        Ok(RegenStep::Ticked {
            health: self.health,
        })
    }

    pub fn ui_value(&self) -> UiHealth {
        if self.is_regenerating {
            UiHealth {
                value: self.health as f32 * UI_SCALE / UI_REFERENCE_HEALTH,
                active: 1.0,
            }
        } else {
            UiHealth {
                value: UI_SCALE,
                active: 0.0,
            }
        }
    }

    fn reset(&mut self) {
        self.health = self.config.max_health;
        self.is_regenerating = false;
        self.countdown_until_regen = self.config.max_countdown_until_regen;
        self.regen_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SilentHook {
        deaths: Vec<Death>,
    }

    impl DeathHook for SilentHook {
        fn on_death(&mut self, death: &Death) -> DeathResponse {
            self.deaths.push(*death);
            DeathResponse {
                notice: None,
                notice_seconds: 0.0,
                reload_level: false,
            }
        }
    }

    fn controller() -> HealthController {
        HealthController::new(HealthConfig::default()).unwrap()
    }

    #[test]
    fn starts_full_and_stable() {
        let hp = controller();
        assert_eq!(100, hp.health());
        assert!(!hp.is_regenerating());
        assert_eq!(20.0, hp.countdown_until_regen());
        assert_eq!(0.0, hp.regen_timer());
    }

    #[test]
    fn rejects_non_positive_damage_without_touching_state() {
        let mut hp = controller();
        let before = hp.snapshot();
        assert_eq!(
            Err(HealthError::NonPositiveDamage(0)),
            hp.apply_damage(0, &mut DefaultDeathHook)
        );
        assert_eq!(
            Err(HealthError::NonPositiveDamage(-5)),
            hp.apply_damage(-5, &mut DefaultDeathHook)
        );
        assert_eq!(before, hp.snapshot());
    }

    #[test]
    fn rejects_negative_and_nan_delta() {
        let mut hp = controller();
        hp.apply_damage(10, &mut DefaultDeathHook).unwrap();
        let before = hp.snapshot();
        assert!(matches!(hp.advance(-1.0), Err(HealthError::InvalidDelta(_))));
        assert!(hp.advance(f32::NAN).is_err());
        assert!(hp.advance(f32::INFINITY).is_err());
        assert_eq!(before, hp.snapshot());
    }

    #[test]
    fn custom_hook_sees_lethal_hit_after_reset() {
        let mut hp = controller();
        let mut hook = SilentHook { deaths: Vec::new() };
        hp.apply_damage(40, &mut hook).unwrap();
        let outcome = hp.apply_damage(70, &mut hook).unwrap();

        assert!(matches!(outcome, DamageOutcome::Died(ref r) if !r.reload_level));
        assert_eq!(
            vec![Death {
                damage: 70,
                remaining: -10,
                max_health: 100
            }],
            hook.deaths
        );
        assert_eq!(100, hp.health());
        assert!(!hp.is_regenerating());
    }

    #[test]
    fn default_hook_requests_notice_and_reload() {
        let mut hp = controller();
        let DamageOutcome::Died(response) = hp.apply_damage(100, &mut DefaultDeathHook).unwrap()
        else {
            panic!("exactly max health should be lethal");
        };
        assert_eq!(Some("You died!".to_string()), response.notice);
        assert_eq!(5.0, response.notice_seconds);
        assert!(response.reload_level);
    }

    #[test]
    fn regen_waits_for_countdown() {
        let mut hp = controller();
        hp.apply_damage(30, &mut DefaultDeathHook).unwrap();
        assert_eq!(Ok(RegenStep::Waiting), hp.advance(19.0));
        assert_eq!(70, hp.health());
        assert_eq!(Ok(RegenStep::Ticked { health: 80 }), hp.advance(1.0));
    }

    #[test]
    fn ui_value_tracks_health_while_regenerating() {
        let mut hp = controller();
        assert_eq!(
            UiHealth {
                value: 5.0,
                active: 0.0
            },
            hp.ui_value()
        );
        hp.apply_damage(30, &mut DefaultDeathHook).unwrap();
        assert_eq!(
            UiHealth {
                value: 3.5,
                active: 1.0
            },
            hp.ui_value()
        );
    }

    #[test]
    fn config_validation() {
        let bad = [
            HealthConfig {
                max_health: 0,
                ..Default::default()
            },
            HealthConfig {
                health_per_regen_tick: 0,
                ..Default::default()
            },
            HealthConfig {
                max_regen_timer: -1.0,
                ..Default::default()
            },
            HealthConfig {
                max_countdown_until_regen: f32::NAN,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(HealthController::new(config).is_err(), "{config:?}");
        }
        assert!(HealthConfig::default().validate().is_ok());
    }
}
