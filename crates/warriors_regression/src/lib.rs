//! Helpers for deterministic health regression tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use warriors_core::{
    DamageOutcome, Death, DeathHook, DeathResponse, HealthConfig, HealthController,
    HealthSnapshot, RegenStep, UiHealth,
};

pub const DEFAULT_SEED: u64 = 42;

/// One input to the controller, in the order the host would issue it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Damage { amount: i32 },
    Advance { delta: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub step: Step,
    pub outcome: String,
    pub state: HealthSnapshot,
    pub ui: UiHealth,
}

/// Counts deaths without asking for a reload.
#[derive(Debug, Default)]
pub struct RecordingHook {
    pub deaths: Vec<Death>,
}

impl DeathHook for RecordingHook {
    fn on_death(&mut self, death: &Death) -> DeathResponse {
        self.deaths.push(*death);
        DeathResponse {
            reload_level: false,
            ..Default::default()
        }
    }
}

/// Scenario constants used throughout: 100 max health, 10 per tick every 10s, 20s wait.
pub fn scenario_config() -> HealthConfig {
    HealthConfig {
        max_health: 100,
        max_regen_timer: 10.0,
        max_countdown_until_regen: 20.0,
        health_per_regen_tick: 10,
    }
}

/// Feeds `steps` through a fresh controller and records the state after each one.
pub fn run_script(
    config: HealthConfig,
    steps: &[Step],
    hook: &mut RecordingHook,
) -> Result<Vec<TraceEntry>, warriors_core::HealthError> {
    let mut controller = HealthController::new(config)?;
    let mut trace = Vec::with_capacity(steps.len());
    for step in steps.iter().copied() {
        let outcome = match step {
            Step::Damage { amount } => match controller.apply_damage(amount, &mut *hook)? {
                DamageOutcome::Wounded { .. } => "wounded".to_string(),
                DamageOutcome::Died(_) => "died".to_string(),
            },
            Step::Advance { delta } => match controller.advance(delta)? {
                RegenStep::Idle => "idle".to_string(),
                RegenStep::Waiting => "waiting".to_string(),
                RegenStep::Ticked { .. } => "ticked".to_string(),
                RegenStep::Restored => "restored".to_string(),
            },
        };
        trace.push(TraceEntry {
            step,
            outcome,
            state: controller.snapshot(),
            ui: controller.ui_value(),
        });
    }
    Ok(trace)
}

/// A seeded mix of hits and frames. Damage stays positive and deltas non-negative.
pub fn random_script(seed: u64, len: usize) -> Vec<Step> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.2) {
                Step::Damage {
                    amount: rng.gen_range(1..=60),
                }
            } else {
                Step::Advance {
                    delta: rng.gen_range(0..=40) as f32 * 0.25,
                }
            }
        })
        .collect()
}

pub fn trace_json(trace: &[TraceEntry]) -> serde_json::Value {
    serde_json::json!({ "steps": trace.len(), "trace": trace })
}
