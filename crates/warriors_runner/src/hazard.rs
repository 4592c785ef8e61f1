use std::ops::RangeInclusive;

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;
use warriors_core::{DamageEvent, HealthSet, Player};

/// Demo damage source: hurts the player on a fixed interval by a seeded random amount.
#[derive(Debug, Clone)]
pub struct HazardPlugin {
    pub seed: u64,
    pub interval: f32,
    pub damage: RangeInclusive<i32>,
}

impl Plugin for HazardPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Hazard {
            rng: StdRng::seed_from_u64(self.seed),
            timer: Timer::from_seconds(self.interval, TimerMode::Repeating),
            damage: self.damage.clone(),
        })
        .add_systems(Update, strike_player.before(HealthSet::Damage));
    }
}

#[derive(Resource, Debug)]
struct Hazard {
    rng: StdRng,
    timer: Timer,
    damage: RangeInclusive<i32>,
}

fn strike_player(
    time: Res<Time>,
    mut hazard: ResMut<Hazard>,
    players: Query<Entity, With<Player>>,
    mut damage: EventWriter<DamageEvent>,
) {
    if !hazard.timer.tick(time.delta()).just_finished() {
        return;
    }
    let range = hazard.damage.clone();
    for target in players.iter() {
        let amount = hazard.rng.gen_range(range.clone());
        info!(target: "warriors_runner.hazard", ?target, amount, "hazard strikes");
        damage.send(DamageEvent { target, amount });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn strikes(seed: u64, count: usize) -> Vec<i32> {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_event::<DamageEvent>()
            .add_plugins(HazardPlugin {
                seed,
                interval: 2.0,
                damage: 5..=35,
            });
        app.world_mut().spawn(Player);

        for _ in 0..count {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs(2));
            app.world_mut().run_schedule(Update);
        }

        app.world_mut()
            .resource_mut::<Events<DamageEvent>>()
            .drain()
            .map(|event| event.amount)
            .collect()
    }

    #[test]
    fn hazard_is_deterministic_per_seed() {
        let baseline = strikes(42, 20);
        assert_eq!(20, baseline.len());
        assert!(baseline.iter().all(|amount| (5..=35).contains(amount)));

        let repeat = strikes(42, 20);
        assert_eq!(baseline, repeat, "same seed should match");

        let different = strikes(7, 20);
        assert_ne!(baseline, different, "different seeds should diverge");
    }
}
