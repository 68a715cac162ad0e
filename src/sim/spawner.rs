//! Time-gated enemy factory
//!
//! Every spawn shortens the interval by a fixed step until it reaches the
//! floor, so the game keeps speeding up but never past a hard limit.

use glam::Vec2;
use rand::Rng;

use super::state::Enemy;
use crate::consts::*;
use crate::platform::Viewport;
use crate::settings::Tuning;

#[derive(Debug, Clone)]
pub struct EnemySpawner {
    interval_ms: f64,
    step_ms: f64,
    floor_ms: f64,
    last_spawn_ms: f64,
}

impl EnemySpawner {
    /// The first enemy appears one full interval after `now_ms`
    pub fn new(tuning: &Tuning, now_ms: f64) -> Self {
        let floor_ms = tuning.spawn_interval_floor_ms.max(0.0);
        Self {
            interval_ms: tuning.spawn_interval_initial_ms.max(floor_ms),
            step_ms: tuning.spawn_interval_step_ms.max(0.0),
            floor_ms,
            last_spawn_ms: now_ms,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn floor_ms(&self) -> f64 {
        self.floor_ms
    }

    /// Push the spawn clock back by `delta_ms` (time spent paused)
    pub fn shift(&mut self, delta_ms: f64) {
        self.last_spawn_ms += delta_ms;
    }

    /// Spawn one enemy if the interval has elapsed
    pub fn update<R: Rng>(
        &mut self,
        now_ms: f64,
        rng: &mut R,
        viewport: Viewport,
        speed_range: (f32, f32),
        id: impl FnOnce() -> u32,
    ) -> Option<Enemy> {
        if now_ms - self.last_spawn_ms < self.interval_ms {
            return None;
        }
        self.last_spawn_ms = now_ms;
        self.interval_ms = (self.interval_ms - self.step_ms).max(self.floor_ms);

        let max_x = (viewport.width - ENEMY_WIDTH).max(0.0);
        let x = if max_x > 0.0 {
            rng.random_range(0.0..=max_x)
        } else {
            0.0
        };
        let (lo, hi) = speed_range;
        let speed = if hi > lo { rng.random_range(lo..=hi) } else { lo };
        let health = rng.random_range(ENEMY_MIN_HEALTH..=ENEMY_MAX_HEALTH) as f32;

        Some(Enemy::new(id(), Vec2::new(x, -ENEMY_HEIGHT), speed, health))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_gated_by_interval() {
        let tuning = Tuning::default();
        let mut spawner = EnemySpawner::new(&tuning, 0.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let vp = Viewport::default();

        assert!(spawner.update(1_000.0, &mut rng, vp, tuning.enemy_speed_range, || 1).is_none());
        let enemy = spawner
            .update(1_500.0, &mut rng, vp, tuning.enemy_speed_range, || 7)
            .unwrap();
        assert_eq!(enemy.id, 7);
        assert!(enemy.pos.y < 0.0);
        assert!((2.0..=4.0).contains(&enemy.max_health));
        assert_eq!(spawner.interval_ms(), SPAWN_INTERVAL_INITIAL_MS - SPAWN_INTERVAL_STEP_MS);

        // Immediately after a spawn nothing new appears
        assert!(spawner.update(1_501.0, &mut rng, vp, tuning.enemy_speed_range, || 8).is_none());
    }

    #[test]
    fn test_tiny_viewport_spawns_at_zero() {
        let tuning = Tuning::default();
        let mut spawner = EnemySpawner::new(&tuning, 0.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let enemy = spawner
            .update(10_000.0, &mut rng, Viewport::new(10.0, 10.0), (50.0, 50.0), || 1)
            .unwrap();
        assert_eq!(enemy.pos.x, 0.0);
        assert_eq!(enemy.speed, 50.0);
    }

    proptest! {
        #[test]
        fn prop_interval_non_increasing_and_floored(
            seed in any::<u64>(),
            steps in proptest::collection::vec(0.0f64..2_000.0, 1..400),
        ) {
            let tuning = Tuning::default();
            let mut spawner = EnemySpawner::new(&tuning, 0.0);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut now = 0.0;
            let mut previous = spawner.interval_ms();
            for dt in steps {
                now += dt;
                let _ = spawner.update(now, &mut rng, Viewport::default(), tuning.enemy_speed_range, || 1);
                prop_assert!(spawner.interval_ms() <= previous);
                prop_assert!(spawner.interval_ms() >= tuning.spawn_interval_floor_ms);
                previous = spawner.interval_ms();
            }
        }
    }
}
