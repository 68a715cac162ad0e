//! Fire-control policy
//!
//! Pattern priority: laser > spread > single. Requests inside the cooldown
//! window are dropped, never queued.

use glam::Vec2;

use super::state::{Bullet, PowerUpFlags};
use crate::consts::*;

/// Projectile pattern for the current effect set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePattern {
    /// One straight bullet
    Single,
    /// Three bullets: straight plus two angled
    Spread,
    /// No discrete bullets; the beam sweep does the damage
    Laser,
}

impl FirePattern {
    pub fn for_flags(flags: &PowerUpFlags) -> Self {
        if flags.laser {
            FirePattern::Laser
        } else if flags.multi_shot {
            FirePattern::Spread
        } else {
            FirePattern::Single
        }
    }
}

/// Result of a fire request
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// Still cooling down; request dropped
    Cooling,
    /// Laser is active, nothing to spawn
    Beam,
    Fired(Vec<Bullet>),
}

#[derive(Debug, Clone)]
pub struct FireControl {
    base_cooldown_ms: f64,
    last_shot_ms: Option<f64>,
}

impl FireControl {
    pub fn new(base_cooldown_ms: f64) -> Self {
        Self {
            base_cooldown_ms,
            last_shot_ms: None,
        }
    }

    /// Base cooldown, quartered while Rapid Fire is active
    pub fn effective_cooldown_ms(&self, flags: &PowerUpFlags) -> f64 {
        if flags.rapid_fire {
            self.base_cooldown_ms / RAPID_FIRE_DIVISOR
        } else {
            self.base_cooldown_ms
        }
    }

    pub fn last_shot_ms(&self) -> Option<f64> {
        self.last_shot_ms
    }

    /// Push the last-shot timestamp back by `delta_ms` (time spent paused)
    pub fn shift(&mut self, delta_ms: f64) {
        if let Some(last) = self.last_shot_ms.as_mut() {
            *last += delta_ms;
        }
    }

    /// Handle one fire request at `now_ms` from `muzzle`
    pub fn request(
        &mut self,
        now_ms: f64,
        flags: &PowerUpFlags,
        muzzle: Vec2,
        mut next_id: impl FnMut() -> u32,
    ) -> FireOutcome {
        let pattern = FirePattern::for_flags(flags);
        if pattern == FirePattern::Laser {
            return FireOutcome::Beam;
        }

        let cooldown = self.effective_cooldown_ms(flags);
        if let Some(last) = self.last_shot_ms {
            if now_ms - last < cooldown {
                return FireOutcome::Cooling;
            }
        }
        self.last_shot_ms = Some(now_ms);

        let angles: &[f32] = match pattern {
            FirePattern::Spread => &[-SPREAD_ANGLE, 0.0, SPREAD_ANGLE],
            _ => &[0.0],
        };
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        let bullets = angles
            .iter()
            .map(|angle| Bullet {
                id: next_id(),
                pos: Vec2::new(muzzle.x - size.x / 2.0, muzzle.y - size.y),
                vel: Vec2::new(angle.sin(), -angle.cos()) * BULLET_SPEED,
                size,
            })
            .collect();
        FireOutcome::Fired(bullets)
    }
}
