//! Read-only view of the world for the rendering collaborator
//!
//! Captured after `update()`; everything is plain data so the host can
//! serialize it or paint it however it likes.

use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::sim::{PowerUpFlags, PowerUpKind, World, laser_beam_rect};
use crate::theme::Craft;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub rect: Rect,
    pub health: f32,
    pub max_health: f32,
    pub health_bar_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub remaining_ms: f64,
    /// Remaining share of the full duration, 0-1
    pub fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: Rect,
    pub craft: Craft,
    pub flags: PowerUpFlags,
    pub bullets: Vec<Rect>,
    pub enemies: Vec<EnemyView>,
    /// (rect, fade)
    pub particles: Vec<(Rect, f32)>,
    pub pickups: Vec<(Rect, PowerUpKind)>,
    pub laser: Option<Rect>,
    pub effects: Vec<EffectView>,
    pub score: u64,
    pub lives: u8,
}

impl Snapshot {
    pub fn capture(world: &World, now_ms: f64) -> Self {
        Self {
            player: world.player.rect(),
            craft: world.player.craft,
            flags: world.player.flags,
            bullets: world.bullets.iter().map(|b| b.rect()).collect(),
            enemies: world
                .enemies
                .iter()
                .map(|e| EnemyView {
                    rect: e.rect(),
                    health: e.health,
                    max_health: e.max_health,
                    health_bar_visible: e.health_bar_visible,
                })
                .collect(),
            particles: world
                .particles
                .iter()
                .map(|p| {
                    let half = p.size / 2.0;
                    (Rect::new(p.pos.x - half, p.pos.y - half, p.size, p.size), p.fade())
                })
                .collect(),
            pickups: world
                .pickups
                .iter()
                .filter(|p| !p.collected)
                .map(|p| (p.rect(), p.kind))
                .collect(),
            laser: world
                .player
                .flags
                .laser
                .then(|| laser_beam_rect(&world.player)),
            effects: world
                .effects
                .iter()
                .map(|e| {
                    let remaining_ms = (e.end_ms - now_ms).max(0.0);
                    EffectView {
                        kind: e.kind,
                        remaining_ms,
                        fraction: (remaining_ms / e.kind.duration_ms()).clamp(0.0, 1.0) as f32,
                    }
                })
                .collect(),
            score: world.score,
            lives: world.lives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Viewport;
    use crate::settings::Tuning;

    #[test]
    fn test_capture_reports_effects_and_laser() {
        let mut world = World::new(1, Viewport::default(), Tuning::default(), Craft::default(), 0.0);
        let (effects, mut targets) = world.effect_targets();
        effects.activate(PowerUpKind::LaserBeam, 0.0, &mut targets);

        let snap = Snapshot::capture(&world, 4_000.0);
        assert!(snap.laser.is_some());
        assert_eq!(snap.effects.len(), 1);
        assert!((snap.effects[0].fraction - 0.5).abs() < 1e-6);
        assert_eq!(snap.lives, 3);
    }
}
