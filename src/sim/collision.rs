//! Collision detection and damage resolution
//!
//! Everything here is axis-aligned. Enemies are always visited in storage
//! order so that multi-hit cases (area damage, several bullets on one
//! enemy) resolve the same way every run. Dead enemies stay in the list
//! until [`take_dead`] removes them and are skipped by every pass.

use glam::Vec2;

use super::state::{Bullet, Enemy, Player};
use crate::consts::*;
use crate::{Rect, lerp};

/// Where a bullet was consumed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub point: Vec2,
    /// Enemy the bullet struck first
    pub enemy_id: u32,
}

/// Outcome of the player × enemy pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactReport {
    /// Enemies destroyed by the shield (no score)
    pub deflected: Vec<Enemy>,
    /// Enemies that cost a life
    pub hits: Vec<Enemy>,
}

/// Explosive-rounds damage at `distance` from the impact point.
///
/// Linear falloff from the max at distance 0 to the min at the radius edge,
/// rounded up. `None` outside the radius.
pub fn explosion_damage(distance: f32) -> Option<f32> {
    if distance > EXPLOSION_RADIUS {
        return None;
    }
    let t = (distance / EXPLOSION_RADIUS).clamp(0.0, 1.0);
    Some(lerp(EXPLOSION_MAX_DAMAGE, EXPLOSION_MIN_DAMAGE, t).ceil())
}

/// Damage every living enemy whose center lies within the blast radius
pub fn apply_area_damage(enemies: &mut [Enemy], center: Vec2) -> usize {
    let mut hit = 0;
    for enemy in enemies.iter_mut().filter(|e| !e.is_dead()) {
        let distance = enemy.rect().center().distance(center);
        if let Some(damage) = explosion_damage(distance) {
            enemy.take_damage(damage);
            hit += 1;
        }
    }
    hit
}

/// Bullet × enemy pass.
///
/// Each bullet stops at the first living enemy it overlaps (storage order)
/// and is consumed. Explosive rounds turn the hit into area damage around
/// the bullet's center; otherwise the struck enemy takes 1 damage.
pub fn bullets_vs_enemies(
    bullets: &mut Vec<Bullet>,
    enemies: &mut [Enemy],
    explosive: bool,
) -> Vec<Impact> {
    let mut impacts = Vec::new();
    bullets.retain(|bullet| {
        let rect = bullet.rect();
        let Some(index) = enemies
            .iter()
            .position(|e| !e.is_dead() && rect.overlaps(&e.rect()))
        else {
            return true;
        };

        let point = rect.center();
        impacts.push(Impact {
            point,
            enemy_id: enemies[index].id,
        });
        if explosive {
            apply_area_damage(enemies, point);
        } else {
            enemies[index].take_damage(1.0);
        }
        false
    });
    impacts
}

/// Vertical strip from the player's muzzle to the top of the canvas
pub fn laser_beam_rect(player: &Player) -> Rect {
    let muzzle = player.muzzle();
    Rect::new(muzzle.x - LASER_WIDTH / 2.0, 0.0, LASER_WIDTH, muzzle.y.max(0.0))
}

/// Continuous beam: every living enemy inside takes the per-frame damage
pub fn laser_sweep(player: &Player, enemies: &mut [Enemy]) -> usize {
    let beam = laser_beam_rect(player);
    let mut hit = 0;
    for enemy in enemies.iter_mut().filter(|e| !e.is_dead()) {
        if beam.overlaps(&enemy.rect()) {
            enemy.take_damage(LASER_DAMAGE_PER_FRAME);
            hit += 1;
        }
    }
    hit
}

/// Player × enemy pass. Every overlapping enemy is removed; with the shield
/// up it is deflected, otherwise it is reported as a hit.
pub fn player_vs_enemies(player: &Player, enemies: &mut Vec<Enemy>) -> ContactReport {
    let rect = player.rect();
    let shielded = player.flags.shield;
    let mut report = ContactReport::default();

    let mut kept = Vec::with_capacity(enemies.len());
    for enemy in enemies.drain(..) {
        if enemy.is_dead() || !rect.overlaps(&enemy.rect()) {
            kept.push(enemy);
        } else if shielded {
            report.deflected.push(enemy);
        } else {
            report.hits.push(enemy);
        }
    }
    *enemies = kept;
    report
}

/// Remove dead enemies, returning them in storage order
pub fn take_dead(enemies: &mut Vec<Enemy>) -> Vec<Enemy> {
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) = enemies.drain(..).partition(|e| e.is_dead());
    *enemies = alive;
    dead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Viewport;
    use crate::theme::Craft;

    fn enemy_centered(id: u32, center: Vec2, health: f32) -> Enemy {
        let pos = center - Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT) / 2.0;
        Enemy::new(id, pos, 0.0, health)
    }

    fn bullet_centered(id: u32, center: Vec2) -> Bullet {
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        Bullet {
            id,
            pos: center - size / 2.0,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[test]
    fn test_explosion_falloff() {
        assert_eq!(explosion_damage(0.0), Some(3.0));
        assert_eq!(explosion_damage(25.0), Some(2.0));
        assert_eq!(explosion_damage(50.0), Some(1.0));
        assert_eq!(explosion_damage(60.0), None);
        // Rounded up
        assert_eq!(explosion_damage(10.0), Some(3.0));
    }

    #[test]
    fn test_bullet_hits_first_enemy_in_storage_order() {
        let p = Vec2::new(200.0, 200.0);
        let mut enemies = vec![enemy_centered(1, p, 3.0), enemy_centered(2, p, 3.0)];
        let mut bullets = vec![bullet_centered(10, p)];

        let impacts = bullets_vs_enemies(&mut bullets, &mut enemies, false);
        assert!(bullets.is_empty());
        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].enemy_id, 1);
        assert_eq!(enemies[0].health, 2.0);
        assert_eq!(enemies[1].health, 3.0);
    }

    #[test]
    fn test_bullet_skips_dead_enemy() {
        let p = Vec2::new(200.0, 200.0);
        let mut enemies = vec![enemy_centered(1, p, 1.0), enemy_centered(2, p, 2.0)];
        let mut bullets = vec![bullet_centered(10, p), bullet_centered(11, p)];

        bullets_vs_enemies(&mut bullets, &mut enemies, false);
        assert!(enemies[0].is_dead());
        assert_eq!(enemies[1].health, 1.0);
        let dead = take_dead(&mut enemies);
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id, 1);
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn test_miss_keeps_bullet() {
        let mut enemies = vec![enemy_centered(1, Vec2::new(100.0, 100.0), 2.0)];
        let mut bullets = vec![bullet_centered(10, Vec2::new(400.0, 400.0))];
        assert!(bullets_vs_enemies(&mut bullets, &mut enemies, false).is_empty());
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_explosive_area_damage() {
        let p = Vec2::new(300.0, 300.0);
        let mut enemies = vec![
            enemy_centered(1, p, 4.0),
            enemy_centered(2, p + Vec2::new(25.0, 0.0), 4.0),
            enemy_centered(3, p + Vec2::new(60.0, 0.0), 4.0),
        ];
        let mut bullets = vec![bullet_centered(10, p)];
        bullets_vs_enemies(&mut bullets, &mut enemies, true);

        let taken: Vec<f32> = enemies.iter().map(|e| e.max_health - e.health).collect();
        assert_eq!(taken[2], 0.0);
        assert!(taken[0] > taken[1]);
        assert!(taken[1] > 0.0);
    }

    #[test]
    fn test_laser_sweep_hits_only_column() {
        let player = Player::new(Viewport::default(), Craft::default());
        let column_x = player.muzzle().x;
        let mut enemies = vec![
            enemy_centered(1, Vec2::new(column_x, 100.0), 2.0),
            enemy_centered(2, Vec2::new(column_x + 200.0, 100.0), 2.0),
            // Below the muzzle
            enemy_centered(3, Vec2::new(column_x, player.pos.y + 100.0), 2.0),
        ];
        for _ in 0..10 {
            laser_sweep(&player, &mut enemies);
        }
        assert!((enemies[0].health - (2.0 - 10.0 * LASER_DAMAGE_PER_FRAME)).abs() < 1e-4);
        assert_eq!(enemies[1].health, 2.0);
        assert_eq!(enemies[2].health, 2.0);
    }

    #[test]
    fn test_player_contact_with_and_without_shield() {
        let mut player = Player::new(Viewport::default(), Craft::default());
        let center = player.rect().center();

        let mut enemies = vec![enemy_centered(1, center, 2.0), enemy_centered(2, Vec2::ZERO, 2.0)];
        let report = player_vs_enemies(&player, &mut enemies);
        assert_eq!(report.hits.len(), 1);
        assert!(report.deflected.is_empty());
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 2);

        player.flags.shield = true;
        let mut enemies = vec![enemy_centered(3, center, 2.0)];
        let report = player_vs_enemies(&player, &mut enemies);
        assert!(report.hits.is_empty());
        assert_eq!(report.deflected.len(), 1);
        assert!(enemies.is_empty());
    }
}
