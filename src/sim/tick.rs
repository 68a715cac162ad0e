//! Per-frame simulation step
//!
//! Order is fixed: input, spawn, bullets, enemies, particles, pickups,
//! effect expiry, collisions, pickup collection, game-over check. Expiry
//! runs before collisions so an effect that ends this frame no longer
//! applies to this frame's hits.

use super::collision::{self, ContactReport};
use super::fire::FireOutcome;
use super::powerup::{Activation, PowerUpKind};
use super::state::{GameEvent, Pickup, World};
use crate::consts::*;
use crate::platform::{Action, FrameContext, InputState};
use crate::render::Color;

/// Input commands for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Horizontal/vertical direction, each in {-1, 0, 1}
    pub axis: (f32, f32),
    /// Fire held this frame
    pub fire: bool,
}

impl TickInput {
    pub fn from_keys(keys: &InputState) -> Self {
        Self {
            axis: keys.axis(),
            fire: keys.is_held(Action::Fire),
        }
    }
}

/// What the step means for the owning screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    GameOver { final_score: u64 },
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput, ctx: &FrameContext) -> StepOutcome {
    let now = ctx.now_ms;
    let dt = ctx.dt;
    world.events.clear();
    world.viewport = ctx.viewport;

    // 1. Input and fire control
    world.player.apply_input(input.axis, dt, world.viewport);
    if input.fire {
        fire(world, now);
    }

    // 2. Spawner
    let speed_range = world.tuning.enemy_speed_range;
    let next_id = &mut world.next_id;
    if let Some(enemy) = world.spawner.update(now, &mut world.rng, world.viewport, speed_range, || {
        let id = *next_id;
        *next_id += 1;
        id
    }) {
        world.enemies.push(enemy);
    }

    // 3. Bullets
    let viewport = world.viewport;
    for bullet in &mut world.bullets {
        bullet.update(dt);
    }
    world
        .bullets
        .retain(|b| b.pos.is_finite() && !b.is_off_screen(viewport));

    // 4. Enemies
    let time_scale = world.time_scale;
    for enemy in &mut world.enemies {
        enemy.update(dt, time_scale);
    }
    let mut escaped = Vec::new();
    world.enemies.retain(|e| {
        if !e.pos.is_finite() {
            log::warn!("Dropping enemy {} with invalid position", e.id);
            return false;
        }
        if e.passed_bottom(viewport) {
            escaped.push(e.id);
            return false;
        }
        true
    });
    world
        .events
        .extend(escaped.into_iter().map(|id| GameEvent::EnemyEscaped { id }));

    // 5. Particles
    for particle in &mut world.particles {
        particle.update(dt);
    }
    world.particles.retain(|p| !p.is_expired());

    // 6. Pickups
    for pickup in &mut world.pickups {
        pickup.update(dt);
    }
    world
        .pickups
        .retain(|p| !p.collected && p.pos.y <= viewport.height);

    // 7. Effect expiry
    let (effects, mut targets) = world.effect_targets();
    let expired = effects.expire(now, &mut targets);
    world
        .events
        .extend(expired.into_iter().map(|kind| GameEvent::EffectExpired { kind }));

    // 8. Collisions
    resolve_collisions(world);

    // 9. Pickup collection
    collect_pickups(world, now);

    // Screen shake decays every frame
    world.shake *= 0.9;
    if world.shake < 0.01 {
        world.shake = 0.0;
    }

    // 10. Game over
    if world.game_over() {
        StepOutcome::GameOver {
            final_score: world.score,
        }
    } else {
        StepOutcome::Continue
    }
}

fn fire(world: &mut World, now: f64) {
    let muzzle = world.player.muzzle();
    let next_id = &mut world.next_id;
    let outcome = world.fire.request(now, &world.player.flags, muzzle, || {
        let id = *next_id;
        *next_id += 1;
        id
    });
    if let FireOutcome::Fired(bullets) = outcome {
        world.events.push(GameEvent::ShotFired {
            bullets: bullets.len(),
        });
        world.bullets.extend(bullets);
    }
}

fn resolve_collisions(world: &mut World) {
    let explosive = world.player.flags.explosive;
    let impacts = collision::bullets_vs_enemies(&mut world.bullets, &mut world.enemies, explosive);
    if explosive {
        let color = PowerUpKind::ExplosiveRounds.color();
        for impact in &impacts {
            world.spawn_burst(impact.point, 8, color, 160.0);
        }
    }
    award_kills(world);

    if world.player.flags.laser {
        collision::laser_sweep(&world.player, &mut world.enemies);
        award_kills(world);
    }

    let ContactReport { deflected, hits } =
        collision::player_vs_enemies(&world.player, &mut world.enemies);
    for enemy in deflected {
        world.events.push(GameEvent::Deflected { id: enemy.id });
        let color = PowerUpKind::ShieldGenerator.color();
        world.spawn_burst(enemy.rect().center(), 10, color, 200.0);
    }
    for _ in hits {
        world.lives = world.lives.saturating_sub(1);
        world.shake = 1.0;
        world.events.push(GameEvent::PlayerHit {
            lives_left: world.lives,
        });
        let center = world.player.rect().center();
        world.spawn_burst(center, 24, Color::rgb(0xFF7700), 260.0);
    }
}

/// Score dead enemies, burst particles, and roll power-up drops
fn award_kills(world: &mut World) {
    for enemy in collision::take_dead(&mut world.enemies) {
        let center = enemy.rect().center();
        world.score += KILL_SCORE;
        world.events.push(GameEvent::EnemyDestroyed {
            id: enemy.id,
            pos: center,
        });
        let color = world.player.craft.theme().palette().enemy;
        world.spawn_burst(center, 14, color, 220.0);

        if world.roll(world.tuning.drop_chance) {
            let kind = world.roll_pickup_kind();
            let id = world.next_entity_id();
            world.pickups.push(Pickup::new(id, kind, center));
            world.events.push(GameEvent::PickupSpawned { kind });
        }
    }
}

fn collect_pickups(world: &mut World, now: f64) {
    let player_rect = world.player.rect();
    let mut collected = Vec::new();
    for pickup in world.pickups.iter_mut().filter(|p| !p.collected) {
        if player_rect.overlaps(&pickup.rect()) {
            pickup.collected = true;
            collected.push((pickup.kind, pickup.rect().center()));
        }
    }

    for (kind, center) in collected {
        world.events.push(GameEvent::PickupCollected { kind });
        let (effects, mut targets) = world.effect_targets();
        let event = match effects.activate(kind, now, &mut targets) {
            Activation::Started => GameEvent::EffectStarted { kind },
            Activation::Refreshed => GameEvent::EffectRefreshed { kind },
        };
        world.events.push(event);
        world.spawn_burst(center, 10, kind.color(), 140.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Viewport;
    use crate::settings::Tuning;
    use crate::sim::state::{Bullet, Enemy};
    use crate::theme::Craft;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn drop_pickup(world: &mut World, kind: PowerUpKind, center: Vec2) {
        let id = world.next_entity_id();
        world.pickups.push(Pickup::new(id, kind, center));
    }

    /// Upward bullet whose center sits on `center` after one step
    fn bullet_reaching(id: u32, center: Vec2) -> Bullet {
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        Bullet {
            id,
            pos: center - size / 2.0 + Vec2::new(0.0, BULLET_SPEED * DT),
            vel: Vec2::new(0.0, -BULLET_SPEED),
            size,
        }
    }

    fn destroyed(world: &World) -> usize {
        world
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count()
    }

    fn world_at(now: f64) -> World {
        World::new(42, Viewport::default(), Tuning::default(), Craft::default(), now)
    }

    fn ctx(now: f64) -> FrameContext {
        FrameContext::new(now, DT, Viewport::default())
    }

    #[test]
    fn test_fire_spawns_bullet_and_event() {
        let mut world = world_at(0.0);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &input, &ctx(16.0));
        assert_eq!(world.bullets.len(), 1);
        assert!(world
            .events
            .contains(&GameEvent::ShotFired { bullets: 1 }));
    }

    #[test]
    fn test_spawner_runs_inside_step() {
        let mut world = world_at(0.0);
        tick(&mut world, &TickInput::default(), &ctx(SPAWN_INTERVAL_INITIAL_MS));
        assert_eq!(world.enemies.len(), 1);
    }

    #[test]
    fn test_enemy_escape_costs_nothing() {
        let mut world = world_at(0.0);
        world
            .enemies
            .push(Enemy::new(99, Vec2::new(0.0, 599.0), 600.0, 2.0));
        tick(&mut world, &TickInput::default(), &ctx(10.0));
        assert!(world.enemies.is_empty());
        assert_eq!(world.lives, 3);
        assert_eq!(world.score, 0);
        assert!(world.events.contains(&GameEvent::EnemyEscaped { id: 99 }));
    }

    #[test]
    fn test_time_slow_halves_enemy_speed() {
        let mut world = world_at(0.0);
        world.enemies.push(Enemy::new(1, Vec2::new(0.0, 0.0), 120.0, 2.0));
        let (effects, mut targets) = world.effect_targets();
        effects.activate(PowerUpKind::TimeSlow, 0.0, &mut targets);

        tick(&mut world, &TickInput::default(), &ctx(10.0));
        assert!((world.enemies[0].pos.y - 120.0 * 0.5 * DT).abs() < 1e-4);
    }

    #[test]
    fn test_kill_awards_score() {
        let mut world = world_at(0.0);
        let muzzle = world.player.muzzle();
        let mut enemy = Enemy::new(5, Vec2::new(muzzle.x - 20.0, muzzle.y - 60.0), 0.0, 1.0);
        enemy.health = 1.0;
        world.enemies.push(enemy);

        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut now = 16.0;
        for _ in 0..30 {
            tick(&mut world, &input, &ctx(now));
            now += 16.0;
            if world.score > 0 {
                break;
            }
        }
        assert_eq!(world.score, KILL_SCORE);
        assert!(world.enemies.iter().all(|e| e.id != 5));
    }

    #[test]
    fn test_laser_kill_scores_like_a_bullet() {
        let mut world = world_at(0.0);
        world.tuning.drop_chance = 0.0;
        let (effects, mut targets) = world.effect_targets();
        effects.activate(PowerUpKind::LaserBeam, 0.0, &mut targets);

        let muzzle = world.player.muzzle();
        world
            .enemies
            .push(Enemy::new(7, Vec2::new(muzzle.x - ENEMY_WIDTH / 2.0, 100.0), 0.0, 2.0));

        let mut now = 16.0;
        let mut killed_on = None;
        for frame in 1..=40 {
            tick(&mut world, &TickInput::default(), &ctx(now));
            now += 16.0;
            if world.enemies.is_empty() {
                killed_on = Some(frame);
                break;
            }
        }
        // 0.1 per frame against 2 health
        assert!(matches!(killed_on, Some(f) if (20..=21).contains(&f)));
        assert_eq!(world.score, KILL_SCORE);
        assert_eq!(destroyed(&world), 1);
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_kill_drops_pickup_at_enemy_center() {
        let mut world = world_at(0.0);
        world.tuning = Tuning {
            drop_chance: 1.0,
            ..Tuning::default()
        };
        let enemy = Enemy::new(3, Vec2::new(200.0, 200.0), 0.0, 1.0);
        let center = enemy.rect().center();
        world.enemies.push(enemy);
        world.bullets.push(bullet_reaching(1, center));

        tick(&mut world, &TickInput::default(), &ctx(16.0));
        assert!(world.enemies.is_empty());
        assert_eq!(world.score, KILL_SCORE);
        assert!(world
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PickupSpawned { .. })));
        assert_eq!(world.pickups.len(), 1);
        assert_eq!(world.pickups[0].rect().center(), center);
        assert!(!world.pickups[0].collected);
    }

    #[test]
    fn test_explosive_round_kills_two_in_radius() {
        let mut world = world_at(0.0);
        world.tuning.drop_chance = 0.0;
        let (effects, mut targets) = world.effect_targets();
        effects.activate(PowerUpKind::ExplosiveRounds, 0.0, &mut targets);

        let struck = Enemy::new(1, Vec2::new(200.0, 200.0), 0.0, 1.0);
        let neighbour = Enemy::new(2, Vec2::new(230.0, 200.0), 0.0, 1.0);
        let outside = Enemy::new(3, Vec2::new(300.0, 200.0), 0.0, 1.0);
        let impact = struck.rect().center();
        world.enemies.extend([struck, neighbour, outside]);
        world.bullets.push(bullet_reaching(1, impact));

        tick(&mut world, &TickInput::default(), &ctx(16.0));
        assert!(world.bullets.is_empty());
        assert_eq!(destroyed(&world), 2);
        assert_eq!(world.score, 2 * KILL_SCORE);
        let left: Vec<u32> = world.enemies.iter().map(|e| e.id).collect();
        assert_eq!(left, vec![3]);
        assert_eq!(world.enemies[0].health, 1.0);
    }

    #[test]
    fn test_unshielded_hit_costs_life() {
        let mut world = world_at(0.0);
        let pos = world.player.pos;
        world.enemies.push(Enemy::new(1, pos, 0.0, 2.0));
        tick(&mut world, &TickInput::default(), &ctx(10.0));
        assert_eq!(world.lives, 2);
        assert!(world.enemies.is_empty());
        assert!(world.events.contains(&GameEvent::PlayerHit { lives_left: 2 }));
    }

    #[test]
    fn test_shield_expiring_this_frame_does_not_protect() {
        let mut world = world_at(0.0);
        let (effects, mut targets) = world.effect_targets();
        effects.activate(PowerUpKind::ShieldGenerator, 0.0, &mut targets);

        let pos = world.player.pos;
        world.enemies.push(Enemy::new(1, pos, 0.0, 2.0));
        tick(&mut world, &TickInput::default(), &ctx(5_000.0));
        assert!(!world.player.flags.shield);
        assert_eq!(world.lives, 2);
    }

    #[test]
    fn test_active_shield_deflects() {
        let mut world = world_at(0.0);
        let (effects, mut targets) = world.effect_targets();
        effects.activate(PowerUpKind::ShieldGenerator, 0.0, &mut targets);

        let pos = world.player.pos;
        world.enemies.push(Enemy::new(1, pos, 0.0, 2.0));
        tick(&mut world, &TickInput::default(), &ctx(4_000.0));
        assert_eq!(world.lives, 3);
        assert_eq!(world.score, 0);
        assert!(world.events.contains(&GameEvent::Deflected { id: 1 }));
    }

    #[test]
    fn test_pickup_collection_activates_effect() {
        let mut world = world_at(0.0);
        let center = world.player.rect().center();
        drop_pickup(&mut world, PowerUpKind::MultiShot, center);

        tick(&mut world, &TickInput::default(), &ctx(10.0));
        assert!(world.player.flags.multi_shot);
        assert!(world.effects.is_active(PowerUpKind::MultiShot));
        assert!(world
            .events
            .contains(&GameEvent::EffectStarted { kind: PowerUpKind::MultiShot }));

        // Collected pickups disappear on the next step
        tick(&mut world, &TickInput::default(), &ctx(26.0));
        assert!(world.pickups.is_empty());
    }

    #[test]
    fn test_lives_zero_reports_game_over() {
        let mut world = world_at(0.0);
        world.lives = 1;
        world.score = 120;
        let pos = world.player.pos;
        world.enemies.push(Enemy::new(1, pos, 0.0, 2.0));
        let outcome = tick(&mut world, &TickInput::default(), &ctx(10.0));
        assert_eq!(outcome, StepOutcome::GameOver { final_score: 120 });
        assert_eq!(world.lives, 0);
    }
}
