//! Session state and entity types
//!
//! Everything one play session mutates lives in [`World`], owned by the
//! Game screen and handed to the simulation step by reference.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fire::FireControl;
use super::powerup::{EffectManager, EffectTargets, PowerUpKind};
use super::spawner::EnemySpawner;
use crate::consts::*;
use crate::platform::Viewport;
use crate::render::Color;
use crate::settings::Tuning;
use crate::theme::Craft;
use crate::Rect;

/// One boolean per power-up category, mirrored from the effect table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpFlags {
    pub rapid_fire: bool,
    pub multi_shot: bool,
    pub laser: bool,
    pub shield: bool,
    pub time_slow: bool,
    pub explosive: bool,
}

impl PowerUpFlags {
    pub fn get(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::RapidFire => self.rapid_fire,
            PowerUpKind::MultiShot => self.multi_shot,
            PowerUpKind::LaserBeam => self.laser,
            PowerUpKind::ShieldGenerator => self.shield,
            PowerUpKind::TimeSlow => self.time_slow,
            PowerUpKind::ExplosiveRounds => self.explosive,
        }
    }

    pub fn set(&mut self, kind: PowerUpKind, on: bool) {
        match kind {
            PowerUpKind::RapidFire => self.rapid_fire = on,
            PowerUpKind::MultiShot => self.multi_shot = on,
            PowerUpKind::LaserBeam => self.laser = on,
            PowerUpKind::ShieldGenerator => self.shield = on,
            PowerUpKind::TimeSlow => self.time_slow = on,
            PowerUpKind::ExplosiveRounds => self.explosive = on,
        }
    }

    pub fn any(&self) -> bool {
        PowerUpKind::ALL.iter().any(|k| self.get(*k))
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Derived from held keys each frame (px/s)
    pub vel: Vec2,
    pub flags: PowerUpFlags,
    pub craft: Craft,
}

impl Player {
    /// Spawn centered horizontally near the bottom of the canvas
    pub fn new(viewport: Viewport, craft: Craft) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(
                (viewport.width - size.x) / 2.0,
                viewport.height - size.y - PLAYER_BOTTOM_MARGIN,
            ),
            size,
            vel: Vec2::ZERO,
            flags: PowerUpFlags::default(),
            craft,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Top-center point bullets leave from
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    /// Move by the input axis and clamp inside the canvas
    pub fn apply_input(&mut self, axis: (f32, f32), dt: f32, viewport: Viewport) {
        self.vel = Vec2::new(axis.0, axis.1) * PLAYER_SPEED;
        self.pos += self.vel * dt;
        self.pos.x = self.pos.x.clamp(0.0, (viewport.width - self.size.x).max(0.0));
        self.pos.y = self.pos.y.clamp(0.0, (viewport.height - self.size.y).max(0.0));
    }
}

/// A player projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Bullet {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Fully outside the visible area (top or sides)
    pub fn is_off_screen(&self, viewport: Viewport) -> bool {
        self.pos.y + self.size.y < 0.0 || self.pos.x + self.size.x < 0.0 || self.pos.x > viewport.width
    }
}

/// A descending enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed before the time-slow multiplier (px/s)
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub health_bar_visible: bool,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, speed: f32, max_health: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            speed,
            health: max_health,
            max_health,
            health_bar_visible: false,
        }
    }

    pub fn update(&mut self, dt: f32, time_scale: f32) {
        self.pos.y += self.speed * time_scale * dt;
        self.sync_health_bar();
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Apply damage, never dropping below zero. Returns true if this killed it.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.sync_health_bar();
        self.is_dead()
    }

    /// Visible only while damaged
    pub fn sync_health_bar(&mut self) {
        self.health_bar_visible = self.health < self.max_health;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn passed_bottom(&self, viewport: Viewport) -> bool {
        self.pos.y > viewport.height
    }
}

/// Cosmetic particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: Color,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel *= PARTICLE_DAMPING;
        self.life -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Remaining life in 0-1, used as alpha
    pub fn fade(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub collected: bool,
}

impl Pickup {
    pub fn new(id: u32, kind: PowerUpKind, center: Vec2) -> Self {
        let size = Vec2::splat(PICKUP_SIZE);
        Self {
            id,
            kind,
            pos: center - size / 2.0,
            size,
            speed: PICKUP_SPEED,
            collected: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Events emitted by one simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ShotFired { bullets: usize },
    EnemyDestroyed { id: u32, pos: Vec2 },
    EnemyEscaped { id: u32 },
    PlayerHit { lives_left: u8 },
    Deflected { id: u32 },
    PickupSpawned { kind: PowerUpKind },
    PickupCollected { kind: PowerUpKind },
    EffectStarted { kind: PowerUpKind },
    EffectRefreshed { kind: PowerUpKind },
    EffectExpired { kind: PowerUpKind },
}

/// Complete session state for one run of the Game screen
#[derive(Debug, Clone)]
pub struct World {
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub pickups: Vec<Pickup>,
    pub effects: EffectManager,
    pub spawner: EnemySpawner,
    pub fire: FireControl,
    pub score: u64,
    pub lives: u8,
    /// Global enemy speed multiplier (Time Slow)
    pub time_scale: f32,
    /// Spawn cosmetic particles
    pub particles_enabled: bool,
    /// Screen shake intensity (decays each frame)
    pub shake: f32,
    /// Events from the most recent step
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    pub(crate) next_id: u32,
}

impl World {
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning, craft: Craft, now_ms: f64) -> Self {
        Self {
            viewport,
            tuning,
            player: Player::new(viewport, craft),
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            pickups: Vec::new(),
            effects: EffectManager::new(),
            spawner: EnemySpawner::new(&tuning, now_ms),
            fire: FireControl::new(tuning.base_fire_cooldown_ms),
            score: 0,
            lives: STARTING_LIVES,
            time_scale: 1.0,
            particles_enabled: true,
            shake: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Reset for a fresh run. Active effects are switched off through their
    /// disable hooks before anything else is discarded.
    pub fn reset(&mut self, seed: u64, viewport: Viewport, craft: Craft, now_ms: f64) {
        let cleared = self.clear_all_power_ups();
        if cleared > 0 {
            log::info!("Cleared {} active power-ups on reset", cleared);
        }
        let particles_enabled = self.particles_enabled;
        *self = World::new(seed, viewport, self.tuning, craft, now_ms);
        self.particles_enabled = particles_enabled;
    }

    /// Move every wall-clock deadline forward after a pause
    pub fn shift_clock(&mut self, delta_ms: f64) {
        if delta_ms <= 0.0 {
            return;
        }
        self.effects.shift(delta_ms);
        self.spawner.shift(delta_ms);
        self.fire.shift(delta_ms);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Split borrow for the effect manager's enable/disable hooks
    pub fn effect_targets(&mut self) -> (&mut EffectManager, EffectTargets<'_>) {
        (
            &mut self.effects,
            EffectTargets {
                flags: &mut self.player.flags,
                time_scale: &mut self.time_scale,
            },
        )
    }

    /// Deactivate every effect, restoring flags and the time multiplier
    pub fn clear_all_power_ups(&mut self) -> usize {
        let (effects, mut targets) = self.effect_targets();
        effects.clear_all(&mut targets)
    }

    pub fn game_over(&self) -> bool {
        self.lives == 0
    }

    /// Burst of particles at `center`
    pub fn spawn_burst(&mut self, center: Vec2, count: usize, color: Color, speed: f32) {
        if !self.particles_enabled {
            return;
        }
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let magnitude = self.rng.random_range(0.3..1.0) * speed;
            let life = self.rng.random_range(0.4..0.9);
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * magnitude,
                life,
                max_life: life,
                size: self.rng.random_range(2.0..4.0),
                color,
            });
        }
    }

    /// Random power-up kind for a drop
    pub fn roll_pickup_kind(&mut self) -> PowerUpKind {
        let i = self.rng.random_range(0..PowerUpKind::ALL.len());
        PowerUpKind::ALL[i]
    }

    pub fn roll(&mut self, chance: f64) -> bool {
        self.rng.random_bool(chance.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(7, Viewport::default(), Tuning::default(), Craft::default(), 0.0)
    }

    #[test]
    fn test_fresh_world_defaults() {
        let w = world();
        assert_eq!(w.score, 0);
        assert_eq!(w.lives, 3);
        assert!(w.enemies.is_empty());
        assert_eq!(w.spawner.interval_ms(), SPAWN_INTERVAL_INITIAL_MS);
        assert_eq!(w.time_scale, 1.0);
        assert!(!w.player.flags.any());
    }

    #[test]
    fn test_player_clamped_left() {
        let mut p = Player::new(Viewport::default(), Craft::default());
        p.pos.x = 0.0;
        p.apply_input((-1.0, 0.0), 1.0 / 60.0, Viewport::default());
        assert_eq!(p.pos.x, 0.0);
    }

    #[test]
    fn test_player_clamped_right_and_bottom() {
        let vp = Viewport::new(300.0, 200.0);
        let mut p = Player::new(vp, Craft::default());
        p.apply_input((1.0, 1.0), 10.0, vp);
        assert_eq!(p.pos.x, 300.0 - PLAYER_WIDTH);
        assert_eq!(p.pos.y, 200.0 - PLAYER_HEIGHT);
    }

    #[test]
    fn test_enemy_damage_floors_at_zero() {
        let mut e = Enemy::new(1, Vec2::ZERO, 100.0, 3.0);
        assert!(!e.health_bar_visible);
        assert!(!e.take_damage(1.0));
        assert!(e.health_bar_visible);
        assert!(!e.take_damage(1.0));
        assert!(e.take_damage(5.0));
        assert_eq!(e.health, 0.0);
        // Already dead enemies do not report a second kill
        assert!(!e.take_damage(1.0));
    }

    #[test]
    fn test_health_bar_hides_when_full() {
        let mut e = Enemy::new(1, Vec2::ZERO, 100.0, 2.0);
        e.take_damage(1.0);
        assert!(e.health_bar_visible);
        e.health = e.max_health;
        e.update(0.0, 1.0);
        assert!(!e.health_bar_visible);
    }

    #[test]
    fn test_particle_damps_and_expires() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            life: 0.05,
            max_life: 0.1,
            size: 2.0,
            color: Color::WHITE,
        };
        p.update(0.02);
        assert!(p.vel.x < 100.0);
        assert!(!p.is_expired());
        p.update(0.04);
        assert!(p.is_expired());
    }

    #[test]
    fn test_bullet_off_screen_top() {
        let mut b = Bullet {
            id: 1,
            pos: Vec2::new(100.0, 5.0),
            vel: Vec2::new(0.0, -BULLET_SPEED),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        };
        assert!(!b.is_off_screen(Viewport::default()));
        b.update(0.1);
        assert!(b.is_off_screen(Viewport::default()));
    }

    #[test]
    fn test_flags_roundtrip_every_kind() {
        let mut flags = PowerUpFlags::default();
        for kind in PowerUpKind::ALL {
            flags.set(kind, true);
            assert!(flags.get(kind));
        }
        for kind in PowerUpKind::ALL {
            flags.set(kind, false);
        }
        assert!(!flags.any());
    }
}
