//! Nova Strike - A browser arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, power-up effects)
//! - `screens`: Screen state machine (intro, selection, play, pause, game over)
//! - `render`: Scene recording for the host's 2D canvas
//! - `platform`: Input and frame timing handed in by the host
//! - `persistence`: Session-scoped key/value storage
//! - `settings`: Difficulty preset and gameplay toggles
//! - `theme`: Themes and the player craft variants
//! - `ui`: Commands for the DOM overlays

pub mod error;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod screens;
pub mod settings;
pub mod sim;
pub mod theme;
pub mod ui;

pub use error::{GameError, Result};
pub use settings::{Difficulty, Settings, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default canvas size (the host overrides it with the real viewport)
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Pixels per second
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Gap between the player's bottom edge and the canvas bottom at spawn
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
    pub const STARTING_LIVES: u8 = 3;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const BULLET_SPEED: f32 = 420.0;
    /// Milliseconds between shots without Rapid Fire
    pub const BASE_FIRE_COOLDOWN_MS: f64 = 250.0;
    pub const RAPID_FIRE_DIVISOR: f64 = 4.0;
    /// Angle of the outer bullets of a spread, radians from vertical (15°)
    pub const SPREAD_ANGLE: f32 = 0.261_799_4;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    pub const ENEMY_MIN_SPEED: f32 = 60.0;
    pub const ENEMY_MAX_SPEED: f32 = 180.0;
    pub const ENEMY_MIN_HEALTH: u8 = 2;
    pub const ENEMY_MAX_HEALTH: u8 = 4;
    pub const KILL_SCORE: u64 = 10;

    /// Spawn pacing (milliseconds)
    pub const SPAWN_INTERVAL_INITIAL_MS: f64 = 1500.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 20.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 300.0;

    /// Power-up pickups
    pub const PICKUP_SIZE: f32 = 30.0;
    pub const PICKUP_SPEED: f32 = 120.0;
    pub const PICKUP_DROP_CHANCE: f64 = 0.2;

    /// Explosive rounds area damage
    pub const EXPLOSION_RADIUS: f32 = 50.0;
    pub const EXPLOSION_MAX_DAMAGE: f32 = 3.0;
    pub const EXPLOSION_MIN_DAMAGE: f32 = 1.0;

    /// Laser beam
    pub const LASER_WIDTH: f32 = 10.0;
    pub const LASER_DAMAGE_PER_FRAME: f32 = 0.1;

    /// Time Slow enemy speed multiplier
    pub const TIME_SLOW_MULTIPLIER: f32 = 0.5;

    /// Particles
    pub const PARTICLE_DAMPING: f32 = 0.98;
    pub const MAX_PARTICLES: usize = 400;

    /// Fade-out before leaving the intro screen
    pub const INTRO_FADE_MS: f64 = 300.0;
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
