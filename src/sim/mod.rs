//! Simulation module
//!
//! All gameplay logic lives here:
//! - Wall-clock deadlines only (no timers, no threads)
//! - Seeded RNG only
//! - Stable iteration order (storage order of each entity list)
//! - No rendering or platform dependencies

pub mod collision;
pub mod fire;
pub mod powerup;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{ContactReport, Impact, explosion_damage, laser_beam_rect};
pub use fire::{FireControl, FireOutcome, FirePattern};
pub use powerup::{Activation, ActiveEffect, EffectManager, EffectTargets, PowerUpKind};
pub use spawner::EnemySpawner;
pub use state::{
    Bullet, Enemy, GameEvent, Particle, Pickup, Player, PowerUpFlags, World,
};
pub use tick::{StepOutcome, TickInput, tick};
