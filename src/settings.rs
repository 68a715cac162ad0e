//! Game settings and preferences
//!
//! Persisted in the session store next to the ship selection.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::SessionStore;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Next harder preset, wrapping to Easy
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Normal => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Gameplay numbers for this preset
    pub fn tuning(&self) -> Tuning {
        let base = Tuning::default();
        match self {
            Difficulty::Easy => Tuning {
                spawn_interval_initial_ms: base.spawn_interval_initial_ms * 1.25,
                spawn_interval_floor_ms: base.spawn_interval_floor_ms * 1.5,
                enemy_speed_range: (ENEMY_MIN_SPEED * 0.8, ENEMY_MAX_SPEED * 0.8),
                drop_chance: 0.3,
                ..base
            },
            Difficulty::Normal => base,
            Difficulty::Hard => Tuning {
                spawn_interval_initial_ms: base.spawn_interval_initial_ms * 0.8,
                spawn_interval_step_ms: base.spawn_interval_step_ms * 1.5,
                enemy_speed_range: (ENEMY_MIN_SPEED * 1.25, ENEMY_MAX_SPEED * 1.25),
                drop_chance: 0.12,
                ..base
            },
        }
    }
}

/// Data-driven gameplay balance consumed by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub spawn_interval_initial_ms: f64,
    pub spawn_interval_step_ms: f64,
    pub spawn_interval_floor_ms: f64,
    /// Enemy speed range in px/s (min, max)
    pub enemy_speed_range: (f32, f32),
    /// Probability a killed enemy drops a power-up
    pub drop_chance: f64,
    pub base_fire_cooldown_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_initial_ms: SPAWN_INTERVAL_INITIAL_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            enemy_speed_range: (ENEMY_MIN_SPEED, ENEMY_MAX_SPEED),
            drop_chance: PICKUP_DROP_CHANCE,
            base_fire_cooldown_ms: BASE_FIRE_COOLDOWN_MS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Visual Effects ===
    /// Explosion and deflect particles
    pub particles: bool,
    /// Screen shake when the player is hit
    pub screen_shake: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            particles: true,
            screen_shake: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn tuning(&self) -> Tuning {
        self.difficulty.tuning()
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Storage key
    const STORAGE_KEY: &'static str = "nova_strike_settings";

    /// Load settings, falling back to defaults on missing or malformed data
    pub fn load(store: &dyn SessionStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from session storage");
                    return settings;
                }
                Err(e) => log::warn!("Discarding malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn SessionStore) -> crate::Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
