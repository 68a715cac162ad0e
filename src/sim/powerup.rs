//! Power-up catalog and effect manager
//!
//! Each kind is either inactive or active with one end time. Picking up a
//! kind that is already active moves its end time to `now + duration`
//! without re-running the enable hook.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::PowerUpFlags;
use crate::consts::TIME_SLOW_MULTIPLIER;
use crate::render::Color;
use crate::{GameError, Result};

/// Power-up types (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    RapidFire,
    MultiShot,
    LaserBeam,
    ShieldGenerator,
    TimeSlow,
    ExplosiveRounds,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::RapidFire,
        PowerUpKind::MultiShot,
        PowerUpKind::LaserBeam,
        PowerUpKind::ShieldGenerator,
        PowerUpKind::TimeSlow,
        PowerUpKind::ExplosiveRounds,
    ];

    /// Effect duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match self {
            PowerUpKind::RapidFire => 10_000.0,
            PowerUpKind::MultiShot => 15_000.0,
            PowerUpKind::LaserBeam => 8_000.0,
            PowerUpKind::ShieldGenerator => 5_000.0,
            PowerUpKind::TimeSlow => 12_000.0,
            PowerUpKind::ExplosiveRounds => 20_000.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "rapidFire",
            PowerUpKind::MultiShot => "multiShot",
            PowerUpKind::LaserBeam => "laserBeam",
            PowerUpKind::ShieldGenerator => "shieldGenerator",
            PowerUpKind::TimeSlow => "timeSlow",
            PowerUpKind::ExplosiveRounds => "explosiveRounds",
        }
    }

    pub fn from_name(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::UnknownPowerUp(s.to_string()))
    }

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::MultiShot => "Multi-Shot",
            PowerUpKind::LaserBeam => "Laser Beam",
            PowerUpKind::ShieldGenerator => "Shield",
            PowerUpKind::TimeSlow => "Time Slow",
            PowerUpKind::ExplosiveRounds => "Explosive Rounds",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::RapidFire => Color::rgb(0xFF6B35),
            PowerUpKind::MultiShot => Color::rgb(0x4ECDC4),
            PowerUpKind::LaserBeam => Color::rgb(0xFF006E),
            PowerUpKind::ShieldGenerator => Color::rgb(0x3A86FF),
            PowerUpKind::TimeSlow => Color::rgb(0x8338EC),
            PowerUpKind::ExplosiveRounds => Color::rgb(0xFFBE0B),
        }
    }
}

/// One active effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub start_ms: f64,
    pub end_ms: f64,
}

/// What a pickup did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started,
    Refreshed,
}

/// The parts of the session the enable/disable hooks touch
pub struct EffectTargets<'a> {
    pub flags: &'a mut PowerUpFlags,
    pub time_scale: &'a mut f32,
}

impl EffectTargets<'_> {
    fn enable(&mut self, kind: PowerUpKind) {
        self.flags.set(kind, true);
        if kind == PowerUpKind::TimeSlow {
            *self.time_scale = TIME_SLOW_MULTIPLIER;
        }
    }

    fn disable(&mut self, kind: PowerUpKind) {
        self.flags.set(kind, false);
        if kind == PowerUpKind::TimeSlow {
            *self.time_scale = 1.0;
        }
    }
}

/// Active effect table, at most one entry per kind
#[derive(Debug, Clone, Default)]
pub struct EffectManager {
    active: BTreeMap<PowerUpKind, ActiveEffect>,
}

impl EffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an effect, or push out the end time of one already running
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        now_ms: f64,
        targets: &mut EffectTargets<'_>,
    ) -> Activation {
        let end_ms = now_ms + kind.duration_ms();
        if let Some(effect) = self.active.get_mut(&kind) {
            effect.end_ms = end_ms;
            log::info!("{} refreshed until {:.0}ms", kind.label(), end_ms);
            return Activation::Refreshed;
        }

        targets.enable(kind);
        self.active.insert(
            kind,
            ActiveEffect {
                kind,
                start_ms: now_ms,
                end_ms,
            },
        );
        log::info!("{} activated for {:.0}ms", kind.label(), kind.duration_ms());
        Activation::Started
    }

    /// Activate by catalog name; unknown names are rejected and nothing changes
    pub fn activate_named(
        &mut self,
        name: &str,
        now_ms: f64,
        targets: &mut EffectTargets<'_>,
    ) -> Result<Activation> {
        let kind = PowerUpKind::from_name(name).inspect_err(|e| log::warn!("{}", e))?;
        Ok(self.activate(kind, now_ms, targets))
    }

    /// Remove every effect whose end time has passed. Returns the expired kinds.
    pub fn expire(&mut self, now_ms: f64, targets: &mut EffectTargets<'_>) -> Vec<PowerUpKind> {
        let expired: Vec<PowerUpKind> = self
            .active
            .values()
            .filter(|e| now_ms >= e.end_ms)
            .map(|e| e.kind)
            .collect();

        for kind in &expired {
            self.active.remove(kind);
            targets.disable(*kind);
            log::info!("{} expired", kind.label());
        }
        expired
    }

    /// Deactivate everything through the disable hooks, then empty the table
    pub fn clear_all(&mut self, targets: &mut EffectTargets<'_>) -> usize {
        let count = self.active.len();
        for kind in self.active.keys() {
            targets.disable(*kind);
        }
        self.active.clear();
        count
    }

    /// Push every deadline back by `delta_ms` (time spent paused)
    pub fn shift(&mut self, delta_ms: f64) {
        for effect in self.active.values_mut() {
            effect.start_ms += delta_ms;
            effect.end_ms += delta_ms;
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<&ActiveEffect> {
        self.active.get(&kind)
    }

    /// Milliseconds left on an effect (0 if inactive)
    pub fn remaining_ms(&self, kind: PowerUpKind, now_ms: f64) -> f64 {
        self.active
            .get(&kind)
            .map(|e| (e.end_ms - now_ms).max(0.0))
            .unwrap_or(0.0)
    }

    /// Active effects in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.active.values()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        manager: EffectManager,
        flags: PowerUpFlags,
        time_scale: f32,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                manager: EffectManager::new(),
                flags: PowerUpFlags::default(),
                time_scale: 1.0,
            }
        }

        fn activate(&mut self, kind: PowerUpKind, now: f64) -> Activation {
            let mut t = EffectTargets {
                flags: &mut self.flags,
                time_scale: &mut self.time_scale,
            };
            self.manager.activate(kind, now, &mut t)
        }

        fn expire(&mut self, now: f64) -> Vec<PowerUpKind> {
            let mut t = EffectTargets {
                flags: &mut self.flags,
                time_scale: &mut self.time_scale,
            };
            self.manager.expire(now, &mut t)
        }

        fn clear(&mut self) -> usize {
            let mut t = EffectTargets {
                flags: &mut self.flags,
                time_scale: &mut self.time_scale,
            };
            self.manager.clear_all(&mut t)
        }
    }

    #[test]
    fn test_catalog_durations() {
        assert_eq!(PowerUpKind::RapidFire.duration_ms(), 10_000.0);
        assert_eq!(PowerUpKind::MultiShot.duration_ms(), 15_000.0);
        assert_eq!(PowerUpKind::LaserBeam.duration_ms(), 8_000.0);
        assert_eq!(PowerUpKind::ShieldGenerator.duration_ms(), 5_000.0);
        assert_eq!(PowerUpKind::TimeSlow.duration_ms(), 12_000.0);
        assert_eq!(PowerUpKind::ExplosiveRounds.duration_ms(), 20_000.0);
    }

    #[test]
    fn test_names_roundtrip() {
        for kind in PowerUpKind::ALL {
            assert_eq!(PowerUpKind::from_name(kind.name()).unwrap(), kind);
        }
        assert!(matches!(
            PowerUpKind::from_name("megaBomb"),
            Err(GameError::UnknownPowerUp(_))
        ));
    }

    #[test]
    fn test_refresh_replaces_end_time() {
        let mut f = Fixture::new();
        assert_eq!(f.activate(PowerUpKind::RapidFire, 1_000.0), Activation::Started);
        assert_eq!(f.activate(PowerUpKind::RapidFire, 4_000.0), Activation::Refreshed);
        assert_eq!(f.manager.len(), 1);
        let effect = f.manager.get(PowerUpKind::RapidFire).unwrap();
        assert_eq!(effect.end_ms, 14_000.0);
        assert_eq!(effect.start_ms, 1_000.0);
    }

    #[test]
    fn test_time_slow_hooks() {
        let mut f = Fixture::new();
        f.activate(PowerUpKind::TimeSlow, 0.0);
        assert!(f.flags.time_slow);
        assert_eq!(f.time_scale, TIME_SLOW_MULTIPLIER);

        assert!(f.expire(11_999.0).is_empty());
        assert_eq!(f.expire(12_000.0), vec![PowerUpKind::TimeSlow]);
        assert!(!f.flags.time_slow);
        assert_eq!(f.time_scale, 1.0);
    }

    #[test]
    fn test_expire_only_due_effects() {
        let mut f = Fixture::new();
        f.activate(PowerUpKind::ShieldGenerator, 0.0);
        f.activate(PowerUpKind::ExplosiveRounds, 0.0);
        let expired = f.expire(6_000.0);
        assert_eq!(expired, vec![PowerUpKind::ShieldGenerator]);
        assert!(!f.flags.shield);
        assert!(f.flags.explosive);
        assert_eq!(f.manager.remaining_ms(PowerUpKind::ExplosiveRounds, 6_000.0), 14_000.0);
    }

    #[test]
    fn test_clear_all_restores_neutral() {
        let mut f = Fixture::new();
        for kind in PowerUpKind::ALL {
            f.activate(kind, 0.0);
        }
        assert!(f.flags.any());
        assert_eq!(f.clear(), 6);
        assert!(f.manager.is_empty());
        assert_eq!(f.flags, PowerUpFlags::default());
        assert_eq!(f.time_scale, 1.0);
    }

    #[test]
    fn test_shift_delays_expiry() {
        let mut f = Fixture::new();
        f.activate(PowerUpKind::ShieldGenerator, 0.0);
        f.manager.shift(3_000.0);
        assert!(f.expire(5_000.0).is_empty());
        assert_eq!(f.expire(8_000.0), vec![PowerUpKind::ShieldGenerator]);
    }

    #[test]
    fn test_activate_named_unknown_changes_nothing() {
        let mut f = Fixture::new();
        let mut t = EffectTargets {
            flags: &mut f.flags,
            time_scale: &mut f.time_scale,
        };
        assert!(f.manager.activate_named("nuke", 0.0, &mut t).is_err());
        assert_eq!(
            f.manager.activate_named("laserBeam", 0.0, &mut t).unwrap(),
            Activation::Started
        );
        assert!(f.flags.laser);
        assert_eq!(f.manager.len(), 1);
    }
}
