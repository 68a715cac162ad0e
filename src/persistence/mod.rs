//! Session-scoped persistence
//!
//! The core only ever stores two string identifiers (theme, ship) plus the
//! settings blob. Nothing outlives the browser session.

use std::collections::HashMap;

use crate::Result;
use crate::theme::{Craft, Theme};

/// Key under which the last confirmed theme name is stored
pub const THEME_KEY: &str = "selectedTheme";
/// Key under which the last confirmed ship id is stored
pub const SHIP_KEY: &str = "selectedShip";

/// Durable key/value store scoped to the session
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store used natively and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// `window.sessionStorage` (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct BrowserSessionStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserSessionStore {
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.session_storage().ok())
            .flatten()
            .ok_or_else(|| crate::GameError::Storage("sessionStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| crate::GameError::Storage(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| crate::GameError::Storage(format!("{:?}", e)))
    }
}

/// Restore the last confirmed craft.
///
/// Falls back to the first theme's first ship when nothing is stored, the
/// theme is unknown, or the ship does not exist under the stored theme.
pub fn load_selection(store: &dyn SessionStore) -> Craft {
    let (Some(theme), Some(ship)) = (store.get(THEME_KEY), store.get(SHIP_KEY)) else {
        log::info!("No stored selection, using default craft");
        return Craft::default();
    };

    match Craft::parse(&theme, &ship) {
        Ok(craft) => {
            log::info!("Restored selection {}/{}", theme, ship);
            craft
        }
        Err(e) => {
            log::warn!("Stored selection rejected ({}), using default craft", e);
            Craft::default()
        }
    }
}

/// Persist the confirmed craft
pub fn save_selection(store: &mut dyn SessionStore, craft: Craft) -> Result<()> {
    let theme: Theme = craft.theme();
    store.set(THEME_KEY, theme.name())?;
    store.set(SHIP_KEY, craft.ship_id())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{OceanShip, SpaceShip};

    #[test]
    fn test_empty_store_gives_default() {
        let store = MemoryStore::default();
        assert_eq!(load_selection(&store), Craft::Space(SpaceShip::Falcon));
    }

    #[test]
    fn test_selection_roundtrip() {
        let mut store = MemoryStore::default();
        save_selection(&mut store, Craft::Ocean(OceanShip::Manta)).unwrap();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("ocean"));
        assert_eq!(store.get(SHIP_KEY).as_deref(), Some("manta"));
        assert_eq!(load_selection(&store), Craft::Ocean(OceanShip::Manta));
    }

    #[test]
    fn test_ship_from_other_theme_falls_back() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "space").unwrap();
        store.set(SHIP_KEY, "manta").unwrap();
        assert_eq!(load_selection(&store), Craft::default());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "volcano").unwrap();
        store.set(SHIP_KEY, "falcon").unwrap();
        assert_eq!(load_selection(&store), Craft::default());
    }
}
