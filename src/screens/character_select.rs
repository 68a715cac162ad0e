//! Theme and ship picker
//!
//! Up/Down cycles themes, Left/Right cycles ships within the theme. The
//! confirmed pair is persisted to the session store and restored the next
//! time the screen is entered.

use glam::Vec2;

use super::{Screen, Shared, StateId, Transition};
use crate::persistence;
use crate::platform::{Action, FrameContext, InputState};
use crate::render::{Canvas, Color, Scene};
use crate::theme::{Craft, Sprite, Theme};
use crate::ui::{Surface, UiCommand};
use crate::{Rect, Result};

#[derive(Debug, Default)]
pub struct CharacterSelectScreen {
    /// Highlighted craft; its theme is the highlighted theme
    cursor: Craft,
}

impl CharacterSelectScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Craft {
        self.cursor
    }

    fn publish(&self, shared: &mut Shared) {
        shared.ui.push(UiCommand::SetSelection {
            theme: self.cursor.theme().name().to_string(),
            ship: self.cursor.ship_id().to_string(),
        });
    }
}

impl Screen for CharacterSelectScreen {
    fn id(&self) -> StateId {
        StateId::CharacterSelect
    }

    fn enter(&mut self, _from: Option<StateId>, shared: &mut Shared, _ctx: &FrameContext) -> Result<()> {
        self.cursor = persistence::load_selection(shared.store.as_ref());
        shared.ui.open(Surface::CharacterSelectScreen);
        self.publish(shared);
        Ok(())
    }

    fn exit(&mut self, _to: StateId, shared: &mut Shared) -> Result<()> {
        shared.ui.close(Surface::CharacterSelectScreen);
        Ok(())
    }

    fn update(&mut self, _shared: &mut Shared, _ctx: &FrameContext) -> Result<Option<Transition>> {
        Ok(None)
    }

    fn render(&self, _shared: &Shared, ctx: &FrameContext, scene: &mut Scene) -> Result<()> {
        let vp = ctx.viewport;
        let theme = self.cursor.theme();
        let palette = theme.palette();
        scene.clear(palette.background);

        let cx = vp.width / 2.0;
        scene.text("Choose your craft", Vec2::new(cx, 60.0), 32.0, Color::WHITE);

        for (row, t) in Theme::ALL.iter().enumerate() {
            let color = if *t == theme {
                t.palette().accent
            } else {
                Color::WHITE.with_alpha(0.5)
            };
            scene.text(t.display_name(), Vec2::new(cx, 120.0 + row as f32 * 30.0), 20.0, color);
        }

        let crafts = theme.crafts();
        let size = 70.0;
        let gap = 50.0;
        let total = crafts.len() as f32 * size + (crafts.len() as f32 - 1.0) * gap;
        let left = cx - total / 2.0;
        let top = vp.height / 2.0 + 20.0;
        for (i, craft) in crafts.iter().enumerate() {
            let rect = Rect::new(left + i as f32 * (size + gap), top, size, size);
            craft.draw(scene, rect);
            if *craft == self.cursor {
                let outline = Rect::new(rect.x - 6.0, rect.y - 6.0, rect.w + 12.0, rect.h + 12.0);
                scene.stroke_rect(outline, palette.accent, 2.0);
            }
            scene.text(
                &craft.display_name(),
                Vec2::new(rect.center().x, rect.bottom() + 24.0),
                16.0,
                Color::WHITE,
            );
        }

        scene.text(
            "Enter to launch, Esc to go back",
            Vec2::new(cx, vp.height - 40.0),
            16.0,
            Color::WHITE.with_alpha(0.7),
        );
        Ok(())
    }

    fn handle_input(&mut self, keys: &InputState, shared: &mut Shared) -> Result<Option<Transition>> {
        if keys.was_pressed(Action::Cancel) {
            return Ok(Some(Transition::To(StateId::Intro)));
        }
        // Fire stays held into the first play frame, so only Confirm launches
        if keys.was_pressed(Action::Confirm) {
            // A store failure costs persistence, not the run
            if let Err(e) = persistence::save_selection(shared.store.as_mut(), self.cursor) {
                log::warn!("Could not persist selection: {}", e);
            }
            shared.craft = self.cursor;
            log::info!(
                "Selected {} / {}",
                self.cursor.theme().name(),
                self.cursor.ship_id()
            );
            return Ok(Some(Transition::To(StateId::Game)));
        }

        let before = self.cursor;
        if keys.was_pressed(Action::Up) {
            self.cursor = self.cursor.theme().prev().default_craft();
        } else if keys.was_pressed(Action::Down) {
            self.cursor = self.cursor.theme().next().default_craft();
        } else if keys.was_pressed(Action::Left) {
            self.cursor = self.cursor.prev_ship();
        } else if keys.was_pressed(Action::Right) {
            self.cursor = self.cursor.next_ship();
        }
        if self.cursor != before {
            self.publish(shared);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, SHIP_KEY, SessionStore, THEME_KEY};
    use crate::platform::Viewport;
    use crate::theme::{ForestShip, OceanShip, SpaceShip};

    fn ctx() -> FrameContext {
        FrameContext::new(0.0, 0.0, Viewport::default())
    }

    fn press(action: Action) -> InputState {
        let mut keys = InputState::new();
        keys.key_down(action);
        keys
    }

    #[test]
    fn test_enter_restores_stored_selection() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "forest").unwrap();
        store.set(SHIP_KEY, "owl").unwrap();
        let mut shared = Shared::new(Box::new(store));
        let mut screen = CharacterSelectScreen::new();
        screen.enter(Some(StateId::Intro), &mut shared, &ctx()).unwrap();
        assert_eq!(screen.cursor(), Craft::Forest(ForestShip::Owl));
    }

    #[test]
    fn test_ship_from_other_theme_falls_back() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "space").unwrap();
        store.set(SHIP_KEY, "shark").unwrap();
        let mut shared = Shared::new(Box::new(store));
        let mut screen = CharacterSelectScreen::new();
        screen.enter(None, &mut shared, &ctx()).unwrap();
        assert_eq!(screen.cursor(), Craft::Space(SpaceShip::Falcon));
    }

    #[test]
    fn test_navigation_and_confirm_persists() {
        let mut shared = Shared::new(Box::new(MemoryStore::default()));
        let mut screen = CharacterSelectScreen::new();
        screen.enter(None, &mut shared, &ctx()).unwrap();

        screen.handle_input(&press(Action::Down), &mut shared).unwrap();
        assert_eq!(screen.cursor(), Craft::Ocean(OceanShip::Submarine));
        screen.handle_input(&press(Action::Left), &mut shared).unwrap();
        assert_eq!(screen.cursor(), Craft::Ocean(OceanShip::Manta));

        let request = screen.handle_input(&press(Action::Confirm), &mut shared).unwrap();
        assert_eq!(request, Some(Transition::To(StateId::Game)));
        assert_eq!(shared.craft, Craft::Ocean(OceanShip::Manta));
        assert_eq!(shared.store.get(THEME_KEY).as_deref(), Some("ocean"));
        assert_eq!(shared.store.get(SHIP_KEY).as_deref(), Some("manta"));
    }

    #[test]
    fn test_fire_does_not_launch() {
        let mut shared = Shared::new(Box::new(MemoryStore::default()));
        let mut screen = CharacterSelectScreen::new();
        screen.enter(None, &mut shared, &ctx()).unwrap();
        let request = screen.handle_input(&press(Action::Fire), &mut shared).unwrap();
        assert_eq!(request, None);
        assert_eq!(shared.store.get(THEME_KEY), None);
    }

    #[test]
    fn test_cancel_returns_to_intro() {
        let mut shared = Shared::new(Box::new(MemoryStore::default()));
        let mut screen = CharacterSelectScreen::new();
        let request = screen.handle_input(&press(Action::Cancel), &mut shared).unwrap();
        assert_eq!(request, Some(Transition::To(StateId::Intro)));
    }
}
