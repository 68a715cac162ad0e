//! Title screen
//!
//! Left/Right picks the difficulty preset, which is saved with the other
//! settings and applies from the next run.

use glam::Vec2;

use super::{Screen, Shared, StateId, Transition};
use crate::consts::INTRO_FADE_MS;
use crate::platform::{Action, FrameContext, InputState};
use crate::render::{Canvas, Color, Scene};
use crate::settings::Difficulty;
use crate::theme::Sprite;
use crate::ui::Surface;
use crate::{Rect, Result};

#[derive(Debug, Default)]
pub struct IntroScreen {
    /// Set once a start request has been issued so repeated presses during
    /// the fade don't reschedule it
    starting: bool,
}

impl IntroScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen for IntroScreen {
    fn id(&self) -> StateId {
        StateId::Intro
    }

    fn enter(&mut self, _from: Option<StateId>, shared: &mut Shared, _ctx: &FrameContext) -> Result<()> {
        self.starting = false;
        shared.ui.open(Surface::IntroScreen);
        Ok(())
    }

    fn exit(&mut self, _to: StateId, shared: &mut Shared) -> Result<()> {
        shared.ui.close(Surface::IntroScreen);
        Ok(())
    }

    fn update(&mut self, _shared: &mut Shared, _ctx: &FrameContext) -> Result<Option<Transition>> {
        Ok(None)
    }

    fn render(&self, shared: &Shared, ctx: &FrameContext, scene: &mut Scene) -> Result<()> {
        let vp = ctx.viewport;
        let palette = shared.craft.theme().palette();
        scene.clear(palette.background);

        let cx = vp.width / 2.0;
        let cy = vp.height / 2.0;
        scene.text("NOVA STRIKE", Vec2::new(cx, cy - 80.0), 48.0, palette.accent);
        scene.text("Press Enter to start", Vec2::new(cx, cy + 20.0), 20.0, Color::WHITE);
        if shared.best_score > 0 {
            let best = format!("Best: {}", shared.best_score);
            scene.text(&best, Vec2::new(cx, cy + 60.0), 16.0, Color::WHITE);
        }
        let difficulty = format!("< {} >", shared.settings.difficulty.as_str());
        scene.text(&difficulty, Vec2::new(cx, cy + 90.0), 16.0, palette.accent);

        // Last confirmed craft idles at the bottom
        let size = 50.0;
        shared.craft.draw(
            scene,
            Rect::new(cx - size / 2.0, vp.height - size - 40.0, size, size),
        );
        Ok(())
    }

    fn handle_input(&mut self, keys: &InputState, shared: &mut Shared) -> Result<Option<Transition>> {
        if self.starting {
            return Ok(None);
        }
        let current = shared.settings.difficulty;
        if keys.was_pressed(Action::Left) {
            set_difficulty(shared, current.prev());
        } else if keys.was_pressed(Action::Right) {
            set_difficulty(shared, current.next());
        }
        if keys.was_pressed(Action::Confirm) || keys.was_pressed(Action::Fire) {
            self.starting = true;
            return Ok(Some(Transition::After {
                to: StateId::CharacterSelect,
                delay_ms: INTRO_FADE_MS,
            }));
        }
        Ok(None)
    }
}

fn set_difficulty(shared: &mut Shared, difficulty: Difficulty) {
    shared.settings.difficulty = difficulty;
    log::info!("Difficulty set to {}", difficulty.as_str());
    if let Err(e) = shared.settings.save(shared.store.as_mut()) {
        log::warn!("Could not persist settings: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::Viewport;
    use crate::settings::Settings;

    #[test]
    fn test_start_requested_once() {
        let mut shared = Shared::new(Box::new(MemoryStore::default()));
        let ctx = FrameContext::new(0.0, 0.0, Viewport::default());
        let mut intro = IntroScreen::new();
        intro.enter(None, &mut shared, &ctx).unwrap();

        let mut keys = InputState::new();
        assert_eq!(intro.handle_input(&keys, &mut shared).unwrap(), None);

        keys.click();
        let request = intro.handle_input(&keys, &mut shared).unwrap();
        assert!(matches!(
            request,
            Some(Transition::After { to: StateId::CharacterSelect, .. })
        ));
        assert_eq!(intro.handle_input(&keys, &mut shared).unwrap(), None);
    }

    #[test]
    fn test_arrows_cycle_and_save_difficulty() {
        let mut shared = Shared::new(Box::new(MemoryStore::default()));
        let mut intro = IntroScreen::new();

        let mut keys = InputState::new();
        keys.key_down(Action::Right);
        assert_eq!(intro.handle_input(&keys, &mut shared).unwrap(), None);
        assert_eq!(shared.settings.difficulty, Difficulty::Hard);

        let mut keys = InputState::new();
        keys.key_down(Action::Left);
        intro.handle_input(&keys, &mut shared).unwrap();
        intro.handle_input(&keys, &mut shared).unwrap();
        assert_eq!(shared.settings.difficulty, Difficulty::Easy);
        assert_eq!(Settings::load(shared.store.as_ref()).difficulty, Difficulty::Easy);
        assert_eq!(shared.settings.tuning(), Difficulty::Easy.tuning());
    }
}
