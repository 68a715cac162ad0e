//! Pause overlay, drawn on top of the screen it paused

use super::{Screen, Shared, StateId, Transition};
use crate::Result;
use crate::platform::{Action, FrameContext, InputState};
use crate::render::{Scene, overlay_text};
use crate::ui::Surface;

#[derive(Debug)]
pub struct PauseScreen {
    return_to: StateId,
}

impl Default for PauseScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl PauseScreen {
    pub fn new() -> Self {
        Self {
            return_to: StateId::Game,
        }
    }

    /// Screen that resuming goes back to
    pub fn return_to(&self) -> StateId {
        self.return_to
    }
}

impl Screen for PauseScreen {
    fn id(&self) -> StateId {
        StateId::Pause
    }

    fn enter(&mut self, from: Option<StateId>, shared: &mut Shared, _ctx: &FrameContext) -> Result<()> {
        // Re-entering Pause from itself keeps the original target
        match from {
            Some(StateId::Pause) | None => {}
            Some(id) => self.return_to = id,
        }
        shared.ui.open(Surface::PauseMenu);
        Ok(())
    }

    fn exit(&mut self, _to: StateId, shared: &mut Shared) -> Result<()> {
        shared.ui.close(Surface::PauseMenu);
        Ok(())
    }

    fn update(&mut self, _shared: &mut Shared, _ctx: &FrameContext) -> Result<Option<Transition>> {
        Ok(None)
    }

    fn render(&self, _shared: &Shared, ctx: &FrameContext, scene: &mut Scene) -> Result<()> {
        let vp = ctx.viewport;
        overlay_text(
            scene,
            vp.width,
            vp.height,
            "PAUSED",
            &["P / Esc / Enter to resume", "M for main menu"],
        );
        Ok(())
    }

    fn handle_input(&mut self, keys: &InputState, _shared: &mut Shared) -> Result<Option<Transition>> {
        if keys.was_pressed(Action::MainMenu) {
            return Ok(Some(Transition::To(StateId::Intro)));
        }
        let resume = [Action::Pause, Action::Cancel, Action::Confirm]
            .into_iter()
            .any(|a| keys.was_pressed(a));
        if resume {
            return Ok(Some(Transition::To(self.return_to)));
        }
        Ok(None)
    }

    fn underlay(&self) -> Option<StateId> {
        Some(self.return_to)
    }
}
