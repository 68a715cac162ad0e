//! Run summary over the frozen final frame

use super::{Screen, Shared, StateId, Transition};
use crate::Result;
use crate::platform::{Action, FrameContext, InputState};
use crate::render::{Scene, overlay_text};
use crate::ui::{Surface, UiCommand};

#[derive(Debug, Default)]
pub struct GameOverScreen {
    final_score: u64,
    best_score: u64,
}

impl GameOverScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn final_score(&self) -> u64 {
        self.final_score
    }
}

impl Screen for GameOverScreen {
    fn id(&self) -> StateId {
        StateId::GameOver
    }

    fn enter(&mut self, _from: Option<StateId>, shared: &mut Shared, _ctx: &FrameContext) -> Result<()> {
        self.final_score = shared.last_score;
        self.best_score = shared.best_score;
        shared.ui.open(Surface::GameOverScreen);
        shared.ui.push(UiCommand::SetFinalScore {
            score: self.final_score,
            best: self.best_score,
        });
        Ok(())
    }

    fn exit(&mut self, _to: StateId, shared: &mut Shared) -> Result<()> {
        shared.ui.close(Surface::GameOverScreen);
        Ok(())
    }

    fn update(&mut self, _shared: &mut Shared, _ctx: &FrameContext) -> Result<Option<Transition>> {
        Ok(None)
    }

    fn render(&self, _shared: &Shared, ctx: &FrameContext, scene: &mut Scene) -> Result<()> {
        let vp = ctx.viewport;
        let score = format!("Final score: {}", self.final_score);
        let best = format!("Best: {}", self.best_score);
        overlay_text(
            scene,
            vp.width,
            vp.height,
            "GAME OVER",
            &[score.as_str(), best.as_str(), "R restart, C change craft, M main menu"],
        );
        Ok(())
    }

    fn handle_input(&mut self, keys: &InputState, _shared: &mut Shared) -> Result<Option<Transition>> {
        let target = if keys.was_pressed(Action::Restart) || keys.was_pressed(Action::Confirm) {
            Some(StateId::Game)
        } else if keys.was_pressed(Action::CharacterSelect) {
            Some(StateId::CharacterSelect)
        } else if keys.was_pressed(Action::MainMenu) || keys.was_pressed(Action::Cancel) {
            Some(StateId::Intro)
        } else {
            None
        };
        Ok(target.map(Transition::To))
    }

    fn underlay(&self) -> Option<StateId> {
        Some(StateId::Game)
    }
}
