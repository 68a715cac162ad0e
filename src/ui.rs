//! Commands to the DOM collaborator
//!
//! Screens never touch elements directly. They queue [`UiCommand`]s that the
//! host drains once per frame; [`Ui`] also tracks which surfaces are shown
//! and which input scopes are attached so enter/exit symmetry is testable.

use std::collections::BTreeSet;

/// A screen-level UI surface (one DOM overlay each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Surface {
    IntroScreen,
    CharacterSelectScreen,
    Hud,
    PauseMenu,
    GameOverScreen,
}

impl Surface {
    /// DOM element id
    pub fn element_id(&self) -> &'static str {
        match self {
            Surface::IntroScreen => "intro-screen",
            Surface::CharacterSelectScreen => "character-select",
            Surface::Hud => "hud",
            Surface::PauseMenu => "pause-menu",
            Surface::GameOverScreen => "game-over",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    Show(Surface),
    Hide(Surface),
    /// Start routing key events for this surface
    AttachInput(Surface),
    DetachInput(Surface),
    SetScore(u64),
    SetLives(u8),
    SetFinalScore { score: u64, best: u64 },
    SetSelection { theme: String, ship: String },
    SetEffects(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct Ui {
    outbox: Vec<UiCommand>,
    visible: BTreeSet<Surface>,
    listening: BTreeSet<Surface>,
}

impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, surface: Surface) {
        self.visible.insert(surface);
        self.outbox.push(UiCommand::Show(surface));
    }

    pub fn hide(&mut self, surface: Surface) {
        self.visible.remove(&surface);
        self.outbox.push(UiCommand::Hide(surface));
    }

    pub fn attach_input(&mut self, surface: Surface) {
        self.listening.insert(surface);
        self.outbox.push(UiCommand::AttachInput(surface));
    }

    pub fn detach_input(&mut self, surface: Surface) {
        self.listening.remove(&surface);
        self.outbox.push(UiCommand::DetachInput(surface));
    }

    /// Show a surface and start listening on it
    pub fn open(&mut self, surface: Surface) {
        self.show(surface);
        self.attach_input(surface);
    }

    /// Exact inverse of [`Ui::open`]
    pub fn close(&mut self, surface: Surface) {
        self.detach_input(surface);
        self.hide(surface);
    }

    pub fn push(&mut self, command: UiCommand) {
        self.outbox.push(command);
    }

    pub fn is_visible(&self, surface: Surface) -> bool {
        self.visible.contains(&surface)
    }

    pub fn is_listening(&self, surface: Surface) -> bool {
        self.listening.contains(&surface)
    }

    pub fn visible(&self) -> impl Iterator<Item = Surface> + '_ {
        self.visible.iter().copied()
    }

    pub fn listening(&self) -> impl Iterator<Item = Surface> + '_ {
        self.listening.iter().copied()
    }

    /// Hand the queued commands to the host
    pub fn drain(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending(&self) -> &[UiCommand] {
        &self.outbox
    }
}
