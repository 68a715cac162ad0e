//! Screen state machine
//!
//! Exactly one screen is current. Screens are a closed set of variants,
//! each holding only its own data; play-session data lives in the Game
//! screen's [`World`](crate::sim::World), and the little that crosses
//! screens (chosen craft, last score, UI outbox, storage) lives in
//! [`Shared`].

pub mod character_select;
pub mod game;
pub mod game_over;
pub mod intro;
pub mod machine;
pub mod pause;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, SessionStore};
use crate::platform::{FrameContext, InputState};
use crate::render::Scene;
use crate::settings::Settings;
use crate::theme::Craft;
use crate::ui::Ui;
use crate::{GameError, Result};

pub use character_select::CharacterSelectScreen;
pub use game::GameScreen;
pub use game_over::GameOverScreen;
pub use intro::IntroScreen;
pub use machine::{LifecycleStats, PendingTransition, StateMachine};
pub use pause::PauseScreen;

/// Names of the screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StateId {
    Intro,
    CharacterSelect,
    Game,
    Pause,
    GameOver,
}

impl StateId {
    pub const ALL: [StateId; 5] = [
        StateId::Intro,
        StateId::CharacterSelect,
        StateId::Game,
        StateId::Pause,
        StateId::GameOver,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StateId::Intro => "Intro",
            StateId::CharacterSelect => "CharacterSelect",
            StateId::Game => "Game",
            StateId::Pause => "Pause",
            StateId::GameOver => "GameOver",
        }
    }

    pub fn from_name(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::UnknownState(s.to_string()))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A screen's request to move elsewhere
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Switch before the next frame
    To(StateId),
    /// Switch once `delay_ms` has passed (fade-out)
    After { to: StateId, delay_ms: f64 },
}

/// Data shared between screens
pub struct Shared {
    pub ui: Ui,
    pub store: Box<dyn SessionStore>,
    pub settings: Settings,
    /// Craft confirmed on the selection screen
    pub craft: Craft,
    /// Final score of the most recent run
    pub last_score: u64,
    /// Best score this session
    pub best_score: u64,
}

impl Shared {
    /// Restore settings and the last confirmed craft from `store`
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        let settings = Settings::load(store.as_ref());
        let craft = persistence::load_selection(store.as_ref());
        Self {
            ui: Ui::new(),
            store,
            settings,
            craft,
            last_score: 0,
            best_score: 0,
        }
    }

    /// Record a finished run
    pub fn record_score(&mut self, score: u64) {
        self.last_score = score;
        self.best_score = self.best_score.max(score);
    }
}

/// Lifecycle every screen implements
pub trait Screen {
    fn id(&self) -> StateId;

    /// Called when the screen becomes current; `from` is the outgoing screen
    fn enter(&mut self, from: Option<StateId>, shared: &mut Shared, ctx: &FrameContext) -> Result<()>;

    /// Called when the screen stops being current; must undo `enter`
    fn exit(&mut self, to: StateId, shared: &mut Shared) -> Result<()>;

    fn update(&mut self, shared: &mut Shared, ctx: &FrameContext) -> Result<Option<Transition>>;

    fn render(&self, shared: &Shared, ctx: &FrameContext, scene: &mut Scene) -> Result<()>;

    fn handle_input(&mut self, keys: &InputState, shared: &mut Shared) -> Result<Option<Transition>>;

    /// Screen drawn underneath this one (overlays such as Pause)
    fn underlay(&self) -> Option<StateId> {
        None
    }
}

/// Tagged variant over all screens
pub enum ScreenState {
    Intro(IntroScreen),
    CharacterSelect(CharacterSelectScreen),
    Game(Box<GameScreen>),
    Pause(PauseScreen),
    GameOver(GameOverScreen),
}

impl ScreenState {
    /// Fresh instance of the screen named `id`
    pub fn for_id(id: StateId) -> Self {
        match id {
            StateId::Intro => ScreenState::Intro(IntroScreen::new()),
            StateId::CharacterSelect => ScreenState::CharacterSelect(CharacterSelectScreen::new()),
            StateId::Game => ScreenState::Game(Box::new(GameScreen::new())),
            StateId::Pause => ScreenState::Pause(PauseScreen::new()),
            StateId::GameOver => ScreenState::GameOver(GameOverScreen::new()),
        }
    }

    pub fn as_screen(&self) -> &dyn Screen {
        match self {
            ScreenState::Intro(s) => s,
            ScreenState::CharacterSelect(s) => s,
            ScreenState::Game(s) => s.as_ref(),
            ScreenState::Pause(s) => s,
            ScreenState::GameOver(s) => s,
        }
    }

    pub fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ScreenState::Intro(s) => s,
            ScreenState::CharacterSelect(s) => s,
            ScreenState::Game(s) => s.as_mut(),
            ScreenState::Pause(s) => s,
            ScreenState::GameOver(s) => s,
        }
    }

    pub fn id(&self) -> StateId {
        self.as_screen().id()
    }
}
