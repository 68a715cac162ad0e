//! Error types for configuration and frame-loop failures

use thiserror::Error;

use crate::screens::StateId;

/// Errors raised by the game core
#[derive(Debug, Error)]
pub enum GameError {
    /// State name could not be parsed
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// State registered twice
    #[error("state already registered: {0}")]
    DuplicateState(StateId),

    /// Registered under a name that belongs to a different screen
    #[error("state {state} cannot be registered as {name}")]
    StateMismatch { name: StateId, state: StateId },

    /// Transition target was never registered
    #[error("state not registered: {0}")]
    UnregisteredState(StateId),

    /// Power-up name not in the catalog
    #[error("unknown power-up type: {0}")]
    UnknownPowerUp(String),

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// Ship id that does not exist under the given theme
    #[error("unknown ship {ship} for theme {theme}")]
    UnknownShip { theme: String, ship: String },

    /// Required DOM element missing at startup
    #[error("missing element: {0}")]
    MissingElement(String),

    /// Canvas or its 2D context is unavailable (fatal)
    #[error("canvas unavailable")]
    CanvasUnavailable,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
