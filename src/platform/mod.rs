//! Platform abstraction layer
//!
//! Everything the host hands the core each frame:
//! - Logical input actions and the key-state map
//! - Canvas size
//! - Wall-clock time

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Logical input identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Primary action (fire)
    Fire,
    Confirm,
    Cancel,
    Pause,
    Restart,
    MainMenu,
    CharacterSelect,
}

impl Action {
    /// Map a browser `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Action::Up),
            "ArrowDown" | "s" | "S" => Some(Action::Down),
            "ArrowLeft" | "a" | "A" => Some(Action::Left),
            "ArrowRight" | "d" | "D" => Some(Action::Right),
            " " => Some(Action::Fire),
            "Enter" => Some(Action::Confirm),
            "Escape" | "Backspace" => Some(Action::Cancel),
            "p" | "P" => Some(Action::Pause),
            "r" | "R" => Some(Action::Restart),
            "m" | "M" => Some(Action::MainMenu),
            "c" | "C" => Some(Action::CharacterSelect),
            _ => None,
        }
    }
}

/// Key-state map filled asynchronously by the host, read once per frame.
///
/// Held actions drive movement and fire; press edges drive menus so that a
/// key held across frames triggers a menu action only once.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, action: Action) {
        // Auto-repeat keydown events must not re-trigger the edge
        if self.held.insert(action) {
            self.pressed.insert(action);
        }
    }

    pub fn key_up(&mut self, action: Action) {
        self.held.remove(&action);
    }

    /// Pointer click counts as a one-frame Confirm press
    pub fn click(&mut self) {
        self.pressed.insert(Action::Confirm);
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Clear press edges once the frame has consumed them
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Drop everything (focus loss)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    /// Horizontal/vertical direction from held keys, each in {-1, 0, 1}
    pub fn axis(&self) -> (f32, f32) {
        let mut x = 0.0;
        let mut y = 0.0;
        if self.is_held(Action::Left) {
            x -= 1.0;
        }
        if self.is_held(Action::Right) {
            x += 1.0;
        }
        if self.is_held(Action::Up) {
            y -= 1.0;
        }
        if self.is_held(Action::Down) {
            y += 1.0;
        }
        (x, y)
    }
}

/// Canvas dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Per-frame timing and canvas info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Wall-clock time in milliseconds
    pub now_ms: f64,
    /// Seconds since the previous frame
    pub dt: f32,
    pub viewport: Viewport,
}

impl FrameContext {
    pub fn new(now_ms: f64, dt: f32, viewport: Viewport) -> Self {
        Self {
            now_ms,
            dt,
            viewport,
        }
    }

    /// Next frame `dt` seconds later
    pub fn advance(&self, dt: f32) -> Self {
        Self {
            now_ms: self.now_ms + dt as f64 * 1000.0,
            dt,
            viewport: self.viewport,
        }
    }
}
