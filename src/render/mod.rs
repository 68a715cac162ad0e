//! Scene recording
//!
//! The core never touches a real drawing context. Screens paint into a
//! [`Scene`], a list of primitive draw commands the host replays onto its
//! 2D canvas each frame.

pub mod snapshot;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

pub use snapshot::{EffectView, EnemyView, Snapshot};

/// RGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub rgb: u32,
    pub alpha: f32,
}

impl Color {
    pub const fn rgb(rgb: u32) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            rgb: self.rgb,
            alpha,
        }
    }

    /// CSS `rgba(...)` string for the host canvas
    pub fn to_css(&self) -> String {
        let r = (self.rgb >> 16) & 0xFF;
        let g = (self.rgb >> 8) & 0xFF;
        let b = self.rgb & 0xFF;
        format!("rgba({},{},{},{:.3})", r, g, b, self.alpha.clamp(0.0, 1.0))
    }

    pub const WHITE: Color = Color::rgb(0xFFFFFF);
    pub const BLACK: Color = Color::rgb(0x000000);
    pub const RED: Color = Color::rgb(0xFF3B30);
    pub const GREEN: Color = Color::rgb(0x34C759);
    pub const YELLOW: Color = Color::rgb(0xFFD60A);
}

/// Drawing surface the sprites paint onto
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);
    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}

/// A single recorded primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCmd {
    Clear { color: Color },
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, width: f32 },
    FillTriangle { points: [Vec2; 3], color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    Text { text: String, pos: Vec2, size: f32, color: Color },
}

/// Recording canvas
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub commands: Vec<DrawCmd>,
    /// Camera shake offset applied by the host when replaying
    pub shake: Vec2,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything recorded last frame
    pub fn reset(&mut self) {
        self.commands.clear();
        self.shake = Vec2::ZERO;
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCmd::Clear { color });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether any text command contains `needle` (handy for overlay checks)
    pub fn contains_text(&self, needle: &str) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCmd::Text { text, .. } if text.contains(needle)))
    }
}

impl Canvas for Scene {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands.push(DrawCmd::StrokeRect { rect, color, width });
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.commands.push(DrawCmd::FillTriangle {
            points: [a, b, c],
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }
}

/// Health bar drawn above a damaged enemy
pub fn health_bar(canvas: &mut dyn Canvas, rect: Rect, health: f32, max_health: f32) {
    let bar = Rect::new(rect.x, rect.y - 8.0, rect.w, 4.0);
    let fraction = if max_health > 0.0 {
        (health / max_health).clamp(0.0, 1.0)
    } else {
        0.0
    };
    canvas.fill_rect(bar, Color::RED);
    canvas.fill_rect(Rect::new(bar.x, bar.y, bar.w * fraction, bar.h), Color::GREEN);
}

/// Centered overlay title with an optional subtitle line
pub fn overlay_text(canvas: &mut dyn Canvas, width: f32, height: f32, title: &str, lines: &[&str]) {
    let cx = width / 2.0;
    let cy = height / 2.0;
    canvas.fill_rect(
        Rect::new(0.0, 0.0, width, height),
        Color::BLACK.with_alpha(0.55),
    );
    canvas.text(title, Vec2::new(cx, cy - 40.0), 40.0, Color::WHITE);
    for (i, line) in lines.iter().enumerate() {
        canvas.text(line, Vec2::new(cx, cy + 10.0 + i as f32 * 26.0), 18.0, Color::WHITE);
    }
}
