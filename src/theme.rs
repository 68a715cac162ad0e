//! Themes and player craft
//!
//! A craft is a tagged variant of theme × ship. Each variant knows how to
//! paint itself, so no drawing routine is ever looked up by name.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::render::{Canvas, Color};
use crate::{GameError, Rect, Result};

/// Anything that can paint itself into a rectangle
pub trait Sprite {
    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect);
}

/// Visual theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Space,
    Ocean,
    Forest,
}

/// Colors used by a theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub enemy: Color,
    pub bullet: Color,
    pub accent: Color,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Space, Theme::Ocean, Theme::Forest];

    /// Identifier stored in the session
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Space => "space",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
        }
    }

    pub fn from_name(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "space" => Ok(Theme::Space),
            "ocean" => Ok(Theme::Ocean),
            "forest" => Ok(Theme::Forest),
            _ => Err(GameError::UnknownTheme(s.to_string())),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Space => "Deep Space",
            Theme::Ocean => "Ocean Depths",
            Theme::Forest => "Enchanted Forest",
        }
    }

    /// Ships available under this theme, first one is the default
    pub fn crafts(&self) -> &'static [Craft] {
        match self {
            Theme::Space => &[
                Craft::Space(SpaceShip::Falcon),
                Craft::Space(SpaceShip::Viper),
                Craft::Space(SpaceShip::Nova),
            ],
            Theme::Ocean => &[
                Craft::Ocean(OceanShip::Submarine),
                Craft::Ocean(OceanShip::Shark),
                Craft::Ocean(OceanShip::Manta),
            ],
            Theme::Forest => &[
                Craft::Forest(ForestShip::Hawk),
                Craft::Forest(ForestShip::Owl),
                Craft::Forest(ForestShip::Dragonfly),
            ],
        }
    }

    pub fn default_craft(&self) -> Craft {
        self.crafts()[0]
    }

    pub fn next(&self) -> Theme {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Theme {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Space => Palette {
                background: Color::rgb(0x05060F),
                enemy: Color::rgb(0xE0457B),
                bullet: Color::rgb(0x7DF9FF),
                accent: Color::rgb(0x9B5DE5),
            },
            Theme::Ocean => Palette {
                background: Color::rgb(0x02253D),
                enemy: Color::rgb(0xF4A259),
                bullet: Color::rgb(0xBDE0FE),
                accent: Color::rgb(0x00B4D8),
            },
            Theme::Forest => Palette {
                background: Color::rgb(0x0B2612),
                enemy: Color::rgb(0x8D5524),
                bullet: Color::rgb(0xF6FF99),
                accent: Color::rgb(0x70E000),
            },
        }
    }

    /// Paint an enemy in this theme's style
    pub fn draw_enemy(&self, canvas: &mut dyn Canvas, rect: Rect) {
        let color = self.palette().enemy;
        let c = rect.center();
        match self {
            Theme::Space => {
                canvas.fill_triangle(
                    Vec2::new(rect.x, rect.y),
                    Vec2::new(rect.x + rect.w, rect.y),
                    Vec2::new(c.x, rect.bottom()),
                    color,
                );
            }
            Theme::Ocean => {
                canvas.fill_circle(c, rect.w.min(rect.h) / 2.0, color);
                canvas.fill_circle(
                    Vec2::new(c.x - rect.w * 0.15, c.y),
                    rect.w * 0.08,
                    Color::WHITE,
                );
            }
            Theme::Forest => {
                canvas.fill_rect(rect, color);
                canvas.fill_rect(
                    Rect::new(rect.x + rect.w * 0.2, rect.y + rect.h * 0.3, rect.w * 0.6, rect.h * 0.2),
                    Color::BLACK,
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceShip {
    Falcon,
    Viper,
    Nova,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OceanShip {
    Submarine,
    Shark,
    Manta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForestShip {
    Hawk,
    Owl,
    Dragonfly,
}

/// Player craft: a theme together with one of its ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Craft {
    Space(SpaceShip),
    Ocean(OceanShip),
    Forest(ForestShip),
}

impl Default for Craft {
    fn default() -> Self {
        Theme::default().default_craft()
    }
}

impl Craft {
    pub fn theme(&self) -> Theme {
        match self {
            Craft::Space(_) => Theme::Space,
            Craft::Ocean(_) => Theme::Ocean,
            Craft::Forest(_) => Theme::Forest,
        }
    }

    /// Ship identifier stored in the session
    pub fn ship_id(&self) -> &'static str {
        match self {
            Craft::Space(SpaceShip::Falcon) => "falcon",
            Craft::Space(SpaceShip::Viper) => "viper",
            Craft::Space(SpaceShip::Nova) => "nova",
            Craft::Ocean(OceanShip::Submarine) => "submarine",
            Craft::Ocean(OceanShip::Shark) => "shark",
            Craft::Ocean(OceanShip::Manta) => "manta",
            Craft::Forest(ForestShip::Hawk) => "hawk",
            Craft::Forest(ForestShip::Owl) => "owl",
            Craft::Forest(ForestShip::Dragonfly) => "dragonfly",
        }
    }

    /// Resolve stored identifiers; the ship must belong to the theme
    pub fn parse(theme: &str, ship: &str) -> Result<Self> {
        let theme_value = Theme::from_name(theme)?;
        theme_value
            .crafts()
            .iter()
            .copied()
            .find(|c| c.ship_id() == ship.to_lowercase())
            .ok_or_else(|| GameError::UnknownShip {
                theme: theme.to_string(),
                ship: ship.to_string(),
            })
    }

    pub fn display_name(&self) -> String {
        let id = self.ship_id();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Next ship within the same theme (wraps)
    pub fn next_ship(&self) -> Craft {
        let crafts = self.theme().crafts();
        let i = crafts.iter().position(|c| c == self).unwrap_or(0);
        crafts[(i + 1) % crafts.len()]
    }

    pub fn prev_ship(&self) -> Craft {
        let crafts = self.theme().crafts();
        let i = crafts.iter().position(|c| c == self).unwrap_or(0);
        crafts[(i + crafts.len() - 1) % crafts.len()]
    }
}

impl Sprite for Craft {
    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        let accent = self.theme().palette().accent;
        match self {
            Craft::Space(ship) => ship.draw(canvas, rect),
            Craft::Ocean(ship) => ship.draw(canvas, rect),
            Craft::Forest(ship) => ship.draw(canvas, rect),
        }
        // Cockpit marker shared by every craft
        canvas.fill_circle(rect.center(), rect.w * 0.08, accent);
    }
}

impl Sprite for SpaceShip {
    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        let nose = Vec2::new(rect.center().x, rect.y);
        let left = Vec2::new(rect.x, rect.bottom());
        let right = Vec2::new(rect.x + rect.w, rect.bottom());
        match self {
            SpaceShip::Falcon => canvas.fill_triangle(nose, left, right, Color::rgb(0xC0C0C0)),
            SpaceShip::Viper => {
                canvas.fill_triangle(nose, left, right, Color::rgb(0x2EC4B6));
                canvas.fill_rect(
                    Rect::new(rect.x, rect.y + rect.h * 0.6, rect.w, rect.h * 0.15),
                    Color::rgb(0x2EC4B6),
                );
            }
            SpaceShip::Nova => {
                canvas.fill_triangle(nose, left, right, Color::rgb(0xFF9F1C));
                canvas.fill_circle(
                    Vec2::new(rect.center().x, rect.bottom()),
                    rect.w * 0.15,
                    Color::YELLOW,
                );
            }
        }
    }
}

impl Sprite for OceanShip {
    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        let c = rect.center();
        match self {
            OceanShip::Submarine => {
                canvas.fill_rect(
                    Rect::new(rect.x + rect.w * 0.25, rect.y, rect.w * 0.5, rect.h),
                    Color::YELLOW,
                );
            }
            OceanShip::Shark => {
                canvas.fill_triangle(
                    Vec2::new(c.x, rect.y),
                    Vec2::new(rect.x + rect.w * 0.2, rect.bottom()),
                    Vec2::new(rect.x + rect.w * 0.8, rect.bottom()),
                    Color::rgb(0x8D99AE),
                );
            }
            OceanShip::Manta => {
                canvas.fill_triangle(
                    Vec2::new(c.x, rect.y + rect.h * 0.3),
                    Vec2::new(rect.x, rect.y + rect.h * 0.7),
                    Vec2::new(rect.x + rect.w, rect.y + rect.h * 0.7),
                    Color::rgb(0x3A0CA3),
                );
                canvas.fill_rect(
                    Rect::new(c.x - 2.0, rect.y + rect.h * 0.6, 4.0, rect.h * 0.4),
                    Color::rgb(0x3A0CA3),
                );
            }
        }
    }
}

impl Sprite for ForestShip {
    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        let c = rect.center();
        match self {
            ForestShip::Hawk => {
                canvas.fill_triangle(
                    Vec2::new(c.x, rect.y),
                    Vec2::new(rect.x, c.y),
                    Vec2::new(rect.x + rect.w, c.y),
                    Color::rgb(0x6F4E37),
                );
                canvas.fill_rect(
                    Rect::new(c.x - rect.w * 0.1, c.y, rect.w * 0.2, rect.h / 2.0),
                    Color::rgb(0x6F4E37),
                );
            }
            ForestShip::Owl => {
                canvas.fill_circle(c, rect.w * 0.45, Color::rgb(0xA47148));
                canvas.fill_circle(Vec2::new(c.x - 8.0, c.y - 5.0), 5.0, Color::YELLOW);
                canvas.fill_circle(Vec2::new(c.x + 8.0, c.y - 5.0), 5.0, Color::YELLOW);
            }
            ForestShip::Dragonfly => {
                canvas.fill_rect(
                    Rect::new(c.x - 3.0, rect.y, 6.0, rect.h),
                    Color::rgb(0x38B000),
                );
                canvas.fill_rect(
                    Rect::new(rect.x, rect.y + rect.h * 0.25, rect.w, rect.h * 0.12),
                    Color::rgb(0xCCFF33).with_alpha(0.7),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Scene;

    #[test]
    fn test_default_craft_is_first_ship_of_first_theme() {
        assert_eq!(Craft::default(), Craft::Space(SpaceShip::Falcon));
        assert_eq!(Theme::ALL[0].default_craft(), Craft::default());
    }

    #[test]
    fn test_parse_rejects_cross_theme_ship() {
        assert!(Craft::parse("forest", "owl").is_ok());
        assert!(matches!(
            Craft::parse("forest", "shark"),
            Err(GameError::UnknownShip { .. })
        ));
        assert!(matches!(
            Craft::parse("lava", "owl"),
            Err(GameError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_ship_cycling_stays_in_theme() {
        let mut craft = Craft::Ocean(OceanShip::Submarine);
        for _ in 0..5 {
            craft = craft.next_ship();
            assert_eq!(craft.theme(), Theme::Ocean);
        }
        assert_eq!(Craft::Ocean(OceanShip::Submarine).prev_ship(), Craft::Ocean(OceanShip::Manta));
    }

    #[test]
    fn test_every_craft_draws_something() {
        for theme in Theme::ALL {
            for craft in theme.crafts() {
                let mut scene = Scene::new();
                craft.draw(&mut scene, Rect::new(0.0, 0.0, 50.0, 50.0));
                assert!(scene.len() >= 2, "{:?} drew nothing", craft);
            }
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Craft::Forest(ForestShip::Dragonfly).display_name(), "Dragonfly");
    }
}
