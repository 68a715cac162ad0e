//! Active play
//!
//! Owns the [`World`]. Every entry starts a fresh run except a resume from
//! Pause, which keeps the world and pushes its deadlines past the pause.

use glam::Vec2;

use super::{Screen, Shared, StateId, Transition};
use crate::Result;
use crate::platform::{Action, FrameContext, InputState, Viewport};
use crate::render::{Canvas, Color, Scene, health_bar};
use crate::settings::Tuning;
use crate::sim::{GameEvent, PowerUpKind, StepOutcome, TickInput, World, laser_beam_rect, tick};
use crate::theme::{Craft, Sprite};
use crate::ui::{Surface, UiCommand};

/// Peak camera offset in pixels at full shake
const SHAKE_PX: f32 = 8.0;

/// Last values pushed to the HUD, to avoid resending unchanged ones
#[derive(Debug, Default)]
struct HudCache {
    score: Option<u64>,
    lives: Option<u8>,
    effects: Vec<String>,
}

#[derive(Debug)]
pub struct GameScreen {
    world: World,
    input: TickInput,
    /// Time of the last simulated frame
    last_frame_ms: f64,
    /// Set while the Pause overlay is up
    paused_at: Option<f64>,
    runs: u64,
    hud: HudCache,
}

impl Default for GameScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl GameScreen {
    pub fn new() -> Self {
        Self {
            world: World::new(0, Viewport::default(), Tuning::default(), Craft::default(), 0.0),
            input: TickInput::default(),
            last_frame_ms: 0.0,
            paused_at: None,
            runs: 0,
            hud: HudCache::default(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access (debug hooks and tests)
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Number of runs started on this screen
    pub fn runs(&self) -> u64 {
        self.runs
    }

    fn start_run(&mut self, shared: &Shared, ctx: &FrameContext) {
        self.runs += 1;
        let seed = (ctx.now_ms.to_bits() ^ self.runs.wrapping_mul(0x9E37_79B9_7F4A_7C15)) | 1;
        self.world.tuning = shared.settings.tuning();
        self.world.reset(seed, ctx.viewport, shared.craft, ctx.now_ms);
        self.world.particles_enabled = shared.settings.particles;
        self.input = TickInput::default();
        self.last_frame_ms = ctx.now_ms;
        log::info!(
            "Run {} started ({} / {}, {} difficulty, seed {})",
            self.runs,
            shared.craft.theme().name(),
            shared.craft.ship_id(),
            shared.settings.difficulty.as_str(),
            seed
        );
    }

    fn effect_labels(&self, now_ms: f64) -> Vec<String> {
        self.world
            .effects
            .iter()
            .map(|e| {
                let secs = ((e.end_ms - now_ms).max(0.0) / 1000.0).ceil();
                format!("{} {}s", e.kind.label(), secs)
            })
            .collect()
    }

    fn sync_hud(&mut self, shared: &mut Shared, now_ms: f64) {
        if self.hud.score != Some(self.world.score) {
            self.hud.score = Some(self.world.score);
            shared.ui.push(UiCommand::SetScore(self.world.score));
        }
        if self.hud.lives != Some(self.world.lives) {
            self.hud.lives = Some(self.world.lives);
            shared.ui.push(UiCommand::SetLives(self.world.lives));
        }
        let labels = self.effect_labels(now_ms);
        if labels != self.hud.effects {
            shared.ui.push(UiCommand::SetEffects(labels.clone()));
            self.hud.effects = labels;
        }
    }

    fn log_events(&self) {
        for event in &self.world.events {
            match event {
                GameEvent::PlayerHit { lives_left } => {
                    log::info!("Player hit, {} lives left", lives_left)
                }
                GameEvent::PickupSpawned { kind } => log::debug!("{} dropped", kind.label()),
                other => log::trace!("{:?}", other),
            }
        }
    }

    fn draw_world(&self, scene: &mut Scene, now_ms: f64) {
        let world = &self.world;
        let theme = world.player.craft.theme();
        let palette = theme.palette();

        for p in &world.particles {
            scene.fill_circle(p.pos, p.size / 2.0, p.color.with_alpha(p.fade()));
        }

        for pickup in world.pickups.iter().filter(|p| !p.collected) {
            let rect = pickup.rect();
            scene.fill_circle(rect.center(), rect.w / 2.0, pickup.kind.color());
            scene.stroke_rect(rect, Color::WHITE.with_alpha(0.6), 1.0);
        }

        for enemy in &world.enemies {
            let rect = enemy.rect();
            theme.draw_enemy(scene, rect);
            if enemy.health_bar_visible {
                health_bar(scene, rect, enemy.health, enemy.max_health);
            }
        }

        let bullet_color = if world.player.flags.explosive {
            PowerUpKind::ExplosiveRounds.color()
        } else {
            palette.bullet
        };
        for bullet in &world.bullets {
            scene.fill_rect(bullet.rect(), bullet_color);
        }

        if world.player.flags.laser {
            // Slight flicker so the beam reads as live
            let alpha = 0.65 + 0.2 * ((now_ms * 0.03).sin() as f32);
            scene.fill_rect(
                laser_beam_rect(&world.player),
                PowerUpKind::LaserBeam.color().with_alpha(alpha),
            );
        }

        let player_rect = world.player.rect();
        world.player.craft.draw(scene, player_rect);
        if world.player.flags.shield {
            scene.fill_circle(
                player_rect.center(),
                player_rect.w * 0.8,
                PowerUpKind::ShieldGenerator.color().with_alpha(0.25),
            );
        }
    }

    fn draw_hud(&self, shared: &Shared, ctx: &FrameContext, scene: &mut Scene) {
        let vp = ctx.viewport;
        let score = format!("Score: {}", self.world.score);
        let lives = format!("Lives: {}", self.world.lives);
        scene.text(&score, Vec2::new(70.0, 30.0), 20.0, Color::WHITE);
        scene.text(&lives, Vec2::new(vp.width - 70.0, 30.0), 20.0, Color::WHITE);

        for (i, effect) in self.world.effects.iter().enumerate() {
            let secs = ((effect.end_ms - ctx.now_ms).max(0.0) / 1000.0).ceil();
            let label = format!("{} {}s", effect.kind.label(), secs);
            scene.text(
                &label,
                Vec2::new(70.0, 60.0 + i as f32 * 20.0),
                14.0,
                effect.kind.color(),
            );
        }

        if shared.settings.show_fps && ctx.dt > 0.0 {
            let fps = format!("{:.0} fps", 1.0 / ctx.dt);
            scene.text(&fps, Vec2::new(vp.width - 50.0, vp.height - 20.0), 12.0, Color::YELLOW);
        }
    }
}

impl Screen for GameScreen {
    fn id(&self) -> StateId {
        StateId::Game
    }

    fn enter(&mut self, from: Option<StateId>, shared: &mut Shared, ctx: &FrameContext) -> Result<()> {
        match (from, self.paused_at.take()) {
            (Some(StateId::Pause), Some(paused_at)) => {
                let paused_for = (ctx.now_ms - paused_at).max(0.0);
                self.world.shift_clock(paused_for);
                self.last_frame_ms = ctx.now_ms;
                log::info!("Resumed after {:.0}ms", paused_for);
            }
            _ => self.start_run(shared, ctx),
        }

        shared.ui.open(Surface::Hud);
        self.hud = HudCache::default();
        self.sync_hud(shared, ctx.now_ms);
        Ok(())
    }

    fn exit(&mut self, to: StateId, shared: &mut Shared) -> Result<()> {
        if to == StateId::Pause {
            self.paused_at = Some(self.last_frame_ms);
        }
        self.input = TickInput::default();
        shared.ui.close(Surface::Hud);
        Ok(())
    }

    fn update(&mut self, shared: &mut Shared, ctx: &FrameContext) -> Result<Option<Transition>> {
        self.last_frame_ms = ctx.now_ms;
        let outcome = tick(&mut self.world, &self.input, ctx);
        self.log_events();
        self.sync_hud(shared, ctx.now_ms);

        match outcome {
            StepOutcome::Continue => Ok(None),
            StepOutcome::GameOver { final_score } => {
                shared.record_score(final_score);
                log::info!("Game over, final score {}", final_score);
                Ok(Some(Transition::To(StateId::GameOver)))
            }
        }
    }

    fn render(&self, shared: &Shared, ctx: &FrameContext, scene: &mut Scene) -> Result<()> {
        let palette = self.world.player.craft.theme().palette();
        scene.clear(palette.background);
        if shared.settings.effective_screen_shake() && self.world.shake > 0.0 {
            let t = ctx.now_ms * 0.05;
            scene.shake = Vec2::new(t.sin() as f32, (t * 1.3).cos() as f32) * self.world.shake * SHAKE_PX;
        }
        self.draw_world(scene, ctx.now_ms);
        self.draw_hud(shared, ctx, scene);
        Ok(())
    }

    fn handle_input(&mut self, keys: &InputState, _shared: &mut Shared) -> Result<Option<Transition>> {
        if keys.was_pressed(Action::Pause) || keys.was_pressed(Action::Cancel) {
            self.input = TickInput::default();
            return Ok(Some(Transition::To(StateId::Pause)));
        }
        self.input = TickInput::from_keys(keys);
        Ok(None)
    }
}
