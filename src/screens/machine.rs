//! The state machine that owns every screen
//!
//! Errors coming out of a screen callback are logged here and never
//! propagated, so a faulty screen degrades a frame instead of stopping
//! the loop.

use std::collections::BTreeMap;

use super::{ScreenState, Shared, StateId, Transition};
use crate::platform::{FrameContext, InputState, Viewport};
use crate::render::{Canvas, Color, Scene, Snapshot};
use crate::{GameError, Rect, Result};

/// A transition waiting for its deadline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTransition {
    pub to: StateId,
    pub deadline_ms: f64,
    pub delay_ms: f64,
}

impl PendingTransition {
    /// Fade progress in 0-1 at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.delay_ms <= 0.0 {
            return 1.0;
        }
        (1.0 - (self.deadline_ms - now_ms) / self.delay_ms).clamp(0.0, 1.0) as f32
    }
}

/// Lifecycle call counters for one screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleStats {
    pub enters: u32,
    pub exits: u32,
}

pub struct StateMachine {
    states: BTreeMap<StateId, ScreenState>,
    current: Option<StateId>,
    pending: Option<PendingTransition>,
    shared: Shared,
    clock: FrameContext,
    scene: Scene,
    stats: BTreeMap<StateId, LifecycleStats>,
}

impl StateMachine {
    /// Empty machine with no current screen
    pub fn new(shared: Shared) -> Self {
        Self {
            states: BTreeMap::new(),
            current: None,
            pending: None,
            shared,
            clock: FrameContext::new(0.0, 0.0, Viewport::default()),
            scene: Scene::new(),
            stats: BTreeMap::new(),
        }
    }

    /// Machine with all five screens registered, not yet started
    pub fn with_default_states(shared: Shared) -> Self {
        let mut machine = Self::new(shared);
        for id in StateId::ALL {
            if let Err(e) = machine.register(id, ScreenState::for_id(id)) {
                log::error!("Failed to register {}: {}", id, e);
            }
        }
        machine
    }

    /// Add a screen under `id`
    pub fn register(&mut self, id: StateId, state: ScreenState) -> Result<()> {
        if self.states.contains_key(&id) {
            log::error!("State {} registered twice", id);
            return Err(GameError::DuplicateState(id));
        }
        if state.id() != id {
            log::error!("State {} offered under name {}", state.id(), id);
            return Err(GameError::StateMismatch {
                name: id,
                state: state.id(),
            });
        }
        self.states.insert(id, state);
        log::debug!("Registered state {}", id);
        Ok(())
    }

    pub fn is_registered(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    /// Exit the current screen and enter `to`.
    ///
    /// Only an unregistered target is reported to the caller; failures
    /// inside `exit`/`enter` are logged and the switch still completes.
    pub fn transition(&mut self, to: StateId) -> Result<()> {
        if !self.states.contains_key(&to) {
            log::error!("Cannot transition to unregistered state {}", to);
            return Err(GameError::UnregisteredState(to));
        }
        self.pending = None;

        let from = self.current;
        if let Some(from_id) = from {
            if let Some(state) = self.states.get_mut(&from_id) {
                if let Err(e) = state.as_screen_mut().exit(to, &mut self.shared) {
                    log::error!("{} exit failed: {}", from_id, e);
                }
                self.stats.entry(from_id).or_default().exits += 1;
            }
        }

        self.current = Some(to);
        if let Some(state) = self.states.get_mut(&to) {
            if let Err(e) = state.as_screen_mut().enter(from, &mut self.shared, &self.clock) {
                log::error!("{} enter failed: {}", to, e);
            }
            self.stats.entry(to).or_default().enters += 1;
        }

        match from {
            Some(from_id) => log::info!("State {} -> {}", from_id, to),
            None => log::info!("State -> {}", to),
        }
        Ok(())
    }

    /// Transition by state name ("Intro", "GameOver", ...)
    pub fn transition_by_name(&mut self, name: &str) -> Result<()> {
        let id = StateId::from_name(name).inspect_err(|e| log::error!("{}", e))?;
        self.transition(id)
    }

    /// Transition to `to` once `delay_ms` has elapsed
    pub fn schedule(&mut self, to: StateId, delay_ms: f64) -> Result<()> {
        if !self.states.contains_key(&to) {
            log::error!("Cannot schedule unregistered state {}", to);
            return Err(GameError::UnregisteredState(to));
        }
        let delay_ms = delay_ms.max(0.0);
        self.pending = Some(PendingTransition {
            to,
            deadline_ms: self.clock.now_ms + delay_ms,
            delay_ms,
        });
        log::debug!("Scheduled {} in {:.0}ms", to, delay_ms);
        Ok(())
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    /// Advance the current screen by one frame
    pub fn update(&mut self, ctx: FrameContext) {
        self.clock = ctx;

        if let Some(pending) = self.pending {
            if ctx.now_ms >= pending.deadline_ms {
                self.pending = None;
                // Failure is logged inside transition
                let _ = self.transition(pending.to);
            }
        }

        let Some(id) = self.current else {
            return;
        };
        let Some(state) = self.states.get_mut(&id) else {
            return;
        };
        match state.as_screen_mut().update(&mut self.shared, &ctx) {
            Ok(Some(request)) => self.apply(request),
            Ok(None) => {}
            Err(e) => log::error!("{} update failed: {}", id, e),
        }
    }

    /// Feed this frame's input to the current screen
    pub fn handle_input(&mut self, keys: &InputState) {
        let Some(id) = self.current else {
            return;
        };
        let Some(state) = self.states.get_mut(&id) else {
            return;
        };
        match state.as_screen_mut().handle_input(keys, &mut self.shared) {
            Ok(Some(request)) => self.apply(request),
            Ok(None) => {}
            Err(e) => log::error!("{} input failed: {}", id, e),
        }
    }

    /// Record the current frame and return it
    pub fn render(&mut self) -> &Scene {
        self.scene.reset();
        let Some(id) = self.current else {
            return &self.scene;
        };

        if let Some(under) = self.states.get(&id).and_then(|s| s.as_screen().underlay()) {
            self.render_state(under);
        }
        self.render_state(id);

        if let Some(pending) = self.pending {
            let vp = self.clock.viewport;
            let alpha = pending.progress(self.clock.now_ms);
            self.scene.fill_rect(
                Rect::new(0.0, 0.0, vp.width, vp.height),
                Color::BLACK.with_alpha(alpha),
            );
        }
        &self.scene
    }

    fn render_state(&mut self, id: StateId) {
        let Some(state) = self.states.get(&id) else {
            return;
        };
        if let Err(e) = state
            .as_screen()
            .render(&self.shared, &self.clock, &mut self.scene)
        {
            log::error!("{} render failed: {}", id, e);
        }
    }

    /// Window lost focus: pause an active game
    pub fn blur(&mut self) {
        if self.current == Some(StateId::Game) {
            log::info!("Auto-paused (window blur)");
            let _ = self.transition(StateId::Pause);
        }
    }

    fn apply(&mut self, request: Transition) {
        // Failures are logged inside transition/schedule
        let _ = match request {
            Transition::To(to) => self.transition(to),
            Transition::After { to, delay_ms } => self.schedule(to, delay_ms),
        };
    }

    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.map(|id| id.name())
    }

    pub fn shared(&self) -> &Shared {
        &self.shared
    }

    pub fn shared_mut(&mut self) -> &mut Shared {
        &mut self.shared
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn clock(&self) -> &FrameContext {
        &self.clock
    }

    pub fn stats(&self, id: StateId) -> LifecycleStats {
        self.stats.get(&id).copied().unwrap_or_default()
    }

    pub fn state(&self, id: StateId) -> Option<&ScreenState> {
        self.states.get(&id)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut ScreenState> {
        self.states.get_mut(&id)
    }

    /// World view for the renderer, if a game session exists
    pub fn snapshot(&self) -> Option<Snapshot> {
        match self.states.get(&StateId::Game)? {
            ScreenState::Game(game) => Some(Snapshot::capture(game.world(), self.clock.now_ms)),
            _ => None,
        }
    }
}
