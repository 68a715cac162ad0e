//! Nova Strike entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

    use nova_strike::GameError;
    use nova_strike::persistence::{BrowserSessionStore, MemoryStore, SessionStore};
    use nova_strike::platform::{Action, FrameContext, InputState, Viewport};
    use nova_strike::render::{DrawCmd, Scene};
    use nova_strike::screens::{Shared, StateId, StateMachine};
    use nova_strike::ui::{Surface, UiCommand};

    /// Longest step fed to the simulation (tab switches, debugger pauses)
    const MAX_DT: f32 = 0.1;

    /// Host state shared by the event closures and the frame loop
    struct Host {
        machine: StateMachine,
        keys: InputState,
        ctx2d: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        document: Document,
        last_time: f64,
    }

    impl Host {
        fn viewport(&self) -> Viewport {
            Viewport::new(self.canvas.width() as f32, self.canvas.height() as f32)
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).clamp(0.0, MAX_DT)
            } else {
                1.0 / 60.0
            };
            self.last_time = time;

            let ctx = FrameContext::new(time, dt, self.viewport());
            self.machine.handle_input(&self.keys);
            self.machine.update(ctx);
            let viewport = ctx.viewport;
            let scene = self.machine.render();
            paint(&self.ctx2d, scene, viewport);
            let commands = self.machine.shared_mut().ui.drain();
            apply_ui(&self.document, commands);
            self.keys.end_frame();
        }
    }

    pub fn run() -> Result<(), GameError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Nova Strike starting...");

        let window = web_sys::window().ok_or(GameError::CanvasUnavailable)?;
        let document = window.document().ok_or(GameError::CanvasUnavailable)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(GameError::CanvasUnavailable)?
            .dyn_into()
            .map_err(|_| GameError::CanvasUnavailable)?;
        let ctx2d: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(GameError::CanvasUnavailable)?
            .dyn_into()
            .map_err(|_| GameError::CanvasUnavailable)?;

        // Missing overlays degrade to canvas-only drawing
        for surface in [
            Surface::IntroScreen,
            Surface::CharacterSelectScreen,
            Surface::Hud,
            Surface::PauseMenu,
            Surface::GameOverScreen,
        ] {
            if document.get_element_by_id(surface.element_id()).is_none() {
                log::error!("{}", GameError::MissingElement(surface.element_id().into()));
            }
        }

        let store: Box<dyn SessionStore> = match BrowserSessionStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}, selections will not persist", e);
                Box::new(MemoryStore::default())
            }
        };

        let mut machine = StateMachine::with_default_states(Shared::new(store));
        machine.transition(StateId::Intro)?;

        let host = Rc::new(RefCell::new(Host {
            machine,
            keys: InputState::new(),
            ctx2d,
            canvas: canvas.clone(),
            document,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, &canvas, host.clone());
        setup_auto_pause(&window, host.clone());
        request_animation_frame(host);

        log::info!("Nova Strike running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Key down
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(action) = Action::from_key(&event.key()) {
                    // Keep arrows and space from scrolling the page
                    if matches!(
                        action,
                        Action::Up | Action::Down | Action::Left | Action::Right | Action::Fire
                    ) {
                        event.prevent_default();
                    }
                    host.borrow_mut().keys.key_down(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(action) = Action::from_key(&event.key()) {
                    host.borrow_mut().keys.key_up(action);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                host.borrow_mut().keys.click();
            });
            let _ =
                canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, host: Rc<RefCell<Host>>) {
        // Visibility change (tab switch, minimize)
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut h = host.borrow_mut();
                if h.document.visibility_state() == web_sys::VisibilityState::Hidden {
                    h.keys.release_all();
                    h.machine.blur();
                }
            });
            if let Some(document) = window.document() {
                let _ = document.add_event_listener_with_callback(
                    "visibilitychange",
                    closure.as_ref().unchecked_ref(),
                );
            }
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut h = host.borrow_mut();
                h.keys.release_all();
                h.machine.blur();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            log::error!("Window gone, frame loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            host.borrow_mut().frame(time);
            request_animation_frame(host);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Replay recorded draw commands on the 2D context
    fn paint(ctx: &CanvasRenderingContext2d, scene: &Scene, viewport: Viewport) {
        let (w, h) = (viewport.width as f64, viewport.height as f64);
        ctx.save();
        let _ = ctx.translate(scene.shake.x as f64, scene.shake.y as f64);
        ctx.set_text_align("center");

        for cmd in &scene.commands {
            match cmd {
                DrawCmd::Clear { color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(-20.0, -20.0, w + 40.0, h + 40.0);
                }
                DrawCmd::FillRect { rect, color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                }
                DrawCmd::StrokeRect { rect, color, width } => {
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                }
                DrawCmd::FillTriangle { points, color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.begin_path();
                    ctx.move_to(points[0].x as f64, points[0].y as f64);
                    ctx.line_to(points[1].x as f64, points[1].y as f64);
                    ctx.line_to(points[2].x as f64, points[2].y as f64);
                    ctx.close_path();
                    ctx.fill();
                }
                DrawCmd::FillCircle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.begin_path();
                    let _ = ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        radius.max(0.0) as f64,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    ctx.fill();
                }
                DrawCmd::Text {
                    text,
                    pos,
                    size,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.set_font(&format!("{}px sans-serif", size));
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
            }
        }
        ctx.restore();
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Apply queued UI commands to the DOM overlays
    fn apply_ui(document: &Document, commands: Vec<UiCommand>) {
        for command in commands {
            match command {
                UiCommand::Show(surface) => {
                    if let Some(el) = document.get_element_by_id(surface.element_id()) {
                        let _ = el.class_list().remove_1("hidden");
                    }
                }
                UiCommand::Hide(surface) => {
                    if let Some(el) = document.get_element_by_id(surface.element_id()) {
                        let _ = el.class_list().add_1("hidden");
                    }
                }
                UiCommand::AttachInput(surface) => {
                    if let Some(el) = document.get_element_by_id(surface.element_id()) {
                        let _ = el.set_attribute("data-active", "true");
                    }
                }
                UiCommand::DetachInput(surface) => {
                    if let Some(el) = document.get_element_by_id(surface.element_id()) {
                        let _ = el.remove_attribute("data-active");
                    }
                }
                UiCommand::SetScore(score) => set_text(document, "score", &score.to_string()),
                UiCommand::SetLives(lives) => set_text(document, "lives", &lives.to_string()),
                UiCommand::SetFinalScore { score, best } => {
                    set_text(document, "final-score", &score.to_string());
                    set_text(document, "best-score", &best.to_string());
                }
                UiCommand::SetSelection { theme, ship } => {
                    set_text(document, "selected-theme", &theme);
                    set_text(document, "selected-ship", &ship);
                }
                UiCommand::SetEffects(labels) => {
                    set_text(document, "effects", &labels.join(" | "));
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {}", e);
        web_sys::console::error_1(&format!("Nova Strike failed to start: {}", e).into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Nova Strike (native) starting...");
    log::info!("Native mode runs a headless attract session; build for wasm32 to play");

    attract::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless session: menus are confirmed, then the autopilot
/// weaves and fires until the run ends.
#[cfg(not(target_arch = "wasm32"))]
mod attract {
    use nova_strike::persistence::MemoryStore;
    use nova_strike::platform::{Action, FrameContext, InputState, Viewport};
    use nova_strike::screens::{Shared, StateId, StateMachine};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Three minutes at 60 fps
    const MAX_FRAMES: u64 = 60 * 180;

    pub fn run() {
        let shared = Shared::new(Box::new(MemoryStore::default()));
        let mut machine = StateMachine::with_default_states(shared);
        if let Err(e) = machine.transition(StateId::Intro) {
            log::error!("Cannot start: {}", e);
            return;
        }

        let viewport = Viewport::default();
        let mut keys = InputState::new();
        let mut draw_commands = 0usize;

        for frame in 0..MAX_FRAMES {
            let ctx = FrameContext::new(frame as f64 * FRAME_MS, (FRAME_MS / 1000.0) as f32, viewport);
            autopilot(frame, machine.current(), &mut keys);
            machine.handle_input(&keys);
            machine.update(ctx);
            draw_commands += machine.render().len();
            machine.shared_mut().ui.drain();
            keys.end_frame();

            if machine.current() == Some(StateId::GameOver) {
                log::info!(
                    "Run ended after {:.1}s with score {}",
                    ctx.now_ms / 1000.0,
                    machine.shared().last_score
                );
                break;
            }
        }

        if let Some(snapshot) = machine.snapshot() {
            match serde_json::to_string(&snapshot) {
                Ok(json) => log::debug!("Final frame: {}", json),
                Err(e) => log::warn!("Could not serialize final frame: {}", e),
            }
            log::info!(
                "Final state {:?}: score {}, lives {}, {} enemies on screen",
                machine.current_name(),
                snapshot.score,
                snapshot.lives,
                snapshot.enemies.len()
            );
        }
        log::info!("Recorded {} draw commands", draw_commands);
    }

    fn autopilot(frame: u64, current: Option<StateId>, keys: &mut InputState) {
        if current == Some(StateId::Game) {
            keys.key_up(Action::Confirm);
            keys.key_down(Action::Fire);
            let (press, release) = if (frame / 90) % 2 == 0 {
                (Action::Left, Action::Right)
            } else {
                (Action::Right, Action::Left)
            };
            keys.key_up(release);
            keys.key_down(press);
        } else if frame % 30 == 0 {
            // Tap confirm twice a second to walk through the menus
            keys.key_down(Action::Confirm);
        } else {
            keys.key_up(Action::Confirm);
        }
    }
}
