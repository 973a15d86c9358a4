//! Bubble Rush entry point
//!
//! Browser build: WebGPU canvas, keyboard input and a DOM HUD.
//! Native build: headless autopilot run that prints the final score.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use bubble_rush::consts::FRAME_MS;
    use bubble_rush::renderer::{DrawList, RenderState};
    use bubble_rush::sim::FrameOutcome;
    use bubble_rush::{Game, Key, Tuning};

    /// Longest frame delta fed to the timers; larger gaps are treated as a stall
    const MAX_FRAME_MS: u64 = 250;

    /// Browser-side wrapper: game plus GPU state and frame timing
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        draw_list: DrawList,
        /// Timestamp of the previous frame in whole ms, 0 before the first frame
        last_ms: u64,
    }

    impl App {
        fn new(seed: u64) -> Self {
            Self {
                game: Game::new(seed, Tuning::default()),
                render_state: None,
                draw_list: DrawList::new(),
                last_ms: 0,
            }
        }

        fn update(&mut self, time: f64) -> FrameOutcome {
            let now_ms = time.max(0.0) as u64;
            let elapsed = if self.last_ms > 0 {
                now_ms.saturating_sub(self.last_ms).min(MAX_FRAME_MS)
            } else {
                FRAME_MS
            };
            self.last_ms = now_ms;
            self.game.step(elapsed, &mut self.draw_list)
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.draw_list.to_vertices()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Text lives in the DOM; shapes go to the GPU
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.game.session.state;

            set_text(&document, "hud-time", &format!("Time: {}", state.timer));
            set_text(&document, "hud-score", &format!("Score: {}", state.score));
            set_visible(&document, "pause-overlay", state.is_paused());
            set_visible(&document, "hud", !state.is_game_over());
            set_visible(&document, "game-over", state.is_game_over());
            if state.is_game_over() {
                set_text(
                    &document,
                    "final-score",
                    &format!("Final Score: {}", state.score),
                );
            }
        }

        fn restart(&mut self, seed: u64) {
            self.game.restart(seed);
            self.last_ms = 0;
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn js_error(context: &str, err: impl std::fmt::Debug) -> JsValue {
        JsValue::from_str(&format!("{context}: {err:?}"))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| js_error("logger", e))?;

        log::info!("Bubble Rush starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| js_error("surface", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| js_error("adapter", e))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| js_error("device", e))?;
        app.borrow_mut().render_state = Some(render_state);

        setup_keyboard(&window, app.clone());
        setup_auto_pause(&window, &document, app.clone());

        set_visible(&document, "hud", true);
        request_animation_frame(app);

        log::info!("Bubble Rush running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_dom(&event.key()) else {
                    return;
                };
                // Arrow keys would scroll the page
                event.prevent_default();

                if key == Key::Restart {
                    let restarted = {
                        let mut a = app.borrow_mut();
                        if a.game.running {
                            false
                        } else {
                            let seed = js_sys::Date::now() as u64;
                            a.restart(seed);
                            log::info!("Game restarted with seed: {}", seed);
                            true
                        }
                    };
                    // The frame loop stopped at game over
                    if restarted {
                        request_animation_frame(app.clone());
                    }
                    return;
                }
                app.borrow_mut().game.key_down(key, event.repeat());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    app.borrow_mut().game.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Queue a pause edge if the game is running
    fn auto_pause(app: &Rc<RefCell<App>>, reason: &str) {
        let mut a = app.borrow_mut();
        let state = &a.game.session.state;
        if !state.is_paused() && !state.is_game_over() {
            a.game.key_down(Key::Pause, false);
            log::info!("Auto-paused ({})", reason);
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, app: Rc<RefCell<App>>) {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&app, "tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                auto_pause(&app, "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let outcome = {
            let mut a = app.borrow_mut();
            let outcome = a.update(time);
            a.render();
            a.update_hud();
            outcome
        };

        if outcome == FrameOutcome::Continue {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::{fs, path::PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;

    use bubble_rush::consts::FRAME_MS;
    use bubble_rush::renderer::DrawList;
    use bubble_rush::sim::FrameOutcome;
    use bubble_rush::{Game, Key, Tuning};

    #[derive(Parser, Debug)]
    #[command(about = "Play Bubble Rush headless with the autopilot", version)]
    struct Args {
        /// RNG seed for spawn positions
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// JSON file overriding game balance
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Stop after this many frames even if the clock has not run out
        #[arg(long, default_value_t = 100_000)]
        max_frames: u64,
        /// Virtual milliseconds per frame
        #[arg(long, default_value_t = FRAME_MS)]
        frame_ms: u64,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Tuning::from_json(&json).with_context(|| format!("parsing tuning file {}", path.display()))
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        anyhow::ensure!(args.frame_ms > 0, "--frame-ms must be positive");

        let tuning = load_tuning(args.tuning.as_ref())?;
        log::info!("Bubble Rush (headless) starting with seed {}", args.seed);

        let mut game = Game::new(args.seed, tuning);
        game.key_down(Key::Autopilot, false);

        let mut canvas = DrawList::new();
        let mut frames = 0u64;
        while frames < args.max_frames {
            frames += 1;
            if game.step(args.frame_ms, &mut canvas) == FrameOutcome::Stop {
                break;
            }
        }

        let state = &game.session.state;
        if !state.is_game_over() {
            log::warn!("Frame limit reached before the clock ran out");
        }
        println!(
            "seed={} frames={} virtual_time={:.1}s time_left={} score={}",
            args.seed,
            frames,
            game.session.now_ms() as f64 / 1000.0,
            state.timer,
            state.score
        );
        for text in canvas.texts() {
            println!("{text}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
