//! Lane Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, TouchEvent};

    use lane_rush::audio::{AudioManager, SoundEffect, music_intensity};
    use lane_rush::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use lane_rush::platform::{DEFAULT_LEADERBOARD_ID, GameCenter, Leaderboard};
    use lane_rush::renderer::{RenderState, build_scene};
    use lane_rush::sim::{GameEvent, GamePhase};
    use lane_rush::{HighScoreData, Session, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        store: Option<LocalStorage>,
        leaderboard: Rc<Leaderboard<GameCenter>>,
        /// Jitter for the renderer, separate from the simulation RNG
        render_rng: Pcg32,
        canvas: HtmlCanvasElement,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement) -> Self {
            let store = match LocalStorage::open() {
                Ok(store) => Some(store),
                Err(e) => {
                    log::warn!("Storage unavailable, records will not persist: {e}");
                    None
                }
            };
            let (settings, high_score) = match &store {
                Some(store) => (Settings::load(store), HighScoreData::load(store)),
                None => (Settings::default(), HighScoreData::default()),
            };

            let mut session = Session::new(seed, high_score);
            session.apply_settings(&settings);
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);

            Self {
                session,
                render_state: None,
                audio,
                settings,
                store,
                leaderboard: Rc::new(Leaderboard::new(GameCenter, DEFAULT_LEADERBOARD_ID)),
                render_rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9),
                canvas,
                last_phase: GamePhase::Start,
            }
        }

        /// Match the canvas backing size to its CSS size and update the viewport
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = self.canvas.client_width().max(1);
            let client_h = self.canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            // The world is laid out in CSS pixels
            self.session.set_viewport(client_w as f32, client_h as f32);
            if let Some(render_state) = &mut self.render_state {
                render_state.resize(width, height);
            }
        }

        /// Advance one animation frame and react to its events
        fn update(&mut self, time: f64) {
            let events = self.session.frame(time);
            for event in &events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
                match *event {
                    GameEvent::RunStarted { run_id } => {
                        log::info!("Run {run_id} started");
                        self.audio.start_music();
                    }
                    GameEvent::BossSpawned { level, health } => {
                        log::info!("Boss level {level} spawned with {health} HP");
                    }
                    GameEvent::GameOver { score, .. } | GameEvent::Victory { score, .. } => {
                        self.audio.stop_music();
                        self.submit_score(score);
                    }
                    _ => {}
                }
            }

            if self.session.phase().is_active() {
                self.audio
                    .set_intensity(music_intensity(self.session.state.speed));
            }
        }

        fn submit_score(&self, score: i64) {
            if !self.leaderboard.is_authenticated() {
                log::debug!("Leaderboard: not signed in, skipping submit");
                return;
            }
            let board = self.leaderboard.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = board.submit_score(score).await {
                    log::warn!("Leaderboard submit failed: {e}");
                }
            });
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.session.state, &self.settings, &mut self.render_rng);
            let viewport = self.session.state.viewport;
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices, viewport) {
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

        /// Start or restart unless the name form is waiting
        fn request_start(&mut self) {
            if self.session.phase().is_active() || self.session.pending_high_score().is_some() {
                return;
            }
            self.audio.resume();
            self.session.request_start();
        }

        /// Save the pending record under the entered name
        fn confirm_name(&mut self, name: &str) {
            let mut scratch = MemoryStore::default();
            let store: &mut dyn KeyValueStore = match &mut self.store {
                Some(store) => store,
                None => &mut scratch,
            };
            match self.session.confirm_high_score(name, store) {
                Ok(true) => log::info!(
                    "High score saved: {} by {}",
                    self.session.high_score.score,
                    self.session.high_score.name
                ),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to save high score: {e}"),
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.master_volume = if self.settings.master_volume > 0.0 { 0.0 } else { 0.8 };
            self.audio.apply_settings(&self.settings);
            self.save_settings();
        }

        fn cycle_quality(&mut self) {
            self.settings.quality = self.settings.quality.next();
            self.session.apply_settings(&self.settings);
            log::info!("Quality: {}", self.settings.quality.as_str());
            self.save_settings();
        }

        fn save_settings(&mut self) {
            if let Some(store) = &mut self.store
                && let Err(e) = self.settings.save(store)
            {
                log::warn!("Failed to save settings: {e}");
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.session.state;
            let phase = state.phase;

            set_text(&document, "#hud-score .hud-value", &state.score.to_string());
            set_text(&document, "#hud-level .hud-value", &state.level.to_string());
            set_text(
                &document,
                "#hud-distance .hud-value",
                &format!("{}m", state.display_distance()),
            );
            if let Some(el) = document.get_element_by_id("level-progress") {
                let _ = el.set_attribute(
                    "style",
                    &format!("width: {:.1}%", state.level_progress() * 100.0),
                );
            }

            show(&document, "hud", phase.is_active());
            show(&document, "boss-warning", phase == GamePhase::BossFight);
            show(&document, "level-complete", phase == GamePhase::LevelTransition);
            show(&document, "start-screen", phase == GamePhase::Start);
            show(&document, "game-over", phase == GamePhase::GameOver);
            show(&document, "victory", phase == GamePhase::Victory);
            show(
                &document,
                "name-form",
                self.session.pending_high_score().is_some(),
            );

            set_text(&document, "#best-score", &self.session.high_score.score.to_string());
            set_text(&document, "#best-name", &self.session.high_score.name);
            set_text(
                &document,
                "#best-level",
                &self.session.high_score.max_level.to_string(),
            );

            if phase != self.last_phase {
                if phase.is_terminal() {
                    set_text(&document, "#final-score", &state.score.to_string());
                    set_text(&document, "#final-level", &state.level.to_string());
                }
                self.last_phase = phase;
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn js_err(msg: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&msg.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Lane Rush starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone())));
        game.borrow_mut().resize();
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_window_handlers(game.clone());
        setup_buttons(game.clone());
        setup_name_form(game.clone());
        authenticate_leaderboard(&game);

        request_animation_frame(game);

        log::info!("Lane Rush running!");
        Ok(())
    }

    fn authenticate_leaderboard(game: &Rc<RefCell<Game>>) {
        if !GameCenter::is_available() {
            log::info!("Leaderboard: no platform service");
            return;
        }
        let board = game.borrow().leaderboard.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = board.authenticate().await {
                log::warn!("Leaderboard authentication failed: {e}");
            }
        });
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if g.session.input.set_key(&code, true) {
                    event.prevent_default();
                    return;
                }
                match code.as_str() {
                    "Space" | "Enter" => g.request_start(),
                    "KeyM" => g.toggle_mute(),
                    "KeyQ" => g.cycle_quality(),
                    "KeyI" => {
                        g.session.autopilot = !g.session.autopilot;
                        log::info!("Autopilot: {}", g.session.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().session.input.set_key(&event.code(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: left/right half of the canvas steers
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let width = canvas_clone.client_width() as f32;
                    g.session
                        .input
                        .set_touch(lane_rush::input::InputState::touch_zone(x, width));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.touches().length() == 0 {
                    game.borrow_mut().session.input.set_touch(0.0);
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: release held keys, optionally mute
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.session.release_input();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                log::debug!("Input released (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn", "victory-restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().request_start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("leaderboard-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let board = game.borrow().leaderboard.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = board.show().await {
                        log::warn!("Leaderboard unavailable: {e}");
                    }
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_name_form(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(form) = document.get_element_by_id("name-form") else {
            return;
        };

        let input: Option<HtmlInputElement> = document
            .get_element_by_id("name-input")
            .and_then(|el| el.dyn_into().ok());
        if let Some(input) = &input {
            input.set_max_length(lane_rush::highscores::MAX_NAME_LEN as i32);
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let name = input.as_ref().map(|i| i.value()).unwrap_or_default();
            game.borrow_mut().confirm_name(&name);
            if let Some(input) = &input {
                input.set_value("");
            }
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_rush::persistence::MemoryStore;
    use lane_rush::{HighScoreData, QualityPreset, Session, Settings};

    env_logger::init();
    log::info!("Lane Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot game - run with `trunk serve` for the web version");

    // lane-rush [seed] [low|medium|high]
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    let quality = args
        .next()
        .and_then(|arg| QualityPreset::parse(&arg))
        .unwrap_or_default();
    log::info!("Seed {seed}, quality {}", quality.as_str());

    let mut store = MemoryStore::default();
    let mut session = Session::new(seed, HighScoreData::load(&store));
    session.apply_settings(&Settings::from_preset(quality));
    session.autopilot = true;
    session.request_start();

    // Ten simulated minutes at 60 fps
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    let mut bosses = 0;
    for frame in 0..MAX_FRAMES {
        for event in session.frame(frame as f64 * FRAME_MS) {
            match event {
                lane_rush::sim::GameEvent::BossSpawned { level, health } => {
                    bosses += 1;
                    log::info!("Boss level {level} ({health} HP)");
                }
                lane_rush::sim::GameEvent::LevelUp { level, bonus } => {
                    log::info!("Level {level} (bonus {bonus})");
                }
                _ => {}
            }
        }
        if session.phase().is_terminal() {
            break;
        }
    }

    let state = &session.state;
    println!("\nSeed:     {seed}");
    println!("Outcome:  {:?}", state.phase);
    println!("Score:    {}", state.score);
    println!("Level:    {}", state.level);
    println!("Distance: {}m", state.display_distance());
    println!("Bosses:   {bosses}");

    match session.confirm_high_score("Autopilot", &mut store) {
        Ok(true) => println!("New high score recorded"),
        Ok(false) => {}
        Err(e) => log::warn!("Failed to record high score: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
