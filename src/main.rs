//! Space Sweep entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use space_sweep::audio::{AudioManager, SoundEffect};
    use space_sweep::renderer::CanvasRenderer;
    use space_sweep::sim::{GameEvent, GameState, HudStats, tick};
    use space_sweep::{Settings, frame_delta};

    /// The single requestAnimationFrame callback, shared by every run
    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        last_time: Option<f64>,
        /// Pointer or touch currently held
        dragging: bool,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer, settings: Settings) -> Self {
            let mut state = GameState::new(seed);
            state.resize(renderer.viewport());
            Self {
                state,
                renderer,
                audio: AudioManager::new(&settings),
                settings,
                last_time: None,
                dragging: false,
            }
        }

        /// Start (or restart) a run
        fn start(&mut self) {
            if self.state.start() {
                self.last_time = None;
                self.dispatch_events();
            }
        }

        /// Run one frame; returns false once the run is over
        fn frame(&mut self, time: f64) -> bool {
            let dt = frame_delta(self.last_time, time);
            self.last_time = Some(time);

            let viewport = self.renderer.viewport();
            tick(&mut self.state, dt, viewport);

            self.renderer
                .render(&self.state.snapshot(), &self.state.tuning, &self.settings);
            if let Some(hud) = self.state.take_hud_update() {
                self.update_hud(hud);
            }
            self.dispatch_events();

            self.state.is_running()
        }

        /// Pointer moved or pressed at a client x coordinate
        fn pointer_at(&mut self, client_x: f32) {
            let x = client_x - self.renderer.client_left();
            self.state.set_player_target(x);
        }

        /// Canvas size changed
        fn resize(&mut self, width: u32, height: u32) {
            self.renderer.resize(width, height);
            let viewport = self.renderer.viewport();
            self.state.resize(viewport);
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.apply_settings(&self.settings);
            set_text("mute-button", if muted { "🔇" } else { "🔊" });
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        }

        fn set_dragging(&mut self, dragging: bool) {
            self.dragging = dragging;
            self.state.set_propelling(dragging);
        }

        fn dispatch_events(&mut self) {
            let events: Vec<GameEvent> = self.state.drain_events().collect();
            for event in &events {
                self.audio.play(SoundEffect::for_event(event));
                match event {
                    GameEvent::Start => show_screen(None),
                    GameEvent::GameOver { score } => {
                        set_text("final-score", &score.to_string());
                        show_screen(Some("game-over"));
                    }
                    _ => {}
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, hud: HudStats) {
            set_text("hud-score", &hud.score.to_string());
            set_text("hud-time", &format!("{}s", hud.time_left));
            set_text("hud-lives", &"❤️".repeat(hud.lives as usize));

            if let Some(el) = document().and_then(|d| d.get_element_by_id("hud-time")) {
                let low = hud.time_running_low() && self.settings.effective_low_time_pulse();
                let _ = el.set_attribute("class", if low { "low" } else { "" });
            }
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    /// Show one overlay screen and hide the others
    fn show_screen(visible: Option<&str>) {
        for id in ["start-screen", "game-over"] {
            if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
                let class = if Some(id) == visible { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(f.as_ref().unchecked_ref());
        }
    }

    /// Build the frame callback once; it reschedules itself until the run ends
    fn frame_loop(game: &Rc<RefCell<Game>>) -> FrameCallback {
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();
        let game = game.clone();

        *f.borrow_mut() = Some(Closure::new(move |time: f64| {
            // Stop scheduling once the run is over
            let running = game.borrow_mut().frame(time);
            if running {
                if let Some(cb) = g.borrow().as_ref() {
                    request_animation_frame(cb);
                }
            }
        }));
        f
    }

    /// Start a run and hand the shared frame callback to the browser
    fn start_loop(game: &Rc<RefCell<Game>>, frames: &FrameCallback) {
        game.borrow_mut().start();
        if let Some(cb) = frames.borrow().as_ref() {
            request_animation_frame(cb);
        }
    }

    fn on_click(id: &str, handler: impl FnMut() + 'static) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let closure = Closure::<dyn FnMut()>::new(handler);
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Space Sweep starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no #canvas element")?
            .dyn_into()?;

        let renderer = CanvasRenderer::new(canvas.clone()).ok_or("no 2d context")?;
        // Preferences come from the page, e.g. <canvas data-settings='{"muted":true}'>
        let settings = canvas
            .get_attribute("data-settings")
            .map(|json| Settings::from_json_or_default(&json))
            .unwrap_or_default();
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        let game = Rc::new(RefCell::new(Game::new(seed, renderer, settings)));
        let frames = frame_loop(&game);

        // Resize handler
        {
            let resize = {
                let game = game.clone();
                move || {
                    if let Some(w) = web_sys::window() {
                        let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
                        let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
                        game.borrow_mut().resize(width as u32, height as u32);
                    }
                }
            };
            resize();
            let closure = Closure::<dyn FnMut()>::new(resize);
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse input
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
                let mut g = game.borrow_mut();
                g.set_dragging(true);
                g.pointer_at(e.client_x() as f32);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.dragging || g.state.is_running() {
                    g.pointer_at(e.client_x() as f32);
                }
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        for event in ["mouseup", "mouseleave", "touchend"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                game.borrow_mut().set_dragging(false);
            });
            canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch input
        for (event, starts_drag) in [("touchstart", true), ("touchmove", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(TouchEvent)>::new(move |e: TouchEvent| {
                e.prevent_default();
                if let Some(touch) = e.touches().get(0) {
                    let mut g = game.borrow_mut();
                    if starts_drag {
                        g.set_dragging(true);
                    }
                    g.pointer_at(touch.client_x() as f32);
                }
            });
            canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Start / play again buttons
        for id in ["start-button", "restart-button"] {
            let game = game.clone();
            let frames = frames.clone();
            on_click(id, move || {
                if !game.borrow().state.is_running() {
                    start_loop(&game, &frames);
                }
            });
        }
        {
            let game = game.clone();
            on_click("mute-button", move || game.borrow_mut().toggle_mute());
        }

        show_screen(Some("start-screen"));
        log::info!("Space Sweep running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Sweep (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => space_sweep::Tuning::default(),
    };
    let settings = match args.next() {
        Some(path) => load_settings(&path),
        None => space_sweep::Settings::default(),
    };
    let seed = std::env::var("SPACE_SWEEP_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);

    match headless::run(tuning, &settings, seed) {
        Ok(score) => println!("Final score: {score}"),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> space_sweep::Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read tuning file {}: {} - using defaults", path, e);
            return space_sweep::Tuning::default();
        }
    };
    match space_sweep::Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("{} - using defaults", e);
            space_sweep::Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> space_sweep::Settings {
    match std::fs::read_to_string(path) {
        Ok(json) => space_sweep::Settings::from_json_or_default(&json),
        Err(e) => {
            log::warn!("Could not read settings file {}: {} - using defaults", path, e);
            space_sweep::Settings::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use space_sweep::audio::sounds_for;
    use space_sweep::sim::{GameEvent, GameState, Viewport, tick};
    use space_sweep::{Settings, Tuning, TuningError};

    const DT: f32 = 1.0 / 60.0;
    const WIDTH: f32 = 1024.0;
    const HEIGHT: f32 = 768.0;

    /// Play one run with a ship sweeping back and forth; returns the score
    pub fn run(tuning: Tuning, settings: &Settings, seed: u64) -> Result<u32, TuningError> {
        let viewport = Viewport::new(WIDTH, HEIGHT);
        let mut state = GameState::with_rng(tuning, Pcg32::seed_from_u64(seed))?;
        state.resize(viewport);
        log::info!("Headless run with seed {}", seed);

        state.start();
        let mut frame: u32 = 0;
        let mut final_score = 0;

        loop {
            let phase = frame as f32 * DT * 0.7;
            state.set_player_target(WIDTH / 2.0 + phase.sin() * WIDTH * 0.45);
            state.set_propelling(frame % 120 < 60);
            tick(&mut state, DT, viewport);
            frame += 1;

            if let Some(hud) = state.take_hud_update() {
                log::debug!(
                    "HUD score={} lives={} time={}s",
                    hud.score,
                    hud.lives,
                    hud.time_left
                );
            }

            let events: Vec<GameEvent> = state.drain_events().collect();
            for sound in sounds_for(&events, settings) {
                log::trace!("sound {:?}", sound);
            }
            for event in &events {
                match event {
                    GameEvent::Collect { id } => log::info!("frame {}: caught #{}", frame, id),
                    GameEvent::Hit { id } => log::info!("frame {}: hit by #{}", frame, id),
                    GameEvent::GameOver { score } => final_score = *score,
                    GameEvent::Start => {}
                }
            }

            if !state.is_running() {
                break;
            }
        }

        log::info!(
            "Run finished after {} frames ({:.1}s simulated)",
            frame,
            state.run_clock
        );
        match state.snapshot().to_json() {
            Ok(json) => log::debug!("Final snapshot: {}", json),
            Err(e) => log::warn!("Could not serialize final snapshot: {}", e),
        }
        Ok(final_score)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_headless_run_is_reproducible() {
            let settings = Settings::default();
            let a = run(Tuning::default(), &settings, 7).unwrap();
            let b = run(Tuning::default(), &settings, 7).unwrap();
            assert_eq!(a, b);
            assert_eq!(a % 10, 0);
        }

        #[test]
        fn test_headless_run_rejects_bad_tuning() {
            let tuning = Tuning {
                object_size_min: 90.0,
                ..Tuning::default()
            };
            assert!(run(tuning, &Settings::default(), 7).is_err());
        }
    }
}
