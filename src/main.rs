//! Arrow Survival entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent};

    use arrow_survival::audio::{AudioManager, SoundEffect};
    use arrow_survival::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use arrow_survival::platform::{FrameClock, InputState};
    use arrow_survival::renderer::{CanvasRenderer, SpriteSheet};
    use arrow_survival::sim::{GameEvent, GameState, RenderSnapshot, SessionConfig, TickInput, tick};
    use arrow_survival::{BestScore, Settings};

    /// DOM nodes the HUD writes to
    struct Hud {
        lives: Element,
        score: Element,
        game_over: Element,
        final_score: Element,
        best_score: Element,
        count_overlay: Option<Element>,
        count_num: Option<Element>,
        game_bg: Option<Element>,
    }

    impl Hud {
        fn find(document: &Document) -> Option<Self> {
            Some(Self {
                lives: document.get_element_by_id("lives")?,
                score: document.get_element_by_id("score")?,
                game_over: document.get_element_by_id("gameOver")?,
                final_score: document.get_element_by_id("finalScore")?,
                best_score: document.get_element_by_id("bestScore")?,
                count_overlay: document.get_element_by_id("countOverlay"),
                count_num: document.get_element_by_id("countNum"),
                game_bg: document
                    .get_element_by_id("gameBg")
                    .or_else(|| document.query_selector(".hero").ok().flatten()),
            })
        }

        fn set_lives(&self, lives: u8) {
            let hearts = "❤️".repeat(lives as usize);
            self.lives.set_text_content(Some(&hearts));
        }

        fn set_score(&self, score: u32) {
            self.score.set_text_content(Some(&format!("💎 {score}")));
        }

        fn show_countdown(&self, n: u8) {
            if let Some(num) = &self.count_num {
                num.set_text_content(Some(&n.to_string()));
            }
            if let Some(el) = &self.count_overlay {
                let _ = el.class_list().add_1("is-visible");
            }
            if let Some(el) = &self.game_bg {
                let _ = el.class_list().add_1("is-blurred");
            }
        }

        fn hide_countdown(&self) {
            if let Some(el) = &self.count_overlay {
                let _ = el.class_list().remove_1("is-visible");
            }
            if let Some(el) = &self.game_bg {
                let _ = el.class_list().remove_1("is-blurred");
            }
        }

        fn show_game_over(&self, final_score: u32, best_score: u32) {
            self.final_score
                .set_text_content(Some(&format!("Score: {final_score}")));
            self.best_score
                .set_text_content(Some(&format!("Best: {best_score}")));
            let _ = self.game_over.class_list().remove_1("hidden");
        }

        fn hide_game_over(&self) {
            let _ = self.game_over.class_list().add_1("hidden");
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        clock: FrameClock,
        audio: AudioManager,
        renderer: CanvasRenderer,
        hud: Hud,
        best: BestScore,
        store: Box<dyn KeyValueStore>,
    }

    impl Game {
        /// Run one animation frame
        fn frame(&mut self, now_ms: f64) {
            let dt = self.clock.frame(now_ms);
            tick(&mut self.state, &TickInput::from(&self.input), dt);

            for event in self.state.drain_events() {
                self.handle_event(event);
            }

            self.renderer.draw(&RenderSnapshot::capture(&self.state));
        }

        /// Route a simulation event to audio, HUD and storage
        fn handle_event(&mut self, event: GameEvent) {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }

            match event {
                GameEvent::CountdownStep(n) => self.hud.show_countdown(n),
                GameEvent::SessionStarted => self.hud.hide_countdown(),
                GameEvent::PlayerHit { lives } => self.hud.set_lives(lives),
                GameEvent::PickupCollected { score } => self.hud.set_score(score),
                GameEvent::GameOver {
                    final_score,
                    best_score,
                    new_best,
                } => {
                    self.hud.set_lives(0);
                    if new_best && self.best.record(final_score) {
                        if let Err(e) = self.best.save(&mut self.store) {
                            log::warn!("Could not save best score: {e}");
                        }
                    }
                    self.hud.show_game_over(final_score, best_score);
                }
                GameEvent::ShotFired { .. } | GameEvent::PickupSpawned { .. } => {}
            }
        }

        /// Reset game state for restart, picking up any settings changed since
        fn restart(&mut self, seed: u64) {
            let settings = Settings::load(&self.store);
            self.audio.set_muted(!settings.sound.enabled());
            self.state = GameState::new(SessionConfig {
                seed,
                difficulty: settings.difficulty,
                best_score: self.best.value.max(self.state.best_score),
                ..self.state.config.clone()
            });
            self.input.clear();
            self.clock.reset();
            self.hud.hide_game_over();
            self.hud.set_lives(self.state.player.lives);
            self.hud.set_score(0);
            log::info!("Game restarted with seed: {}", seed);
        }
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}, settings will not persist");
                Box::new(MemoryStore::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Arrow Survival starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("Canvas #gameCanvas not found");
            return;
        };
        let Some(hud) = Hud::find(&document) else {
            log::error!("HUD elements missing");
            return;
        };

        let sheets = SpriteSheet::load("assets/player.png", 4, 3)
            .and_then(|p| Ok((p, SpriteSheet::load("assets/attacker.png", 1, 1)?)));
        let (player_sheet, attacker_sheet) = match sheets {
            Ok(sheets) => sheets,
            Err(e) => {
                log::error!("Failed to create sprite images: {:?}", e);
                return;
            }
        };
        if !(player_sheet.decoded().await && attacker_sheet.decoded().await) {
            log::warn!("Sprite sheets failed to decode, drawing placeholders");
        }

        let renderer = match CanvasRenderer::new(&canvas, player_sheet, attacker_sheet) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to set up canvas: {:?}", e);
                return;
            }
        };

        let store = open_store();
        let settings = Settings::load(&store);
        let best = BestScore::load(&store);

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(SessionConfig {
            seed,
            difficulty: settings.difficulty,
            best_score: best.value,
            bounds: glam::Vec2::new(canvas.width() as f32, canvas.height() as f32),
            ..Default::default()
        });
        log::info!("Game initialized with seed: {}", seed);

        hud.hide_game_over();
        hud.set_lives(state.player.lives);
        hud.set_score(0);

        let game = Rc::new(RefCell::new(Game {
            state,
            input: InputState::new(),
            clock: FrameClock::new(),
            audio: AudioManager::new(settings.sound.enabled()),
            renderer,
            hud,
            best,
            store,
        }));

        // The first countdown step was queued before anyone was listening
        {
            let mut g = game.borrow_mut();
            for event in g.state.drain_events() {
                g.handle_event(event);
            }
        }

        setup_input_handlers(game.clone());
        setup_buttons(&document, game.clone());

        request_animation_frame(game);

        log::info!("Arrow Survival running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Held keys are lost when focus leaves
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear();
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Browsers only start audio after a gesture
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                game.borrow().audio.resume();
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.play(SoundEffect::Click);
                g.restart(js_sys::Date::now() as u64);
                for event in g.state.drain_events() {
                    g.handle_event(event);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("homeBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow().audio.play(SoundEffect::Click);
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("index.html");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arrow Survival (native) starting...");
    log::info!("Native mode runs a headless session - use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .map(|s| arrow_survival::Difficulty::parse(&s))
        .unwrap_or_default();
    let tuning = args.next().map(|path| load_tuning(&path)).unwrap_or_default();
    headless::run(difficulty, tuning, 7);
}

/// Read a JSON tuning override, keeping defaults if it can't be used
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> arrow_survival::Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read {}: {}, using default tuning", path, e);
            return Default::default();
        }
    };
    match arrow_survival::Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("{}, using default tuning", e);
            Default::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use arrow_survival::persistence::MemoryStore;
    use arrow_survival::sim::{GameEvent, GameState, SessionConfig, TickInput, tick};
    use arrow_survival::{BestScore, Difficulty, Settings, Tuning};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_SECS: f32 = 120.0;

    /// Scripted player: walk toward the diamond, otherwise circle the left half
    fn scripted_input(state: &GameState) -> TickInput {
        let target = match state.pickup {
            Some(p) => p.pos,
            None => {
                let t = state.elapsed * 0.8;
                state.bounds() * Vec2::new(0.25, 0.5) + Vec2::new(t.cos(), t.sin()) * 120.0
            }
        };
        let to = target - state.player.pos();
        let axis = Vec2::new(
            if to.x.abs() > 4.0 { to.x.signum() } else { 0.0 },
            if to.y.abs() > 4.0 { to.y.signum() } else { 0.0 },
        );
        TickInput { axis }
    }

    pub fn run(difficulty: Difficulty, tuning: Tuning, seed: u64) {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty,
            ..Default::default()
        };
        if let Err(e) = settings.save(&mut store) {
            log::warn!("Could not save settings: {e}");
        }
        let mut best = BestScore::load(&store);

        let mut state = GameState::new(SessionConfig {
            seed,
            difficulty: settings.difficulty,
            best_score: best.value,
            tuning,
            ..Default::default()
        });

        let mut frames = 0u32;
        while !state.is_over() && state.clock < MAX_SECS {
            let input = scripted_input(&state);
            tick(&mut state, &input, FRAME_DT);
            frames += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::SessionStarted => log::info!("Go!"),
                    GameEvent::PlayerHit { lives } => log::info!("Hit! lives={}", lives),
                    GameEvent::PickupCollected { score } => log::info!("Diamond! score={}", score),
                    GameEvent::GameOver {
                        final_score,
                        new_best,
                        ..
                    } => {
                        if new_best && best.record(final_score) {
                            if let Err(e) = best.save(&mut store) {
                                log::warn!("Could not save best score: {e}");
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "Headless session finished after {} frames ({:.1}s): score={} best={} over={}",
            frames,
            state.clock,
            state.score,
            best.value,
            state.is_over()
        );
    }
}
