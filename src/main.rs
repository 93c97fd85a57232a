//! Pixel Commando entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser build owns the keyboard handling and the fixed-step frame loop
//! and hands each frame's snapshot to a JS render hook; the native build
//! runs a short headless demo so the simulation can be exercised without a
//! browser.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use pixel_commando::ads::VendorEvent;
    use pixel_commando::sim::{Screen, TickInput};
    use pixel_commando::{Command, Game};

    const TICK_MS: f64 = 1000.0 / 60.0;
    /// Cap catch-up after a background tab so the sim never spirals
    const MAX_TICKS_PER_FRAME: u32 = 5;

    /// Host state shared between the frame loop and the input handlers
    struct Host {
        game: Game,
        input: TickInput,
        /// One-tick pulses, cleared after each simulated tick
        shoot_edge: bool,
        accumulator: f64,
        last_time: f64,
    }

    impl Host {
        fn new(seed: u64) -> Self {
            Self {
                game: Game::new(seed),
                input: TickInput::default(),
                shoot_edge: false,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        fn frame(&mut self, now: f64) {
            if self.last_time == 0.0 {
                self.last_time = now;
            }
            self.accumulator += now - self.last_time;
            self.last_time = now;

            let mut ticks = 0;
            while self.accumulator >= TICK_MS && ticks < MAX_TICKS_PER_FRAME {
                let input = TickInput {
                    shoot: self.shoot_edge,
                    ..self.input.clone()
                };
                self.game.frame(&input);
                self.shoot_edge = false;
                self.accumulator -= TICK_MS;
                ticks += 1;
            }
            if ticks == MAX_TICKS_PER_FRAME {
                self.accumulator = 0.0;
            }

            render(&self.game);
        }

        fn key_down(&mut self, key: &str) {
            match key {
                "ArrowLeft" => self.input.left = true,
                "ArrowRight" => self.input.right = true,
                " " | "ArrowUp" => self.input.jump = true,
                "f" => self.shoot_edge = true,
                "Escape" => self.game.command(Command::Back),
                "m" => self.game.command(Command::ToggleMute),
                "F8" => self.game.command(Command::CycleVendor),
                "a" => self.game.command(Command::WatchAd),
                "Enter" => self.confirm(),
                _ => {}
            }
            // Arrow keys double as menu navigation off the play screen
            if self.game.session().screen != Screen::Play {
                match key {
                    "ArrowUp" => self.game.command(Command::MenuUp),
                    "ArrowDown" => self.game.command(Command::MenuDown),
                    "ArrowLeft" => self.game.command(Command::StagePrev),
                    "ArrowRight" => self.game.command(Command::StageNext),
                    _ => {}
                }
            }
        }

        fn key_up(&mut self, key: &str) {
            match key {
                "ArrowLeft" => self.input.left = false,
                "ArrowRight" => self.input.right = false,
                " " | "ArrowUp" => self.input.jump = false,
                _ => {}
            }
        }

        fn confirm(&mut self) {
            let command = match self.game.session().screen {
                Screen::Home => Command::MenuConfirm,
                Screen::LevelSelect => Command::LevelConfirm,
                Screen::Win => Command::NextLevel,
                Screen::GameOver => Command::Retry,
                _ => return,
            };
            self.game.command(command);
        }
    }

    /// Hand the frame snapshot to `window.__pixelCommandoRender` if the
    /// page defined one
    fn render(game: &Game) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let hook = js_sys::Reflect::get(&window, &JsValue::from_str("__pixelCommandoRender"));
        let Ok(hook) = hook else { return };
        if let Some(func) = hook.dyn_ref::<js_sys::Function>() {
            match serde_json::to_string(&game.snapshot()) {
                Ok(json) => {
                    let _ = func.call1(&JsValue::NULL, &JsValue::from_str(&json));
                }
                Err(err) => log::error!("snapshot serialization failed: {err}"),
            }
        }
    }

    fn vendor_event_from(name: &str, rewarded: bool) -> Option<VendorEvent> {
        Some(match name {
            "sdkReady" => VendorEvent::SdkReady,
            "adStarted" => VendorEvent::AdStarted,
            "adFinished" => VendorEvent::AdFinished,
            "adError" => VendorEvent::AdError,
            "gamePause" => VendorEvent::GamePause,
            "gameStart" => VendorEvent::GameStart,
            "rewardResult" => VendorEvent::RewardResult { rewarded },
            _ => return None,
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pixel Commando starting...");

        let window = web_sys::window().expect("no window");
        let seed = js_sys::Date::now() as u64;
        let host = Rc::new(RefCell::new(Host::new(seed)));

        // Keyboard
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                host.borrow_mut().key_down(&e.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                host.borrow_mut().key_up(&e.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // SDK glue reports vendor lifecycle through
        // `window.__pixelCommandoVendorEvent(name, rewarded)`
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(String, bool)>::new(move |name: String, rewarded| {
                if let Some(event) = vendor_event_from(&name, rewarded) {
                    host.borrow_mut().game.handle_vendor_event(event);
                } else {
                    log::warn!("unknown vendor event: {name}");
                }
            });
            let _ = js_sys::Reflect::set(
                &window,
                &JsValue::from_str("__pixelCommandoVendorEvent"),
                closure.as_ref(),
            );
            closure.forget();
        }

        // requestAnimationFrame loop
        let raf: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let raf_clone = raf.clone();
        *raf.borrow_mut() = Some(Closure::new(move |now: f64| {
            host.borrow_mut().frame(now);
            if let Some(window) = web_sys::window() {
                if let Some(closure) = raf_clone.borrow().as_ref() {
                    let _ = window
                        .request_animation_frame(closure.as_ref().unchecked_ref());
                }
            }
        }));
        if let Some(closure) = raf.borrow().as_ref() {
            let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pixel_commando::sim::TickInput;
    use pixel_commando::{Command, Game};

    env_logger::init();
    log::info!("Pixel Commando (native) starting...");

    // Headless demo: start level 1 and run the player to the right for a
    // few seconds, firing periodically.
    let mut game = Game::new(0x5EED);
    game.command(Command::MenuConfirm);

    for frame in 0u32..600 {
        let input = TickInput {
            right: true,
            jump: frame % 90 == 0,
            shoot: frame % 30 == 0,
            ..TickInput::default()
        };
        game.frame(&input);
    }

    let snap = game.snapshot();
    log::info!(
        "after 600 ticks: screen={} x={:.0} health={} coins={}",
        snap.screen,
        snap.player.pos.x,
        snap.player.health,
        snap.progress.coins
    );
    println!(
        "Pixel Commando headless demo finished on screen '{}' at x={:.0} with {} coins",
        snap.screen, snap.player.pos.x, snap.progress.coins
    );
}
