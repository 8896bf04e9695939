pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use brick_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// brick_web::export_game!(MyGame, "my-game", select);
/// ```
///
/// `game_init(selection)` builds the game from a host-provided string with
/// `<$game_type>::select(&str) -> Result<Self, E>`; a failure is logged and
/// thrown to the host instead of starting the loop.
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `brick_engine::Game`
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    (@common $game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Runs `f` against the live runner. Calls made before `game_init` are ignored.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        fn start_runner(game: $game_type) {
            let runner = $crate::GameRunner::new(game);
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        fn install_logging() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32, button: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, button }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32, button: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y, button }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_wheel(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_snapshot() -> Option<String> {
            with_runner(|r| r.snapshot()).flatten()
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_header_ptr() -> *const f32 {
            with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const f32 {
            with_runner(|r| r.sound_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height()).unwrap_or_default()
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats()).unwrap_or_default()
        }
    };

    // The host picks what to start (a level number, a file name).
    ($game_type:ty, $game_name:literal, select) => {
        $crate::export_game!(@common $game_type, $game_name);

        #[wasm_bindgen]
        pub fn game_init(selection: &str) -> Result<(), JsValue> {
            install_logging();
            match <$game_type>::select(selection) {
                Ok(game) => {
                    start_runner(game);
                    Ok(())
                }
                Err(e) => {
                    log::error!("{}: {}", $game_name, e);
                    Err(JsValue::from_str(&e.to_string()))
                }
            }
        }
    };
}
