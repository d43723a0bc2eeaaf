//! Flappy Canvas core crate.
//!
//! A small side-scrolling arcade game rendered on a fixed 288x512 HTML canvas.
//! The simulation (gravity, obstacle spawning/recycling, collision, scoring)
//! lives in pure-Rust modules under [`game`] and runs natively under
//! `cargo test`; the browser glue (canvas, sprites, input listeners, the
//! requestAnimationFrame loop) only comes alive through [`start_game`].

use wasm_bindgen::prelude::*;

pub mod game;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Sets up the canvas and input listeners, loads the sprite set and starts
/// the frame loop once every image has resolved. Asset failure is fatal: the
/// loop never runs and the error is logged.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start_arcade_mode()
}

/// Tears the game down: cancels the scheduled frame callback (exactly once)
/// and drops the session. No further ticks occur afterwards.
#[wasm_bindgen]
pub fn stop_game() {
    game::stop_arcade_mode();
}
