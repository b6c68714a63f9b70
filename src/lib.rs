//! Valentine celebration effects.
//!
//! Confetti, firework rockets with explosion fragments and floating DOM hearts,
//! drawn over the "yes" page. `start_celebration()` wires everything to the page;
//! the animation core in [`celebration::Celebration`] is plain Rust and is
//! exercised natively by the test suite.

use wasm_bindgen::prelude::*;

pub mod celebration;
pub mod config;
pub mod error;
pub mod overlay;
pub mod rng;
pub mod surface;

pub use celebration::{Celebration, SpawnCounters};
pub use config::FxConfig;
pub use error::{FxError, FxResult};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // A second module instance on the page already owns the logger; keep it.
    let _ = console_log::init_with_level(level);
}
