//! Amidakuji core crate.
//!
//! A ladder lottery: vertical lines for participants, random horizontal rungs,
//! and a deterministic walk from every top label to a distinct bottom outcome.
//! The combinatorial core (`ladder`) and the controller (`game`) are plain Rust
//! and run natively; `stage` binds them to the page canvas and controls.

use wasm_bindgen::prelude::*;

pub mod animation;
pub mod config;
pub mod error;
pub mod game;
pub mod ladder;
pub mod layout;
pub mod rng;
pub mod roster;
mod stage;

pub use config::LadderConfig;
pub use error::LadderError;
pub use game::LadderGame;
pub use ladder::{Ladder, Mapping, RungGrid};
pub use rng::{RandomSource, SeededRng};
pub use stage::{start_classic_ladder, start_ladder};

#[cfg(feature = "serde_json")]
pub use stage::start_ladder_with_config;

/// Release date shown in the page footer.
pub const APP_VERSION_DATE: &str = "2026-02-11";

/// Line counts passed to the JS exports are clamped to `2..=MAX_EXPORT_LINES`.
pub const MAX_EXPORT_LINES: u32 = 64;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn app_version() -> String {
    APP_VERSION_DATE.to_string()
}

/// Generate a ladder from `seed` and return its mapping (`mapping[top] = bottom`).
#[wasm_bindgen]
pub fn resolve_ladder(lines: u32, complexity: u32, seed: u32) -> Vec<u32> {
    let ladder = export_ladder(lines, complexity, seed);
    ladder.mapping.as_slice().iter().map(|&b| b as u32).collect()
}

/// Same ladder as [`resolve_ladder`], serialized with its grid.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn ladder_snapshot_json(lines: u32, complexity: u32, seed: u32) -> Result<String, JsValue> {
    let ladder = export_ladder(lines, complexity, seed);
    serde_json::to_string(&ladder).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn export_ladder(lines: u32, complexity: u32, seed: u32) -> Ladder {
    let config = LadderConfig::default();
    let complexity = config.clamp_complexity(complexity);
    let lines = lines.clamp(2, MAX_EXPORT_LINES) as usize;
    let mut rng = SeededRng::new(seed as u64);
    Ladder::generate(lines, complexity, &config, &mut rng)
}

/// Browser console logging; silent off wasm so native tests never call into JS.
pub(crate) fn log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

#[cfg(target_arch = "wasm32")]
fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
