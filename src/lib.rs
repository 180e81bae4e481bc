//! taplap core crate.
//!
//! Colored tokens ride a randomly generated track that scrolls in time with a tempo.
//! `taplap(selector, conf)` starts the animation on a canvas; the path walk, the
//! time-to-position math and the scene drawing are plain Rust and usable without a
//! browser.

use wasm_bindgen::prelude::*;

pub mod canvas;
pub mod config;
pub mod error;
pub mod frame;
mod logging;
pub mod motion;
pub mod path;
pub mod render;

pub use config::Config;
pub use error::{TaplapError, TaplapResult};
pub use frame::{FrameClock, Session};
pub use motion::{Anchor, BeatClock, Token};
pub use path::{Level, Path};
pub use render::Painter;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

/// Starts an animation on the canvas matching `selector`. `conf` may be omitted or
/// hold any subset of the options; the rest take their defaults.
#[wasm_bindgen]
pub fn taplap(selector: &str, conf: JsValue) -> Result<(), JsValue> {
    let config = parse_config(conf)?;
    log::set_max_level(log_level(&config));
    canvas::start(selector, config)?;
    Ok(())
}

fn parse_config(conf: JsValue) -> TaplapResult<Config> {
    if conf.is_undefined() || conf.is_null() {
        return Ok(Config::default());
    }
    serde_wasm_bindgen::from_value(conf).map_err(|e| TaplapError::config(e.to_string()))
}

fn log_level(config: &Config) -> log::LevelFilter {
    if config.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}
