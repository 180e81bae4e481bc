//! `log` backend writing to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&msg),
            Level::Warn => console::warn_1(&msg),
            Level::Info => console::info_1(&msg),
            Level::Debug | Level::Trace => console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger once; later calls only adjust the level.
pub fn init(level: LevelFilter) {
    // set_logger fails only if a logger is already installed, which is fine
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
