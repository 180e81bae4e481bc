//! Session configuration and drawing constants.

use serde::Deserialize;

use crate::error::{TaplapError, TaplapResult};
use crate::motion::Anchor;
use crate::path::Level;

// Drawing style
pub const GRID_COLOR: &str = "#eee";
pub const MARKER_COLOR: &str = "#333";
pub const MARKER_SIZE: f64 = 4.0;
pub const TOKEN_RADIUS: f64 = 10.0;
/// Offset that lands 1px strokes on pixel centers.
pub const HALF_PIXEL: f64 = 0.5;

// Logging cadence for the per-second progress report.
pub const DEBUG_INTERVAL_MS: f64 = 1_000.0;

// Defaults
pub const DEFAULT_PLAYERS: usize = 4;
pub const DEFAULT_VERTICAL_MARGIN: f64 = 40.0;
pub const DEFAULT_LAP_DISTANCE: f64 = 140.0;
pub const DEFAULT_TOP_MARGIN: f64 = 100.0;
pub const DEFAULT_COLORS: [&str; 4] = ["#f00", "#0f0", "#00f", "#f0f"];
pub const DEFAULT_BPM: f64 = 90.0;
pub const DEFAULT_MAX_FPS: f64 = 120.0;
pub const DEFAULT_PATH_LENGTH: usize = 100;
pub const DEFAULT_PROGRESS_DIGITS: u32 = 1;
/// f64 carries no more useful decimals than this.
pub const MAX_PROGRESS_DIGITS: u32 = 15;

/// Options accepted by `taplap(selector, conf)`. Missing fields take the defaults
/// above.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub players: usize,
    pub vertical_margin: f64,
    pub lap_distance: f64,
    pub top_margin: f64,
    pub colors: Vec<String>,
    pub bpm: f64,
    pub maxfps: Option<f64>,
    pub path_length: usize,
    pub anchor: Anchor,
    pub progress_digits: u32,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            vertical_margin: DEFAULT_VERTICAL_MARGIN,
            lap_distance: DEFAULT_LAP_DISTANCE,
            top_margin: DEFAULT_TOP_MARGIN,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            bpm: DEFAULT_BPM,
            maxfps: Some(DEFAULT_MAX_FPS),
            path_length: DEFAULT_PATH_LENGTH,
            anchor: Anchor::default(),
            progress_digits: DEFAULT_PROGRESS_DIGITS,
            debug: false,
        }
    }
}

impl Config {
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> TaplapResult<Self> {
        let config: Config =
            serde_json::from_str(text).map_err(|e| TaplapError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would produce non-finite positions or missing colors.
    pub fn validate(&self) -> TaplapResult<()> {
        positive("bpm", self.bpm)?;
        positive("lapDistance", self.lap_distance)?;
        positive("verticalMargin", self.vertical_margin)?;
        if !self.top_margin.is_finite() {
            return Err(TaplapError::config("topMargin must be finite"));
        }
        if let Some(fps) = self.maxfps {
            positive("maxfps", fps)?;
        }
        if self.players == 0 {
            return Err(TaplapError::config("players must be at least 1"));
        }
        if self.colors.len() < self.players {
            return Err(TaplapError::config(format!(
                "colors has {} entries but players is {}",
                self.colors.len(),
                self.players
            )));
        }
        if self.progress_digits > MAX_PROGRESS_DIGITS {
            return Err(TaplapError::config(format!(
                "progressDigits must be at most {MAX_PROGRESS_DIGITS}, got {}",
                self.progress_digits
            )));
        }
        if self.path_length < 2 {
            return Err(TaplapError::config("pathLength must be at least 2"));
        }
        Ok(())
    }

    /// Minimum time between rendered frames, if capped.
    pub fn min_frame_interval_ms(&self) -> Option<f64> {
        self.maxfps.map(|fps| 1_000.0 / fps)
    }

    /// Horizontal grid lines: every level of the first lane plus one per extra lane.
    pub fn grid_rows(&self) -> usize {
        Level::MAX as usize + self.players.saturating_sub(1)
    }
}

fn positive(name: &str, value: f64) -> TaplapResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TaplapError::config(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}
