//! Time -> position mapping. Everything here is a pure function of timestamps and
//! configuration, so the browser loop and the tests share the same math.

use serde::Deserialize;

use crate::path::{Level, Path};

// --- Core Time / Beat Model -------------------------------------------------

/// BeatClock tracks timing relative to BPM.
#[derive(Clone, Debug)]
pub struct BeatClock {
    bpm: f64,           // beats per minute
    start_ms: f64,      // performance.now() when started
    last_beat_idx: i64, // index of last reported whole beat
}

impl BeatClock {
    pub fn new(bpm: f64, now: f64) -> Self {
        Self {
            bpm,
            start_ms: now,
            last_beat_idx: -1,
        }
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn beat_duration_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }

    pub fn current_beat(&self, now: f64) -> f64 {
        (now - self.start_ms) / self.beat_duration_ms()
    }

    /// Whole beats crossed since the previous call (empty when none).
    pub fn take_new_beats(&mut self, now: f64) -> std::ops::RangeInclusive<i64> {
        let whole = self.current_beat(now).floor() as i64;
        let first = self.last_beat_idx.saturating_add(1);
        if whole >= first {
            self.last_beat_idx = whole;
        }
        first..=whole
    }
}

/// Horizontal distance travelled after `now - start` ms: beats elapsed times the
/// lane distance.
pub fn progress(now_ms: f64, start_ms: f64, bpm: f64, lane_distance: f64) -> f64 {
    (now_ms - start_ms) / (60_000.0 / bpm) * lane_distance
}

pub fn round_to_digits(value: f64, digits: u32) -> f64 {
    if digits == 0 {
        return value.round();
    }
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}

/// Pixel Y of the first level of lane `lane` (0-based).
pub fn lane_base_y(top_margin: f64, vertical_margin: f64, lane: usize) -> f64 {
    top_margin + vertical_margin * lane as f64
}

pub fn level_to_y(level: Level, lane_base_y: f64, vertical_margin: f64) -> f64 {
    lane_base_y + level.offset() as f64 * vertical_margin
}

/// Lane geometry shared by every interpolation on one lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lane {
    pub base_y: f64,
    pub vertical_margin: f64,
}

impl Lane {
    pub fn y(&self, level: Level) -> f64 {
        level_to_y(level, self.base_y, self.vertical_margin)
    }
}

/// Where along the path a horizontal position falls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentPos {
    pub index: usize,
    pub fraction: f64,
}

/// Splits `progress + horizontal_offset` into a segment index and the fraction
/// travelled through it. Positions before the path start clamp to segment 0.
pub fn segment_at(horizontal_offset: f64, progress: f64, lane_distance: f64) -> SegmentPos {
    let absolute_x = progress + horizontal_offset;
    if absolute_x <= 0.0 {
        return SegmentPos {
            index: 0,
            fraction: 0.0,
        };
    }
    SegmentPos {
        index: (absolute_x / lane_distance).floor() as usize,
        fraction: (absolute_x % lane_distance) / lane_distance,
    }
}

/// Y of a token drawn `horizontal_offset` px right of the scroll origin, linearly
/// interpolated between the levels bracketing its segment. Past the end of the
/// path the last level is held; an empty path sits on the lane base.
pub fn vertical_position(
    horizontal_offset: f64,
    progress: f64,
    lane_distance: f64,
    path: &Path,
    lane: Lane,
) -> f64 {
    let seg = segment_at(horizontal_offset, progress, lane_distance);
    let next = seg.index.saturating_add(1);
    let (Some(from), Some(to)) = (path.clamped(seg.index), path.clamped(next)) else {
        return lane.base_y;
    };
    lerp(lane.y(from), lane.y(to), seg.fraction)
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Horizontal placement of tokens on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Every token sits at the left edge; the path scrolls beneath it.
    #[default]
    Left,
    /// Tokens trail the viewport's horizontal midpoint by one lap distance each.
    Center,
}

impl Anchor {
    /// Screen X of token `lane` (0-based), also its offset from the scroll origin.
    pub fn token_x(self, viewport_width: f64, lane: usize, lane_distance: f64) -> f64 {
        match self {
            Anchor::Left => 0.0,
            Anchor::Center => (viewport_width / 2.0).round() - lane as f64 * lane_distance,
        }
    }
}

/// A participant on the track. Position is derived each frame; only the index is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    index: usize,
}

impl Token {
    /// Tokens are numbered from 1.
    pub fn new(index: usize) -> Option<Self> {
        (index >= 1).then_some(Self { index })
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn lane(self) -> usize {
        self.index - 1
    }

    pub fn color(self, palette: &[String]) -> Option<&str> {
        palette.get(self.lane()).map(String::as_str)
    }
}
