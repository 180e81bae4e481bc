//! Host-agnostic session state and per-frame tick.
//!
//! The browser loop feeds `requestAnimationFrame` timestamps into [`Session::tick`];
//! tests feed synthetic ones. No timestamp is read from the environment here.

use log::{debug, info, warn};
use rand::Rng;

use crate::config::{Config, DEBUG_INTERVAL_MS};
use crate::error::TaplapResult;
use crate::motion::{self, BeatClock, Lane, Token};
use crate::path::{self, Path};

/// Frame-rate limiter: throttles work, never scheduling.
#[derive(Clone, Debug)]
pub struct FrameClock {
    min_interval_ms: Option<f64>,
    last_render_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(min_interval_ms: Option<f64>) -> Self {
        Self {
            min_interval_ms,
            last_render_ms: None,
        }
    }

    /// True when a frame at `now` should be rendered; records it as the last one.
    pub fn admit(&mut self, now: f64) -> bool {
        if let (Some(min), Some(last)) = (self.min_interval_ms, self.last_render_ms) {
            if now - last < min {
                return false;
            }
        }
        self.last_render_ms = Some(now);
        true
    }

    pub fn last_render_ms(&self) -> Option<f64> {
        self.last_render_ms
    }
}

/// One running animation: generated path, tokens, clocks and derived progress.
#[derive(Clone, Debug)]
pub struct Session {
    config: Config,
    path: Path,
    tokens: Vec<Token>,
    frames: FrameClock,
    beats: BeatClock,
    progress: f64,
    last_debug_ms: Option<f64>,
    outran_path: bool,
}

impl Session {
    /// Validates `config`, generates the path and starts the clocks at `now`.
    pub fn start<R: Rng + ?Sized>(config: Config, rng: &mut R, now: f64) -> TaplapResult<Self> {
        config.validate()?;
        let path = path::generate(rng, config.path_length);
        Self::with_path(config, path, now)
    }

    /// Session over a caller-supplied path. `config.path_length` is not consulted.
    pub fn with_path(config: Config, path: Path, now: f64) -> TaplapResult<Self> {
        config.validate()?;
        let tokens = (1..=config.players).filter_map(Token::new).collect();
        info!(
            "taplap session: {} tokens, {} levels, {} bpm, lap {}px",
            config.players,
            path.len(),
            config.bpm,
            config.lap_distance
        );
        Ok(Self {
            frames: FrameClock::new(config.min_frame_interval_ms()),
            beats: BeatClock::new(config.bpm, now),
            config,
            path,
            tokens,
            progress: 0.0,
            last_debug_ms: None,
            outran_path: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn start_ms(&self) -> f64 {
        self.beats.start_ms()
    }

    /// Advances the session to `now`. Returns false when the frame cap skips the
    /// frame, in which case nothing changes and nothing should be drawn.
    pub fn tick(&mut self, now: f64) -> bool {
        // frame timestamps may predate the start call by a fraction of a frame
        let now = now.max(self.start_ms());
        if !self.frames.admit(now) {
            return false;
        }
        let raw = motion::progress(
            now,
            self.start_ms(),
            self.config.bpm,
            self.config.lap_distance,
        );
        self.progress = motion::round_to_digits(raw, self.config.progress_digits);

        let beats = self.beats.take_new_beats(now);
        if !beats.is_empty() {
            debug!("beat {}", beats.end());
        }
        if self.last_debug_ms.is_none_or(|t| now - t > DEBUG_INTERVAL_MS) {
            self.last_debug_ms = Some(now);
            debug!(
                "progress {:.1}px, segment {}",
                self.progress,
                self.current_segment()
            );
        }
        if !self.outran_path && self.current_segment().saturating_add(1) >= self.path.len() {
            self.outran_path = true;
            warn!(
                "track ran past its {} generated levels; holding the last level",
                self.path.len()
            );
        }
        true
    }

    /// Segment under the scroll origin.
    pub fn current_segment(&self) -> usize {
        motion::segment_at(0.0, self.progress, self.config.lap_distance).index
    }

    pub fn lane(&self, token: Token) -> Lane {
        Lane {
            base_y: motion::lane_base_y(
                self.config.top_margin,
                self.config.vertical_margin,
                token.lane(),
            ),
            vertical_margin: self.config.vertical_margin,
        }
    }

    /// Screen position of `token` for a viewport `viewport_width` px wide.
    pub fn token_position(&self, token: Token, viewport_width: f64) -> (f64, f64) {
        let x = self
            .config
            .anchor
            .token_x(viewport_width, token.lane(), self.config.lap_distance);
        let y = motion::vertical_position(
            x,
            self.progress,
            self.config.lap_distance,
            &self.path,
            self.lane(token),
        );
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Anchor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(config: Config) -> Session {
        let mut rng = StdRng::seed_from_u64(42);
        Session::start(config, &mut rng, 1_000.0).unwrap()
    }

    #[test]
    fn test_frame_clock_caps_rate() {
        let mut fc = FrameClock::new(Some(10.0));
        assert!(fc.admit(0.0));
        assert!(!fc.admit(5.0));
        assert!(!fc.admit(9.9));
        assert!(fc.admit(10.0));
        assert_eq!(fc.last_render_ms(), Some(10.0));
    }

    #[test]
    fn test_frame_clock_uncapped() {
        let mut fc = FrameClock::new(None);
        assert!(fc.admit(0.0));
        assert!(fc.admit(0.1));
        assert!(fc.admit(0.1));
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let mut rng = StdRng::seed_from_u64(0);
        let bad = Config {
            bpm: 0.0,
            ..Config::default()
        };
        assert!(Session::start(bad, &mut rng, 0.0).is_err());
    }

    #[test]
    fn test_with_path_rejects_invalid_config() {
        let path = Path::from_levels(&[1, 2, 3]).unwrap();
        for bad in [
            Config { lap_distance: 0.0, ..Config::default() },
            Config { progress_digits: 400, ..Config::default() },
        ] {
            assert!(Session::with_path(bad, path.clone(), 0.0).is_err());
        }
    }

    #[test]
    fn test_tick_with_extreme_tempo_stays_finite() {
        let config = Config {
            bpm: 1e300,
            maxfps: None,
            ..Config::default()
        };
        let mut s = session(config);
        assert!(s.tick(2_000.0));
        assert_eq!(s.current_segment(), usize::MAX);
        let last = s.path().last().unwrap();
        let token = s.tokens()[0];
        assert_eq!(s.token_position(token, 800.0).1, s.lane(token).y(last));
        assert!(s.tick(3_000.0));
    }

    #[test]
    fn test_start_builds_path_and_tokens() {
        let s = session(Config::default());
        assert_eq!(s.path().len(), 100);
        let idx: Vec<usize> = s.tokens().iter().map(|t| t.index()).collect();
        assert_eq!(idx, vec![1, 2, 3, 4]);
        assert_eq!(s.progress(), 0.0);
    }

    #[test]
    fn test_tick_tracks_elapsed_beats() {
        let mut s = session(Config {
            bpm: 90.0,
            lap_distance: 80.0,
            maxfps: None,
            ..Config::default()
        });
        assert!(s.tick(1_000.0));
        assert_eq!(s.progress(), 0.0);
        assert!(s.tick(1_000.0 + 666.67));
        assert!((s.progress() - 80.0).abs() < 0.05);
        assert_eq!(s.current_segment(), 1);
    }

    #[test]
    fn test_throttled_tick_keeps_progress() {
        let mut s = session(Config {
            maxfps: Some(10.0),
            ..Config::default()
        });
        assert!(s.tick(1_500.0));
        let before = s.progress();
        assert!(!s.tick(1_550.0));
        assert_eq!(s.progress(), before);
        assert!(s.tick(1_600.0));
        assert!(s.progress() > before);
    }

    #[test]
    fn test_token_position_left_anchor_follows_path() {
        let config = Config {
            lap_distance: 100.0,
            maxfps: None,
            ..Config::default()
        };
        let path = Path::from_levels(&[1, 3, 2]).unwrap();
        // 90 bpm: one segment every 666.67 ms
        let mut s = Session::with_path(config, path, 0.0).unwrap();
        s.tick(333.333);
        let t2 = s.tokens()[1];
        let (x, y) = s.token_position(t2, 800.0);
        assert_eq!(x, 0.0);
        // lane 1 base = 140; halfway from level 1 (140) to level 3 (220)
        assert!((y - 180.0).abs() < 0.1, "y = {y}");
    }

    #[test]
    fn test_token_position_center_anchor_staggers_tokens() {
        let config = Config {
            anchor: Anchor::Center,
            ..Config::default()
        };
        let s = session(config);
        let xs: Vec<f64> = s
            .tokens()
            .iter()
            .map(|&t| s.token_position(t, 1000.0).0)
            .collect();
        assert_eq!(xs, vec![500.0, 360.0, 220.0, 80.0]);
    }

    #[test]
    fn test_tick_past_path_end_holds_last_level() {
        let config = Config {
            maxfps: None,
            ..Config::default()
        };
        let path = Path::from_levels(&[2, 6]).unwrap();
        let mut s = Session::with_path(config, path, 0.0).unwrap();
        assert!(s.tick(60_000.0));
        let t1 = s.tokens()[0];
        let (_, y) = s.token_position(t1, 800.0);
        assert_eq!(y, 100.0 + 5.0 * 40.0);
    }
}
