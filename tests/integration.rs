// Integration tests (native) for the `taplap` crate.
// These tests avoid wasm-specific functionality and drive sessions with synthetic
// timestamps so they can run under `cargo test` on the host.

use rand::SeedableRng;
use rand::rngs::StdRng;
use taplap::motion::{self, Lane};
use taplap::path::{self, Level, Path};
use taplap::render::{self, Painter};
use taplap::{Anchor, Config, Session};

#[derive(Default)]
struct CountingPainter {
    clears: Vec<(f64, f64)>,
    disks: Vec<(f64, f64, String)>,
}

impl Painter for CountingPainter {
    fn clear(&mut self, width: f64, height: f64) {
        self.clears.push((width, height));
    }
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _x: f64, _y: f64) {}
    fn line_to(&mut self, _x: f64, _y: f64) {}
    fn stroke(&mut self, _color: &str) {}
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, _color: &str) {}
    fn fill_disk(&mut self, x: f64, y: f64, _radius: f64, color: &str) {
        self.disks.push((x, y, color.to_string()));
    }
}

#[test]
fn generated_paths_hold_walk_invariants() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        for n in [2usize, 3, 40, 100] {
            let p = path::generate(&mut rng, n);
            assert_eq!(p.len(), n);
            assert!(p.levels().iter().all(|l| (1..=7).contains(&l.get())));
            assert!(p.levels().windows(2).all(|w| w[0] != w[1]));
        }
    }
}

#[test]
fn example_paths_are_checked_for_repeats() {
    let ok = Path::from_levels(&[3, 6, 2, 7, 1]).expect("valid walk");
    assert_eq!(ok.len(), 5);
    assert!(Path::from_levels(&[3, 5, 5]).is_none());
}

#[test]
fn one_beat_at_90_bpm_is_one_lap() {
    let p = motion::round_to_digits(motion::progress(666.67, 0.0, 90.0, 80.0), 1);
    assert!((p - 80.0).abs() < 0.05, "progress {p}");
}

#[test]
fn doubling_bpm_doubles_progress_rate() {
    for t in [100.0, 1_000.0, 12_345.0] {
        let a = motion::progress(t, 0.0, 75.0, 140.0);
        let b = motion::progress(t, 0.0, 150.0, 140.0);
        assert!((b - 2.0 * a).abs() < 1e-9);
    }
}

#[test]
fn interpolation_hits_levels_at_segment_boundaries() {
    let p = Path::from_levels(&[3, 6, 2, 7, 1]).unwrap();
    let lane = Lane {
        base_y: 100.0,
        vertical_margin: 40.0,
    };
    for (i, level) in p.levels().iter().enumerate().take(4) {
        let y = motion::vertical_position(0.0, i as f64 * 80.0, 80.0, &p, lane);
        assert_eq!(y, lane.y(*level));
        let next = p.get(i + 1).unwrap();
        let near = motion::vertical_position(0.0, i as f64 * 80.0 + 79.99, 80.0, &p, lane);
        assert!((near - lane.y(next)).abs() < 0.1);
    }
}

#[test]
fn resizing_leaves_path_and_progress_alone() {
    let config = Config {
        maxfps: None,
        anchor: Anchor::Center,
        ..Config::default()
    };
    let mut rng = StdRng::seed_from_u64(9);
    let mut session = Session::start(config, &mut rng, 0.0).unwrap();
    session.tick(2_345.0);
    let path_before = session.path().clone();
    let progress_before = session.progress();

    let mut painter = CountingPainter::default();
    for (w, h) in [(800.0, 600.0), (1_920.0, 1_080.0), (320.0, 480.0)] {
        render::draw_scene(&mut painter, &session, w, h);
    }
    assert_eq!(painter.clears.len(), 3);
    assert_eq!(session.path(), &path_before);
    assert_eq!(session.progress(), progress_before);
}

#[test]
fn token_disks_use_their_palette_color() {
    let config = Config {
        players: 2,
        colors: vec!["red".into(), "blue".into(), "unused".into()],
        ..Config::default()
    };
    let session = Session::with_path(config, Path::from_levels(&[1, 7]).unwrap(), 0.0).unwrap();
    let mut painter = CountingPainter::default();
    render::draw_scene(&mut painter, &session, 640.0, 480.0);
    let colors: Vec<&str> = painter.disks.iter().map(|d| d.2.as_str()).collect();
    assert_eq!(colors, vec!["red", "blue"]);
    // progress 0: both tokens rest on level 1 of their own lane
    assert_eq!(painter.disks[0].1, 100.5);
    assert_eq!(painter.disks[1].1, 140.5);
}

#[test]
fn long_sessions_hold_the_final_level() {
    let config = Config {
        maxfps: None,
        path_length: 5,
        ..Config::default()
    };
    let mut rng = StdRng::seed_from_u64(4);
    let mut session = Session::start(config, &mut rng, 0.0).unwrap();
    assert!(session.tick(600_000.0));
    let last: Level = session.path().last().unwrap();
    let token = session.tokens()[0];
    let (_, y) = session.token_position(token, 1_024.0);
    assert_eq!(y, session.lane(token).y(last));
}
