//! Scene drawing. The session pushes coordinates and colors into a [`Painter`];
//! the browser's 2D context is one painter, tests record into another.

use crate::config::{GRID_COLOR, HALF_PIXEL, MARKER_COLOR, MARKER_SIZE, TOKEN_RADIUS};
use crate::frame::Session;
use crate::motion::Token;

/// Minimal 2D drawing surface, shaped after the canvas path API.
pub trait Painter {
    fn clear(&mut self, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self, color: &str);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_disk(&mut self, x: f64, y: f64, radius: f64, color: &str);
}

/// Redraws the whole scene for a `width` x `height` surface at the session's
/// current progress.
pub fn draw_scene(painter: &mut impl Painter, session: &Session, width: f64, height: f64) {
    painter.clear(width, height);
    draw_grid(painter, session, width);
    for &token in session.tokens() {
        draw_path(painter, session, token, width);
    }
    draw_tokens(painter, session, width);
}

fn draw_grid(painter: &mut impl Painter, session: &Session, width: f64) {
    let c = session.config();
    for i in 0..c.grid_rows() {
        let y = c.vertical_margin * i as f64 + c.top_margin + HALF_PIXEL;
        line(painter, 0.0, y, width, y, GRID_COLOR);
    }
}

/// Path polyline and its point markers on one token's lane. Only the part that
/// crosses the viewport is stroked.
fn draw_path(painter: &mut impl Painter, session: &Session, token: Token, width: f64) {
    let c = session.config();
    let levels = session.path().levels();
    let Some(&first) = levels.first() else {
        return;
    };
    let lane = session.lane(token);
    let progress = session.progress();
    let color = token.color(&c.colors).unwrap_or(GRID_COLOR);

    painter.begin_path();
    painter.move_to(-progress, lane.y(first) + HALF_PIXEL);
    for (j, &level) in levels.iter().enumerate().skip(1) {
        let x = j as f64 * c.lap_distance - progress;
        let y = lane.y(level) + HALF_PIXEL;
        if x < 0.0 {
            // left of the viewport
            painter.move_to(x, y);
        } else if x - c.lap_distance <= width {
            painter.line_to(x, y);
        }
    }
    painter.stroke(color);

    let half = MARKER_SIZE / 2.0;
    for (j, &level) in levels.iter().enumerate() {
        let x = j as f64 * c.lap_distance - progress;
        if x + half < 0.0 || x - half > width {
            continue;
        }
        painter.fill_rect(
            x - half,
            lane.y(level) - half + HALF_PIXEL,
            MARKER_SIZE,
            MARKER_SIZE,
            MARKER_COLOR,
        );
    }
}

fn draw_tokens(painter: &mut impl Painter, session: &Session, width: f64) {
    let palette = &session.config().colors;
    for &token in session.tokens() {
        let (x, y) = session.token_position(token, width);
        let color = token.color(palette).unwrap_or(MARKER_COLOR);
        painter.fill_disk(x + HALF_PIXEL, y + HALF_PIXEL, TOKEN_RADIUS, color);
    }
}

fn line(painter: &mut impl Painter, x1: f64, y1: f64, x2: f64, y2: f64, color: &str) {
    painter.begin_path();
    painter.move_to(x1, y1);
    painter.line_to(x2, y2);
    painter.stroke(color);
}
