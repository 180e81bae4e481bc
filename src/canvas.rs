//! Browser glue: canvas lookup, resize tracking and the animation frame loop.
//!
//! The session and its painter live in one `Stage` shared by the frame closure and
//! the resize closure. Only the resize handler changes the canvas size; the frame
//! callback reads the size afresh every time it paints.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window, window};

use crate::config::Config;
use crate::error::{TaplapError, TaplapResult};
use crate::frame::Session;
use crate::render::{self, Painter};

impl Painter for CanvasRenderingContext2d {
    fn clear(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn stroke(&mut self, color: &str) {
        self.set_stroke_style_str(color);
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }

    fn fill_disk(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        CanvasRenderingContext2d::begin_path(self);
        self.arc(x, y, radius, 0.0, TAU).ok();
        self.set_fill_style_str(color);
        self.fill();
    }
}

/// Runtime state of one running animation.
struct Stage {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    session: Session,
}

impl Stage {
    fn tick(&mut self, now: f64) {
        if self.session.tick(now) {
            self.paint();
        }
    }

    fn paint(&mut self) {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        render::draw_scene(&mut self.ctx, &self.session, width, height);
    }

    fn fit_to(&mut self, win: &Window) {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        self.canvas.set_width(dim(win.inner_width()) as u32);
        self.canvas.set_height(dim(win.inner_height()) as u32);
    }
}

/// Looks up the canvas, starts a session at the current time and hands it to the
/// browser's frame loop. Runs until the page goes away.
pub fn start(selector: &str, config: Config) -> TaplapResult<()> {
    let win = window().ok_or(TaplapError::NoWindow)?;
    let doc = win.document().ok_or(TaplapError::NoDocument)?;

    let element = doc
        .query_selector(selector)
        .map_err(|e| TaplapError::js(&e))?
        .ok_or_else(|| TaplapError::CanvasNotFound(selector.to_string()))?;
    let canvas: HtmlCanvasElement = element
        .dyn_into()
        .map_err(|_| TaplapError::NotACanvas(selector.to_string()))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| TaplapError::js(&e))?
        .ok_or_else(|| TaplapError::NoContext(selector.to_string()))?
        .dyn_into()
        .map_err(|_| TaplapError::NoContext(selector.to_string()))?;

    let now = performance_now(&win);
    let session = Session::start(config, &mut rand::rng(), now)?;
    info!("taplap started on '{selector}'");

    let stage = Rc::new(RefCell::new(Stage {
        canvas,
        ctx,
        session,
    }));
    watch_resize(&win, stage.clone())?;
    start_frame_loop(stage);
    Ok(())
}

fn performance_now(win: &Window) -> f64 {
    win.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Keeps the canvas the size of the window and repaints at the current progress.
fn watch_resize(win: &Window, stage: Rc<RefCell<Stage>>) -> TaplapResult<()> {
    {
        let mut st = stage.borrow_mut();
        st.fit_to(win);
        st.paint();
    }
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        if let Some(win) = window() {
            let mut st = stage.borrow_mut();
            st.fit_to(&win);
            st.paint();
        }
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        .map_err(|e| TaplapError::js(&e))?;
    closure.forget();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop(stage: Rc<RefCell<Stage>>) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        stage.borrow_mut().tick(ts);
        // always ask for the next frame, even when the fps cap skipped this one
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), callback.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
