//! Drawing surface used by the animation core.
//!
//! The core only needs three primitives; `CanvasSurface` implements them on a
//! 2D canvas sized to the viewport, tests use an in-memory recorder.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{FxError, FxResult};

pub trait Surface {
    /// Wipe everything back to transparent.
    fn clear(&mut self);
    /// Filled rectangle of size `w x h` centred on `(x, y)`, rotated by `rotation` radians.
    fn fill_rotated_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rotation: f64, color: &str);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, alpha: f64);
}

/// 2D canvas drawn in logical (CSS) pixels regardless of device pixel ratio.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> FxResult<Self> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(FxError::NoContext)?
            .dyn_into()
            .map_err(|_| FxError::NoContext)?;
        Ok(Self {
            canvas,
            ctx,
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        })
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Resize the backing store to `width * dpr` by `height * dpr` and scale the
    /// context so callers keep drawing in logical pixels.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.canvas.set_width((width * dpr).round() as u32);
        self.canvas.set_height((height * dpr).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        // Setting width/height resets the transform, so reapply it every time.
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rotated_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rotation: f64, color: &str) {
        self.ctx.save();
        let _ = self.ctx.translate(x, y);
        let _ = self.ctx.rotate(rotation);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
        self.ctx.restore();
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, alpha: f64) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
        self.ctx.set_global_alpha(1.0);
    }
}
