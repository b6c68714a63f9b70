//! Browser runtime for the celebration page.
//!
//! Looks up `#fxCanvas` and `#hearts`, builds a [`Celebration`] over them and
//! drives it from `requestAnimationFrame`. The runtime lives in a thread-local
//! slot; JS talks to it through the `#[wasm_bindgen]` functions below. A page
//! missing either element simply gets no effect.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window, window};

use crate::config::FxConfig;
use crate::error::{FxError, FxResult};
use crate::overlay::DomOverlay;
use crate::rng::FxRng;
use crate::surface::CanvasSurface;

mod entities;
mod fx;
mod ticker;

pub use entities::{
    CONFETTI_DRAG, CONFETTI_GRAVITY, Confetti, EXPLOSION_CONFETTI, FRAGMENT_GRAVITY, Fragment,
    PALETTE, Particle, ROCKET_GRAVITY, Rocket, explode_rocket, update_rocket,
};
pub use fx::{Celebration, SpawnCounters};
pub use ticker::{MAX_CATCH_UP, Ticker};

const CANVAS_ID: &str = "fxCanvas";
const HEARTS_ID: &str = "hearts";
const TOGGLE_ID: &str = "toggleLights";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct Runtime {
    fx: Celebration<CanvasSurface, DomOverlay>,
    frame: FrameCallback,
    raf_id: Option<i32>,
}

impl Runtime {
    fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.fx.resize(width, height);
        self.fx.surface_mut().resize(width, height, dpr);
    }

    fn request_frame(&mut self) {
        if self.raf_id.is_some() {
            return;
        }
        let Some(win) = window() else { return };
        if let Some(cb) = self.frame.borrow().as_ref() {
            self.raf_id = win
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .ok();
        }
    }

    fn cancel_frame(&mut self) {
        if let (Some(id), Some(win)) = (self.raf_id.take(), window()) {
            let _ = win.cancel_animation_frame(id);
        }
    }
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

// --- Exported controls -------------------------------------------------------

/// Start the celebration with the profile matching the current viewport and
/// motion preference. Safe to call repeatedly.
#[wasm_bindgen]
pub fn start_celebration() -> Result<(), JsValue> {
    let Some(win) = window() else {
        log::warn!("celebration disabled: {}", FxError::NoWindow);
        return Ok(());
    };
    let (width, _) = viewport(&win);
    start_with(FxConfig::for_viewport(width, prefers_reduced_motion(&win)))
}

/// Like [`start_celebration`], with JSON overrides on top of the viewport profile,
/// e.g. `{"max_particles": 400}`. Overrides only apply on the first start.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_celebration_with_config(json: &str) -> Result<(), JsValue> {
    let win = window().ok_or(FxError::NoWindow)?;
    let (width, _) = viewport(&win);
    let base = FxConfig::for_viewport(width, prefers_reduced_motion(&win));
    let config = crate::config::FxOverrides::from_json(json)?.apply(base);
    start_with(config)
}

#[wasm_bindgen]
pub fn stop_celebration() {
    with_runtime(|rt| {
        if rt.fx.stop() {
            rt.cancel_frame();
        }
    });
}

/// Flip between running and stopped. Returns whether it is running afterwards.
#[wasm_bindgen]
pub fn toggle_celebration() -> bool {
    match with_runtime(|rt| rt.fx.is_running()) {
        Some(true) => {
            stop_celebration();
            false
        }
        Some(false) => {
            resume();
            true
        }
        None => false,
    }
}

#[wasm_bindgen]
pub fn is_celebrating() -> bool {
    with_runtime(|rt| rt.fx.is_running()).unwrap_or(false)
}

/// Extra confetti at page coordinates, e.g. where the "Yes" button was clicked.
/// Returns the number of pieces actually spawned after throttling.
#[wasm_bindgen]
pub fn burst_at(x: f64, y: f64, count: u32) -> u32 {
    with_runtime(|rt| {
        if rt.fx.is_running() {
            let spawned = rt.fx.spawn_burst(x, y, count as usize) as u32;
            rt.request_frame();
            spawned
        } else {
            0
        }
    })
    .unwrap_or(0)
}

#[wasm_bindgen]
pub fn launch_rocket() -> bool {
    with_runtime(|rt| {
        let launched = rt.fx.is_running() && rt.fx.launch_rocket();
        if launched {
            rt.request_frame();
        }
        launched
    })
    .unwrap_or(false)
}

// --- Setup -------------------------------------------------------------------

fn start_with(config: FxConfig) -> Result<(), JsValue> {
    let installed = RUNTIME.with(|cell| cell.borrow().is_some());
    if !installed {
        match install(config) {
            Ok(rt) => RUNTIME.with(|cell| *cell.borrow_mut() = Some(rt)),
            Err(err) => {
                log::warn!("celebration disabled: {err}");
                return Ok(());
            }
        }
    }
    resume();
    Ok(())
}

fn resume() {
    let now = now_ms();
    with_runtime(|rt| {
        if rt.fx.start(now) {
            rt.request_frame();
        }
    });
}

fn install(config: FxConfig) -> FxResult<Runtime> {
    let win = window().ok_or(FxError::NoWindow)?;
    let doc = win.document().ok_or(FxError::NoDocument)?;

    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(CANVAS_ID)
        .ok_or(FxError::MissingElement(CANVAS_ID))?
        .dyn_into()
        .map_err(|_| FxError::MissingElement(CANVAS_ID))?;
    let hearts = doc
        .get_element_by_id(HEARTS_ID)
        .ok_or(FxError::MissingElement(HEARTS_ID))?;

    let (width, height) = viewport(&win);
    let mut surface = CanvasSurface::new(canvas)?;
    surface.resize(width, height, win.device_pixel_ratio());
    let overlay = DomOverlay::new(doc.clone(), hearts);
    log::info!(
        "celebration ready: {width}x{height}, cap {}, reduced motion {}",
        config.max_particles,
        config.reduced_motion
    );
    let fx = Celebration::new(config, FxRng::from_entropy(), surface, overlay, width, height);

    install_listeners(&win)?;
    Ok(Runtime {
        fx,
        frame: frame_callback(),
        raf_id: None,
    })
}

fn frame_callback() -> FrameCallback {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    *f.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_runtime(|rt| {
            rt.raf_id = None;
            if !rt.fx.is_running() {
                return;
            }
            sync_device_pixel_ratio(rt);
            rt.fx.tick(ts);
            // A settled reduced-motion burst has nothing left to draw.
            if !rt.fx.is_idle() {
                rt.request_frame();
            }
        });
    }) as Box<dyn FnMut(f64)>));
    f
}

fn install_listeners(win: &Window) -> FxResult<()> {
    // Viewport resize keeps the canvas at logical pixel size.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let Some(win) = window() else { return };
            let (w, h) = viewport(&win);
            let dpr = win.device_pixel_ratio();
            with_runtime(|rt| rt.resize(w, h, dpr));
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Toggle button (optional on the page).
    match win
        .document()
        .and_then(|d| d.get_element_by_id(TOGGLE_ID))
    {
        Some(button) => {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                toggle_celebration();
            }) as Box<dyn FnMut(_)>);
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        None => log::debug!("no #{TOGGLE_ID} control, keyboard toggle only"),
    }

    // Space bar does the same as the toggle button.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.code() == "Space" && !evt.repeat() {
                evt.prevent_default();
                toggle_celebration();
            }
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

// --- Environment -------------------------------------------------------------

fn sync_device_pixel_ratio(rt: &mut Runtime) {
    let Some(win) = window() else { return };
    let dpr = win.device_pixel_ratio();
    if (dpr - rt.fx.surface().dpr()).abs() > f64::EPSILON {
        let (w, h) = rt.fx.viewport();
        rt.resize(w, h, dpr);
    }
}

fn viewport(win: &Window) -> (f64, f64) {
    let w = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (w, h)
}

fn prefers_reduced_motion(win: &Window) -> bool {
    win.match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
