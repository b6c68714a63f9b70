//! Heart overlay: the positioned, pointer-events-disabled container that floating
//! hearts are appended to. The CSS animation does the motion; we only add nodes
//! and take them away again.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::{FxError, FxResult};

/// Visual parameters of one floating heart.
#[derive(Clone, Debug, PartialEq)]
pub struct HeartSpec {
    /// Horizontal position as a percentage of the container width.
    pub left_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
    pub size_px: f64,
}

impl HeartSpec {
    /// Seconds after which the node is removed: delay + animation + 1 s slack.
    pub fn lifetime_ms(&self) -> f64 {
        (self.delay_s + self.duration_s + 1.0) * 1000.0
    }
}

pub trait Overlay {
    type Handle;

    fn append(&mut self, heart: &HeartSpec) -> FxResult<Self::Handle>;
    fn remove(&mut self, handle: Self::Handle);
    /// Remove every heart still present.
    fn clear(&mut self);
}

pub struct DomOverlay {
    document: Document,
    container: Element,
}

impl DomOverlay {
    pub fn new(document: Document, container: Element) -> Self {
        Self {
            document,
            container,
        }
    }
}

impl Overlay for DomOverlay {
    type Handle = Element;

    fn append(&mut self, heart: &HeartSpec) -> FxResult<Element> {
        let el: HtmlElement = self
            .document
            .create_element("div")?
            .dyn_into()
            .map_err(|_| FxError::Js("heart node is not an HtmlElement".into()))?;
        el.set_class_name("heart");
        let style = el.style();
        style.set_property("left", &format!("{:.2}%", heart.left_pct))?;
        style.set_property("width", &format!("{:.0}px", heart.size_px))?;
        style.set_property("height", &format!("{:.0}px", heart.size_px))?;
        style.set_property("animation-duration", &format!("{:.2}s", heart.duration_s))?;
        style.set_property("animation-delay", &format!("{:.2}s", heart.delay_s))?;
        self.container.append_child(&el)?;
        Ok(el.unchecked_into())
    }

    fn remove(&mut self, handle: Element) {
        handle.remove();
    }

    fn clear(&mut self) {
        // Only hearts live in here.
        self.container.set_inner_html("");
    }
}
