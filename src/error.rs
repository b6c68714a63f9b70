//! Error taxonomy for the celebration effect.
//!
//! None of these are fatal to the surrounding page: the runtime logs them and
//! leaves the effect disabled. Entity-cap exhaustion is handled by eviction and
//! never surfaces here.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    /// A required element (`#fxCanvas`, `#hearts`) is absent from the page.
    #[error("missing element #{0}")]
    MissingElement(&'static str),

    #[error("canvas 2d context unavailable")]
    NoContext,

    #[error("invalid effect config: {0}")]
    Config(String),

    /// Anything thrown back at us by a DOM call.
    #[error("js error: {0}")]
    Js(String),
}

pub type FxResult<T> = Result<T, FxError>;

impl From<JsValue> for FxError {
    fn from(value: JsValue) -> Self {
        FxError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<FxError> for JsValue {
    fn from(err: FxError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        FxError::Config(err.to_string())
    }
}
