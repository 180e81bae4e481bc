//! Error type for session start-up. Nothing fails once the loop is running.

use wasm_bindgen::JsValue;

pub type TaplapResult<T> = Result<T, TaplapError>;

#[derive(thiserror::Error, Debug)]
pub enum TaplapError {
    #[error("invalid config: {0}")]
    Config(String),

    #[error("no global window")]
    NoWindow,

    #[error("no document on window")]
    NoDocument,

    #[error("no element matches selector '{0}'")]
    CanvasNotFound(String),

    #[error("element '{0}' is not a <canvas>")]
    NotACanvas(String),

    #[error("2d context unavailable on '{0}'")]
    NoContext(String),

    #[error("js error: {0}")]
    Js(String),
}

impl TaplapError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn js(value: &JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<TaplapError> for JsValue {
    fn from(err: TaplapError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
