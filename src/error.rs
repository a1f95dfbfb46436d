//! Error type for the fallible edges of the editor: browser APIs and JSON input.

use wasm_bindgen::JsValue;

/// Errors surfaced by the editor.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The configuration JSON could not be parsed.
    #[error("invalid editor config: {0}")]
    InvalidConfig(#[source] serde_json::Error),
    /// The scene snapshot JSON could not be parsed.
    #[error("invalid scene snapshot: {0}")]
    InvalidScene(#[source] serde_json::Error),
    /// A Canvas2D or DOM call threw.
    #[error("canvas call failed: {0}")]
    Canvas(String),
    /// The canvas element did not provide a 2D rendering context.
    #[error("canvas has no 2d context")]
    MissingContext,
    /// No global `window` (not running in a browser).
    #[error("no browser window available")]
    NoWindow,
}

impl From<JsValue> for EditorError {
    fn from(value: JsValue) -> Self {
        Self::Canvas(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<EditorError> for JsValue {
    fn from(err: EditorError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
