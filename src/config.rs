//! Editor configuration supplied by the host as JSON.
//!
//! Every field has a default so the host may pass `{}` or omit keys it does
//! not care about.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SCALE;
use crate::error::EditorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Draw component names under their sprites.
    pub show_labels: bool,
    /// Refuse connections between incompatible port kinds.
    pub strict_ports: bool,
    /// Base URL for per-type sprites; `<base>/<type>.png` is requested.
    pub sprite_base_url: String,
    /// `log` level filter name (`"error"` .. `"trace"`).
    pub log_level: String,
    /// Scale (pixels per meter) used on load and on view reset.
    pub initial_scale: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            show_labels: true,
            strict_ports: false,
            sprite_base_url: "/sprites".to_owned(),
            log_level: "info".to_owned(),
            initial_scale: DEFAULT_SCALE,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] when the JSON is malformed or a
    /// field has the wrong type.
    pub fn from_json(raw: &str) -> Result<Self, EditorError> {
        serde_json::from_str(raw).map_err(EditorError::InvalidConfig)
    }

    /// The configured log level, falling back to `Info` for unknown names.
    #[must_use]
    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Sprite URL for one component type.
    #[must_use]
    pub fn sprite_url(&self, type_name: &str) -> String {
        format!("{}/{type_name}.png", self.sprite_base_url.trim_end_matches('/'))
    }
}
