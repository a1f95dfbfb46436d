//! 2D layout editor for lighting installations.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It draws a
//! top-down view of a room with the placed track, spotlight, connector and
//! power-supply components, and turns pointer and keyboard input into edit
//! intents. The scene itself belongs to the host's configuration store: the
//! engine reads snapshots and emits [`engine::Action`]s, and never mutates a
//! snapshot in place.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`model`] | Scene snapshot types and the per-type connection-point catalog |
//! | [`camera`] | Viewport pan/zoom and world <-> canvas transforms |
//! | [`input`] | Modes, modifiers and the interaction state machine |
//! | [`hit`] | Hit-testing of component bodies and connection points |
//! | [`connect`] | Two-click connection handshake |
//! | [`measure`] | Two-click distance measurement and the measurement list |
//! | [`render`] | Canvas2D render pipeline |
//! | [`sprites`] | Per-type sprite loading with fallback |
//! | [`host`] | DOM event wiring and window-level pointer capture |
//! | [`config`] | Host-supplied editor configuration |
//! | [`error`] | Editor error type |
//! | [`consts`] | Shared numeric constants (zoom limits, hit padding, box sizes) |

pub mod camera;
pub mod config;
pub mod connect;
pub mod consts;
pub mod engine;
pub mod error;
pub mod hit;
pub mod host;
pub mod input;
pub mod measure;
pub mod model;
pub mod render;
pub mod sprites;

/// Route `log` output and panics to the browser console.
///
/// Safe to call more than once: the first logger stays installed and the
/// level filter follows the latest call, so each mount applies its config.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(level) {
        log::debug!("console logger already installed: {err}");
    }
    log::set_max_level(level.to_level_filter());
}
