//! Shared numeric constants for the layout canvas.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed viewport scale, in pixels per meter.
pub const MIN_SCALE: f64 = 10.0;

/// Largest allowed viewport scale, in pixels per meter.
pub const MAX_SCALE: f64 = 200.0;

/// Scale used when no configuration overrides it.
pub const DEFAULT_SCALE: f64 = 50.0;

/// Multiplicative zoom step applied per wheel notch.
pub const ZOOM_FACTOR: f64 = 1.1;

// ── Hit-testing ─────────────────────────────────────────────────

/// Extra screen-space slop around component bounding boxes, in pixels.
pub const HIT_PADDING_PX: f64 = 15.0;

/// Maximum pointer distance from a connection point that still counts as a hit.
pub const PORT_HIT_RADIUS_PX: f64 = 15.0;

// ── Gestures ────────────────────────────────────────────────────

/// Pointer displacement past which a press becomes a drag, in pixels.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Minimum width and height of a box selection that changes the selection.
pub const MIN_BOX_SELECT_PX: f64 = 5.0;

/// Keyboard nudge distance in meters when grid snapping is off.
pub const NUDGE_STEP_M: f64 = 0.1;

// ── Bounding boxes (pixels, width × height) ─────────────────────

pub const TRACK_BOX_PX: (f64, f64) = (120.0, 30.0);
pub const SPOTLIGHT_BOX_PX: (f64, f64) = (40.0, 40.0);
pub const CONNECTOR_BOX_PX: (f64, f64) = (30.0, 30.0);
pub const POWER_SUPPLY_BOX_PX: (f64, f64) = (50.0, 40.0);
pub const DEFAULT_BOX_PX: (f64, f64) = (40.0, 40.0);
