//! Input model: editor modes, modifier keys, mouse buttons, and the gesture state.
//!
//! `Mode` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InteractionState` is the single active gesture or pending
//! handshake, carrying the context needed to compute deltas and emit intents.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::model::{ComponentId, Vec3};

/// Editor mode chosen in the host toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Click to select, drag to move (default).
    #[default]
    Select,
    /// Same gestures as `Select`; the host uses it to signal move intent.
    Move,
    /// Plain clicks on a component start a rotation.
    Rotate,
    /// Two clicks capture a distance.
    Measure,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Linux/Windows or Cmd on macOS: the multi-select toggle.
    #[must_use]
    pub fn toggles_selection(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`, `"ArrowUp"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta in pixels (positive `dy` scrolls down).
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Canvas-space rectangle normalized to a non-negative size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Build the rectangle spanned by two corners, in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// The single active gesture or pending two-click handshake.
///
/// Gesture variants (`Panning`, `Dragging`, `Rotating`, `BoxSelecting`) end on
/// pointer-up or pointer-leave. `Connecting` and `Measuring` span two clicks
/// and survive pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Dragging the view.
    Panning {
        /// Pointer position at the previous event.
        last: Point,
    },
    /// Moving the selected components together.
    Dragging {
        /// Pointer position at pointer-down.
        start: Point,
        /// Position of every dragged component at pointer-down.
        start_positions: HashMap<ComponentId, Vec3>,
        /// Set once the pointer has moved past the drag threshold.
        has_moved: bool,
    },
    /// Spinning one component around its center.
    Rotating { target_id: ComponentId },
    /// Rubber-band selection.
    BoxSelecting { start: Point, current: Point, has_moved: bool },
    /// First port of a connection has been clicked.
    Connecting { from_component_id: ComponentId, from_point_id: String },
    /// Measure mode; `first_point` is set after the first click.
    Measuring { first_point: Option<Point> },
}

impl InteractionState {
    /// Whether this state is a drag-style gesture that needs global pointer capture.
    #[must_use]
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            Self::Panning { .. } | Self::Dragging { .. } | Self::Rotating { .. } | Self::BoxSelecting { .. }
        )
    }

    /// The live box-selection rectangle, if one is being dragged.
    #[must_use]
    pub fn selection_rect(&self) -> Option<SelectionRect> {
        match self {
            Self::BoxSelecting { start, current, .. } => Some(SelectionRect::from_corners(*start, *current)),
            _ => None,
        }
    }

    /// The pending first measurement point, if any.
    #[must_use]
    pub fn pending_measurement(&self) -> Option<Point> {
        match self {
            Self::Measuring { first_point } => *first_point,
            _ => None,
        }
    }

    /// The pending connection source, if any.
    #[must_use]
    pub fn pending_connection(&self) -> Option<(&str, &str)> {
        match self {
            Self::Connecting { from_component_id, from_point_id } => {
                Some((from_component_id.as_str(), from_point_id.as_str()))
            }
            _ => None,
        }
    }
}
