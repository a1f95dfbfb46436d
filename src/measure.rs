//! Measurement tool: two-click distance capture and the ordered measurement list.
//!
//! Measurements are display-only. They live in canvas pixels, carry the metric
//! distance computed at capture time, and never touch the scene.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Point, Viewport};

/// One captured distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: String,
    pub start: Point,
    pub end: Point,
    pub distance_meters: f64,
}

impl Measurement {
    /// Capture the distance between two canvas points at the current scale.
    #[must_use]
    pub fn capture(start: Point, end: Point, viewport: &Viewport) -> Self {
        Self {
            id: format!("measurement-{}", Uuid::new_v4().simple()),
            start,
            end,
            distance_meters: viewport.canvas_dist_to_world(start.distance_to(end)),
        }
    }

    /// Midpoint of the measured segment, where the label is drawn.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point::new((self.start.x + self.end.x) * 0.5, (self.start.y + self.end.y) * 0.5)
    }

    /// Distance formatted for display, e.g. `"2.00 m"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:.2} m", self.distance_meters)
    }
}

/// Measurements in insertion order; the position gives the display number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementList {
    items: Vec<Measurement>,
}

impl MeasurementList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.items.push(measurement);
    }

    /// Remove one measurement by id. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|m| m.id != id);
        self.items.len() != before
    }

    /// Drop every measurement. Returns `false` when the list was already empty.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.items.is_empty();
        self.items.clear();
        had_any
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Measurement] {
        &self.items
    }
}
