//! Viewport state and the world <-> canvas coordinate transforms.
//!
//! World space is the room's metric floor plane: `x` to the right and `z`
//! towards the viewer, in meters. Canvas space is CSS pixels with the origin
//! in the top-left corner. The world origin sits at the canvas center, shifted
//! by `pan_x` / `pan_y`, and one meter spans `scale` pixels.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE, ZOOM_FACTOR};

/// A point in canvas space (pixels) or on the world floor plane (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Pan/zoom state of the 2D editor.
///
/// `scale` is pixels per meter and always stays within
/// [`MIN_SCALE`]..=[`MAX_SCALE`]. `width` / `height` are the canvas CSS
/// dimensions used to center the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: DEFAULT_SCALE, pan_x: 0.0, pan_y: 0.0, width: 0.0, height: 0.0 }
    }
}

impl Viewport {
    /// Canvas position of the world origin.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.width * 0.5 + self.pan_x, self.height * 0.5 + self.pan_y)
    }

    /// Convert a floor-plane world position (meters) to canvas pixels.
    #[must_use]
    pub fn world_to_canvas(&self, x: f64, z: f64) -> Point {
        let origin = self.origin();
        Point::new(x.mul_add(self.scale, origin.x), z.mul_add(self.scale, origin.y))
    }

    /// Convert a canvas position (pixels) back to floor-plane world meters `(x, z)`.
    #[must_use]
    pub fn canvas_to_world(&self, canvas: Point) -> (f64, f64) {
        let origin = self.origin();
        ((canvas.x - origin.x) / self.scale, (canvas.y - origin.y) / self.scale)
    }

    /// Convert a canvas distance (pixels) to a world distance (meters).
    #[must_use]
    pub fn canvas_dist_to_world(&self, dist: f64) -> f64 {
        debug_assert!(self.scale > 0.0, "viewport scale must stay positive");
        dist / self.scale
    }

    /// Update the canvas dimensions.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Shift the view by a pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the scale directly. Values outside the allowed range are ignored.
    ///
    /// Returns `true` when the scale changed.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !(MIN_SCALE..=MAX_SCALE).contains(&scale) || scale == self.scale {
            return false;
        }
        self.scale = scale;
        true
    }

    /// Zoom by `notches` wheel steps (positive zooms in).
    ///
    /// A step whose result would leave the allowed range is rejected and the
    /// viewport is left untouched.
    pub fn zoom_by_notches(&mut self, notches: i32) -> bool {
        self.set_scale(self.scale * ZOOM_FACTOR.powi(notches))
    }

    /// Zoom by `notches` while keeping the world point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, notches: i32) -> bool {
        let (wx, wz) = self.canvas_to_world(anchor);
        if !self.zoom_by_notches(notches) {
            return false;
        }
        let moved = self.world_to_canvas(wx, wz);
        self.pan_by(anchor.x - moved.x, anchor.y - moved.y);
        true
    }

    /// Restore the default scale and remove any pan, keeping canvas dimensions.
    pub fn reset(&mut self, scale: f64) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }
}
