//! Zoom model: a single clamped scale factor and coordinate conversion.
//!
//! The renderer applies the scale as a uniform transform anchored at the
//! canvas top-center; this module only owns the scalar and the math for
//! mapping pointer coordinates back into world space during a drag.

#[cfg(test)]
#[path = "zoom_test.rs"]
mod zoom_test;

use crate::consts::{MAX_SCALE, MIN_SCALE, SCALE_STEP};

/// A point in either screen or world space (canvas units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Uniform zoom state. `scale` is 1.0 at rest and always stays inside
/// `[MIN_SCALE, MAX_SCALE]`.
#[derive(Debug, Clone, Copy)]
pub struct Zoom {
    pub scale: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Zoom {
    /// Step the scale up by one increment, clamped at the upper bound.
    pub fn zoom_in(&mut self) {
        self.step(SCALE_STEP);
    }

    /// Step the scale down by one increment, clamped at the lower bound.
    pub fn zoom_out(&mut self) {
        self.step(-SCALE_STEP);
    }

    /// Return to the resting scale.
    pub fn reset(&mut self) {
        self.scale = 1.0;
    }

    fn step(&mut self, delta: f64) {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Convert a screen-space point into world coordinates under the
    /// current scale.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: screen.x / self.scale, y: screen.y / self.scale }
    }
}
