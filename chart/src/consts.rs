//! Shared numeric constants for the chart engine.

// ── Node geometry ───────────────────────────────────────────────

/// Node box width in canvas units.
pub const NODE_W: f64 = 150.0;

/// Node box height in canvas units.
pub const NODE_H: f64 = 80.0;

// ── Spacing ─────────────────────────────────────────────────────

/// Minimum horizontal gap between sibling boxes.
pub const H_MARGIN: f64 = 50.0;

/// Vertical distance between a parent's top edge and its children's.
pub const V_MARGIN: f64 = 110.0;

/// Distance from the canvas top edge to the root box.
pub const ROOT_TOP_MARGIN: f64 = 20.0;

// ── Canvas ──────────────────────────────────────────────────────

/// Default canvas width used to anchor the root when the host
/// doesn't supply its own viewport width.
pub const DEFAULT_CANVAS_W: f64 = 1200.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Lower bound of the zoom scale factor.
pub const MIN_SCALE: f64 = 0.5;

/// Upper bound of the zoom scale factor.
pub const MAX_SCALE: f64 = 2.0;

/// Scale change per zoom step.
pub const SCALE_STEP: f64 = 0.1;
