//! Scene emission: flattens store and UI state into an ordered draw list.
//!
//! This is the engine's side of the redraw contract: clear everything,
//! then draw every direct connector, every advisory connector, and every
//! node box, in that order. The scene is plain data — the rendering
//! surface (DOM, canvas, terminal) lives outside this crate and never
//! reads the store directly.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::connector::{self, Connector};
use crate::doc::{NodeId, NodeKind, NodeStore};
use crate::input::UiState;
use crate::layout::LayoutConfig;
use crate::zoom::Zoom;

/// One node box, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Display name shown in the box header.
    pub label: String,
    /// Relationship kind; drives the box's style class.
    pub kind: NodeKind,
    /// Hierarchical level; drives per-level styling.
    pub depth: i32,
    /// Whether this box is the current selection.
    pub selected: bool,
}

/// Complete draw list for one frame, already in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Uniform scale the renderer applies, anchored top-center.
    pub scale: f64,
    /// All connectors: direct elbows first, then advisory.
    pub connectors: Vec<Connector>,
    /// All node boxes, in store order, drawn above the connectors.
    pub boxes: Vec<NodeBox>,
}

/// Build the scene for the current store and UI state.
#[must_use]
pub fn build_scene(store: &NodeStore, ui: &UiState, zoom: &Zoom, config: &LayoutConfig) -> Scene {
    let connectors = connector::build_connectors(store, config);
    let boxes = store
        .iter()
        .map(|n| NodeBox {
            id: n.id,
            x: n.x,
            y: n.y,
            width: config.node_w,
            height: config.node_h,
            label: n.name.clone(),
            kind: n.kind,
            depth: n.depth,
            selected: ui.selected_id == Some(n.id),
        })
        .collect();
    Scene { scale: zoom.scale, connectors, boxes }
}
