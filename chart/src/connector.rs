//! Connector geometry: three-segment elbows joining parent and child boxes.
//!
//! A connector runs from the parent's bottom-center down to the vertical
//! midpoint, across to the child's horizontal center, then down to the
//! child's top-center. Everything here is pure geometry over node
//! positions; connectors are rebuilt on every scene and never persisted.

#[cfg(test)]
#[path = "connector_test.rs"]
mod connector_test;

use crate::doc::{Node, NodeId, NodeKind, NodeStore};
use crate::layout::LayoutConfig;
use crate::zoom::Point;

/// Visual treatment of a connector line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Solid, filled stroke for direct reports.
    Solid,
    /// Dashed, unfilled stroke for advisory relationships.
    Dashed,
}

impl From<NodeKind> for LineStyle {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Direct => Self::Solid,
            NodeKind::Advisory => Self::Dashed,
        }
    }
}

/// One axis-aligned segment of an elbow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// A parent→child elbow: vertical drop, horizontal shelf, vertical drop.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent: NodeId,
    pub child: NodeId,
    pub style: LineStyle,
    pub segments: [Segment; 3],
}

/// Derive the elbow between two positioned nodes. Pure function of the
/// two positions and the child's kind; identical inputs always yield
/// identical segments. Degenerate zero-length segments are still
/// emitted — a missing line must never read as "no relationship".
#[must_use]
pub fn build_connector(parent: &Node, child: &Node, config: &LayoutConfig) -> Connector {
    let xp = parent.x + config.node_w / 2.0;
    let yp = parent.y + config.node_h;
    let xc = child.x + config.node_w / 2.0;
    let yc = child.y;
    let y_mid = yp + (yc - yp) / 2.0;

    Connector {
        parent: parent.id,
        child: child.id,
        style: child.kind.into(),
        segments: [
            Segment { from: Point::new(xp, yp), to: Point::new(xp, y_mid) },
            Segment {
                from: Point::new(xp.min(xc), y_mid),
                to: Point::new(xp.max(xc), y_mid),
            },
            Segment { from: Point::new(xc, y_mid), to: Point::new(xc, yc) },
        ],
    }
}

/// All connectors in draw order: every direct elbow first, then every
/// advisory elbow, so dashed lines are never occluded by solid ones.
/// Store order is preserved within each kind.
#[must_use]
pub fn build_connectors(store: &NodeStore, config: &LayoutConfig) -> Vec<Connector> {
    let mut out = Vec::new();
    for kind in [NodeKind::Direct, NodeKind::Advisory] {
        for child in store.iter() {
            if child.kind != kind {
                continue;
            }
            let Some(parent_id) = child.parent_id else {
                continue;
            };
            if let Some(parent) = store.get(&parent_id) {
                out.push(build_connector(parent, child, config));
            }
        }
    }
    out
}
