//! Layout engine: assigns a position to every node from tree structure alone.
//!
//! One pass anchors the root, then walks the depth groups top-down. Each
//! sibling group is centered under its parent, and each level then gets an
//! overlap-resolution sweep that pushes colliding boxes right until the
//! level is clean. Positions are written back into the caller's store; the
//! caller decides what to persist.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::{DEFAULT_CANVAS_W, H_MARGIN, NODE_H, NODE_W, ROOT_TOP_MARGIN, V_MARGIN};
use crate::doc::{NodeId, NodeStore};
use crate::level::{self, EmptyTreeError};

/// Fixed geometry and spacing for a session. Boxes are uniform; nothing
/// here is derived from data.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Node box width.
    pub node_w: f64,
    /// Node box height.
    pub node_h: f64,
    /// Minimum horizontal gap between boxes on a level.
    pub h_margin: f64,
    /// Vertical distance between a parent's top edge and its children's.
    pub v_margin: f64,
    /// Canvas width; the root is anchored at its horizontal center.
    pub canvas_w: f64,
    /// Distance from the canvas top edge to the root box.
    pub top_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_w: NODE_W,
            node_h: NODE_H,
            h_margin: H_MARGIN,
            v_margin: V_MARGIN,
            canvas_w: DEFAULT_CANVAS_W,
            top_margin: ROOT_TOP_MARGIN,
        }
    }
}

/// Structural violations detected during a layout pass. These are
/// reported up, never silently repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// No depth-1 node is present.
    #[error("no root node (depth 1) present")]
    MissingRoot,
    /// More than one depth-1 node is present.
    #[error("more than one root node present")]
    MultipleRoots,
    /// A node references a parent that is not in the store. This
    /// indicates store corruption and must reach the caller.
    #[error("node {node} has no resolvable parent")]
    OrphanNode { node: NodeId },
    /// Layout was attempted on an empty store.
    #[error(transparent)]
    EmptyTree(#[from] EmptyTreeError),
}

/// Assign a position to every node in the store.
///
/// # Errors
///
/// [`LayoutError::EmptyTree`] on an empty store, [`LayoutError::MissingRoot`]
/// / [`LayoutError::MultipleRoots`] when the single-root invariant does not
/// hold, and [`LayoutError::OrphanNode`] when a node's parent cannot be
/// resolved.
pub fn layout(store: &mut NodeStore, config: &LayoutConfig) -> Result<(), LayoutError> {
    let levels = level::group_by_depth(store)?;

    let root_id = match levels.get(&1).map(Vec::as_slice) {
        None | Some([]) => return Err(LayoutError::MissingRoot),
        Some([id]) => *id,
        Some(_) => return Err(LayoutError::MultipleRoots),
    };
    store.set_position(&root_id, config.canvas_w / 2.0 - config.node_w / 2.0, config.top_margin);

    // Parents always sit one level up, so walking depths in ascending
    // order guarantees every parent is already positioned.
    for (_, ids) in levels.range(2..) {
        position_level(store, ids, config)?;
        resolve_overlaps(store, ids, config);
    }
    Ok(())
}

/// Place every node of one level relative to its (already positioned)
/// parent.
fn position_level(
    store: &mut NodeStore,
    ids: &[NodeId],
    config: &LayoutConfig,
) -> Result<(), LayoutError> {
    // Group same-parent siblings. Both the group discovery order and the
    // members within a group preserve store order.
    let mut groups: Vec<(NodeId, Vec<NodeId>)> = Vec::new();
    for id in ids {
        let parent_id = store
            .get(id)
            .and_then(|n| n.parent_id)
            .ok_or(LayoutError::OrphanNode { node: *id })?;
        if store.get(&parent_id).is_none() {
            return Err(LayoutError::OrphanNode { node: *id });
        }
        match groups.iter_mut().find(|(p, _)| *p == parent_id) {
            Some((_, members)) => members.push(*id),
            None => groups.push((parent_id, vec![*id])),
        }
    }

    for (parent_id, members) in &groups {
        let (px, py) = match store.get(parent_id) {
            Some(p) => (p.x, p.y),
            None => continue,
        };
        let y = py + config.v_margin;

        if let [only] = members.as_slice() {
            // Boxes share one width, so centering under the parent's
            // center is the parent's own x.
            store.set_position(only, px, y);
        } else {
            #[allow(clippy::cast_precision_loss)]
            let count = members.len() as f64;
            let span = count * config.node_w + (count - 1.0) * config.h_margin;
            let start = px + config.node_w / 2.0 - span / 2.0;
            for (i, id) in members.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let x = start + i as f64 * (config.node_w + config.h_margin);
                store.set_position(id, x, y);
            }
        }
    }
    Ok(())
}

/// Push colliding boxes on one level apart, sweeping until a full pass
/// makes no shift. Only lower-index nodes push higher-index ones, and a
/// push only ever moves a node right, so the sweep reaches a fixed point.
fn resolve_overlaps(store: &mut NodeStore, ids: &[NodeId], config: &LayoutConfig) {
    loop {
        let mut shifted = false;
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let Some(a) = store.get(&ids[i]).map(|n| (n.x, n.y)) else {
                    continue;
                };
                let Some(b) = store.get(&ids[j]).map(|n| (n.x, n.y)) else {
                    continue;
                };
                if boxes_overlap(a, b, config) {
                    store.set_position(&ids[j], b.0 + config.node_w + config.h_margin, b.1);
                    shifted = true;
                }
            }
        }
        if !shifted {
            break;
        }
    }
}

/// Standard AABB intersection test for two uniform boxes at the given
/// top-left corners.
fn boxes_overlap(a: (f64, f64), b: (f64, f64), config: &LayoutConfig) -> bool {
    a.0 < b.0 + config.node_w
        && a.0 + config.node_w > b.0
        && a.1 < b.1 + config.node_h
        && a.1 + config.node_h > b.1
}
