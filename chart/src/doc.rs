//! Document model: org-chart nodes, their attributes, and the in-memory store.
//!
//! This module defines the node record as it exists in the store and on the
//! wire (`Node`), a sparse-update type for incremental edits (`PartialNode`),
//! the create-request shape whose id the persistence collaborator assigns
//! (`NewNode`), and the runtime store that owns all live nodes (`NodeStore`).
//!
//! The store preserves insertion order. Sibling order is positional — there
//! is no explicit index attribute — so every traversal that feeds layout or
//! drawing iterates in that stable order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::zoom::Point;

/// Unique identifier for a chart node.
pub type NodeId = Uuid;

/// How a node relates to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Operational reporting line, drawn solid.
    Direct,
    /// Consultative line, drawn dashed.
    Advisory,
}

impl NodeKind {
    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Advisory => "advisory",
        }
    }

    /// Parse a wire name. Returns `None` for anything else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(Self::Direct),
            "advisory" => Some(Self::Advisory),
            _ => None,
        }
    }
}

/// A chart node as stored in the document and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier, assigned by the persistence collaborator.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Relationship to the parent. The root's kind is never drawn.
    pub kind: NodeKind,
    /// Hierarchical level; the root is 1.
    pub depth: i32,
    /// Parent node id. `None` exactly for the root.
    pub parent_id: Option<NodeId>,
    /// Left edge of the box in canvas units.
    pub x: f64,
    /// Top edge of the box in canvas units.
    pub y: f64,
}

/// Fields for a node that does not exist yet. The persistence collaborator
/// assigns the id and echoes back a full [`Node`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNode {
    pub name: String,
    pub kind: NodeKind,
    pub depth: i32,
    pub parent_id: Option<NodeId>,
}

/// Sparse update for a node. Only present fields are applied.
///
/// Structure (`depth`, `parent_id`) is fixed at creation; moving a node to a
/// different parent is delete-and-recreate territory, not an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialNode {
    /// New display name, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New relationship kind, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    /// New left edge, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New top edge, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl PartialNode {
    /// A position-only update, the payload persisted after layout and drag.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }
}

/// In-memory store of chart nodes, iterated in insertion order.
pub struct NodeStore {
    nodes: HashMap<NodeId, Node>,
    order: Vec<NodeId>,
}

impl NodeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: HashMap::new(), order: Vec::new() }
    }

    /// Insert or replace a node. A replaced node keeps its original
    /// position in the iteration order.
    pub fn insert(&mut self, node: Node) {
        if !self.nodes.contains_key(&node.id) {
            self.order.push(node.id);
        }
        self.nodes.insert(node.id, node);
    }

    /// Remove a node by id, returning it if it was present.
    pub fn remove(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.nodes.remove(id);
        if removed.is_some() {
            self.order.retain(|o| o != id);
        }
        removed
    }

    /// Return a reference to a node by id.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Apply a partial update to an existing node. Returns false if the
    /// node doesn't exist.
    pub fn apply_partial(&mut self, id: &NodeId, partial: &PartialNode) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if let Some(ref name) = partial.name {
            node.name = name.clone();
        }
        if let Some(kind) = partial.kind {
            node.kind = kind;
        }
        if let Some(x) = partial.x {
            node.x = x;
        }
        if let Some(y) = partial.y {
            node.y = y;
        }
        true
    }

    /// Overwrite a node's position. Returns false if the node doesn't exist.
    pub fn set_position(&mut self, id: &NodeId, x: f64, y: f64) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.x = x;
        node.y = y;
        true
    }

    /// Replace all nodes with a full snapshot. The snapshot's sequence
    /// order becomes the store's iteration order.
    pub fn load_snapshot(&mut self, nodes: Vec<Node>) {
        self.nodes.clear();
        self.order.clear();
        for node in nodes {
            self.insert(node);
        }
    }

    /// Iterate nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// The first depth-1 node in store order, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.iter().find(|n| n.depth == 1)
    }

    /// How many depth-1 nodes the store currently holds.
    #[must_use]
    pub fn root_count(&self) -> usize {
        self.iter().filter(|n| n.depth == 1).count()
    }

    /// Direct children of `id`, in store order.
    #[must_use]
    pub fn children(&self, id: &NodeId) -> Vec<&Node> {
        self.iter().filter(|n| n.parent_id.as_ref() == Some(id)).collect()
    }

    /// Whether any node lists `id` as its parent.
    #[must_use]
    pub fn has_children(&self, id: &NodeId) -> bool {
        self.iter().any(|n| n.parent_id.as_ref() == Some(id))
    }

    /// Every node reachable from `id` via parent links, excluding `id`
    /// itself, in breadth-first store order. The visited set guards
    /// against a corrupted store with a parent cycle.
    #[must_use]
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(*id);
        let mut frontier = vec![*id];
        while let Some(current) = frontier.pop() {
            for child in self.children(&current) {
                if visited.insert(child.id) {
                    out.push(child.id);
                    frontier.push(child.id);
                }
            }
        }
        out
    }

    /// The topmost node whose box contains `pt`, given the fixed box size.
    /// Boxes are drawn in store order, so the scan runs back to front.
    #[must_use]
    pub fn node_at(&self, pt: Point, node_w: f64, node_h: f64) -> Option<NodeId> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.nodes.get(id))
            .find(|n| {
                pt.x >= n.x && pt.x <= n.x + node_w && pt.y >= n.y && pt.y <= n.y + node_h
            })
            .map(|n| n.id)
    }

    /// Number of nodes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the store contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}
