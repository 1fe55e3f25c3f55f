//! Incremental update controller: session state and per-mutation layout scope.
//!
//! `EngineCore` owns the whole editing session — node store, selection, the
//! active gesture, zoom — as one explicit object; there are no ambient
//! globals. Every mutation returns [`Action`]s describing what the host must
//! persist and whether a redraw is due. The controller decides, per
//! mutation, between a full layout pass (structural edits, releasing a
//! dragged parent), a local update (dragging, releasing a dragged leaf),
//! and no geometry work at all (rename, kind change).

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::doc::{NewNode, Node, NodeId, NodeKind, NodeStore, PartialNode};
use crate::input::{Button, InputState, UiState};
use crate::layout::{self, LayoutConfig, LayoutError};
use crate::render::{self, Scene};
use crate::zoom::{Point, Zoom};

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// Persist these fields for this node.
    NodeUpdated { id: NodeId, fields: PartialNode },
    /// Persist the deletion of this node.
    NodeDeleted { id: NodeId },
    /// The selection changed. UI chrome only; nothing to persist.
    SelectionChanged { id: Option<NodeId> },
    /// The scene is stale; rebuild and redraw.
    RenderNeeded,
}

/// Rejected user input. Raised before any store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("node name must not be empty")]
    EmptyName,
    #[error("a root node already exists; only one is allowed")]
    SecondRoot,
    #[error("parent {0} not found")]
    UnknownParent(NodeId),
    #[error("node {0} not found")]
    UnknownNode(NodeId),
    #[error("depth {depth} is invalid here; expected {expected}")]
    DepthMismatch { depth: i32, expected: i32 },
}

/// Anything an engine operation can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// What a delete-subtree would remove, computed before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    /// The target and every transitive descendant, breadth-first.
    pub ids: Vec<NodeId>,
    /// Whether the target is the root. Hosts must ask for the stronger
    /// whole-chart confirmation before acting on a root plan.
    pub deletes_root: bool,
}

/// Core engine state for one editing session.
#[derive(Default)]
pub struct EngineCore {
    pub doc: NodeStore,
    pub zoom: Zoom,
    pub ui: UiState,
    pub input: InputState,
    pub config: LayoutConfig,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose layout uses the given geometry instead of the
    /// defaults (e.g. the host's actual viewport width).
    #[must_use]
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // --- Hydration from the persistence collaborator ---

    /// Replace the session's nodes with a server snapshot.
    pub fn load_snapshot(&mut self, nodes: Vec<Node>) {
        self.doc.load_snapshot(nodes);
    }

    /// Apply an externally confirmed field update.
    pub fn apply_update(&mut self, id: &NodeId, fields: &PartialNode) {
        self.doc.apply_partial(id, fields);
    }

    /// Apply an externally confirmed deletion.
    pub fn apply_delete(&mut self, id: &NodeId) {
        self.doc.remove(id);
        if self.ui.selected_id.as_ref() == Some(id) {
            self.ui.selected_id = None;
        }
    }

    // --- Validation ---

    /// Check a prospective node against the session's invariants without
    /// mutating anything. Hosts call this before asking the persistence
    /// collaborator to create the record.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyName`] for a blank name,
    /// [`ValidationError::SecondRoot`] when a depth-1 node already exists,
    /// [`ValidationError::UnknownParent`] when the parent id is absent, and
    /// [`ValidationError::DepthMismatch`] when the depth doesn't sit one
    /// level below the parent (or isn't 1 for a parentless node).
    pub fn validate_new(&self, new: &NewNode) -> Result<(), ValidationError> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        match new.parent_id {
            None => {
                if new.depth != 1 {
                    return Err(ValidationError::DepthMismatch { depth: new.depth, expected: 1 });
                }
                if self.doc.root_count() > 0 {
                    return Err(ValidationError::SecondRoot);
                }
            }
            Some(parent_id) => {
                let parent = self
                    .doc
                    .get(&parent_id)
                    .ok_or(ValidationError::UnknownParent(parent_id))?;
                if new.depth != parent.depth + 1 {
                    return Err(ValidationError::DepthMismatch {
                        depth: new.depth,
                        expected: parent.depth + 1,
                    });
                }
            }
        }
        Ok(())
    }

    // --- Structural edits ---

    /// Insert a persisted node and re-derive every position.
    ///
    /// # Errors
    ///
    /// Validation failures leave the store untouched; layout failures
    /// surface store corruption (see [`LayoutError`]).
    pub fn insert_node(&mut self, node: Node) -> Result<Vec<Action>, EngineError> {
        let new = NewNode {
            name: node.name.clone(),
            kind: node.kind,
            depth: node.depth,
            parent_id: node.parent_id,
        };
        self.validate_new(&new)?;
        self.doc.insert(node);
        self.relayout()
    }

    /// Compute what deleting `id` would remove, without removing anything.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownNode`] if `id` is not in the store.
    pub fn delete_plan(&self, id: &NodeId) -> Result<DeletePlan, ValidationError> {
        let node = self.doc.get(id).ok_or(ValidationError::UnknownNode(*id))?;
        let deletes_root = node.depth == 1;
        let mut ids = vec![*id];
        ids.extend(self.doc.descendants(id));
        Ok(DeletePlan { ids, deletes_root })
    }

    /// Delete `id` and its whole subtree, then re-derive the remainder's
    /// positions. The traversal follows parent links only, so nothing
    /// outside the closure is ever removed.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownNode`] if `id` is not in the store;
    /// layout failures as for [`Self::relayout`].
    pub fn delete_subtree(&mut self, id: &NodeId) -> Result<Vec<Action>, EngineError> {
        let plan = self.delete_plan(id)?;
        let mut actions = Vec::with_capacity(plan.ids.len() + 1);
        for doomed in &plan.ids {
            self.doc.remove(doomed);
            if self.ui.selected_id.as_ref() == Some(doomed) {
                self.ui.selected_id = None;
            }
            actions.push(Action::NodeDeleted { id: *doomed });
        }
        actions.extend(self.relayout()?);
        if !matches!(actions.last(), Some(Action::RenderNeeded)) {
            actions.push(Action::RenderNeeded);
        }
        Ok(actions)
    }

    /// Change a node's display name. No geometry is touched.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyName`] when the trimmed name is blank,
    /// [`ValidationError::UnknownNode`] when `id` is absent.
    pub fn rename(&mut self, id: &NodeId, name: &str) -> Result<Vec<Action>, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.doc.get(id).is_none() {
            return Err(ValidationError::UnknownNode(*id).into());
        }
        let fields = PartialNode { name: Some(name.to_owned()), ..PartialNode::default() };
        self.doc.apply_partial(id, &fields);
        Ok(vec![Action::NodeUpdated { id: *id, fields }, Action::RenderNeeded])
    }

    /// Change a node's relationship kind. Connector style follows on the
    /// next scene; positions are untouched.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownNode`] when `id` is absent.
    pub fn set_kind(&mut self, id: &NodeId, kind: NodeKind) -> Result<Vec<Action>, EngineError> {
        if self.doc.get(id).is_none() {
            return Err(ValidationError::UnknownNode(*id).into());
        }
        let fields = PartialNode { kind: Some(kind), ..PartialNode::default() };
        self.doc.apply_partial(id, &fields);
        Ok(vec![Action::NodeUpdated { id: *id, fields }, Action::RenderNeeded])
    }

    /// Run a full layout pass and emit one position update per node.
    ///
    /// A missing root is non-fatal: the pass is skipped until a root
    /// exists again. Other structural failures propagate.
    ///
    /// # Errors
    ///
    /// [`LayoutError::MultipleRoots`] / [`LayoutError::OrphanNode`] on a
    /// corrupted store.
    pub fn relayout(&mut self) -> Result<Vec<Action>, EngineError> {
        if self.doc.is_empty() {
            return Ok(Vec::new());
        }
        match layout::layout(&mut self.doc, &self.config) {
            Ok(()) => {}
            Err(LayoutError::MissingRoot) => return Ok(vec![Action::RenderNeeded]),
            Err(e) => return Err(e.into()),
        }
        let mut actions: Vec<Action> = self
            .doc
            .iter()
            .map(|n| Action::NodeUpdated { id: n.id, fields: PartialNode::position(n.x, n.y) })
            .collect();
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    // --- Pointer events ---

    /// Pointer pressed at `screen_pt`. A press on a node arms a potential
    /// drag; a press on the background drops the selection.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.zoom.screen_to_world(screen_pt);
        match self.doc.node_at(world, self.config.node_w, self.config.node_h) {
            Some(id) => {
                let Some(node) = self.doc.get(&id) else {
                    return Vec::new();
                };
                self.input = InputState::DraggingNode {
                    id,
                    grab: Point::new(world.x - node.x, world.y - node.y),
                    moved: false,
                };
                Vec::new()
            }
            None => {
                if self.ui.selected_id.is_some() {
                    self.ui.selected_id = None;
                    vec![Action::SelectionChanged { id: None }, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Pointer moved. During a drag the node follows the pointer, clamped
    /// to non-negative canvas coordinates; connectors touching it rebuild
    /// with the next scene.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let InputState::DraggingNode { id, grab, .. } = self.input else {
            return Vec::new();
        };
        let world = self.zoom.screen_to_world(screen_pt);
        let x = (world.x - grab.x).max(0.0);
        let y = (world.y - grab.y).max(0.0);
        if !self.doc.set_position(&id, x, y) {
            self.input = InputState::Idle;
            return Vec::new();
        }
        self.input = InputState::DraggingNode { id, grab, moved: true };
        vec![Action::RenderNeeded]
    }

    /// Pointer released. Zero movement is a click (select). A real drag
    /// persists the drop position; if the node has children the manual
    /// position is provisional and a full layout pass overrides it, while
    /// a leaf keeps its drop point verbatim.
    ///
    /// # Errors
    ///
    /// Layout failures as for [`Self::relayout`].
    pub fn on_pointer_up(&mut self) -> Result<Vec<Action>, EngineError> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Ok(Vec::new()),
            InputState::DraggingNode { id, moved: false, .. } => {
                self.ui.selected_id = Some(id);
                Ok(vec![Action::SelectionChanged { id: Some(id) }, Action::RenderNeeded])
            }
            InputState::DraggingNode { id, moved: true, .. } => {
                let Some(node) = self.doc.get(&id) else {
                    return Ok(Vec::new());
                };
                let mut actions =
                    vec![Action::NodeUpdated { id, fields: PartialNode::position(node.x, node.y) }];
                if self.doc.has_children(&id) {
                    actions.extend(self.relayout()?);
                } else {
                    actions.push(Action::RenderNeeded);
                }
                Ok(actions)
            }
        }
    }

    // --- Queries ---

    /// The currently selected node, if any.
    #[must_use]
    pub fn selection(&self) -> Option<NodeId> {
        self.ui.selected_id
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.doc.get(id)
    }

    /// Build the current frame's draw list.
    #[must_use]
    pub fn scene(&self) -> Scene {
        render::build_scene(&self.doc, &self.ui, &self.zoom, &self.config)
    }
}
