//! Input model: pointer buttons, selection state, and the drag gesture.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. A press with zero movement is a click (selection); a press
//! with any movement is a drag. The `moved` flag latches true on the first
//! real movement and is what disambiguates the two on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::NodeId;
use crate::zoom::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button; the only one that starts a drag.
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// The id of the currently selected node, if any.
    pub selected_id: Option<NodeId>,
}

/// The gesture state machine: `Idle → DraggingNode → Idle`.
#[derive(Debug, Clone, Copy)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// A press started on a node. Whether it ends up a click or a drag
    /// is decided by `moved` at release time.
    DraggingNode {
        /// Id of the pressed node.
        id: NodeId,
        /// World-space offset from the node's top-left corner to the
        /// pointer at press time; keeps the grab point under the cursor.
        grab: Point,
        /// Latched true once any movement has been observed.
        moved: bool,
    },
}

impl Default for InputState {
    fn default() -> Self {
        Self::Idle
    }
}
