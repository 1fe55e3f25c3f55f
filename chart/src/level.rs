//! Level grouper: partitions the store into ordered groups by depth.

#[cfg(test)]
#[path = "level_test.rs"]
mod level_test;

use std::collections::BTreeMap;

use crate::doc::{NodeId, NodeStore};

/// Grouping was attempted on a store with no nodes. Callers that have no
/// root yet must special-case before asking for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot group an empty tree")]
pub struct EmptyTreeError;

/// Partition the store by depth. Within a depth, node order preserves the
/// store's iteration order; depths come out ascending. O(n).
///
/// # Errors
///
/// Returns [`EmptyTreeError`] if the store holds no nodes.
pub fn group_by_depth(store: &NodeStore) -> Result<BTreeMap<i32, Vec<NodeId>>, EmptyTreeError> {
    if store.is_empty() {
        return Err(EmptyTreeError);
    }
    let mut levels: BTreeMap<i32, Vec<NodeId>> = BTreeMap::new();
    for node in store.iter() {
        levels.entry(node.depth).or_default().push(node.id);
    }
    Ok(levels)
}
