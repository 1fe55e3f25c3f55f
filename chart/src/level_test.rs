#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::{Node, NodeKind};

fn make_node(name: &str, depth: i32, parent_id: Option<NodeId>) -> Node {
    Node {
        id: Uuid::new_v4(),
        name: name.into(),
        kind: NodeKind::Direct,
        depth,
        parent_id,
        x: 0.0,
        y: 0.0,
    }
}

#[test]
fn empty_store_is_an_error() {
    let store = NodeStore::new();
    assert_eq!(group_by_depth(&store), Err(EmptyTreeError));
}

#[test]
fn groups_come_out_by_ascending_depth() {
    let mut store = NodeStore::new();
    let root = make_node("r", 1, None);
    let root_id = root.id;
    store.insert(root);
    let child = make_node("c", 2, Some(root_id));
    let child_id = child.id;
    store.insert(child);
    store.insert(make_node("g", 3, Some(child_id)));

    let levels = group_by_depth(&store).unwrap();
    let depths: Vec<i32> = levels.keys().copied().collect();
    assert_eq!(depths, [1, 2, 3]);
    assert_eq!(levels[&1], vec![root_id]);
    assert_eq!(levels[&2], vec![child_id]);
}

#[test]
fn order_within_a_depth_is_store_order() {
    let mut store = NodeStore::new();
    let root = make_node("r", 1, None);
    let root_id = root.id;
    store.insert(root);
    let ids: Vec<NodeId> = ["a", "b", "c"]
        .iter()
        .map(|name| {
            let node = make_node(name, 2, Some(root_id));
            let id = node.id;
            store.insert(node);
            id
        })
        .collect();

    let levels = group_by_depth(&store).unwrap();
    assert_eq!(levels[&2], ids);
}

#[test]
fn grouping_does_not_mutate_the_store() {
    let mut store = NodeStore::new();
    store.insert(make_node("r", 1, None));
    let before: Vec<NodeId> = store.iter().map(|n| n.id).collect();
    let _ = group_by_depth(&store).unwrap();
    let after: Vec<NodeId> = store.iter().map(|n| n.id).collect();
    assert_eq!(before, after);
}
