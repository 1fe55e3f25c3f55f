#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::connector::LineStyle;
use crate::doc::{Node, NodeKind};

fn make_node(name: &str, kind: NodeKind, depth: i32, parent_id: Option<NodeId>) -> Node {
    Node {
        id: Uuid::new_v4(),
        name: name.into(),
        kind,
        depth,
        parent_id,
        x: 0.0,
        y: 0.0,
    }
}

/// Engine holding root "A" with children "B" (direct, with advisory
/// child "C") and "D" (direct, leaf).
fn abcd_engine() -> (EngineCore, NodeId, NodeId, NodeId, NodeId) {
    let mut engine = EngineCore::new();
    let a = make_node("A", NodeKind::Direct, 1, None);
    let a_id = a.id;
    engine.insert_node(a).unwrap();
    let b = make_node("B", NodeKind::Direct, 2, Some(a_id));
    let b_id = b.id;
    engine.insert_node(b).unwrap();
    let c = make_node("C", NodeKind::Advisory, 3, Some(b_id));
    let c_id = c.id;
    engine.insert_node(c).unwrap();
    let d = make_node("D", NodeKind::Direct, 2, Some(a_id));
    let d_id = d.id;
    engine.insert_node(d).unwrap();
    (engine, a_id, b_id, c_id, d_id)
}

fn updated_ids(actions: &[Action]) -> Vec<NodeId> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::NodeUpdated { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

fn deleted_ids(actions: &[Action]) -> Vec<NodeId> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::NodeDeleted { id } => Some(*id),
            _ => None,
        })
        .collect()
}

// =============================================================
// Insertion and validation
// =============================================================

#[test]
fn insert_root_lays_out_and_emits_updates() {
    let mut engine = EngineCore::new();
    let root = make_node("CEO", NodeKind::Direct, 1, None);
    let root_id = root.id;
    let actions = engine.insert_node(root).unwrap();

    let node = engine.node(&root_id).unwrap();
    assert_eq!((node.x, node.y), (525.0, 20.0));
    assert_eq!(updated_ids(&actions), vec![root_id]);
    assert!(matches!(actions.last(), Some(Action::RenderNeeded)));
}

#[test]
fn second_root_rejected_without_mutation() {
    let mut engine = EngineCore::new();
    engine.insert_node(make_node("CEO", NodeKind::Direct, 1, None)).unwrap();

    let err = engine.insert_node(make_node("CEO 2", NodeKind::Direct, 1, None)).unwrap_err();
    assert_eq!(err, EngineError::Validation(ValidationError::SecondRoot));
    assert_eq!(engine.doc.len(), 1);
}

#[test]
fn blank_name_rejected() {
    let mut engine = EngineCore::new();
    let err = engine.insert_node(make_node("   ", NodeKind::Direct, 1, None)).unwrap_err();
    assert_eq!(err, EngineError::Validation(ValidationError::EmptyName));
    assert!(engine.doc.is_empty());
}

#[test]
fn unknown_parent_rejected() {
    let mut engine = EngineCore::new();
    engine.insert_node(make_node("CEO", NodeKind::Direct, 1, None)).unwrap();
    let ghost = Uuid::new_v4();
    let err = engine.insert_node(make_node("VP", NodeKind::Direct, 2, Some(ghost))).unwrap_err();
    assert_eq!(err, EngineError::Validation(ValidationError::UnknownParent(ghost)));
    assert_eq!(engine.doc.len(), 1);
}

#[test]
fn depth_must_sit_one_below_the_parent() {
    let mut engine = EngineCore::new();
    let root = make_node("CEO", NodeKind::Direct, 1, None);
    let root_id = root.id;
    engine.insert_node(root).unwrap();

    let err = engine.insert_node(make_node("VP", NodeKind::Direct, 3, Some(root_id))).unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(ValidationError::DepthMismatch { depth: 3, expected: 2 })
    );
}

#[test]
fn parentless_node_must_have_depth_one() {
    let engine = EngineCore::new();
    let new = NewNode { name: "CEO".into(), kind: NodeKind::Direct, depth: 2, parent_id: None };
    assert_eq!(
        engine.validate_new(&new),
        Err(ValidationError::DepthMismatch { depth: 2, expected: 1 })
    );
}

#[test]
fn insert_child_recenters_the_level() {
    let mut engine = EngineCore::new();
    let root = make_node("CEO", NodeKind::Direct, 1, None);
    let root_id = root.id;
    engine.insert_node(root).unwrap();
    let child = make_node("VP", NodeKind::Direct, 2, Some(root_id));
    let child_id = child.id;
    let actions = engine.insert_node(child).unwrap();

    let child = engine.node(&child_id).unwrap();
    let root = engine.node(&root_id).unwrap();
    assert_eq!(child.x, root.x);
    assert_eq!(child.y, 130.0);
    // The full pass re-emits every node's position.
    assert_eq!(updated_ids(&actions).len(), 2);
}

// =============================================================
// Deletion
// =============================================================

#[test]
fn delete_plan_reports_closure_and_root_flag() {
    let (engine, a_id, b_id, c_id, _) = abcd_engine();

    let plan = engine.delete_plan(&b_id).unwrap();
    assert_eq!(plan.ids, vec![b_id, c_id]);
    assert!(!plan.deletes_root);

    let root_plan = engine.delete_plan(&a_id).unwrap();
    assert!(root_plan.deletes_root);
    assert_eq!(root_plan.ids.len(), 4);
}

#[test]
fn delete_subtree_removes_exactly_the_closure() {
    let (mut engine, a_id, b_id, c_id, d_id) = abcd_engine();
    let actions = engine.delete_subtree(&b_id).unwrap();

    let mut gone = deleted_ids(&actions);
    gone.sort();
    let mut expected = vec![b_id, c_id];
    expected.sort();
    assert_eq!(gone, expected);

    assert!(engine.node(&b_id).is_none());
    assert!(engine.node(&c_id).is_none());
    assert!(engine.node(&a_id).is_some());
    assert!(engine.node(&d_id).is_some());

    // D is now an only child and recenters under A.
    assert_eq!(engine.node(&d_id).unwrap().x, engine.node(&a_id).unwrap().x);
}

#[test]
fn delete_root_empties_the_chart() {
    let (mut engine, a_id, ..) = abcd_engine();
    let actions = engine.delete_subtree(&a_id).unwrap();
    assert!(engine.doc.is_empty());
    assert_eq!(deleted_ids(&actions).len(), 4);
    assert!(updated_ids(&actions).is_empty());
    assert!(matches!(actions.last(), Some(Action::RenderNeeded)));
}

#[test]
fn delete_unknown_node_errors() {
    let (mut engine, ..) = abcd_engine();
    let ghost = Uuid::new_v4();
    let err = engine.delete_subtree(&ghost).unwrap_err();
    assert_eq!(err, EngineError::Validation(ValidationError::UnknownNode(ghost)));
}

#[test]
fn deleting_the_selected_subtree_clears_selection() {
    let (mut engine, _, b_id, c_id, _) = abcd_engine();
    engine.ui.selected_id = Some(c_id);
    engine.delete_subtree(&b_id).unwrap();
    assert!(engine.selection().is_none());
}

// =============================================================
// Rename / kind change
// =============================================================

#[test]
fn rename_touches_no_geometry() {
    let (mut engine, _, b_id, ..) = abcd_engine();
    let before: Vec<(f64, f64)> = engine.doc.iter().map(|n| (n.x, n.y)).collect();

    let actions = engine.rename(&b_id, "  Head of Ops  ").unwrap();
    assert_eq!(engine.node(&b_id).unwrap().name, "Head of Ops");
    let after: Vec<(f64, f64)> = engine.doc.iter().map(|n| (n.x, n.y)).collect();
    assert_eq!(before, after);

    let [Action::NodeUpdated { id, fields }, Action::RenderNeeded] = actions.as_slice() else {
        panic!("expected a single field update plus redraw");
    };
    assert_eq!(*id, b_id);
    assert_eq!(fields.name.as_deref(), Some("Head of Ops"));
    assert!(fields.x.is_none() && fields.y.is_none());
}

#[test]
fn rename_to_blank_is_rejected() {
    let (mut engine, _, b_id, ..) = abcd_engine();
    let err = engine.rename(&b_id, "   ").unwrap_err();
    assert_eq!(err, EngineError::Validation(ValidationError::EmptyName));
    assert_eq!(engine.node(&b_id).unwrap().name, "B");
}

#[test]
fn kind_change_restyles_the_connector() {
    let mut engine = EngineCore::new();
    let root = make_node("CEO", NodeKind::Direct, 1, None);
    let root_id = root.id;
    engine.insert_node(root).unwrap();
    let child = make_node("VP", NodeKind::Direct, 2, Some(root_id));
    let child_id = child.id;
    engine.insert_node(child).unwrap();

    let before = engine.node(&child_id).unwrap().x;
    engine.set_kind(&child_id, NodeKind::Advisory).unwrap();

    assert_eq!(engine.node(&child_id).unwrap().x, before);
    let scene = engine.scene();
    assert_eq!(scene.connectors.len(), 1);
    assert_eq!(scene.connectors[0].style, LineStyle::Dashed);
}

// =============================================================
// Relayout edge cases
// =============================================================

#[test]
fn relayout_without_a_root_is_skipped() {
    let mut engine = EngineCore::new();
    engine.load_snapshot(vec![make_node("floating", NodeKind::Direct, 2, Some(Uuid::new_v4()))]);
    let actions = engine.relayout().unwrap();
    assert!(matches!(actions.as_slice(), [Action::RenderNeeded]));
}

#[test]
fn relayout_on_empty_store_is_a_noop() {
    let mut engine = EngineCore::new();
    assert!(engine.relayout().unwrap().is_empty());
}

#[test]
fn relayout_surfaces_store_corruption() {
    let mut engine = EngineCore::new();
    let root = make_node("CEO", NodeKind::Direct, 1, None);
    engine.load_snapshot(vec![root, make_node("orphan", NodeKind::Direct, 2, Some(Uuid::new_v4()))]);
    assert!(matches!(engine.relayout(), Err(EngineError::Layout(_))));
}

// =============================================================
// Pointer: click vs drag
// =============================================================

#[test]
fn click_without_movement_selects() {
    let (mut engine, a_id, ..) = abcd_engine();
    let node = engine.node(&a_id).unwrap();
    let press = Point::new(node.x + 5.0, node.y + 5.0);

    engine.on_pointer_down(press, Button::Primary);
    assert!(matches!(engine.input, InputState::DraggingNode { moved: false, .. }));

    let actions = engine.on_pointer_up().unwrap();
    assert_eq!(engine.selection(), Some(a_id));
    assert!(matches!(engine.input, InputState::Idle));
    assert!(actions
        .iter()
        .any(|a| matches!(a, Action::SelectionChanged { id: Some(id) } if *id == a_id)));
}

#[test]
fn background_press_drops_selection() {
    let (mut engine, a_id, ..) = abcd_engine();
    engine.ui.selected_id = Some(a_id);
    let actions = engine.on_pointer_down(Point::new(-500.0, -500.0), Button::Primary);
    assert!(engine.selection().is_none());
    assert!(actions.iter().any(|a| matches!(a, Action::SelectionChanged { id: None })));
}

#[test]
fn non_primary_buttons_are_ignored() {
    let (mut engine, a_id, ..) = abcd_engine();
    let node = engine.node(&a_id).unwrap();
    let press = Point::new(node.x + 5.0, node.y + 5.0);
    engine.on_pointer_down(press, Button::Secondary);
    assert!(matches!(engine.input, InputState::Idle));
}

#[test]
fn dragged_leaf_keeps_its_drop_point() {
    let (mut engine, a_id, _, _, d_id) = abcd_engine();
    let root_before = {
        let n = engine.node(&a_id).unwrap();
        (n.x, n.y)
    };
    let leaf = engine.node(&d_id).unwrap();
    let press = Point::new(leaf.x + 10.0, leaf.y + 10.0);

    engine.on_pointer_down(press, Button::Primary);
    engine.on_pointer_move(Point::new(900.0, 500.0));
    let actions = engine.on_pointer_up().unwrap();

    let leaf = engine.node(&d_id).unwrap();
    assert_eq!((leaf.x, leaf.y), (890.0, 490.0));

    // Local change only: the leaf's position is the sole persisted
    // update and nothing else moved.
    assert_eq!(updated_ids(&actions), vec![d_id]);
    let root_after = engine.node(&a_id).unwrap();
    assert_eq!((root_after.x, root_after.y), root_before);
}

#[test]
fn dragged_parent_snaps_back_through_relayout() {
    let (mut engine, _, b_id, ..) = abcd_engine();
    let settled_x = engine.node(&b_id).unwrap().x;
    let node = engine.node(&b_id).unwrap();
    let press = Point::new(node.x + 10.0, node.y + 10.0);

    engine.on_pointer_down(press, Button::Primary);
    engine.on_pointer_move(Point::new(50.0, 600.0));
    let actions = engine.on_pointer_up().unwrap();

    // The drop point was persisted first, then the full pass overrode it.
    let first = actions.first().unwrap();
    assert!(matches!(first, Action::NodeUpdated { id, .. } if *id == b_id));
    assert!(updated_ids(&actions).len() > 1);

    let node = engine.node(&b_id).unwrap();
    assert_eq!(node.x, settled_x);
    assert_eq!(node.y, 130.0);
}

#[test]
fn drag_clamps_to_non_negative_coordinates() {
    let (mut engine, _, _, _, d_id) = abcd_engine();
    let node = engine.node(&d_id).unwrap();
    let press = Point::new(node.x + 10.0, node.y + 10.0);

    engine.on_pointer_down(press, Button::Primary);
    engine.on_pointer_move(Point::new(-300.0, -300.0));
    engine.on_pointer_up().unwrap();

    let node = engine.node(&d_id).unwrap();
    assert_eq!((node.x, node.y), (0.0, 0.0));
}

#[test]
fn drag_accounts_for_zoom_scale() {
    let (mut engine, _, _, _, d_id) = abcd_engine();
    engine.zoom.scale = 2.0;
    let node = engine.node(&d_id).unwrap();
    // Screen coordinates are world * scale while the grab math happens
    // in world space.
    let press = Point::new((node.x + 10.0) * 2.0, (node.y + 10.0) * 2.0);

    engine.on_pointer_down(press, Button::Primary);
    engine.on_pointer_move(Point::new(800.0, 600.0));
    engine.on_pointer_up().unwrap();

    let node = engine.node(&d_id).unwrap();
    assert_eq!((node.x, node.y), (390.0, 290.0));
}

#[test]
fn stray_move_and_release_are_noops() {
    let (mut engine, ..) = abcd_engine();
    assert!(engine.on_pointer_move(Point::new(10.0, 10.0)).is_empty());
    assert!(engine.on_pointer_up().unwrap().is_empty());
}

// =============================================================
// Hydration
// =============================================================

#[test]
fn snapshot_hydration_feeds_the_scene() {
    let mut engine = EngineCore::new();
    let root = make_node("CEO", NodeKind::Direct, 1, None);
    let root_id = root.id;
    let child = make_node("VP", NodeKind::Advisory, 2, Some(root_id));
    engine.load_snapshot(vec![root, child]);

    let scene = engine.scene();
    assert_eq!(scene.boxes.len(), 2);
    assert_eq!(scene.connectors.len(), 1);
}

#[test]
fn apply_delete_clears_a_stale_selection() {
    let (mut engine, _, _, c_id, _) = abcd_engine();
    engine.ui.selected_id = Some(c_id);
    engine.apply_delete(&c_id);
    assert!(engine.selection().is_none());
    assert!(engine.node(&c_id).is_none());
}
