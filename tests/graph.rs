//! Tests for the process graph facade: passthrough, queries and rebuilds.
mod common;
use common::*;
use procflow::prelude::*;
use serde_json::json;

#[test]
fn test_passthrough_accessors() {
    let mut graph = ProcessGraph::new(linear_process());
    assert_eq!(graph.id(), 100);
    assert_eq!(graph.name(), "Test process");
    assert_eq!(graph.project_id(), 1);
    assert_eq!(graph.shapes().len(), 3);
    assert_eq!(graph.links().len(), 2);
    assert!(graph.status().is_none());

    graph.set_name("Renamed");
    graph.set_status(Some(ItemStatus {
        is_locked: true,
        ..Default::default()
    }));
    graph.set_property_value("description", PropertyValue::new("description", json!("text")));

    assert_eq!(graph.name(), "Renamed");
    assert!(graph.status().unwrap().is_locked);
    assert_eq!(graph.property_values()["description"].value, json!("text"));
}

#[test]
fn test_shape_lookup_and_roles() {
    let graph = ProcessGraph::new(branching_process());

    assert_eq!(graph.get_shape_by_id(3).map(|s| s.name.as_str()), Some("A"));
    assert_eq!(graph.get_shape_type_by_id(2), Some(ShapeRole::UserDecision));
    assert_eq!(graph.get_start_shape_id(), Some(1));
    assert_eq!(graph.get_end_shape_id(), Some(6));
    assert_eq!(graph.get_precondition_shape_id(), None);

    assert!(graph.is_decision(2));
    assert!(!graph.is_decision(3));
    assert!(graph.is_user_task(3));
    assert!(!graph.is_system_task(3));

    let shape = graph.get_shape_by_id(6).unwrap();
    assert_eq!(graph.get_shape_type(shape), Some(ShapeRole::End));
}

#[test]
fn test_unknown_ids_do_not_fail() {
    let graph = ProcessGraph::new(branching_process());

    assert!(graph.get_shape_by_id(9999).is_none());
    assert!(graph.get_shape_type_by_id(9999).is_none());
    assert!(graph.get_next_shape_ids(9999).is_none());
    assert!(graph.get_prev_shape_ids(9999).is_none());
    assert!(graph.get_next_order_index(9999).is_none());
    assert!(!graph.has_multiple_prev_shapes_by_id(9999));
    assert!(!graph.is_decision(9999));
    assert_eq!(graph.is_in_same_flow(9999, 1), None);
    assert_eq!(graph.is_in_child_flow(1, 9999), None);
}

#[test]
fn test_merge_point_detection() {
    let graph = ProcessGraph::new(branching_process());
    assert!(graph.has_multiple_prev_shapes_by_id(5));
    assert!(!graph.has_multiple_prev_shapes_by_id(3));
    assert_eq!(graph.get_prev_shape_ids(5), Some(vec![3, 4]));
}

#[test]
fn test_next_order_index() {
    let graph = ProcessGraph::new(branching_process());
    assert_eq!(graph.get_next_order_index(2), Some(2));
    assert_eq!(graph.get_next_order_index(1), Some(1));
    assert_eq!(graph.get_next_order_index(6), Some(0));
    assert_eq!(graph.get_link_index(2, 3), Some(1));
}

#[test]
fn test_first_non_system_shape_skips_system_tasks() {
    let graph = ProcessGraph::new(system_chain_process());
    assert_eq!(graph.get_first_non_system_shape_id(1), Some(3));
    assert_eq!(graph.get_first_non_system_shape_id(3), Some(4));
    assert_eq!(graph.get_first_non_system_shape_id(4), None);
}

#[test]
fn test_first_non_system_shape_follows_primary_edge_only() {
    let graph = ProcessGraph::new(nested_process());
    // 4 (system decision) -> 5 (system task) -> 7 (user task); branch 6 is ignored.
    assert_eq!(graph.get_first_non_system_shape_id(2), Some(3));
    assert_eq!(graph.get_first_non_system_shape_id(4), Some(7));
}

#[test]
fn test_first_non_system_shape_stops_on_system_loop() {
    let document = document(
        vec![
            shape(1, "Start", ShapeRole::Start),
            shape(2, "Poll", ShapeRole::SystemTask),
            shape(3, "Retry", ShapeRole::SystemTask),
        ],
        vec![Link::new(1, 2, 0), Link::new(2, 3, 0), Link::new(3, 2, 0)],
        None,
    );
    let graph = ProcessGraph::new(document);
    assert_eq!(graph.get_first_non_system_shape_id(1), None);
}

#[test]
fn test_rebuild_is_idempotent() {
    let graph = ProcessGraph::new(nested_process());

    graph.update_tree_and_flows().expect("first rebuild");
    let first_index = graph.shape_index().unwrap();
    let first_flows = graph.flow_decomposition().unwrap();

    graph.update_tree_and_flows().expect("second rebuild");
    assert_eq!(graph.shape_index().unwrap(), first_index);
    assert_eq!(graph.flow_decomposition().unwrap(), first_flows);

    graph.update_tree().expect("tree rebuild");
    assert_eq!(graph.shape_index().unwrap(), first_index);
}

#[test]
fn test_mutations_mark_derived_state_dirty() {
    let mut graph = ProcessGraph::new(linear_process());
    assert_eq!(graph.get_next_shape_ids(2), Some(vec![3]));
    graph.update_tree_and_flows().unwrap();
    assert!(!graph.is_dirty());

    graph.add_shape(shape(10, "Inserted", ShapeRole::SystemTask));
    assert!(graph.is_dirty());
    let removed = graph.remove_link(2, 3);
    assert_eq!(removed, Some(Link::new(2, 3, 0)));
    graph.add_link(Link::new(2, 10, 0));
    graph.add_link(Link::new(10, 3, 0));

    assert_eq!(graph.get_next_shape_ids(2), Some(vec![10]));
    assert_eq!(graph.get_shape_by_id(10).map(|s| s.name.as_str()), Some("Inserted"));
    assert_eq!(graph.flows().unwrap()[0].shape_ids, vec![1, 2, 10, 3]);
    assert_eq!(graph.get_first_non_system_shape_id(2), Some(3));

    assert!(graph.remove_link(2, 3).is_none());
}

#[test]
fn test_direct_list_edits_are_seen_by_queries() {
    let mut graph = ProcessGraph::new(branching_process());
    assert_eq!(graph.flows().unwrap().len(), 2);

    graph.links_mut().retain(|link| link.source_id != 2 || link.destination_id != 4);
    graph.shapes_mut().retain(|shape| shape.id != 4);
    graph.links_mut().retain(|link| link.source_id != 4);
    graph.decision_branch_destination_links_mut().clear();

    assert_eq!(graph.flows().unwrap().len(), 1);
    assert!(!graph.has_multiple_prev_shapes_by_id(5));
    assert!(graph.get_shape_by_id(4).is_none());
}

#[test]
fn test_broken_document_answers_unknown() {
    let mut document = linear_process();
    document.links.push(Link::new(3, 77, 0));

    assert!(matches!(
        ProcessGraph::builder(document.clone()).try_build(),
        Err(GraphError::UnknownLinkEndpoint { missing_id: 77, .. })
    ));

    let mut graph = ProcessGraph::new(document);
    assert!(graph.get_shape_by_id(1).is_none());
    assert!(graph.flows().is_none());
    assert!(matches!(
        graph.build_error(),
        Some(GraphError::UnknownLinkEndpoint { .. })
    ));

    graph.links_mut().pop();
    assert_eq!(graph.get_shape_by_id(1).map(|s| s.id), Some(1));
    assert!(graph.build_error().is_none());
}

#[test]
fn test_destroy_releases_document() {
    let mut graph = ProcessGraph::new(branching_process());
    assert!(graph.flows().is_some());

    graph.destroy();
    assert!(graph.shapes().is_empty());
    assert!(graph.get_shape_by_id(1).is_none());
    assert_eq!(graph.get_start_shape_id(), None);
    assert_eq!(graph.flows(), Some(vec![]));
}

#[test]
fn test_replace_and_take_document() {
    let mut graph = ProcessGraph::new(linear_process());
    graph.replace_document(branching_process());
    assert_eq!(graph.get_end_shape_id(), Some(6));

    let document = graph.into_document();
    assert_eq!(document, branching_process());
}

#[test]
fn test_custom_client_type_key_and_aliases() {
    let key = "kind";
    let document = document(
        vec![
            shape_with_client_type(1, "Begin", key, json!("begin")),
            shape_with_client_type(2, "Work", key, json!("step")),
            shape_with_client_type(3, "Auto", key, json!("systemtask")),
            shape_with_client_type(4, "Finish", key, json!("finish")),
        ],
        vec![Link::new(1, 2, 0), Link::new(2, 3, 0), Link::new(3, 4, 0)],
        None,
    );

    let graph = ProcessGraph::builder(document.clone())
        .with_client_type_key(key)
        .with_role_alias("begin", ShapeRole::Start)
        .with_role_alias("step", ShapeRole::UserTask)
        .with_role_alias("finish", ShapeRole::End)
        .try_build()
        .expect("Failed to build graph");

    assert_eq!(graph.get_start_shape_id(), Some(1));
    assert_eq!(graph.get_end_shape_id(), Some(4));
    assert_eq!(graph.get_shape_type_by_id(3), Some(ShapeRole::SystemTask));
    assert_eq!(graph.get_first_non_system_shape_id(2), Some(4));

    // Default options look at `clientType`, which these shapes don't have.
    let plain = ProcessGraph::new(document);
    assert_eq!(plain.get_start_shape_id(), None);
    assert_eq!(plain.get_shape_type_by_id(1), None);
}
