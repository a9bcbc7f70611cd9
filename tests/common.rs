//! Common test utilities for building process documents.
use procflow::prelude::*;
use serde_json::json;

/// Creates a shape whose `clientType` holds the numeric code of `role`.
#[allow(dead_code)]
pub fn shape(id: ShapeId, name: &str, role: ShapeRole) -> Shape {
    shape_with_client_type(id, name, "clientType", json!(role.code()))
}

/// Creates a shape with an arbitrary client-type property.
#[allow(dead_code)]
pub fn shape_with_client_type(
    id: ShapeId,
    name: &str,
    key: &str,
    value: serde_json::Value,
) -> Shape {
    let mut property_values = PropertyValues::default();
    property_values.insert(key.to_string(), PropertyValue::new(key, value));
    Shape {
        id,
        name: name.to_string(),
        parent_id: 100,
        type_prefix: "PROS".to_string(),
        base_item_type_predefined: 0,
        property_values,
    }
}

#[allow(dead_code)]
pub fn document(
    shapes: Vec<Shape>,
    links: Vec<Link>,
    destination_links: Option<Vec<Link>>,
) -> ProcessDocument {
    ProcessDocument {
        id: 100,
        name: "Test process".to_string(),
        project_id: 1,
        type_prefix: "PRO".to_string(),
        base_item_type_predefined: 0,
        shapes,
        links,
        decision_branch_destination_links: destination_links,
        property_values: PropertyValues::default(),
        status: None,
    }
}

/// `Start(1) -> A(2) -> End(3)`
#[allow(dead_code)]
pub fn linear_process() -> ProcessDocument {
    document(
        vec![
            shape(1, "Start", ShapeRole::Start),
            shape(2, "A", ShapeRole::UserTask),
            shape(3, "End", ShapeRole::End),
        ],
        vec![Link::new(1, 2, 0), Link::new(2, 3, 0)],
        None,
    )
}

/// `Start(1) -> Decision(2)`, branch 0 `-> A(3) -> Merge(5)`,
/// branch 1 `-> B(4) -> Merge(5)`, then `Merge(5) -> End(6)`.
/// Both branches record Merge as their destination.
#[allow(dead_code)]
pub fn branching_process() -> ProcessDocument {
    document(
        vec![
            shape(1, "Start", ShapeRole::Start),
            shape(2, "Decision", ShapeRole::UserDecision),
            shape(3, "A", ShapeRole::UserTask),
            shape(4, "B", ShapeRole::UserTask),
            shape(5, "Merge", ShapeRole::UserTask),
            shape(6, "End", ShapeRole::End),
        ],
        vec![
            Link::new(1, 2, 0),
            Link::new(2, 3, 0).with_label("yes"),
            Link::new(2, 4, 1).with_label("no"),
            Link::new(3, 5, 0),
            Link::new(4, 5, 0),
            Link::new(5, 6, 0),
        ],
        Some(vec![Link::new(2, 5, 0), Link::new(2, 5, 1)]),
    )
}

/// Outer decision 2 re-converges at 8; inner decision 4 (on the outer
/// secondary branch) re-converges at 7.
#[allow(dead_code)]
pub fn nested_process() -> ProcessDocument {
    document(
        vec![
            shape(1, "Start", ShapeRole::Start),
            shape(2, "Outer", ShapeRole::UserDecision),
            shape(3, "Main task", ShapeRole::UserTask),
            shape(4, "Inner", ShapeRole::SystemDecision),
            shape(5, "Inner main", ShapeRole::SystemTask),
            shape(6, "Inner alt", ShapeRole::SystemTask),
            shape(7, "Inner merge", ShapeRole::UserTask),
            shape(8, "Outer merge", ShapeRole::UserTask),
            shape(9, "End", ShapeRole::End),
        ],
        vec![
            Link::new(1, 2, 0),
            Link::new(2, 3, 0),
            Link::new(2, 4, 1),
            Link::new(4, 5, 0),
            Link::new(4, 6, 1),
            Link::new(5, 7, 0),
            Link::new(6, 7, 0),
            Link::new(7, 8, 0),
            Link::new(3, 8, 0),
            Link::new(8, 9, 0),
        ],
        Some(vec![Link::new(2, 8, 1), Link::new(4, 7, 1)]),
    )
}

/// `Start(1) -> SystemTask(2) -> UserTask(3) -> End(4)`
#[allow(dead_code)]
pub fn system_chain_process() -> ProcessDocument {
    document(
        vec![
            shape(1, "Start", ShapeRole::Start),
            shape(2, "Lookup", ShapeRole::SystemTask),
            shape(3, "Review", ShapeRole::UserTask),
            shape(4, "End", ShapeRole::End),
        ],
        vec![Link::new(1, 2, 0), Link::new(2, 3, 0), Link::new(3, 4, 0)],
        None,
    )
}
