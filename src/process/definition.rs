use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Numeric shape identifier, unique and stable for the lifetime of a document.
///
/// Shapes added by an editor before the first save typically carry negative ids.
pub type ShapeId = i64;

/// A single entry of a property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    #[serde(alias = "property_name")]
    pub property_name: String,
    #[serde(default, alias = "type_predefined")]
    pub type_predefined: i32,
    #[serde(default, alias = "type_id")]
    pub type_id: Option<i64>,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl PropertyValue {
    pub fn new(property_name: &str, value: serde_json::Value) -> Self {
        Self {
            property_name: property_name.to_string(),
            type_predefined: 0,
            type_id: None,
            value,
        }
    }
}

/// A property bag keyed by property name.
pub type PropertyValues = AHashMap<String, PropertyValue>;

/// A node of the process diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    pub name: String,
    #[serde(default, alias = "parent_id")]
    pub parent_id: ShapeId,
    #[serde(default, alias = "type_prefix")]
    pub type_prefix: String,
    #[serde(default, alias = "base_item_type_predefined")]
    pub base_item_type_predefined: i32,
    #[serde(default, alias = "property_values")]
    pub property_values: PropertyValues,
}

/// A directed edge between two shapes.
///
/// For the outgoing links of a decision, `order_index` is the branch order:
/// 0 is the primary continuation, higher values are secondary branches. The
/// same type is used for decision branch destination links, where
/// `destination_id` is the shape at which the branch re-converges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(alias = "source_id")]
    pub source_id: ShapeId,
    #[serde(alias = "destination_id")]
    pub destination_id: ShapeId,
    #[serde(default, rename = "orderindex", alias = "orderIndex", alias = "order_index")]
    pub order_index: i32,
    #[serde(default)]
    pub label: Option<String>,
}

impl Link {
    pub fn new(source_id: ShapeId, destination_id: ShapeId, order_index: i32) -> Self {
        Self {
            source_id,
            destination_id,
            order_index,
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// Lock and permission state reported by the load service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatus {
    #[serde(default, alias = "is_locked")]
    pub is_locked: bool,
    #[serde(default, alias = "is_locked_by_me")]
    pub is_locked_by_me: bool,
    #[serde(default, alias = "is_read_only")]
    pub is_read_only: bool,
    #[serde(default, alias = "is_deleted")]
    pub is_deleted: bool,
}

/// The canonical process document the graph model wraps.
///
/// This is the target structure for any custom format conversion and the
/// shape of the JSON delivered by the process load service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocument {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "project_id")]
    pub project_id: i64,
    #[serde(default, alias = "type_prefix")]
    pub type_prefix: String,
    #[serde(default, alias = "base_item_type_predefined")]
    pub base_item_type_predefined: i32,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, alias = "decision_branch_destination_links")]
    pub decision_branch_destination_links: Option<Vec<Link>>,
    #[serde(default, alias = "property_values")]
    pub property_values: PropertyValues,
    #[serde(default)]
    pub status: Option<ItemStatus>,
}
