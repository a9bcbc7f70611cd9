use crate::process::ShapeId;
use thiserror::Error;

/// Errors that make the shape index or the flow decomposition impossible to build.
///
/// These are structural integrity failures of the document. There is no partial
/// result: a graph whose rebuild fails has no usable derived state until the
/// document is corrected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error(
        "Link #{link_index} ({source_id} -> {destination_id}) references shape '{missing_id}', which is not in the shape list"
    )]
    UnknownLinkEndpoint {
        link_index: usize,
        source_id: ShapeId,
        destination_id: ShapeId,
        missing_id: ShapeId,
    },

    #[error("Shape '{shape_id}' doesn't exist in tree (reached from {})", display_previous(.previous_id))]
    ShapeNotInTree {
        shape_id: ShapeId,
        previous_id: Option<ShapeId>,
    },

    #[error("Shape '{shape_id}' doesn't exist in shape list (expected at index {index})")]
    ShapeNotInList { shape_id: ShapeId, index: usize },

    #[error(
        "Decision '{decision_id}' has a branch starting at shape '{branch_head_id}' with no recorded branch destination"
    )]
    MissingBranchDestination {
        decision_id: ShapeId,
        branch_head_id: ShapeId,
    },
}

fn display_previous(previous_id: &Option<ShapeId>) -> String {
    match previous_id {
        Some(id) => format!("shape '{}'", id),
        None => "the document start".to_string(),
    }
}

/// Errors that can occur while loading a process document.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    #[error("Failed to parse process JSON: {0}")]
    JsonParseError(String),

    #[error(transparent)]
    Conversion(#[from] ProcessConversionError),
}

/// Errors that can occur when converting a custom user format into a `ProcessDocument`.
#[derive(Error, Debug, Clone)]
pub enum ProcessConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
