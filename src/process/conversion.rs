use super::definition::ProcessDocument;
use crate::error::{DocumentError, ProcessConversionError};
use std::fs;

/// A trait for custom data models that can be converted into a `ProcessDocument`.
///
/// Implement it on the structs your load service deserializes into to hand
/// them to the graph model without going through the canonical JSON layout.
///
/// # Example
///
/// ```rust,no_run
/// use procflow::prelude::*;
/// use procflow::error::ProcessConversionError;
///
/// struct MyStep { id: i64, title: String }
/// struct MyProcess { id: i64, steps: Vec<MyStep> }
///
/// impl IntoProcess for MyProcess {
///     fn into_process(self) -> std::result::Result<ProcessDocument, ProcessConversionError> {
///         let shapes = self
///             .steps
///             .into_iter()
///             .map(|step| Shape {
///                 id: step.id,
///                 name: step.title,
/// #               parent_id: 0,
/// #               type_prefix: String::new(),
/// #               base_item_type_predefined: 0,
/// #               property_values: Default::default(),
///             })
///             .collect();
///         Ok(ProcessDocument { id: self.id, shapes, ..Default::default() })
///     }
/// }
/// ```
pub trait IntoProcess {
    /// Consumes the object and converts it into a process document.
    fn into_process(self) -> Result<ProcessDocument, ProcessConversionError>;
}

impl IntoProcess for ProcessDocument {
    fn into_process(self) -> Result<ProcessDocument, ProcessConversionError> {
        Ok(self)
    }
}

impl ProcessDocument {
    /// Parses a document from the JSON representation of the load service.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::JsonParseError(e.to_string()))
    }

    /// Loads a document from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DocumentError::JsonParseError(format!("Could not read file '{}': {}", path, e))
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::JsonParseError(e.to_string()))
    }
}
