//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the procflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use procflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = ProcessDocument::from_file("path/to/process.json")?;
//! let graph = ProcessGraph::new(document);
//! graph.update_tree_and_flows()?;
//!
//! for flow in graph.flows().unwrap_or_default() {
//!     println!("{}", FlowFormatter::format_flow(&flow));
//! }
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::branches::BranchResolver;
pub use crate::graph::flows::{Flow, FlowDecomposer, FlowDecomposition, FlowId, MergeStack};
pub use crate::graph::formatter::FlowFormatter;
pub use crate::graph::index::{ShapeIndex, TreeShapeRef};
pub use crate::graph::options::{BranchSplitting, GraphOptions};
pub use crate::graph::{ProcessGraph, ProcessGraphBuilder};

// Document model
pub use crate::process::{
    IntoProcess, ItemStatus, Link, ProcessDocument, PropertyValue, PropertyValues, Shape,
    ShapeId, ShapeRole,
};

// Error types
pub use crate::error::{DocumentError, GraphError, ProcessConversionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
