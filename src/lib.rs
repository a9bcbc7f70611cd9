//! # Procflow - Process-Flow Graph Model
//!
//! **Procflow** is the in-memory graph model of a business-process diagram: start and
//! end markers, user and system tasks, decisions, merge points and the directed links
//! between them. From the flat shape and link lists of a process document it derives an
//! adjacency index and a decomposition into *flows*, straight-line runs of shapes that
//! split at decisions and end where their branch re-converges.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Data**: Deserialize the process JSON into a `ProcessDocument`, or
//!     implement `IntoProcess` for your own structs.
//! 2.  **Wrap**: Hand the document to `ProcessGraph::builder` (or `ProcessGraph::new`).
//!     `try_build` validates the document up front; `build` defers the work to the
//!     first query.
//! 3.  **Query**: Ask structural questions (next/previous shapes, branch destinations,
//!     same-flow membership) while editing.
//! 4.  **Mutate**: Edit shapes and links through the graph. Every mutation marks the
//!     derived state dirty and the next query rebuilds it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use procflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let document = ProcessDocument::from_file("path/to/process.json")?;
//!
//!     // Fails if a link points at a missing shape or a decision branch has no
//!     // recorded destination.
//!     let graph = ProcessGraph::builder(document)
//!         .with_role_alias("gateway", ShapeRole::SystemDecision)
//!         .try_build()?;
//!
//!     let start = graph.get_start_shape_id().expect("process has a start shape");
//!     println!("First user-facing shape: {:?}", graph.get_first_non_system_shape_id(start));
//!     println!("{}", FlowFormatter::format_flows(&graph));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod graph;
pub mod prelude;
pub mod process;
