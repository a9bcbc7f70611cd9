use crate::process::ShapeRole;
use ahash::AHashMap;

/// The property bag key that holds a shape's role.
pub const DEFAULT_CLIENT_TYPE_KEY: &str = "clientType";

/// How the outgoing edges of a decision are split into flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchSplitting {
    /// The first outgoing edge continues the current flow; every further edge
    /// opens a child flow that ends at its recorded branch destination.
    #[default]
    SecondaryBranches,
    /// Every outgoing edge opens a child flow; the flow owning the decision
    /// ends at the decision. Each branch needs a recorded destination.
    AllBranches,
}

/// Settings used when building the shape index and the flows.
#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub client_type_key: String,
    pub role_aliases: AHashMap<String, ShapeRole>,
    pub branch_splitting: BranchSplitting,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            client_type_key: DEFAULT_CLIENT_TYPE_KEY.to_string(),
            role_aliases: AHashMap::new(),
            branch_splitting: BranchSplitting::default(),
        }
    }
}
