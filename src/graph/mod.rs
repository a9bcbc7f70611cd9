use crate::error::{DocumentError, GraphError};
use crate::process::{
    IntoProcess, ItemStatus, Link, ProcessDocument, PropertyValue, PropertyValues, Shape,
    ShapeId, ShapeRole,
};
use ahash::AHashSet;
use std::cell::RefCell;
use tracing::{debug, warn};

pub mod branches;
pub mod flows;
pub mod formatter;
pub mod index;
pub mod options;

use branches::{BranchResolver, update_decision_destination_id};
use flows::{Flow, FlowDecomposer, FlowDecomposition, FlowId};
use index::{ShapeIndex, shape_role};
use options::{BranchSplitting, GraphOptions};

/// Derived state. `None` means dirty; a cached `Err` stays until the next mutation.
#[derive(Default)]
struct DerivedState {
    index: Option<Result<ShapeIndex, GraphError>>,
    flows: Option<Result<FlowDecomposition, GraphError>>,
}

/// The graph model of a process document.
///
/// Wraps a `ProcessDocument` and answers structural queries about it. The shape
/// index and the flows are derived lazily: every mutation entry point marks
/// them dirty and every read rebuilds what it needs first. A read whose
/// rebuild fails answers `None`; call [`ProcessGraph::update_tree_and_flows`]
/// to get the error itself.
pub struct ProcessGraph {
    document: ProcessDocument,
    options: GraphOptions,
    cache: RefCell<DerivedState>,
}

/// Configures a `ProcessGraph` before it wraps its document.
pub struct ProcessGraphBuilder {
    document: ProcessDocument,
    options: GraphOptions,
}

impl ProcessGraphBuilder {
    pub fn new(document: ProcessDocument) -> Self {
        Self {
            document,
            options: GraphOptions::default(),
        }
    }

    /// Reads shape roles from `key` instead of `clientType`.
    pub fn with_client_type_key(mut self, key: &str) -> Self {
        self.options.client_type_key = key.to_string();
        self
    }

    /// Maps a custom string client type onto a role.
    pub fn with_role_alias(mut self, client_type: &str, role: ShapeRole) -> Self {
        self.options
            .role_aliases
            .insert(client_type.to_string(), role);
        self
    }

    pub fn with_branch_splitting(mut self, splitting: BranchSplitting) -> Self {
        self.options.branch_splitting = splitting;
        self
    }

    pub fn with_options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    /// Wraps the document; derived state is built on first use.
    pub fn build(self) -> ProcessGraph {
        ProcessGraph {
            document: self.document,
            options: self.options,
            cache: RefCell::new(DerivedState::default()),
        }
    }

    /// Wraps the document and builds the index and flows right away.
    pub fn try_build(self) -> Result<ProcessGraph, GraphError> {
        let graph = self.build();
        graph.update_tree_and_flows()?;
        Ok(graph)
    }
}

impl ProcessGraph {
    pub fn new(document: ProcessDocument) -> Self {
        ProcessGraphBuilder::new(document).build()
    }

    pub fn builder(document: ProcessDocument) -> ProcessGraphBuilder {
        ProcessGraphBuilder::new(document)
    }

    /// Converts a custom format and wraps the result with default options.
    pub fn from_process<P: IntoProcess>(source: P) -> Result<Self, DocumentError> {
        Ok(Self::new(source.into_process()?))
    }

    // --- Derived state -------------------------------------------------

    /// Rebuilds the shape index from the current shapes and links.
    pub fn update_tree(&self) -> Result<(), GraphError> {
        let built = self.build_index();
        self.cache.borrow_mut().index = Some(built.clone());
        built.map(|_| ())
    }

    /// Rebuilds the shape index and the flow decomposition.
    pub fn update_tree_and_flows(&self) -> Result<(), GraphError> {
        let index = self.build_index();
        let flows = match &index {
            Ok(index) => Some(self.build_flows(index)),
            Err(_) => None,
        };
        let mut cache = self.cache.borrow_mut();
        cache.index = Some(index.clone());
        cache.flows = flows.clone();
        index?;
        flows.transpose().map(|_| ())
    }

    /// True when the next read will rebuild the derived state.
    pub fn is_dirty(&self) -> bool {
        let cache = self.cache.borrow();
        cache.index.is_none() || cache.flows.is_none()
    }

    /// The error that broke the last rebuild, if any.
    pub fn build_error(&self) -> Option<GraphError> {
        let cache = self.cache.borrow();
        let index_error = cache.index.as_ref().and_then(|built| built.as_ref().err());
        let flows_error = cache.flows.as_ref().and_then(|built| built.as_ref().err());
        index_error.or(flows_error).cloned()
    }

    /// A copy of the current shape index.
    pub fn shape_index(&self) -> Option<ShapeIndex> {
        self.with_index(|index| index.clone())
    }

    /// A copy of the current flow decomposition.
    pub fn flow_decomposition(&self) -> Option<FlowDecomposition> {
        self.with_flows(|_, flows| flows.clone())
    }

    fn build_index(&self) -> Result<ShapeIndex, GraphError> {
        ShapeIndex::build(&self.document.shapes, &self.document.links, &self.options)
    }

    fn build_flows(&self, index: &ShapeIndex) -> Result<FlowDecomposition, GraphError> {
        let resolver = BranchResolver::new(
            index,
            &self.document.links,
            self.document.decision_branch_destination_links.as_deref(),
        );
        FlowDecomposer::new(
            index,
            &self.document.shapes,
            resolver,
            self.options.branch_splitting,
        )
        .decompose()
    }

    fn ensure_index(&self) {
        if self.cache.borrow().index.is_some() {
            return;
        }
        debug!(process_id = self.document.id, "shape index dirty, rebuilding");
        let built = self.build_index();
        if let Err(e) = &built {
            warn!(process_id = self.document.id, error = %e, "shape index rebuild failed");
        }
        self.cache.borrow_mut().index = Some(built);
    }

    fn ensure_flows(&self) {
        self.ensure_index();
        if self.cache.borrow().flows.is_some() {
            return;
        }
        let built = match self.cache.borrow().index.as_ref() {
            Some(Ok(index)) => self.build_flows(index),
            _ => return,
        };
        if let Err(e) = &built {
            warn!(process_id = self.document.id, error = %e, "flow rebuild failed");
        }
        self.cache.borrow_mut().flows = Some(built);
    }

    fn with_index<R>(&self, f: impl FnOnce(&ShapeIndex) -> R) -> Option<R> {
        self.ensure_index();
        match self.cache.borrow().index.as_ref() {
            Some(Ok(index)) => Some(f(index)),
            _ => None,
        }
    }

    fn with_flows<R>(&self, f: impl FnOnce(&ShapeIndex, &FlowDecomposition) -> R) -> Option<R> {
        self.ensure_flows();
        let cache = self.cache.borrow();
        match (cache.index.as_ref(), cache.flows.as_ref()) {
            (Some(Ok(index)), Some(Ok(flows))) => Some(f(index, flows)),
            _ => None,
        }
    }

    fn mark_dirty(&mut self) {
        *self.cache.get_mut() = DerivedState::default();
    }

    // --- Document passthrough --------------------------------------------

    pub fn document(&self) -> &ProcessDocument {
        &self.document
    }

    pub fn into_document(self) -> ProcessDocument {
        self.document
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub fn id(&self) -> i64 {
        self.document.id
    }

    pub fn name(&self) -> &str {
        &self.document.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.document.name = name.to_string();
    }

    pub fn project_id(&self) -> i64 {
        self.document.project_id
    }

    pub fn status(&self) -> Option<&ItemStatus> {
        self.document.status.as_ref()
    }

    pub fn set_status(&mut self, status: Option<ItemStatus>) {
        self.document.status = status;
    }

    pub fn property_values(&self) -> &PropertyValues {
        &self.document.property_values
    }

    pub fn set_property_value(&mut self, name: &str, value: PropertyValue) {
        self.document.property_values.insert(name.to_string(), value);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.document.shapes
    }

    pub fn links(&self) -> &[Link] {
        &self.document.links
    }

    pub fn decision_branch_destination_links(&self) -> &[Link] {
        self.document
            .decision_branch_destination_links
            .as_deref()
            .unwrap_or_default()
    }

    // --- Structural mutation ---------------------------------------------

    pub fn shapes_mut(&mut self) -> &mut Vec<Shape> {
        self.mark_dirty();
        &mut self.document.shapes
    }

    pub fn links_mut(&mut self) -> &mut Vec<Link> {
        self.mark_dirty();
        &mut self.document.links
    }

    pub fn decision_branch_destination_links_mut(&mut self) -> &mut Vec<Link> {
        self.mark_dirty();
        self.document
            .decision_branch_destination_links
            .get_or_insert_with(Vec::new)
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes_mut().push(shape);
    }

    pub fn add_link(&mut self, link: Link) {
        self.links_mut().push(link);
    }

    /// Removes the link `source_id -> destination_id`, returning it.
    pub fn remove_link(&mut self, source_id: ShapeId, destination_id: ShapeId) -> Option<Link> {
        let position = self
            .document
            .links
            .iter()
            .position(|l| l.source_id == source_id && l.destination_id == destination_id)?;
        Some(self.links_mut().remove(position))
    }

    pub fn replace_document(&mut self, document: ProcessDocument) {
        self.document = document;
        self.mark_dirty();
    }

    /// Points the branch (`decision_id`, `order_index`) at a new destination.
    ///
    /// Returns `false` when no destination link matches; nothing changes then.
    pub fn update_decision_destination_id(
        &mut self,
        decision_id: ShapeId,
        order_index: i32,
        new_destination_id: ShapeId,
    ) -> bool {
        let Some(destination_links) = self.document.decision_branch_destination_links.as_mut()
        else {
            return false;
        };
        let updated = update_decision_destination_id(
            destination_links,
            decision_id,
            order_index,
            new_destination_id,
        );
        if updated {
            self.mark_dirty();
        }
        updated
    }

    /// Drops the document and every derived structure.
    pub fn destroy(&mut self) {
        self.document = ProcessDocument::default();
        self.mark_dirty();
    }

    // --- Shape queries ---------------------------------------------------

    pub fn get_shape_by_id(&self, id: ShapeId) -> Option<&Shape> {
        let position = self.with_index(|index| index.get(id).map(|node| node.index))??;
        self.document.shapes.get(position)
    }

    pub fn get_shape_type(&self, shape: &Shape) -> Option<ShapeRole> {
        shape_role(shape, &self.options)
    }

    pub fn get_shape_type_by_id(&self, id: ShapeId) -> Option<ShapeRole> {
        self.get_shape_by_id(id)
            .and_then(|shape| self.get_shape_type(shape))
    }

    pub fn is_decision(&self, id: ShapeId) -> bool {
        self.get_shape_type_by_id(id)
            .is_some_and(ShapeRole::is_decision)
    }

    pub fn is_user_task(&self, id: ShapeId) -> bool {
        self.get_shape_type_by_id(id) == Some(ShapeRole::UserTask)
    }

    pub fn is_system_task(&self, id: ShapeId) -> bool {
        self.get_shape_type_by_id(id) == Some(ShapeRole::SystemTask)
    }

    pub fn get_start_shape_id(&self) -> Option<ShapeId> {
        self.with_index(ShapeIndex::start_shape_id).flatten()
    }

    pub fn get_precondition_shape_id(&self) -> Option<ShapeId> {
        self.with_index(ShapeIndex::precondition_shape_id).flatten()
    }

    pub fn get_end_shape_id(&self) -> Option<ShapeId> {
        self.with_index(ShapeIndex::end_shape_id).flatten()
    }

    pub fn get_next_shape_ids(&self, id: ShapeId) -> Option<Vec<ShapeId>> {
        self.with_index(|index| index.get_next_shape_ids(id).map(<[ShapeId]>::to_vec))
            .flatten()
    }

    pub fn get_prev_shape_ids(&self, id: ShapeId) -> Option<Vec<ShapeId>> {
        self.with_index(|index| index.get_prev_shape_ids(id).map(<[ShapeId]>::to_vec))
            .flatten()
    }

    /// True when more than one link enters the shape.
    pub fn has_multiple_prev_shapes_by_id(&self, id: ShapeId) -> bool {
        self.with_index(|index| index.get_prev_shape_ids(id).is_some_and(|prev| prev.len() > 1))
            .unwrap_or(false)
    }

    pub fn get_link_index(&self, source_id: ShapeId, destination_id: ShapeId) -> Option<usize> {
        self.with_index(|index| index.get_link_index(source_id, destination_id))
            .flatten()
    }

    /// The order index a new outgoing link of `id` should get.
    pub fn get_next_order_index(&self, id: ShapeId) -> Option<i32> {
        let links = &self.document.links;
        self.with_index(|index| {
            index.get(id).map(|_| {
                links
                    .iter()
                    .filter(|link| link.source_id == id)
                    .map(|link| link.order_index + 1)
                    .max()
                    .unwrap_or(0)
            })
        })
        .flatten()
    }

    /// Follows primary links from `id` past system tasks and system decisions.
    ///
    /// Only the first outgoing link of each shape is followed. Returns `None`
    /// when the chain dead-ends or loops.
    pub fn get_first_non_system_shape_id(&self, id: ShapeId) -> Option<ShapeId> {
        let mut visited = AHashSet::new();
        let mut current = id;
        loop {
            let next_id = *self.get_next_shape_ids(current)?.first()?;
            if !visited.insert(next_id) {
                return None;
            }
            match self.get_shape_type_by_id(next_id) {
                Some(role) if role.is_system() => current = next_id,
                _ => return Some(next_id),
            }
        }
    }

    // --- Branch queries --------------------------------------------------

    pub fn get_decision_branch_destination_links<P>(&self, predicate: P) -> Vec<Link>
    where
        P: Fn(&Link) -> bool,
    {
        branches::decision_branch_destination_links(
            self.decision_branch_destination_links(),
            predicate,
        )
        .into_iter()
        .cloned()
        .collect()
    }

    pub fn get_connected_decision_ids(&self, destination_id: ShapeId) -> Vec<ShapeId> {
        branches::connected_decision_ids(self.decision_branch_destination_links(), destination_id)
    }

    pub fn get_branch_destination_ids(&self, decision_id: ShapeId) -> Vec<ShapeId> {
        branches::branch_destination_ids(self.decision_branch_destination_links(), decision_id)
    }

    pub fn get_branch_destination_id(
        &self,
        decision_id: ShapeId,
        first_shape_in_branch: ShapeId,
    ) -> Option<ShapeId> {
        self.with_index(|index| {
            BranchResolver::new(
                index,
                &self.document.links,
                self.document.decision_branch_destination_links.as_deref(),
            )
            .get_branch_destination_id(decision_id, first_shape_in_branch)
        })
        .flatten()
    }

    // --- Flow queries ----------------------------------------------------

    pub fn flows(&self) -> Option<Vec<Flow>> {
        self.with_flows(|_, flows| flows.flows().to_vec())
    }

    pub fn get_flow(&self, id: FlowId) -> Option<Flow> {
        self.with_flows(|_, flows| flows.get(id).cloned()).flatten()
    }

    pub fn get_flow_by_shape_id(&self, shape_id: ShapeId) -> Option<Flow> {
        self.with_flows(|_, flows| flows.flow_of(shape_id).cloned())
            .flatten()
    }

    /// Whether both shapes belong to the same flow; `None` when either is unknown.
    pub fn is_in_same_flow(&self, id: ShapeId, other_id: ShapeId) -> Option<bool> {
        self.with_flows(|_, flows| {
            let flow = flows.flow_id_of(id)?;
            let other = flows.flow_id_of(other_id)?;
            Some(flow == other)
        })
        .flatten()
    }

    /// Whether the flow of `id` branched directly from the flow of `other_id`;
    /// `None` when either is unknown.
    pub fn is_in_child_flow(&self, id: ShapeId, other_id: ShapeId) -> Option<bool> {
        self.with_flows(|_, flows| {
            let flow = flows.flow_of(id)?;
            let other = flows.flow_id_of(other_id)?;
            Some(flow.parent == Some(other))
        })
        .flatten()
    }
}
