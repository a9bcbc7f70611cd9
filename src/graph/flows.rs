use super::branches::BranchResolver;
use super::index::ShapeIndex;
use super::options::BranchSplitting;
use crate::error::GraphError;
use crate::process::{Shape, ShapeId};
use ahash::AHashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Stable identifier of a flow: its creation sequence number. The root flow is `FlowId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowId(pub usize);

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A straight-line run of shapes between a branch point and the next
/// re-convergence point or dead end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    pub id: FlowId,
    pub start_shape_id: ShapeId,
    /// The flow that owns the decision this flow branched from.
    pub parent: Option<FlowId>,
    /// Order index of the decision link that spawned this flow.
    pub order_index: Option<i32>,
    /// First shape of the branch that spawned this flow.
    pub first_shape_id: Option<ShapeId>,
    /// Member shapes in walk order.
    pub shape_ids: Vec<ShapeId>,
    /// The shape at which this flow rejoined another one, excluded from `shape_ids`.
    pub terminated_at: Option<ShapeId>,
}

impl Flow {
    fn root(start_shape_id: ShapeId) -> Self {
        Self {
            id: FlowId(0),
            start_shape_id,
            parent: None,
            order_index: None,
            first_shape_id: None,
            shape_ids: Vec::new(),
            terminated_at: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn contains(&self, shape_id: ShapeId) -> bool {
        self.shape_ids.contains(&shape_id)
    }

    pub fn len(&self) -> usize {
        self.shape_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shape_ids.is_empty()
    }
}

/// Pending merge points of the enclosing branches, innermost last.
///
/// Pushing returns a new stack that shares its tail with the original, so
/// sibling branches never see each other's merge points and cloning is cheap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStack(Option<Rc<MergeFrame>>);

#[derive(Debug, PartialEq, Eq)]
struct MergeFrame {
    merge_id: ShapeId,
    depth: usize,
    outer: MergeStack,
}

impl MergeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, merge_id: ShapeId) -> Self {
        Self(Some(Rc::new(MergeFrame {
            merge_id,
            depth: self.len() + 1,
            outer: self.clone(),
        })))
    }

    pub fn top(&self) -> Option<ShapeId> {
        self.0.as_ref().map(|frame| frame.merge_id)
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |frame| frame.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Pending unit of work of the walk.
enum Step {
    /// Visit a shape as part of `flow`.
    Visit {
        id: ShapeId,
        previous_id: Option<ShapeId>,
        flow: FlowId,
        merges: MergeStack,
    },
    /// Open a child flow of `parent` for the branch `decision_id -> head_id`.
    Branch {
        decision_id: ShapeId,
        head_id: ShapeId,
        parent: FlowId,
        merges: MergeStack,
    },
}

/// The result of walking a process: every flow plus the reverse index from
/// shape id to owning flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowDecomposition {
    flows: Vec<Flow>,
    shape_id_to_flow: AHashMap<ShapeId, FlowId>,
}

impl FlowDecomposition {
    /// All flows in creation order, root first.
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn get(&self, id: FlowId) -> Option<&Flow> {
        self.flows.get(id.0)
    }

    pub fn flow_id_of(&self, shape_id: ShapeId) -> Option<FlowId> {
        self.shape_id_to_flow.get(&shape_id).copied()
    }

    pub fn flow_of(&self, shape_id: ShapeId) -> Option<&Flow> {
        self.flow_id_of(shape_id).and_then(|id| self.get(id))
    }
}

/// Partitions the shapes reachable from the Start shape into flows.
pub struct FlowDecomposer<'a> {
    index: &'a ShapeIndex,
    shapes: &'a [Shape],
    resolver: BranchResolver<'a>,
    splitting: BranchSplitting,
    flows: Vec<Flow>,
    shape_id_to_flow: AHashMap<ShapeId, FlowId>,
}

impl<'a> FlowDecomposer<'a> {
    pub fn new(
        index: &'a ShapeIndex,
        shapes: &'a [Shape],
        resolver: BranchResolver<'a>,
        splitting: BranchSplitting,
    ) -> Self {
        Self {
            index,
            shapes,
            resolver,
            splitting,
            flows: Vec::new(),
            shape_id_to_flow: AHashMap::new(),
        }
    }

    /// Walks the process from its Start shape.
    ///
    /// A document without a Start shape yields no flows. Any missing shape or
    /// unresolvable branch destination fails the whole decomposition.
    pub fn decompose(mut self) -> Result<FlowDecomposition, GraphError> {
        if let Some(start_id) = self.index.start_shape_id() {
            self.flows.push(Flow::root(start_id));
            self.walk(start_id)?;
        }

        debug!(
            flows = self.flows.len(),
            shapes = self.shape_id_to_flow.len(),
            "decomposed process into flows"
        );
        Ok(FlowDecomposition {
            flows: self.flows,
            shape_id_to_flow: self.shape_id_to_flow,
        })
    }

    /// Depth-first walk driven by an explicit stack, so long processes don't
    /// exhaust the call stack.
    ///
    /// Outgoing links are pushed in reverse, which finishes the whole primary
    /// continuation of a shape before its secondary branches open their flows.
    fn walk(&mut self, start_id: ShapeId) -> Result<(), GraphError> {
        let mut pending = vec![Step::Visit {
            id: start_id,
            previous_id: None,
            flow: FlowId(0),
            merges: MergeStack::new(),
        }];

        while let Some(step) = pending.pop() {
            let (id, previous_id, flow, merges) = match step {
                Step::Visit {
                    id,
                    previous_id,
                    flow,
                    merges,
                } => (id, previous_id, flow, merges),
                Step::Branch {
                    decision_id,
                    head_id,
                    parent,
                    merges,
                } => {
                    let destination_id = self
                        .resolver
                        .get_branch_destination_id(decision_id, head_id)
                        .ok_or(GraphError::MissingBranchDestination {
                            decision_id,
                            branch_head_id: head_id,
                        })?;
                    let child = self.spawn_branch(parent, decision_id, head_id);
                    trace!(
                        decision_id,
                        branch_head_id = head_id,
                        destination_id,
                        flow = child.0,
                        "spawned branch flow"
                    );
                    (head_id, Some(decision_id), child, merges.push(destination_id))
                }
            };

            let index = self.index;
            // Unreachable while `ShapeIndex::build` rejects links to unknown shapes.
            let node = index.get(id).ok_or(GraphError::ShapeNotInTree {
                shape_id: id,
                previous_id,
            })?;
            match self.shapes.get(node.index) {
                Some(shape) if shape.id == id => {}
                _ => {
                    return Err(GraphError::ShapeNotInList {
                        shape_id: id,
                        index: node.index,
                    });
                }
            }

            // Reaching the innermost pending merge point, or a shape some other
            // flow already owns, ends this flow before the shape.
            if merges.top() == Some(id) || self.shape_id_to_flow.contains_key(&id) {
                self.flows[flow.0].terminated_at = Some(id);
                continue;
            }

            self.flows[flow.0].shape_ids.push(id);
            self.shape_id_to_flow.insert(id, flow);

            let next_ids = &node.next_shape_ids;
            let branches_from = match self.splitting {
                BranchSplitting::SecondaryBranches => 1,
                BranchSplitting::AllBranches if next_ids.len() > 1 => 0,
                BranchSplitting::AllBranches => 1,
            };

            for (position, &next_id) in next_ids.iter().enumerate().rev() {
                let merges = merges.clone();
                pending.push(if position < branches_from {
                    Step::Visit {
                        id: next_id,
                        previous_id: Some(id),
                        flow,
                        merges,
                    }
                } else {
                    Step::Branch {
                        decision_id: id,
                        head_id: next_id,
                        parent: flow,
                        merges,
                    }
                });
            }
        }
        Ok(())
    }

    fn spawn_branch(&mut self, parent: FlowId, decision_id: ShapeId, first_id: ShapeId) -> FlowId {
        let id = FlowId(self.flows.len());
        self.flows.push(Flow {
            id,
            start_shape_id: first_id,
            parent: Some(parent),
            order_index: self.resolver.get_order_index(decision_id, first_id),
            first_shape_id: Some(first_id),
            shape_ids: Vec::new(),
            terminated_at: None,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_stack_push_leaves_original_untouched() {
        let outer = MergeStack::new().push(7);
        let inner = outer.push(9);

        assert_eq!(outer.top(), Some(7));
        assert_eq!(outer.len(), 1);
        assert_eq!(inner.top(), Some(9));
        assert_eq!(inner.len(), 2);
        assert!(MergeStack::new().top().is_none());
    }
}
