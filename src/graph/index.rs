use super::options::GraphOptions;
use crate::error::GraphError;
use crate::process::{Link, Shape, ShapeId, ShapeRole};
use ahash::AHashMap;
use tracing::{debug, warn};

/// Position and adjacency of a single shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeShapeRef {
    /// Index into the document's shape list.
    pub index: usize,
    /// Destinations of outgoing links, in link list order.
    pub next_shape_ids: Vec<ShapeId>,
    /// Sources of incoming links, in link list order.
    pub prev_shape_ids: Vec<ShapeId>,
}

impl TreeShapeRef {
    fn new(index: usize) -> Self {
        Self {
            index,
            next_shape_ids: Vec::new(),
            prev_shape_ids: Vec::new(),
        }
    }
}

/// Adjacency index derived from the flat shape and link lists.
///
/// Rebuilt from scratch whenever the document changes; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeIndex {
    tree: AHashMap<ShapeId, TreeShapeRef>,
    link_index: AHashMap<(ShapeId, ShapeId), usize>,
    start_shape_id: Option<ShapeId>,
    precondition_shape_id: Option<ShapeId>,
    end_shape_id: Option<ShapeId>,
}

/// Reads the role of a shape from its property bag.
pub(crate) fn shape_role(shape: &Shape, options: &GraphOptions) -> Option<ShapeRole> {
    shape
        .property_values
        .get(&options.client_type_key)
        .and_then(|property| ShapeRole::from_client_type(&property.value, &options.role_aliases))
}

impl ShapeIndex {
    /// Builds the index.
    ///
    /// The first shape found with role Start, PreconditionSystemTask or End
    /// becomes the respective distinguished shape. Fails on the first link that
    /// references a shape missing from `shapes`.
    pub fn build(
        shapes: &[Shape],
        links: &[Link],
        options: &GraphOptions,
    ) -> Result<Self, GraphError> {
        let mut index = ShapeIndex::default();

        for (position, shape) in shapes.iter().enumerate() {
            if index.tree.contains_key(&shape.id) {
                warn!(shape_id = shape.id, position, "duplicate shape id, keeping first");
                continue;
            }
            index.tree.insert(shape.id, TreeShapeRef::new(position));

            let slot = match shape_role(shape, options) {
                Some(ShapeRole::Start) => &mut index.start_shape_id,
                Some(ShapeRole::PreconditionSystemTask) => &mut index.precondition_shape_id,
                Some(ShapeRole::End) => &mut index.end_shape_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(shape.id);
            }
        }

        for (link_index, link) in links.iter().enumerate() {
            for endpoint in [link.source_id, link.destination_id] {
                if !index.tree.contains_key(&endpoint) {
                    return Err(GraphError::UnknownLinkEndpoint {
                        link_index,
                        source_id: link.source_id,
                        destination_id: link.destination_id,
                        missing_id: endpoint,
                    });
                }
            }

            if let Some(source) = index.tree.get_mut(&link.source_id) {
                source.next_shape_ids.push(link.destination_id);
            }
            if let Some(destination) = index.tree.get_mut(&link.destination_id) {
                destination.prev_shape_ids.push(link.source_id);
            }
            index
                .link_index
                .entry((link.source_id, link.destination_id))
                .or_insert(link_index);
        }

        debug!(
            shapes = shapes.len(),
            links = links.len(),
            start = ?index.start_shape_id,
            end = ?index.end_shape_id,
            "built shape index"
        );
        Ok(index)
    }

    pub fn get(&self, id: ShapeId) -> Option<&TreeShapeRef> {
        self.tree.get(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.tree.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn get_next_shape_ids(&self, id: ShapeId) -> Option<&[ShapeId]> {
        self.tree.get(&id).map(|node| node.next_shape_ids.as_slice())
    }

    pub fn get_prev_shape_ids(&self, id: ShapeId) -> Option<&[ShapeId]> {
        self.tree.get(&id).map(|node| node.prev_shape_ids.as_slice())
    }

    /// Position of the link `source_id -> destination_id` in the link list.
    pub fn get_link_index(&self, source_id: ShapeId, destination_id: ShapeId) -> Option<usize> {
        self.link_index.get(&(source_id, destination_id)).copied()
    }

    pub fn start_shape_id(&self) -> Option<ShapeId> {
        self.start_shape_id
    }

    pub fn precondition_shape_id(&self) -> Option<ShapeId> {
        self.precondition_shape_id
    }

    pub fn end_shape_id(&self) -> Option<ShapeId> {
        self.end_shape_id
    }
}
