use super::index::ShapeIndex;
use crate::process::{Link, ShapeId};

/// Answers questions about where decision branches re-converge.
///
/// Branch destination links are keyed by (decision, order index), while the
/// flow walk knows a branch by its first shape. Resolving goes through the
/// structural link between the two to recover the order index.
#[derive(Debug, Clone, Copy)]
pub struct BranchResolver<'a> {
    index: &'a ShapeIndex,
    links: &'a [Link],
    destination_links: &'a [Link],
}

impl<'a> BranchResolver<'a> {
    pub fn new(
        index: &'a ShapeIndex,
        links: &'a [Link],
        destination_links: Option<&'a [Link]>,
    ) -> Self {
        Self {
            index,
            links,
            destination_links: destination_links.unwrap_or_default(),
        }
    }

    /// All branch destination links matching `predicate`, in list order.
    pub fn get_decision_branch_destination_links<P>(&self, predicate: P) -> Vec<&'a Link>
    where
        P: Fn(&Link) -> bool,
    {
        decision_branch_destination_links(self.destination_links, predicate)
    }

    /// Decisions whose branches re-converge at `destination_id`.
    pub fn get_connected_decision_ids(&self, destination_id: ShapeId) -> Vec<ShapeId> {
        connected_decision_ids(self.destination_links, destination_id)
    }

    /// Recorded re-convergence points of every branch of `decision_id`.
    pub fn get_branch_destination_ids(&self, decision_id: ShapeId) -> Vec<ShapeId> {
        branch_destination_ids(self.destination_links, decision_id)
    }

    /// Order index of the structural link `source_id -> destination_id`.
    pub fn get_order_index(&self, source_id: ShapeId, destination_id: ShapeId) -> Option<i32> {
        let link_index = self.index.get_link_index(source_id, destination_id)?;
        self.links.get(link_index).map(|link| link.order_index)
    }

    /// Where the branch of `decision_id` that starts at `first_shape_in_branch`
    /// re-converges, if both the structural link and its destination entry exist.
    pub fn get_branch_destination_id(
        &self,
        decision_id: ShapeId,
        first_shape_in_branch: ShapeId,
    ) -> Option<ShapeId> {
        let order_index = self.get_order_index(decision_id, first_shape_in_branch)?;
        self.destination_links
            .iter()
            .find(|link| link.source_id == decision_id && link.order_index == order_index)
            .map(|link| link.destination_id)
    }
}

/// Entries of `destination_links` matching `predicate`, in list order.
pub fn decision_branch_destination_links<P>(
    destination_links: &[Link],
    predicate: P,
) -> Vec<&Link>
where
    P: Fn(&Link) -> bool,
{
    destination_links
        .iter()
        .filter(|link| predicate(*link))
        .collect()
}

pub fn connected_decision_ids(destination_links: &[Link], destination_id: ShapeId) -> Vec<ShapeId> {
    destination_links
        .iter()
        .filter(|link| link.destination_id == destination_id)
        .map(|link| link.source_id)
        .collect()
}

pub fn branch_destination_ids(destination_links: &[Link], decision_id: ShapeId) -> Vec<ShapeId> {
    destination_links
        .iter()
        .filter(|link| link.source_id == decision_id)
        .map(|link| link.destination_id)
        .collect()
}

/// Points the branch (`decision_id`, `order_index`) at a new destination.
///
/// Returns `false` and leaves the list untouched when no entry matches.
pub fn update_decision_destination_id(
    destination_links: &mut [Link],
    decision_id: ShapeId,
    order_index: i32,
    new_destination_id: ShapeId,
) -> bool {
    match destination_links
        .iter_mut()
        .find(|link| link.source_id == decision_id && link.order_index == order_index)
    {
        Some(link) => {
            link.destination_id = new_destination_id;
            true
        }
        None => false,
    }
}
