use super::ProcessGraph;
use super::flows::Flow;
use crate::process::{Shape, ShapeId};
use itertools::Itertools;

/// Formats shapes and flows into human-readable strings
pub struct FlowFormatter;

impl FlowFormatter {
    /// Formats a shape as `name [Role] #id`.
    pub fn format_shape(graph: &ProcessGraph, shape: &Shape) -> String {
        let role = graph
            .get_shape_type(shape)
            .map_or("?".to_string(), |role| role.to_string());
        format!("{} [{}] #{}", shape.name, role, shape.id)
    }

    /// One line per flow, e.g. `flow #1 (parent #0, branch 1): 4 -> 5 | merges at 7`.
    pub fn format_flow(flow: &Flow) -> String {
        let mut line = format!("flow {}", flow.id);
        if let Some(parent) = flow.parent {
            let branch = flow
                .order_index
                .map_or("?".to_string(), |order| order.to_string());
            line.push_str(&format!(" (parent {}, branch {})", parent, branch));
        }
        line.push_str(": ");
        if flow.is_empty() {
            line.push_str("<empty>");
        } else {
            line.push_str(&flow.shape_ids.iter().join(" -> "));
        }
        if let Some(merge_id) = flow.terminated_at {
            line.push_str(&format!(" | merges at {}", merge_id));
        }
        line
    }

    /// Formats every flow of the graph, one per line. Empty when flows can't be built.
    pub fn format_flows(graph: &ProcessGraph) -> String {
        graph
            .flows()
            .unwrap_or_default()
            .iter()
            .map(Self::format_flow)
            .join("\n")
    }

    /// Renders the flows as a tree following parent links, naming each shape.
    pub fn format_flow_tree(graph: &ProcessGraph) -> String {
        let flows = graph.flows().unwrap_or_default();
        let mut output = String::new();
        for root in flows.iter().filter(|flow| flow.is_root()) {
            Self::format_tree_recursive(graph, &flows, root, "", true, &mut output);
        }
        output
    }

    fn format_tree_recursive(
        graph: &ProcessGraph,
        flows: &[Flow],
        flow: &Flow,
        prefix: &str,
        is_last: bool,
        output: &mut String,
    ) {
        let node_marker = if is_last { "└── " } else { "├── " };
        let names = flow
            .shape_ids
            .iter()
            .map(|id| Self::shape_label(graph, *id))
            .join(" -> ");
        output.push_str(&format!("{}{}{}: {}\n", prefix, node_marker, flow.id, names));

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        let children: Vec<&Flow> = flows
            .iter()
            .filter(|child| child.parent == Some(flow.id))
            .collect();
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            Self::format_tree_recursive(graph, flows, child, &child_prefix, last, output);
        }
    }

    fn shape_label(graph: &ProcessGraph, id: ShapeId) -> String {
        graph
            .get_shape_by_id(id)
            .map_or_else(|| format!("#{}", id), |shape| Self::format_shape(graph, shape))
    }
}
