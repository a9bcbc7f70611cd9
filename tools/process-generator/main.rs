use clap::Parser;
use procflow::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::json;
use std::fs;

/// A CLI tool to generate random, valid process documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_process.json")]
    output: String,

    /// The maximum number of decisions to place
    #[arg(long, default_value_t = 4)]
    decisions: usize,

    /// The maximum nesting depth of decisions
    #[arg(long, default_value_t = 2)]
    depth: usize,

    /// The maximum number of branches per decision
    #[arg(long, default_value_t = 3)]
    max_branches: usize,
}

struct Generator {
    rng: ThreadRng,
    next_id: ShapeId,
    decisions_left: usize,
    max_branches: usize,
    shapes: Vec<Shape>,
    links: Vec<Link>,
    destination_links: Vec<Link>,
}

impl Generator {
    fn add_shape(&mut self, role: ShapeRole) -> ShapeId {
        let id = self.next_id;
        self.next_id += 1;
        let mut property_values = PropertyValues::default();
        property_values.insert(
            "clientType".to_string(),
            PropertyValue::new("clientType", json!(role.code())),
        );
        self.shapes.push(Shape {
            id,
            name: format!("{} {}", role, id),
            parent_id: 1,
            type_prefix: "PROS".to_string(),
            base_item_type_predefined: 0,
            property_values,
        });
        id
    }

    fn link(&mut self, source_id: ShapeId, destination_id: ShapeId, order_index: i32) {
        self.links
            .push(Link::new(source_id, destination_id, order_index));
    }

    /// Generates a chain of tasks and decision blocks, returning its first and last shape.
    fn sequence(&mut self, depth: usize) -> (ShapeId, ShapeId) {
        let length = self.rng.random_range(1..=3);
        let mut first = None;
        let mut last: Option<ShapeId> = None;
        for _ in 0..length {
            let (head, tail) = if depth > 0 && self.decisions_left > 0 && self.rng.random_bool(0.5)
            {
                self.decision_block(depth)
            } else {
                let role = if self.rng.random_bool(0.6) {
                    ShapeRole::UserTask
                } else {
                    ShapeRole::SystemTask
                };
                let id = self.add_shape(role);
                (id, id)
            };
            if let Some(previous) = last {
                self.link(previous, head, 0);
            }
            first.get_or_insert(head);
            last = Some(tail);
        }
        (first.unwrap_or_default(), last.unwrap_or_default())
    }

    /// A decision whose branches all re-converge at a fresh merge shape.
    fn decision_block(&mut self, depth: usize) -> (ShapeId, ShapeId) {
        self.decisions_left -= 1;
        let role = if self.rng.random_bool(0.5) {
            ShapeRole::UserDecision
        } else {
            ShapeRole::SystemDecision
        };
        let decision = self.add_shape(role);
        let branches = self.rng.random_range(2..=self.max_branches.max(2));
        let bodies: Vec<Option<(ShapeId, ShapeId)>> = (0..branches)
            .map(|branch| {
                // At most one branch, never the primary one, goes straight to the merge.
                if branch == branches - 1 && self.rng.random_bool(0.25) {
                    None
                } else {
                    Some(self.sequence(depth - 1))
                }
            })
            .collect();
        let merge = self.add_shape(ShapeRole::UserTask);

        for (branch, body) in bodies.into_iter().enumerate() {
            let order_index = branch as i32;
            match body {
                Some((head, tail)) => {
                    self.link(decision, head, order_index);
                    self.link(tail, merge, 0);
                }
                None => self.link(decision, merge, order_index),
            }
            self.destination_links
                .push(Link::new(decision, merge, order_index));
        }
        (decision, merge)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.max_branches < 2 {
        eprintln!("Error: --max-branches must be at least 2");
        std::process::exit(1);
    }

    let mut generator = Generator {
        rng: rand::rng(),
        next_id: 2,
        decisions_left: cli.decisions,
        max_branches: cli.max_branches,
        shapes: Vec::new(),
        links: Vec::new(),
        destination_links: Vec::new(),
    };

    println!(
        "Generating process (up to {} decisions, depth {})...",
        cli.decisions, cli.depth
    );
    let start = generator.add_shape(ShapeRole::Start);
    let (head, tail) = generator.sequence(cli.depth);
    let end = generator.add_shape(ShapeRole::End);
    generator.link(start, head, 0);
    generator.link(tail, end, 0);

    let document = ProcessDocument {
        id: 1,
        name: "Generated process".to_string(),
        shapes: generator.shapes,
        links: generator.links,
        decision_branch_destination_links: Some(generator.destination_links),
        ..Default::default()
    };

    // Refuse to write anything the graph model would reject.
    let graph = ProcessGraph::builder(document).try_build()?;
    let flows = graph.flows().unwrap_or_default().len();
    let document = graph.into_document();

    fs::write(&cli.output, document.to_json_pretty()?)?;
    println!(
        "Successfully generated {} shapes in {} flows and saved to '{}'",
        document.shapes.len(),
        flows,
        cli.output
    );
    Ok(())
}
