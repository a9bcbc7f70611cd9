use clap::Parser;
use procflow::prelude::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Inspect the flows and structure of a process document
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the process document JSON file
    document_path: String,

    /// Split every decision edge into its own flow, not just the secondary ones
    #[arg(long)]
    all_branches: bool,

    /// Check whether two shapes belong to the same flow
    #[arg(long, num_args = 2, value_names = ["ID", "OTHER_ID"])]
    same_flow: Option<Vec<ShapeId>>,

    /// Find the first shape after ID that is not a system task or system decision
    #[arg(long, value_name = "ID")]
    first_non_system: Option<ShapeId>,

    /// Print flows as a tree with shape names
    #[arg(long)]
    tree: bool,

    /// Log index and flow rebuilds
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let total_start = Instant::now();

    // --- 1. Loading ---
    let document = ProcessDocument::from_file(&cli.document_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load process document '{}': {}",
            cli.document_path, e
        ))
    });
    println!(
        "Loaded process #{} '{}' ({} shapes, {} links)",
        document.id,
        document.name,
        document.shapes.len(),
        document.links.len()
    );

    // --- 2. Building the graph ---
    let splitting = if cli.all_branches {
        BranchSplitting::AllBranches
    } else {
        BranchSplitting::SecondaryBranches
    };
    let build_start = Instant::now();
    let graph = ProcessGraph::builder(document)
        .with_branch_splitting(splitting)
        .try_build()
        .unwrap_or_else(|e| exit_with_error(&format!("Process graph is invalid: {}", e)));
    let build_duration = build_start.elapsed();

    // --- 3. Structure ---
    println!("\n--- Distinguished Shapes ---");
    println!("Start:        {}", describe(&graph, graph.get_start_shape_id()));
    println!(
        "Precondition: {}",
        describe(&graph, graph.get_precondition_shape_id())
    );
    println!("End:          {}", describe(&graph, graph.get_end_shape_id()));

    let flows = graph.flows().unwrap_or_default();
    println!("\n--- Flows ({}) ---", flows.len());
    if cli.tree {
        print!("{}", FlowFormatter::format_flow_tree(&graph));
    } else {
        println!("{}", FlowFormatter::format_flows(&graph));
    }

    // --- 4. Queries ---
    if let Some(ids) = &cli.same_flow {
        let (id, other_id) = (ids[0], ids[1]);
        let answer = match graph.is_in_same_flow(id, other_id) {
            Some(true) => "yes",
            Some(false) => "no",
            None => "unknown (shape not in any flow)",
        };
        println!("\nSame flow {} / {}: {}", id, other_id, answer);
    }
    if let Some(id) = cli.first_non_system {
        println!(
            "\nFirst non-system shape after {}: {}",
            id,
            describe(&graph, graph.get_first_non_system_shape_id(id))
        );
    }

    println!("\n--- Performance Summary ---");
    println!("Graph Build:          {:?}", build_duration);
    println!("Total Execution:      {:?}", total_start.elapsed());
}

fn describe(graph: &ProcessGraph, id: Option<ShapeId>) -> String {
    match id.and_then(|id| graph.get_shape_by_id(id)) {
        Some(shape) => FlowFormatter::format_shape(graph, shape),
        None => "-".to_string(),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "procflow=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
