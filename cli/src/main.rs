//! pargraph CLI: inspect graphs, run BFS and PageRank, generate test graphs
//!
//! Settings are layered: built-in defaults, then the `--config` YAML file,
//! then command-line flags.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table};
use pargraph::algo::{BfsStrategy, GraphView};
use pargraph::graph::{chain, grid, star, uniform_random};
use pargraph::{load_graph, save_graph, GraphSummary, RunConfig, Runner};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "pargraph", version, about = "Parallel BFS and PageRank over static graphs")]
struct Cli {
    /// Worker threads (defaults to one per logical CPU)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// YAML run configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    TopDown,
    BottomUp,
    Hybrid,
    All,
}

impl StrategyArg {
    fn strategies(self) -> Vec<BfsStrategy> {
        match self {
            StrategyArg::TopDown => vec![BfsStrategy::TopDown],
            StrategyArg::BottomUp => vec![BfsStrategy::BottomUp],
            StrategyArg::Hybrid => vec![BfsStrategy::Hybrid],
            StrategyArg::All => BfsStrategy::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GraphKind {
    /// `--edges` edges with uniformly random endpoints
    Uniform,
    /// Bidirectional lattice, `--cols` wide
    Grid,
    /// Directed path
    Chain,
    /// Vertex 0 linked both ways to every other vertex
    Star,
}

#[derive(Subcommand)]
enum Commands {
    /// Print graph statistics
    Info {
        /// Graph file (.bin snapshot, .graph adjacency graph, anything else edge list)
        graph: PathBuf,
    },
    /// Run breadth-first search
    Bfs {
        graph: PathBuf,

        /// Source vertex
        #[arg(long)]
        root: Option<usize>,

        /// Strategy to run
        #[arg(long)]
        strategy: Option<StrategyArg>,

        /// Hybrid switches to bottom-up once vertices / frontier <= this (0 never switches)
        #[arg(long)]
        switch_threshold: Option<usize>,

        /// Check every result against a sequential BFS
        #[arg(long)]
        verify: bool,
    },
    /// Run PageRank
    Pagerank {
        graph: PathBuf,

        #[arg(long)]
        damping: Option<f64>,

        /// Stop once the L1 change of an iteration falls below this
        #[arg(long)]
        tolerance: Option<f64>,

        #[arg(long)]
        max_iterations: Option<usize>,

        /// Number of top-ranked vertices to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Write a synthetic graph
    Generate {
        kind: GraphKind,

        #[arg(long, default_value_t = 1000)]
        nodes: usize,

        /// Edge count for `uniform` (defaults to 8 per vertex)
        #[arg(long)]
        edges: Option<usize>,

        /// Row width for `grid` (defaults to the square root of `--nodes`)
        #[arg(long)]
        cols: Option<usize>,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output file, format chosen by extension
        #[arg(long, short)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    pargraph::init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_yaml_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if cli.threads.is_some() {
        config.threads = cli.threads;
    }

    match cli.command {
        Commands::Info { graph } => run_info(&graph, &cli.format),
        Commands::Bfs {
            graph,
            root,
            strategy,
            switch_threshold,
            verify,
        } => {
            if let Some(root) = root {
                config.bfs.root = root;
            }
            if let Some(strategy) = strategy {
                config.bfs.strategies = strategy.strategies();
            }
            if let Some(threshold) = switch_threshold {
                config.bfs.switch_threshold = threshold;
            }
            config.bfs.verify |= verify;
            run_bfs(&graph, config, &cli.format)
        }
        Commands::Pagerank {
            graph,
            damping,
            tolerance,
            max_iterations,
            top,
        } => {
            if let Some(damping) = damping {
                config.pagerank.damping_factor = damping;
            }
            if let Some(tolerance) = tolerance {
                config.pagerank.tolerance = tolerance;
            }
            if max_iterations.is_some() {
                config.pagerank.max_iterations = max_iterations;
            }
            run_pagerank(&graph, config, top, &cli.format)
        }
        Commands::Generate {
            kind,
            nodes,
            edges,
            cols,
            seed,
            output,
        } => run_generate(kind, nodes, edges, cols, seed, &output),
    }
}

fn load(path: &Path) -> Result<GraphView> {
    load_graph(path).with_context(|| format!("loading graph {}", path.display()))
}

fn run_info(path: &Path, format: &OutputFormat) -> Result<()> {
    let summary = GraphSummary::of(&load(path)?);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            println!("Vertices:       {}", summary.vertices);
            println!("Edges:          {}", summary.edges);
            println!("Dangling:       {}", summary.dangling);
            println!("Max out-degree: {}", summary.max_out_degree);
            println!("Max in-degree:  {}", summary.max_in_degree);
            println!("Memory:         {} bytes", summary.memory_bytes);
        }
    }

    Ok(())
}

fn run_bfs(path: &Path, config: RunConfig, format: &OutputFormat) -> Result<()> {
    let view = load(path)?;
    let runner = Runner::new(config)?;
    let runs = runner.run_all_bfs(&view)?;
    let summaries: Vec<_> = runs.iter().map(|run| run.summary()).collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["strategy", "root", "reached", "depth", "steps", "switch step", "time (ms)"]);

            for summary in &summaries {
                table.add_row(vec![
                    summary.strategy.to_string(),
                    summary.root.to_string(),
                    summary.visited.to_string(),
                    optional(summary.max_distance),
                    summary.steps.to_string(),
                    optional(summary.switched_at),
                    format!("{:.3}", summary.millis),
                ]);
            }

            println!("{}", table);
            println!("{} threads, {} vertices", runner.threads(), view.vertex_count());
            if runner.config().bfs.verify {
                println!("verified against sequential BFS");
            }
        }
    }

    Ok(())
}

fn run_pagerank(path: &Path, config: RunConfig, top: usize, format: &OutputFormat) -> Result<()> {
    let view = load(path)?;
    let runner = Runner::new(config)?;
    let run = runner.run_pagerank(&view)?;
    let summary = run.summary();
    let ranked = run.top(top);

    match format {
        OutputFormat::Json => {
            let top: Vec<_> = ranked
                .iter()
                .map(|&(vertex, score)| serde_json::json!({ "vertex": vertex, "score": score }))
                .collect();
            let output = serde_json::json!({ "summary": summary, "top": top });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!("Iterations: {}", summary.iterations);
            println!("Delta:      {:e}", summary.delta);
            println!("Converged:  {}", summary.converged);
            println!("Dangling:   {}", summary.dangling);
            println!("Score sum:  {:.9}", summary.score_sum);
            println!("Time:       {:.3} ms on {} threads", summary.millis, runner.threads());

            if !ranked.is_empty() {
                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["rank", "vertex", "score"]);
                for (rank, (vertex, score)) in ranked.iter().enumerate() {
                    table.add_row(vec![
                        (rank + 1).to_string(),
                        vertex.to_string(),
                        format!("{:.9}", score),
                    ]);
                }
                println!("{}", table);
            }
        }
    }

    Ok(())
}

fn run_generate(
    kind: GraphKind,
    nodes: usize,
    edges: Option<usize>,
    cols: Option<usize>,
    seed: u64,
    output: &Path,
) -> Result<()> {
    let view = match kind {
        GraphKind::Uniform => uniform_random(nodes, edges.unwrap_or(nodes * 8), seed)?,
        GraphKind::Grid => {
            let cols = cols.unwrap_or_else(|| (nodes as f64).sqrt().ceil() as usize);
            if cols == 0 {
                bail!("grid needs at least one column");
            }
            grid(nodes / cols, cols)?
        }
        GraphKind::Chain => chain(nodes)?,
        GraphKind::Star => star(nodes)?,
    };

    save_graph(&view, output).with_context(|| format!("writing {}", output.display()))?;
    info!(path = %output.display(), "graph written");
    println!(
        "wrote {} vertices, {} edges to {}",
        view.vertex_count(),
        view.edge_count(),
        output.display()
    );
    Ok(())
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
