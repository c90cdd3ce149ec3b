//! pargraph
//!
//! Shared-memory parallel graph analytics over static, read-only directed
//! graphs:
//!
//! - single-source BFS distance labeling with top-down, bottom-up and hybrid
//!   (direction-switching) strategies
//! - PageRank with dangling-mass correction
//!
//! The engines live in the `pargraph-algorithms` crate. This crate provides
//! the pieces around them: graph loading, saving and generation ([`graph`]),
//! run configuration ([`config`]) and timed, pool-sized execution
//! ([`runner`]).
//!
//! # Example
//!
//! ```rust
//! use pargraph::{GraphView, RunConfig, Runner};
//! use pargraph::algo::BfsStrategy;
//!
//! let view = GraphView::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
//! let runner = Runner::new(RunConfig::default()).unwrap();
//!
//! let run = runner.run_bfs(&view, BfsStrategy::Hybrid).unwrap();
//! assert_eq!(run.distances, vec![0, 1, 1, 2]);
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod runner;

/// Re-export of the algorithm engines
pub use pargraph_algorithms as algo;

pub use config::{BfsSettings, RunConfig};
pub use error::{PargraphError, PargraphResult};
pub use graph::{load_graph, save_graph, GraphSummary};
pub use pargraph_algorithms::GraphView;
pub use runner::{BfsRun, PageRankRun, Runner};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Install a stderr `tracing` subscriber.
///
/// `verbosity` 0 logs warnings, 1 info, 2 debug (per-step BFS and
/// per-iteration PageRank events), 3 and above trace. Does nothing if a
/// global subscriber is already installed.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
