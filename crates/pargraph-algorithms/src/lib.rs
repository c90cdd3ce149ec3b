//! Shared-memory parallel graph analytics over a static CSR graph.
//!
//! - [`breadth_first_search`]: single-source hop distances with top-down,
//!   bottom-up and hybrid (direction-switching) strategies
//! - [`page_rank`]: power-iteration PageRank with dangling-mass correction
//!
//! Both engines run on the rayon pool they are called from and write into
//! caller-owned buffers.

pub mod bfs;
pub mod common;
pub mod error;
pub mod frontier;
pub mod pagerank;

pub use bfs::{
    bfs_bottom_up, bfs_hybrid, bfs_top_down, breadth_first_search, sequential_bfs, BfsConfig,
    BfsReport, BfsStep, BfsStrategy, StepMode, DEFAULT_SWITCH_THRESHOLD, UNVISITED,
};
pub use common::{GraphView, NodeId};
pub use error::{AlgoError, AlgoResult};
pub use frontier::Frontier;
pub use pagerank::{page_rank, PageRankConfig, PageRankReport};
