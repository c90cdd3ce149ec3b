//! Error types for loading graphs, reading configuration and running engines

use pargraph_algorithms::AlgoError;
use thiserror::Error;

/// Errors that can occur outside the algorithm engines
#[derive(Error, Debug)]
pub enum PargraphError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line in a text graph file
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Structurally invalid file contents
    #[error("format error: {0}")]
    Format(String),

    /// Binary snapshot encoding/decoding error
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Run configuration could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Rejected graph or algorithm parameters
    #[error("algorithm error: {0}")]
    Algo(#[from] AlgoError),

    /// Worker pool could not be created
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Parallel result disagrees with the sequential reference
    #[error("verification failed: {0}")]
    Verification(String),
}

pub type PargraphResult<T> = Result<T, PargraphError>;
