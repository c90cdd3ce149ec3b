//! Error types for graph construction and algorithm entry points

use thiserror::Error;

/// Errors reported before an algorithm starts any work.
///
/// The engines themselves have no failure paths: once the inputs pass these
/// checks, every run terminates with a result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgoError {
    /// Caller-supplied output buffer does not match the vertex count
    #[error("output buffer has length {actual}, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// BFS root is not a vertex of the graph
    #[error("root vertex {root} out of range for graph with {vertex_count} vertices")]
    RootOutOfRange { root: usize, vertex_count: usize },

    /// A configuration value is outside its valid range
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// An edge refers to a vertex id that does not exist
    #[error("edge ({source_vertex}, {target_vertex}) out of range for graph with {vertex_count} vertices")]
    EdgeOutOfRange {
        source_vertex: usize,
        target_vertex: usize,
        vertex_count: usize,
    },

    /// CSR tables violate the offset/endpoint invariants
    #[error("malformed graph: {0}")]
    MalformedGraph(String),
}

pub type AlgoResult<T> = Result<T, AlgoError>;

/// Checks that a caller-supplied buffer covers every vertex.
pub(crate) fn check_buffer_len(expected: usize, actual: usize) -> AlgoResult<()> {
    if expected != actual {
        return Err(AlgoError::BufferLength { expected, actual });
    }
    Ok(())
}
