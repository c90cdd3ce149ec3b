//! Graph construction, file formats and synthetic generators
//!
//! Every loader produces a validated [`GraphView`]. Supported formats:
//!
//! - edge list: one `src dst` pair per line (`#`/`%` comments allowed)
//! - adjacency graph: text CSR starting with the `AdjacencyGraph` token
//! - snapshot: bincode-encoded [`GraphView`] behind a magic header

pub mod generate;
pub mod loader;
pub mod snapshot;

pub use generate::{chain, grid, star, uniform_random};
pub use loader::{read_adjacency_graph, read_edge_list, write_adjacency_graph, write_edge_list};
pub use pargraph_algorithms::{GraphView, NodeId};
pub use snapshot::{read_snapshot, write_snapshot};

use crate::error::PargraphResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// On-disk graph encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    EdgeList,
    AdjacencyGraph,
    Snapshot,
}

impl GraphFormat {
    /// Picks the format from a file extension: `.bin` is a snapshot,
    /// `.graph` an adjacency graph, anything else an edge list.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("bin") => GraphFormat::Snapshot,
            Some("graph") => GraphFormat::AdjacencyGraph,
            _ => GraphFormat::EdgeList,
        }
    }
}

/// Load a graph, choosing the format from the file extension.
pub fn load_graph(path: impl AsRef<Path>) -> PargraphResult<GraphView> {
    let path = path.as_ref();
    let format = GraphFormat::from_path(path);
    let reader = BufReader::new(File::open(path)?);

    let view = match format {
        GraphFormat::EdgeList => read_edge_list(reader)?,
        GraphFormat::AdjacencyGraph => read_adjacency_graph(reader)?,
        GraphFormat::Snapshot => read_snapshot(reader)?,
    };

    info!(
        path = %path.display(),
        ?format,
        vertices = view.vertex_count(),
        edges = view.edge_count(),
        "graph loaded"
    );
    Ok(view)
}

/// Save a graph, choosing the format from the file extension.
pub fn save_graph(view: &GraphView, path: impl AsRef<Path>) -> PargraphResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    match GraphFormat::from_path(path) {
        GraphFormat::EdgeList => write_edge_list(view, &mut writer)?,
        GraphFormat::AdjacencyGraph => write_adjacency_graph(view, &mut writer)?,
        GraphFormat::Snapshot => write_snapshot(view, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Shape statistics of a loaded graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub vertices: usize,
    pub edges: usize,
    /// Vertices with no outgoing edges
    pub dangling: usize,
    pub max_out_degree: usize,
    pub max_in_degree: usize,
    /// Approximate heap usage of both CSR tables
    pub memory_bytes: usize,
}

impl GraphSummary {
    pub fn of(view: &GraphView) -> Self {
        let n = view.vertex_count();
        GraphSummary {
            vertices: n,
            edges: view.edge_count(),
            dangling: view.dangling_count(),
            max_out_degree: (0..n).map(|v| view.out_degree(v)).max().unwrap_or(0),
            max_in_degree: (0..n).map(|v| view.in_degree(v)).max().unwrap_or(0),
            memory_bytes: view.memory_usage(),
        }
    }
}
