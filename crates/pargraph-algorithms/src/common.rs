//! Shared graph representation for the algorithm engines
//!
//! Provides a read-only, dense, integer-indexed view of a directed graph in
//! Compressed Sparse Row (CSR) format, with both the outgoing and the incoming
//! adjacency tables materialized.

use crate::error::{AlgoError, AlgoResult};
use std::ops::Range;

/// Vertex identifier: a dense index in `0..vertex_count`.
pub type NodeId = usize;

/// Immutable CSR view of a directed graph.
///
/// For every vertex `v`, its outgoing edges are
/// `out_targets[out_offsets[v]..out_offsets[v + 1]]` and its incoming edges are
/// `in_sources[in_offsets[v]..in_offsets[v + 1]]`. Both offset tables have
/// `vertex_count + 1` entries, start at 0 and end at the edge count.
///
/// The view is shared read-only between worker threads; every accessor is a
/// pure read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphView {
    /// Number of vertices
    node_count: usize,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    out_offsets: Vec<usize>,
    /// Contiguous array of target vertex indices
    out_targets: Vec<NodeId>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    in_offsets: Vec<usize>,
    /// Contiguous array of source vertex indices
    in_sources: Vec<NodeId>,
}

impl GraphView {
    /// A graph with no vertices and no edges.
    pub fn empty() -> Self {
        GraphView {
            node_count: 0,
            out_offsets: vec![0],
            out_targets: Vec::new(),
            in_offsets: vec![0],
            in_sources: Vec::new(),
        }
    }

    /// Builds a view from an unordered list of directed `(source, target)` edges.
    ///
    /// Uses a two-pass counting sort per table, so edges keep their relative
    /// input order within each vertex's range. Parallel edges and self loops
    /// are preserved.
    pub fn from_edges(node_count: usize, edges: &[(NodeId, NodeId)]) -> AlgoResult<Self> {
        for &(src, dst) in edges {
            if src >= node_count || dst >= node_count {
                return Err(AlgoError::EdgeOutOfRange {
                    source_vertex: src,
                    target_vertex: dst,
                    vertex_count: node_count,
                });
            }
        }

        let (out_offsets, out_targets) = bucket_edges(node_count, edges.iter().copied());
        let (in_offsets, in_sources) =
            bucket_edges(node_count, edges.iter().map(|&(src, dst)| (dst, src)));

        Ok(GraphView {
            node_count,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
        })
    }

    /// Builds a view from per-vertex successor lists.
    pub fn from_adjacency_list(outgoing: Vec<Vec<NodeId>>) -> AlgoResult<Self> {
        let node_count = outgoing.len();
        let edges: Vec<(NodeId, NodeId)> = outgoing
            .iter()
            .enumerate()
            .flat_map(|(src, targets)| targets.iter().map(move |&dst| (src, dst)))
            .collect();
        Self::from_edges(node_count, &edges)
    }

    /// Builds a view from an outgoing CSR table, deriving the incoming table.
    pub fn from_out_csr(out_offsets: Vec<usize>, out_targets: Vec<NodeId>) -> AlgoResult<Self> {
        let node_count = out_offsets.len().checked_sub(1).ok_or_else(|| {
            AlgoError::MalformedGraph("offset table must have at least one entry".to_string())
        })?;
        validate_table("outgoing", node_count, &out_offsets, &out_targets)?;

        let reversed = (0..node_count).flat_map(|src| {
            out_targets[out_offsets[src]..out_offsets[src + 1]]
                .iter()
                .map(move |&dst| (dst, src))
        });
        let (in_offsets, in_sources) = bucket_edges(node_count, reversed);

        Ok(GraphView {
            node_count,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
        })
    }

    /// Builds a view from both CSR tables, checking every structural invariant.
    pub fn from_csr(
        out_offsets: Vec<usize>,
        out_targets: Vec<NodeId>,
        in_offsets: Vec<usize>,
        in_sources: Vec<NodeId>,
    ) -> AlgoResult<Self> {
        let view = GraphView {
            node_count: out_offsets.len().saturating_sub(1),
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
        };
        view.validate()?;
        Ok(view)
    }

    /// Checks the CSR invariants of both tables.
    ///
    /// Views deserialized from untrusted bytes must pass this before use.
    pub fn validate(&self) -> AlgoResult<()> {
        if self.out_offsets.is_empty() {
            return Err(AlgoError::MalformedGraph(
                "offset table must have at least one entry".to_string(),
            ));
        }
        validate_table("outgoing", self.node_count, &self.out_offsets, &self.out_targets)?;
        validate_table("incoming", self.node_count, &self.in_offsets, &self.in_sources)?;
        if self.out_targets.len() != self.in_sources.len() {
            return Err(AlgoError::MalformedGraph(format!(
                "outgoing table has {} edges but incoming table has {}",
                self.out_targets.len(),
                self.in_sources.len()
            )));
        }
        Ok(())
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.node_count
    }

    /// Number of directed edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Flat-array index range of the outgoing edges of `idx`
    #[inline]
    pub fn out_range(&self, idx: NodeId) -> Range<usize> {
        debug_assert!(idx < self.node_count, "vertex {idx} out of range");
        self.out_offsets[idx]..self.out_offsets[idx + 1]
    }

    /// Flat-array index range of the incoming edges of `idx`
    #[inline]
    pub fn in_range(&self, idx: NodeId) -> Range<usize> {
        debug_assert!(idx < self.node_count, "vertex {idx} out of range");
        self.in_offsets[idx]..self.in_offsets[idx + 1]
    }

    /// Get the out-degree of a vertex
    #[inline]
    pub fn out_degree(&self, idx: NodeId) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a vertex
    #[inline]
    pub fn in_degree(&self, idx: NodeId) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a vertex
    #[inline]
    pub fn successors(&self, idx: NodeId) -> &[NodeId] {
        &self.out_targets[self.out_range(idx)]
    }

    /// Get incoming neighbors (predecessors) of a vertex
    #[inline]
    pub fn predecessors(&self, idx: NodeId) -> &[NodeId] {
        &self.in_sources[self.in_range(idx)]
    }

    /// Raw outgoing table: `(offsets, targets)`
    pub fn out_csr(&self) -> (&[usize], &[NodeId]) {
        (&self.out_offsets, &self.out_targets)
    }

    /// Raw incoming table: `(offsets, sources)`
    pub fn in_csr(&self) -> (&[usize], &[NodeId]) {
        (&self.in_offsets, &self.in_sources)
    }

    /// Vertices with no outgoing edges
    pub fn dangling_count(&self) -> usize {
        (0..self.node_count).filter(|&v| self.out_degree(v) == 0).count()
    }

    /// Approximate heap usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        (self.out_offsets.len() + self.in_offsets.len()) * size_of::<usize>()
            + (self.out_targets.len() + self.in_sources.len()) * size_of::<NodeId>()
    }
}

impl Default for GraphView {
    fn default() -> Self {
        Self::empty()
    }
}

/// Counting sort of `(bucket, value)` pairs into a CSR table.
fn bucket_edges<I>(node_count: usize, pairs: I) -> (Vec<usize>, Vec<NodeId>)
where
    I: Iterator<Item = (NodeId, NodeId)> + Clone,
{
    // Pass 1: degree histogram
    let mut counts = vec![0usize; node_count];
    for (bucket, _) in pairs.clone() {
        counts[bucket] += 1;
    }

    let mut offsets = Vec::with_capacity(node_count + 1);
    let mut running = 0;
    offsets.push(0);
    for count in counts {
        running += count;
        offsets.push(running);
    }

    // Pass 2: scatter through per-bucket write cursors
    let mut values = vec![0; running];
    let mut cursors = offsets[..node_count].to_vec();
    for (bucket, value) in pairs {
        values[cursors[bucket]] = value;
        cursors[bucket] += 1;
    }

    (offsets, values)
}

fn validate_table(
    name: &str,
    node_count: usize,
    offsets: &[usize],
    endpoints: &[NodeId],
) -> AlgoResult<()> {
    if offsets.len().checked_sub(1) != Some(node_count) {
        return Err(AlgoError::MalformedGraph(format!(
            "{name} offsets have {} entries for {node_count} vertices",
            offsets.len()
        )));
    }
    if offsets[0] != 0 {
        return Err(AlgoError::MalformedGraph(format!(
            "{name} offsets must start at 0, found {}",
            offsets[0]
        )));
    }
    if let Some(v) = offsets.windows(2).position(|w| w[0] > w[1]) {
        return Err(AlgoError::MalformedGraph(format!(
            "{name} offsets decrease at vertex {v}"
        )));
    }
    if offsets[node_count] != endpoints.len() {
        return Err(AlgoError::MalformedGraph(format!(
            "{name} offsets end at {} but there are {} edges",
            offsets[node_count],
            endpoints.len()
        )));
    }
    if let Some(&bad) = endpoints.iter().find(|&&v| v >= node_count) {
        return Err(AlgoError::MalformedGraph(format!(
            "{name} endpoint {bad} out of range for {node_count} vertices"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> GraphView {
        // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
        GraphView::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap()
    }

    #[test]
    fn test_from_edges_builds_both_tables() {
        let view = diamond();
        assert_eq!(view.vertex_count(), 4);
        assert_eq!(view.edge_count(), 4);
        assert_eq!(view.successors(0), &[1, 2]);
        assert_eq!(view.successors(3), &[] as &[NodeId]);
        assert_eq!(view.predecessors(3), &[1, 2]);
        assert_eq!(view.predecessors(0), &[] as &[NodeId]);
        assert_eq!(view.out_range(1), 2..3);
        assert_eq!(view.in_range(3), 2..4);
        assert!(view.validate().is_ok());
    }

    #[test]
    fn test_last_range_ends_at_edge_count() {
        let view = diamond();
        let (offsets, targets) = view.out_csr();
        assert_eq!(offsets.len(), 5);
        assert_eq!(*offsets.last().unwrap(), targets.len());
    }

    #[test]
    fn test_degrees_and_dangling() {
        let view = diamond();
        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.in_degree(3), 2);
        assert_eq!(view.dangling_count(), 1);
    }

    #[test]
    fn test_parallel_edges_and_self_loops_kept() {
        let view = GraphView::from_edges(2, &[(0, 1), (0, 1), (1, 1)]).unwrap();
        assert_eq!(view.successors(0), &[1, 1]);
        assert_eq!(view.predecessors(1), &[0, 0, 1]);
    }

    #[test]
    fn test_edge_out_of_range() {
        let err = GraphView::from_edges(2, &[(0, 5)]).unwrap_err();
        assert_eq!(
            err,
            AlgoError::EdgeOutOfRange {
                source_vertex: 0,
                target_vertex: 5,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn test_from_out_csr_derives_incoming() {
        let view = GraphView::from_out_csr(vec![0, 2, 3, 4, 4], vec![1, 2, 3, 3]).unwrap();
        assert_eq!(view, diamond());
    }

    #[test]
    fn test_from_csr_rejects_bad_offsets() {
        let err = GraphView::from_csr(vec![0, 2, 1], vec![1, 0], vec![0, 1, 2], vec![1, 0]);
        assert!(matches!(err, Err(AlgoError::MalformedGraph(_))));

        let err = GraphView::from_csr(vec![0, 1, 3], vec![1, 0], vec![0, 1, 2], vec![1, 0]);
        assert!(matches!(err, Err(AlgoError::MalformedGraph(_))));
    }

    #[test]
    fn test_from_csr_accepts_own_tables() {
        let view = diamond();
        let (out_offsets, out_targets) = view.out_csr();
        let (in_offsets, in_sources) = view.in_csr();
        assert_eq!(in_offsets, &[0, 0, 1, 2, 4]);
        assert_eq!(in_sources, &[0, 0, 1, 2]);

        let rebuilt = GraphView::from_csr(
            out_offsets.to_vec(),
            out_targets.to_vec(),
            in_offsets.to_vec(),
            in_sources.to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, view);
    }

    #[test]
    fn test_validate_rejects_impossible_vertex_count() {
        let mut view = diamond();
        view.node_count = usize::MAX;
        assert!(matches!(view.validate(), Err(AlgoError::MalformedGraph(_))));
    }

    #[test]
    fn test_from_adjacency_list() {
        let view = GraphView::from_adjacency_list(vec![vec![1, 2], vec![3], vec![3], vec![]]).unwrap();
        assert_eq!(view, diamond());
    }

    #[test]
    fn test_empty_graph() {
        let view = GraphView::empty();
        assert_eq!(view.vertex_count(), 0);
        assert_eq!(view.edge_count(), 0);
        assert!(view.validate().is_ok());
        assert_eq!(GraphView::from_edges(0, &[]).unwrap(), view);
    }
}
