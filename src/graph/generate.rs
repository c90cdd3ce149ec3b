//! Synthetic graph generators for benchmarks and smoke tests.
//!
//! All generators are deterministic: the same arguments always produce the
//! same edge order.

use crate::error::PargraphResult;
use pargraph_algorithms::{GraphView, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `m` directed edges with endpoints drawn uniformly from `0..n`
/// (Erdos-Renyi G(n, m) with repetition). Self loops and parallel edges may occur.
pub fn uniform_random(n: usize, m: usize, seed: u64) -> PargraphResult<GraphView> {
    if n == 0 {
        return Ok(GraphView::empty());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let edges: Vec<(NodeId, NodeId)> = (0..m)
        .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n)))
        .collect();
    Ok(GraphView::from_edges(n, &edges)?)
}

/// `rows x cols` lattice with edges in both directions between 4-neighbours.
/// Vertex `(r, c)` has id `r * cols + c`.
pub fn grid(rows: usize, cols: usize) -> PargraphResult<GraphView> {
    let mut edges = Vec::with_capacity(4 * rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let v = r * cols + c;
            if c + 1 < cols {
                edges.push((v, v + 1));
                edges.push((v + 1, v));
            }
            if r + 1 < rows {
                edges.push((v, v + cols));
                edges.push((v + cols, v));
            }
        }
    }
    Ok(GraphView::from_edges(rows * cols, &edges)?)
}

/// `0 -> 1 -> ... -> n-1`
pub fn chain(n: usize) -> PargraphResult<GraphView> {
    let edges: Vec<(NodeId, NodeId)> = (1..n).map(|v| (v - 1, v)).collect();
    Ok(GraphView::from_edges(n, &edges)?)
}

/// Center `0` linked both ways to leaves `1..n`.
pub fn star(n: usize) -> PargraphResult<GraphView> {
    let edges: Vec<(NodeId, NodeId)> = (1..n).flat_map(|leaf| [(0, leaf), (leaf, 0)]).collect();
    Ok(GraphView::from_edges(n, &edges)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_random_is_deterministic() {
        let a = uniform_random(100, 500, 42).unwrap();
        let b = uniform_random(100, 500, 42).unwrap();
        let c = uniform_random(100, 500, 43).unwrap();
        assert_eq!(a.edge_count(), 500);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(uniform_random(0, 10, 1).unwrap().vertex_count(), 0);
    }

    #[test]
    fn test_grid_shape() {
        let view = grid(3, 4).unwrap();
        assert_eq!(view.vertex_count(), 12);
        // 2 * (rows * (cols - 1) + (rows - 1) * cols)
        assert_eq!(view.edge_count(), 2 * (3 * 3 + 2 * 4));
        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.out_degree(5), 4);
    }

    #[test]
    fn test_chain_and_star() {
        let view = chain(5).unwrap();
        assert_eq!(view.edge_count(), 4);
        assert_eq!(view.successors(3), &[4]);
        assert_eq!(view.dangling_count(), 1);

        let view = star(6).unwrap();
        assert_eq!(view.out_degree(0), 5);
        assert_eq!(view.in_degree(0), 5);
        assert_eq!(view.successors(4), &[0]);

        assert_eq!(chain(0).unwrap().vertex_count(), 0);
        assert_eq!(star(1).unwrap().edge_count(), 0);
    }
}
