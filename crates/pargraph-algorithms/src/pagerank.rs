//! PageRank algorithm implementation
//!
//! Push-based power iteration: every vertex scatters its score along its
//! outgoing edges into an atomically accumulated buffer, damping and uniform
//! teleport are applied, and the mass held by dangling vertices is spread
//! evenly over the whole graph so the scores keep summing to one.

use crate::common::GraphView;
use crate::error::{check_buffer_len, AlgoError, AlgoResult};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Vertices per rayon task in the per-vertex passes
const MIN_LEN: usize = 512;

/// PageRank configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PageRankConfig {
    /// Damping factor, strictly between 0 and 1 (usually 0.85)
    pub damping_factor: f64,
    /// Iteration stops once the L1 change between two iterations is below this
    pub tolerance: f64,
    /// Optional safety cap. `None` iterates until convergence.
    pub max_iterations: Option<usize>,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            tolerance: 1e-7,
            max_iterations: None,
        }
    }
}

impl PageRankConfig {
    fn validate(&self) -> AlgoResult<()> {
        let d = self.damping_factor;
        if !(d > 0.0 && d < 1.0) {
            return Err(AlgoError::InvalidParameter {
                name: "damping_factor",
                reason: format!("{d} is not strictly between 0 and 1"),
            });
        }
        let t = self.tolerance;
        if !(t > 0.0 && t.is_finite()) {
            return Err(AlgoError::InvalidParameter {
                name: "tolerance",
                reason: format!("{t} is not a positive finite value"),
            });
        }
        if self.max_iterations == Some(0) {
            return Err(AlgoError::InvalidParameter {
                name: "max_iterations",
                reason: "must allow at least one iteration".to_string(),
            });
        }
        Ok(())
    }
}

/// Summary of a PageRank run. Scores live in the caller's buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankReport {
    pub iterations: usize,
    /// L1 change of the last iteration
    pub delta: f64,
    /// False only when `max_iterations` stopped the loop first
    pub converged: bool,
    /// Vertices with no outgoing edges
    pub dangling: usize,
}

/// Calculate PageRank, writing one score per vertex into `scores`.
///
/// Runs on the current rayon pool. `scores` must have one slot per vertex;
/// its previous contents are overwritten with the uniform start vector.
pub fn page_rank(
    view: &GraphView,
    config: &PageRankConfig,
    scores: &mut [f64],
) -> AlgoResult<PageRankReport> {
    let n = view.vertex_count();
    check_buffer_len(n, scores.len())?;
    config.validate()?;

    if n == 0 {
        return Ok(PageRankReport {
            iterations: 0,
            delta: 0.0,
            converged: true,
            dangling: 0,
        });
    }

    let d = config.damping_factor;
    let n_f = n as f64;
    let base_score = (1.0 - d) / n_f;

    scores.par_iter_mut().for_each(|s| *s = 1.0 / n_f);
    let accumulated: Vec<AtomicF64> = (0..n).map(|_| AtomicF64::new(0.0)).collect();

    let dangling: Vec<usize> = (0..n)
        .into_par_iter()
        .filter(|&v| view.out_degree(v) == 0)
        .collect();
    debug!(vertices = n, dangling = dangling.len(), "pagerank start");

    let mut iterations = 0;
    loop {
        iterations += 1;

        // Scatter each vertex's share along its outgoing edges
        let old: &[f64] = &*scores;
        old.par_iter()
            .enumerate()
            .with_min_len(MIN_LEN)
            .for_each(|(v, &score)| {
                let targets = view.successors(v);
                if targets.is_empty() {
                    return;
                }
                let share = score / targets.len() as f64;
                for &t in targets {
                    accumulated[t].fetch_add(share, Ordering::Relaxed);
                }
            });

        // Mass parked on dangling vertices teleports uniformly
        let correction: f64 = dangling.par_iter().map(|&v| old[v] * d / n_f).sum();

        // Damping, teleport and correction; the accumulator is drained for the
        // next iteration in the same pass
        let delta: f64 = scores
            .par_iter_mut()
            .zip(accumulated.par_iter())
            .with_min_len(MIN_LEN)
            .map(|(score, acc)| {
                let next = d * acc.take(Ordering::Relaxed) + base_score + correction;
                let diff = (next - *score).abs();
                *score = next;
                diff
            })
            .sum();

        debug!(iteration = iterations, delta, correction, "pagerank iteration");

        if delta < config.tolerance {
            return Ok(PageRankReport {
                iterations,
                delta,
                converged: true,
                dangling: dangling.len(),
            });
        }
        if config.max_iterations.is_some_and(|max| iterations >= max) {
            warn!(
                iterations,
                delta,
                tolerance = config.tolerance,
                "pagerank stopped at iteration cap before converging"
            );
            return Ok(PageRankReport {
                iterations,
                delta,
                converged: false,
                dangling: dangling.len(),
            });
        }
    }
}

/// `f64` with an atomic add, stored as raw bits in an `AtomicU64`.
#[repr(transparent)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn new(value: f64) -> Self {
        AtomicF64(AtomicU64::new(value.to_bits()))
    }

    #[inline]
    fn fetch_add(&self, value: f64, order: Ordering) -> f64 {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + value).to_bits();
            match self.0.compare_exchange_weak(current, next, order, Ordering::Relaxed) {
                Ok(prev) => return f64::from_bits(prev),
                Err(actual) => current = actual,
            }
        }
    }

    /// Returns the value and resets it to zero.
    #[inline]
    fn take(&self, order: Ordering) -> f64 {
        f64::from_bits(self.0.swap(0.0f64.to_bits(), order))
    }
}
