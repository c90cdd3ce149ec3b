//! Parallel breadth-first search
//!
//! Level-synchronous BFS labeling every vertex with its hop distance from a
//! root. Three interchangeable strategies produce identical distances:
//!
//! - **Top-down** expands the current frontier along outgoing edges. A vertex
//!   is claimed with a compare-and-swap on its distance, and only the winner
//!   appends it to the next frontier.
//! - **Bottom-up** scans every unvisited vertex and looks for a predecessor on
//!   the current frontier. Each vertex is written by exactly one worker per
//!   step, so plain loads and stores suffice.
//! - **Hybrid** runs top-down until the frontier grows to a large fraction of
//!   the graph, then switches to bottom-up for the rest of the run.

use crate::common::{GraphView, NodeId};
use crate::error::{check_buffer_len, AlgoError, AlgoResult};
use crate::frontier::Frontier;
use rayon::prelude::*;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::debug;

/// Distance of a vertex not reached from the root
pub const UNVISITED: i32 = -1;

/// Default `vertex_count / frontier_len` ratio at which hybrid BFS turns bottom-up
pub const DEFAULT_SWITCH_THRESHOLD: usize = 10;

/// Frontier vertices per rayon task in a top-down step
const TOP_DOWN_MIN_LEN: usize = 512;
/// Graph vertices per rayon task in a bottom-up step
const BOTTOM_UP_MIN_LEN: usize = 1024;

/// Which traversal strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum BfsStrategy {
    TopDown,
    BottomUp,
    Hybrid,
}

impl BfsStrategy {
    pub const ALL: [BfsStrategy; 3] = [BfsStrategy::TopDown, BfsStrategy::BottomUp, BfsStrategy::Hybrid];

    pub fn name(self) -> &'static str {
        match self {
            BfsStrategy::TopDown => "top-down",
            BfsStrategy::BottomUp => "bottom-up",
            BfsStrategy::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for BfsStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BfsStrategy {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-down" | "topdown" | "top_down" => Ok(BfsStrategy::TopDown),
            "bottom-up" | "bottomup" | "bottom_up" => Ok(BfsStrategy::BottomUp),
            "hybrid" => Ok(BfsStrategy::Hybrid),
            other => Err(AlgoError::InvalidParameter {
                name: "strategy",
                reason: format!("unknown BFS strategy '{other}'"),
            }),
        }
    }
}

/// BFS configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BfsConfig {
    /// Vertex labeled with distance 0
    pub root: NodeId,
    /// Hybrid BFS switches to bottom-up once
    /// `vertex_count / frontier_len <= switch_threshold`. Zero never switches.
    pub switch_threshold: usize,
}

impl Default for BfsConfig {
    fn default() -> Self {
        Self {
            root: 0,
            switch_threshold: DEFAULT_SWITCH_THRESHOLD,
        }
    }
}

/// Direction a single step was executed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum StepMode {
    TopDown,
    BottomUp,
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepMode::TopDown => f.write_str("top-down"),
            StepMode::BottomUp => f.write_str("bottom-up"),
        }
    }
}

/// One level of the traversal
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BfsStep {
    /// Distance of the frontier being expanded
    pub distance: i32,
    pub mode: StepMode,
    /// Vertices at `distance`
    pub frontier: usize,
    /// Vertices labeled `distance + 1` by this step
    pub discovered: usize,
}

/// Summary of a BFS run. Distances themselves live in the caller's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BfsReport {
    pub strategy: BfsStrategy,
    pub root: NodeId,
    pub steps: Vec<BfsStep>,
    /// Index into `steps` of the first bottom-up step of a hybrid run
    pub switched_at: Option<usize>,
    /// Vertices with a distance, root included
    pub visited: usize,
}

impl BfsReport {
    fn new(strategy: BfsStrategy, root: NodeId) -> Self {
        Self {
            strategy,
            root,
            steps: Vec::new(),
            switched_at: None,
            visited: 0,
        }
    }

    /// Largest distance assigned, `None` for an empty graph
    pub fn max_distance(&self) -> Option<i32> {
        if self.visited == 0 {
            return None;
        }
        Some(
            self.steps
                .iter()
                .filter(|step| step.discovered > 0)
                .map(|step| step.distance + 1)
                .max()
                .unwrap_or(0),
        )
    }

    fn record(&mut self, distance: i32, mode: StepMode, frontier: usize, discovered: usize) {
        debug!(
            step = self.steps.len(),
            distance,
            mode = %mode,
            frontier,
            discovered,
            "bfs step"
        );
        self.visited += discovered;
        self.steps.push(BfsStep {
            distance,
            mode,
            frontier,
            discovered,
        });
    }
}

/// Top-down BFS from `root`.
pub fn bfs_top_down(view: &GraphView, root: NodeId, distances: &mut [i32]) -> AlgoResult<BfsReport> {
    let config = BfsConfig {
        root,
        ..BfsConfig::default()
    };
    breadth_first_search(view, BfsStrategy::TopDown, &config, distances)
}

/// Bottom-up BFS from `root`.
pub fn bfs_bottom_up(view: &GraphView, root: NodeId, distances: &mut [i32]) -> AlgoResult<BfsReport> {
    let config = BfsConfig {
        root,
        ..BfsConfig::default()
    };
    breadth_first_search(view, BfsStrategy::BottomUp, &config, distances)
}

/// Hybrid BFS with the direction switch governed by `config.switch_threshold`.
pub fn bfs_hybrid(view: &GraphView, config: &BfsConfig, distances: &mut [i32]) -> AlgoResult<BfsReport> {
    breadth_first_search(view, BfsStrategy::Hybrid, config, distances)
}

/// Labels `distances[v]` with the hop distance from `config.root` to `v`, or
/// [`UNVISITED`] when `v` is unreachable.
///
/// Runs on the current rayon pool. `distances` must have one slot per vertex;
/// its previous contents are overwritten.
pub fn breadth_first_search(
    view: &GraphView,
    strategy: BfsStrategy,
    config: &BfsConfig,
    distances: &mut [i32],
) -> AlgoResult<BfsReport> {
    let n = view.vertex_count();
    check_buffer_len(n, distances.len())?;

    let mut report = BfsReport::new(strategy, config.root);
    if n == 0 {
        return Ok(report);
    }
    if config.root >= n {
        return Err(AlgoError::RootOutOfRange {
            root: config.root,
            vertex_count: n,
        });
    }

    let labels: Vec<AtomicI32> = (0..n)
        .into_par_iter()
        .map(|_| AtomicI32::new(UNVISITED))
        .collect();
    labels[config.root].store(0, Ordering::Relaxed);
    report.visited = 1;

    match strategy {
        BfsStrategy::TopDown => {
            run_top_down(view, &labels, config.root, None, &mut report);
        }
        BfsStrategy::BottomUp => run_bottom_up(view, &labels, 0, 1, &mut report),
        BfsStrategy::Hybrid => {
            let threshold = Some(config.switch_threshold).filter(|&t| t > 0);
            if let Some((distance, frontier)) =
                run_top_down(view, &labels, config.root, threshold, &mut report)
            {
                report.switched_at = Some(report.steps.len());
                debug!(distance, frontier, "switching to bottom-up");
                run_bottom_up(view, &labels, distance, frontier, &mut report);
            }
        }
    }

    distances
        .par_iter_mut()
        .zip(labels.into_par_iter())
        .for_each(|(d, label)| *d = label.into_inner());

    Ok(report)
}

/// Runs top-down steps until the frontier empties. With a switch threshold,
/// stops early and returns the current distance and frontier size once the
/// frontier is large relative to the graph.
fn run_top_down(
    view: &GraphView,
    labels: &[AtomicI32],
    root: NodeId,
    switch_threshold: Option<usize>,
    report: &mut BfsReport,
) -> Option<(i32, usize)> {
    let n = view.vertex_count();
    let mut frontier = Frontier::singleton(n, root);
    let mut next = Frontier::new(n);
    let mut distance = 0;

    while !frontier.is_empty() {
        if let Some(threshold) = switch_threshold {
            if n / frontier.len() <= threshold {
                return Some((distance, frontier.len()));
            }
        }

        next.clear();
        top_down_step(view, &frontier, &next, labels);
        report.record(distance, StepMode::TopDown, frontier.len(), next.len());

        std::mem::swap(&mut frontier, &mut next);
        distance += 1;
    }
    None
}

/// Runs bottom-up steps from the layer at `distance` until a scan labels nothing.
fn run_bottom_up(
    view: &GraphView,
    labels: &[AtomicI32],
    mut distance: i32,
    mut frontier: usize,
    report: &mut BfsReport,
) {
    loop {
        let discovered = bottom_up_step(view, distance, labels);
        report.record(distance, StepMode::BottomUp, frontier, discovered);
        if discovered == 0 {
            break;
        }
        frontier = discovered;
        distance += 1;
    }
}

/// Expands every frontier vertex along its outgoing edges into `next`.
fn top_down_step(view: &GraphView, frontier: &Frontier, next: &Frontier, labels: &[AtomicI32]) {
    frontier
        .par_iter()
        .with_min_len(TOP_DOWN_MIN_LEN)
        .for_each(|node| {
            let next_distance = labels[node].load(Ordering::Relaxed) + 1;
            for &neighbor in view.successors(node) {
                let slot = &labels[neighbor];
                // Cheap read first; the CAS decides the single owner.
                if slot.load(Ordering::Relaxed) == UNVISITED
                    && slot
                        .compare_exchange(UNVISITED, next_distance, Ordering::Relaxed, Ordering::Relaxed)
                        .is_ok()
                {
                    next.push(neighbor);
                }
            }
        });
}

/// Labels every unvisited vertex that has a predecessor at `frontier_distance`.
/// Returns how many vertices were labeled.
fn bottom_up_step(view: &GraphView, frontier_distance: i32, labels: &[AtomicI32]) -> usize {
    labels
        .par_iter()
        .enumerate()
        .with_min_len(BOTTOM_UP_MIN_LEN)
        .map(|(node, slot)| {
            if slot.load(Ordering::Relaxed) != UNVISITED {
                return 0;
            }
            let on_frontier = view
                .predecessors(node)
                .iter()
                .any(|&pred| labels[pred].load(Ordering::Relaxed) == frontier_distance);
            if on_frontier {
                slot.store(frontier_distance + 1, Ordering::Relaxed);
                1
            } else {
                0
            }
        })
        .sum()
}

/// Single-threaded queue-based BFS, used to check the parallel strategies.
///
/// # Panics
///
/// Panics if the graph is non-empty and `root` is out of range.
pub fn sequential_bfs(view: &GraphView, root: NodeId) -> Vec<i32> {
    let n = view.vertex_count();
    let mut distances = vec![UNVISITED; n];
    if n == 0 {
        return distances;
    }

    let mut queue = VecDeque::new();
    distances[root] = 0;
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        let next_distance = distances[current] + 1;
        for &next in view.successors(current) {
            if distances[next] == UNVISITED {
                distances[next] = next_distance;
                queue.push_back(next);
            }
        }
    }

    distances
}
