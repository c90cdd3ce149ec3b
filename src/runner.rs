//! Timed execution of the engines on a dedicated worker pool

use crate::config::RunConfig;
use crate::error::{PargraphError, PargraphResult};
use pargraph_algorithms::{
    breadth_first_search, page_rank, sequential_bfs, BfsReport, BfsStrategy, GraphView, NodeId,
    PageRankReport, UNVISITED,
};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// Result of one BFS execution
#[derive(Debug, Clone)]
pub struct BfsRun {
    pub distances: Vec<i32>,
    pub report: BfsReport,
    pub elapsed: Duration,
}

impl BfsRun {
    pub fn summary(&self) -> BfsSummary {
        BfsSummary {
            strategy: self.report.strategy,
            root: self.report.root,
            visited: self.report.visited,
            max_distance: self.report.max_distance(),
            steps: self.report.steps.len(),
            switched_at: self.report.switched_at,
            millis: millis(self.elapsed),
        }
    }
}

/// Flat, serializable view of a [`BfsRun`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfsSummary {
    pub strategy: BfsStrategy,
    pub root: NodeId,
    pub visited: usize,
    pub max_distance: Option<i32>,
    pub steps: usize,
    pub switched_at: Option<usize>,
    pub millis: f64,
}

/// Result of one PageRank execution
#[derive(Debug, Clone)]
pub struct PageRankRun {
    pub scores: Vec<f64>,
    pub report: PageRankReport,
    pub elapsed: Duration,
}

impl PageRankRun {
    /// The `k` highest-ranked vertices, best first. Ties go to the lower id.
    pub fn top(&self, k: usize) -> Vec<(NodeId, f64)> {
        let mut ranked: Vec<(NodeId, f64)> = self.scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    pub fn summary(&self) -> PageRankSummary {
        PageRankSummary {
            iterations: self.report.iterations,
            delta: self.report.delta,
            converged: self.report.converged,
            dangling: self.report.dangling,
            score_sum: self.scores.iter().sum(),
            millis: millis(self.elapsed),
        }
    }
}

/// Flat, serializable view of a [`PageRankRun`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankSummary {
    pub iterations: usize,
    pub delta: f64,
    pub converged: bool,
    pub dangling: usize,
    pub score_sum: f64,
    pub millis: f64,
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Owns a rayon pool sized by [`RunConfig::threads`] and runs the engines
/// inside it.
pub struct Runner {
    config: RunConfig,
    pool: ThreadPool,
}

impl Runner {
    pub fn new(config: RunConfig) -> PargraphResult<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("pargraph-worker-{i}"));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        info!(threads = pool.current_num_threads(), "worker pool ready");

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Worker threads in the pool
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run one BFS strategy from the configured root.
    ///
    /// With `bfs.verify` set, the distances are checked against
    /// [`sequential_bfs`] and a mismatch is returned as
    /// [`PargraphError::Verification`].
    pub fn run_bfs(&self, view: &GraphView, strategy: BfsStrategy) -> PargraphResult<BfsRun> {
        let config = self.config.bfs.to_config();
        let mut distances = vec![UNVISITED; view.vertex_count()];

        let start = Instant::now();
        let report = self
            .pool
            .install(|| breadth_first_search(view, strategy, &config, &mut distances))?;
        let elapsed = start.elapsed();

        info!(
            %strategy,
            root = config.root,
            visited = report.visited,
            steps = report.steps.len(),
            switched_at = ?report.switched_at,
            millis = millis(elapsed),
            "bfs finished"
        );

        if self.config.bfs.verify {
            verify_distances(view, config.root, &distances)?;
        }

        Ok(BfsRun {
            distances,
            report,
            elapsed,
        })
    }

    /// Run every strategy listed in `bfs.strategies`, in order.
    pub fn run_all_bfs(&self, view: &GraphView) -> PargraphResult<Vec<BfsRun>> {
        self.config
            .bfs
            .strategies
            .iter()
            .map(|&strategy| self.run_bfs(view, strategy))
            .collect()
    }

    pub fn run_pagerank(&self, view: &GraphView) -> PargraphResult<PageRankRun> {
        let mut scores = vec![0.0; view.vertex_count()];

        let start = Instant::now();
        let report = self
            .pool
            .install(|| page_rank(view, &self.config.pagerank, &mut scores))?;
        let elapsed = start.elapsed();

        info!(
            iterations = report.iterations,
            delta = report.delta,
            converged = report.converged,
            millis = millis(elapsed),
            "pagerank finished"
        );

        Ok(PageRankRun {
            scores,
            report,
            elapsed,
        })
    }
}

/// Compare `distances` with a sequential BFS from `root`.
pub fn verify_distances(view: &GraphView, root: NodeId, distances: &[i32]) -> PargraphResult<()> {
    let n = view.vertex_count();
    if distances.len() != n {
        return Err(PargraphError::Verification(format!(
            "expected {n} distances, got {}",
            distances.len()
        )));
    }
    if n > 0 && root >= n {
        return Err(PargraphError::Verification(format!(
            "root {root} outside a graph of {n} vertices"
        )));
    }

    let expected = sequential_bfs(view, root);
    let mismatches = expected
        .iter()
        .zip(distances)
        .filter(|(want, got)| want != got)
        .count();

    match expected.iter().zip(distances).position(|(want, got)| want != got) {
        None => Ok(()),
        Some(v) => Err(PargraphError::Verification(format!(
            "{mismatches} vertices differ from the sequential reference, first at vertex {v}: expected {}, got {}",
            expected[v], distances[v]
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{chain, grid};

    fn runner(threads: usize) -> Runner {
        let mut config = RunConfig::default();
        config.threads = Some(threads);
        config.bfs.verify = true;
        Runner::new(config).unwrap()
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(runner(3).threads(), 3);
    }

    #[test]
    fn test_bfs_on_grid() {
        let view = grid(20, 30).unwrap();
        let runner = runner(4);
        for strategy in BfsStrategy::ALL {
            let run = runner.run_bfs(&view, strategy).unwrap();
            assert_eq!(run.report.visited, 600);
            assert_eq!(run.distances[599], 19 + 29);
            assert_eq!(run.summary().max_distance, Some(48));
        }
    }

    #[test]
    fn test_run_all_bfs_uses_configured_order() {
        let mut config = RunConfig::default();
        config.bfs.strategies = vec![BfsStrategy::BottomUp, BfsStrategy::TopDown];
        let runner = Runner::new(config).unwrap();

        let runs = runner.run_all_bfs(&chain(10).unwrap()).unwrap();
        let order: Vec<_> = runs.iter().map(|run| run.report.strategy).collect();
        assert_eq!(order, vec![BfsStrategy::BottomUp, BfsStrategy::TopDown]);
        assert_eq!(runs[0].distances, runs[1].distances);
    }

    #[test]
    fn test_root_out_of_range() {
        let mut config = RunConfig::default();
        config.bfs.root = 10;
        let runner = Runner::new(config).unwrap();
        assert!(matches!(
            runner.run_bfs(&chain(10).unwrap(), BfsStrategy::Hybrid),
            Err(PargraphError::Algo(_))
        ));
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let view = chain(4).unwrap();
        assert!(verify_distances(&view, 0, &[0, 1, 2, 3]).is_ok());
        match verify_distances(&view, 0, &[0, 1, 5, 3]) {
            Err(PargraphError::Verification(message)) => assert!(message.contains("vertex 2")),
            other => panic!("expected verification error, got {other:?}"),
        }
        assert!(verify_distances(&view, 0, &[0, 1]).is_err());
    }

    #[test]
    fn test_pagerank_top() {
        let view = GraphView::from_edges(4, &[(1, 0), (2, 0), (3, 0), (0, 1)]).unwrap();
        let run = runner(2).run_pagerank(&view).unwrap();
        assert!(run.report.converged);

        let top = run.top(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 0);
        assert_eq!(top[1].0, 1);
        assert!((run.summary().score_sum - 1.0).abs() < 1e-9);
        assert_eq!(run.top(10).len(), 4);
    }
}
