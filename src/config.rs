//! Run configuration
//!
//! A [`RunConfig`] can be built in code or read from YAML. Every field has a
//! default, so a config file only needs the keys it changes:
//!
//! ```yaml
//! threads: 8
//! bfs:
//!   root: 0
//!   switch_threshold: 10
//!   strategies: [top-down, hybrid]
//!   verify: true
//! pagerank:
//!   damping_factor: 0.85
//!   tolerance: 1.0e-7
//! ```

use crate::error::PargraphResult;
use pargraph_algorithms::{BfsConfig, BfsStrategy, NodeId, PageRankConfig, DEFAULT_SWITCH_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// BFS section of a [`RunConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BfsSettings {
    pub root: NodeId,
    pub switch_threshold: usize,
    /// Strategies run by [`crate::Runner::run_all_bfs`], in order
    pub strategies: Vec<BfsStrategy>,
    /// Compare every result against a sequential reference BFS
    pub verify: bool,
}

impl Default for BfsSettings {
    fn default() -> Self {
        Self {
            root: 0,
            switch_threshold: DEFAULT_SWITCH_THRESHOLD,
            strategies: vec![BfsStrategy::Hybrid],
            verify: false,
        }
    }
}

impl BfsSettings {
    pub fn to_config(&self) -> BfsConfig {
        BfsConfig {
            root: self.root,
            switch_threshold: self.switch_threshold,
        }
    }
}

/// Everything a [`crate::Runner`] needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Worker threads, `None` for rayon's default (one per logical CPU)
    pub threads: Option<usize>,
    pub bfs: BfsSettings,
    pub pagerank: PageRankConfig,
}

impl RunConfig {
    pub fn from_yaml_str(yaml: &str) -> PargraphResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> PargraphResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn to_yaml_string(&self) -> PargraphResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PargraphError;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.threads, None);
        assert_eq!(config.bfs.strategies, vec![BfsStrategy::Hybrid]);
        assert_eq!(config.bfs.to_config(), BfsConfig::default());
        assert_eq!(config.pagerank, PageRankConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "
threads: 4
bfs:
  root: 7
  strategies: [top-down, bottom-up]
pagerank:
  max_iterations: 50
";
        let config = RunConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.bfs.root, 7);
        assert_eq!(config.bfs.switch_threshold, DEFAULT_SWITCH_THRESHOLD);
        assert_eq!(
            config.bfs.strategies,
            vec![BfsStrategy::TopDown, BfsStrategy::BottomUp]
        );
        assert!(!config.bfs.verify);
        assert_eq!(config.pagerank.max_iterations, Some(50));
        assert_eq!(config.pagerank.damping_factor, 0.85);
    }

    #[test]
    fn test_yaml_reload() {
        let mut config = RunConfig::default();
        config.threads = Some(2);
        config.bfs.verify = true;
        config.pagerank.tolerance = 1e-9;

        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(RunConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_unknown_strategy() {
        let yaml = "bfs:\n  strategies: [sideways]\n";
        assert!(matches!(
            RunConfig::from_yaml_str(yaml),
            Err(PargraphError::Config(_))
        ));
    }
}
