use pargraph::algo::{sequential_bfs, BfsStrategy, UNVISITED};
use pargraph::graph::{star, uniform_random};
use pargraph::{load_graph, save_graph, GraphView, PargraphError, RunConfig, Runner};
use std::io::Write;

fn sample_graph() -> GraphView {
    // Two components: a diamond with a tail, and an isolated cycle
    GraphView::from_edges(
        8,
        &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (5, 6), (6, 7), (7, 5)],
    )
    .unwrap()
}

#[test]
fn test_save_and_load_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let view = uniform_random(500, 4000, 11).unwrap();

    for name in ["graph.txt", "graph.graph", "graph.bin"] {
        let path = dir.path().join(name);
        save_graph(&view, &path).unwrap();
        assert_eq!(load_graph(&path).unwrap(), view, "format of {name}");
    }
}

#[test]
fn test_load_hand_written_edge_list() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# source target").unwrap();
    writeln!(file, "0 1").unwrap();
    writeln!(file, "1 2").unwrap();
    writeln!(file, "2 0").unwrap();
    writeln!(file, "2 3").unwrap();
    file.flush().unwrap();

    let view = load_graph(file.path()).unwrap();
    assert_eq!(view.vertex_count(), 4);
    assert_eq!(view.edge_count(), 4);
    assert_eq!(view.dangling_count(), 1);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_graph(dir.path().join("missing.txt")),
        Err(PargraphError::Io(_))
    ));
}

#[test]
fn test_runner_strategies_agree() {
    let view = sample_graph();
    let mut config = RunConfig::default();
    config.threads = Some(4);
    config.bfs.strategies = BfsStrategy::ALL.to_vec();
    config.bfs.verify = true;
    let runner = Runner::new(config).unwrap();

    let runs = runner.run_all_bfs(&view).unwrap();
    assert_eq!(runs.len(), 3);
    for run in &runs {
        assert_eq!(run.distances, vec![0, 1, 1, 2, 3, UNVISITED, UNVISITED, UNVISITED]);
        assert_eq!(run.report.visited, 5);
        assert_eq!(run.report.max_distance(), Some(3));
    }
}

#[test]
fn test_runner_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "threads: 2\nbfs:\n  root: 5\n  strategies: [bottom-up]\n  verify: true\npagerank:\n  tolerance: 1.0e-10\n"
    )
    .unwrap();
    file.flush().unwrap();

    let config = RunConfig::from_yaml_file(file.path()).unwrap();
    let runner = Runner::new(config).unwrap();
    assert_eq!(runner.threads(), 2);

    let runs = runner.run_all_bfs(&sample_graph()).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].report.strategy, BfsStrategy::BottomUp);
    assert_eq!(runs[0].distances[5..], [0, 1, 2]);
    assert_eq!(runs[0].distances[0], UNVISITED);
}

#[test]
fn test_thread_counts_agree() {
    let view = uniform_random(20_000, 160_000, 3).unwrap();
    let expected = sequential_bfs(&view, 0);
    let mut reference_scores: Option<Vec<f64>> = None;

    for threads in [1, 2, 8] {
        let mut config = RunConfig::default();
        config.threads = Some(threads);
        config.pagerank.tolerance = 1e-10;
        let runner = Runner::new(config).unwrap();

        let run = runner.run_bfs(&view, BfsStrategy::Hybrid).unwrap();
        assert_eq!(run.distances, expected, "{threads} threads");

        let scores = runner.run_pagerank(&view).unwrap().scores;
        match &reference_scores {
            None => reference_scores = Some(scores),
            Some(reference) => {
                let l1: f64 = reference.iter().zip(&scores).map(|(a, b)| (a - b).abs()).sum();
                assert!(l1 < 1e-8, "{threads} threads differ by {l1}");
            }
        }
    }
}

#[test]
fn test_pagerank_star_center_wins() {
    let runner = Runner::new(RunConfig::default()).unwrap();
    let run = runner.run_pagerank(&star(50).unwrap()).unwrap();

    assert!(run.report.converged);
    assert_eq!(run.top(1)[0].0, 0);
    let leaf = run.scores[1];
    assert!(run.scores[1..].iter().all(|s| (s - leaf).abs() < 1e-9));
    assert!((run.scores.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn test_invalid_pagerank_config() {
    let mut config = RunConfig::default();
    config.pagerank.damping_factor = 1.5;
    let runner = Runner::new(config).unwrap();
    assert!(matches!(
        runner.run_pagerank(&sample_graph()),
        Err(PargraphError::Algo(_))
    ));
}
