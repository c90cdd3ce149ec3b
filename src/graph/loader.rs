//! Text graph formats

use crate::error::{PargraphError, PargraphResult};
use pargraph_algorithms::{GraphView, NodeId};
use std::io::{BufRead, Read, Write};

/// First token of an adjacency-graph file
pub const ADJACENCY_GRAPH_HEADER: &str = "AdjacencyGraph";

/// Parse an edge list: one `src dst` pair per line.
///
/// Blank lines and lines starting with `#` or `%` are skipped, columns after
/// the second are ignored. The vertex count is one past the largest id seen.
pub fn read_edge_list<R: BufRead>(reader: R) -> PargraphResult<GraphView> {
    let mut edges = Vec::new();
    let mut node_count = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let src = parse_vertex(fields.next(), line_no)?;
        let dst = parse_vertex(fields.next(), line_no)?;
        let highest = src.max(dst).checked_add(1).ok_or_else(|| PargraphError::Parse {
            line: line_no,
            message: format!("vertex id {} is too large", src.max(dst)),
        })?;
        node_count = node_count.max(highest);
        edges.push((src, dst));
    }

    Ok(GraphView::from_edges(node_count, &edges)?)
}

fn parse_vertex(field: Option<&str>, line: usize) -> PargraphResult<NodeId> {
    let field = field.ok_or_else(|| PargraphError::Parse {
        line,
        message: "expected two vertex ids".to_string(),
    })?;
    field.parse().map_err(|_| PargraphError::Parse {
        line,
        message: format!("invalid vertex id '{field}'"),
    })
}

/// Parse the text CSR format: the `AdjacencyGraph` token, the vertex count,
/// the edge count, one out-offset per vertex and one target per edge, all
/// whitespace separated. The incoming table is derived.
pub fn read_adjacency_graph<R: BufRead>(mut reader: R) -> PargraphResult<GraphView> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    let mut tokens = contents.split_whitespace();

    match tokens.next() {
        Some(ADJACENCY_GRAPH_HEADER) => {}
        other => {
            return Err(PargraphError::Format(format!(
                "expected '{ADJACENCY_GRAPH_HEADER}' header, found {other:?}"
            )))
        }
    }

    let node_count = next_number(&mut tokens, "vertex count")?;
    let edge_count = next_number(&mut tokens, "edge count")?;
    if node_count.checked_add(edge_count).is_none() {
        return Err(PargraphError::Format(format!(
            "vertex count {node_count} and edge count {edge_count} are too large"
        )));
    }

    // Every announced entry needs at least one byte of input
    let budget = contents.len();
    let mut offsets = Vec::with_capacity(node_count.min(budget) + 1);
    for _ in 0..node_count {
        offsets.push(next_number(&mut tokens, "offset")?);
    }
    offsets.push(edge_count);

    let mut targets = Vec::with_capacity(edge_count.min(budget));
    for _ in 0..edge_count {
        targets.push(next_number(&mut tokens, "edge target")?);
    }

    if tokens.next().is_some() {
        return Err(PargraphError::Format(
            "trailing data after the last edge".to_string(),
        ));
    }

    Ok(GraphView::from_out_csr(offsets, targets)?)
}

fn next_number<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> PargraphResult<usize> {
    let token = tokens
        .next()
        .ok_or_else(|| PargraphError::Format(format!("unexpected end of file reading {what}")))?;
    token
        .parse()
        .map_err(|_| PargraphError::Format(format!("invalid {what} '{token}'")))
}

/// Write one `src dst` line per edge, preceded by a comment with the counts.
pub fn write_edge_list<W: Write>(view: &GraphView, writer: &mut W) -> PargraphResult<()> {
    writeln!(writer, "# vertices: {} edges: {}", view.vertex_count(), view.edge_count())?;
    for src in 0..view.vertex_count() {
        for &dst in view.successors(src) {
            writeln!(writer, "{src} {dst}")?;
        }
    }
    Ok(())
}

/// Write the outgoing table in the adjacency-graph text format.
pub fn write_adjacency_graph<W: Write>(view: &GraphView, writer: &mut W) -> PargraphResult<()> {
    let (offsets, targets) = view.out_csr();
    writeln!(writer, "{ADJACENCY_GRAPH_HEADER}")?;
    writeln!(writer, "{}", view.vertex_count())?;
    writeln!(writer, "{}", view.edge_count())?;
    for offset in &offsets[..view.vertex_count()] {
        writeln!(writer, "{offset}")?;
    }
    for target in targets {
        writeln!(writer, "{target}")?;
    }
    Ok(())
}
