use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use roadnet_core::{EdgeList, EdgeRecord, Graph, GraphError, GraphSource, NodeId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::state::LoadedGraph;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("graph needs {used_mb}MB, exceeds max_memory_mb={max_mb}MB")]
    MemoryLimit { used_mb: usize, max_mb: u32 },
}

fn parse_error(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        line,
        message: message.into(),
    }
}

/// Read a road network file and build the graph.
///
/// Fails without handing out a partial graph if the file is missing,
/// any record is malformed, or the graph exceeds `max_memory_mb`.
pub fn load_graph(path: &Path, max_memory_mb: u32) -> Result<LoadedGraph, LoadError> {
    let start = Instant::now();

    let source = read_edge_list(path)?;
    let declared_edge_count = source.edge_count();
    if declared_edge_count != source.edges.len() {
        warn!(
            declared = declared_edge_count,
            found = source.edges.len(),
            "edge count header does not match the number of edge records"
        );
    }

    // Refuse oversized graphs before allocating them, then again on the
    // real footprint.
    check_memory(
        Graph::estimate_memory(source.node_count(), source.edges.len()),
        max_memory_mb,
    )?;
    let graph = Graph::from_source(source)?;
    check_memory(graph.memory_usage(), max_memory_mb)?;

    let load_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        load_time_ms,
        "graph loaded"
    );

    Ok(LoadedGraph {
        graph,
        source_path: path.to_path_buf(),
        declared_edge_count,
        load_time_ms,
    })
}

fn check_memory(bytes: usize, max_mb: u32) -> Result<(), LoadError> {
    let used_mb = bytes / (1024 * 1024);
    if used_mb > max_mb as usize {
        return Err(LoadError::MemoryLimit { used_mb, max_mb });
    }
    Ok(())
}

pub fn read_edge_list(path: &Path) -> Result<EdgeList, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_edge_list(&text)
}

// ---------------------------------------------------------------------------
// Text format
// ---------------------------------------------------------------------------

/// Parse the road network text format:
///
/// ```text
/// <node count>
/// <edge count>
/// <from> <to> <weight>
/// ...
/// ```
///
/// Fields are whitespace-separated and blank lines are ignored. Line
/// numbers in errors are 1-based and refer to the input text.
pub fn parse_edge_list(text: &str) -> Result<EdgeList, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (line, node_count) = match lines.next() {
        Some((line, raw)) => (line, parse_count(line, raw, "node count")?),
        None => return Err(parse_error(1, "missing node count")),
    };
    let edge_count = match lines.next() {
        Some((line, raw)) => parse_count(line, raw, "edge count")?,
        None => return Err(parse_error(line + 1, "missing edge count")),
    };

    let mut edges = Vec::with_capacity(edge_count.min(1 << 20));
    for (line, raw) in lines {
        edges.push(parse_edge(line, raw, node_count)?);
    }

    Ok(EdgeList {
        node_count,
        edge_count,
        edges,
    })
}

fn parse_count(line: usize, raw: &str, what: &str) -> Result<usize, LoadError> {
    raw.parse::<usize>()
        .map_err(|_| parse_error(line, format!("invalid {what} '{raw}'")))
}

fn parse_node(line: usize, raw: &str, node_count: usize) -> Result<NodeId, LoadError> {
    let node = raw
        .parse::<NodeId>()
        .map_err(|_| parse_error(line, format!("invalid node index '{raw}'")))?;
    if node >= node_count {
        return Err(parse_error(
            line,
            format!("node {node} is outside 0..{node_count}"),
        ));
    }
    Ok(node)
}

fn parse_edge(line: usize, raw: &str, node_count: usize) -> Result<EdgeRecord, LoadError> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    let [from, to, weight] = fields[..] else {
        return Err(parse_error(
            line,
            format!("expected '<from> <to> <weight>', got {} fields", fields.len()),
        ));
    };

    let weight = weight
        .parse::<f64>()
        .map_err(|_| parse_error(line, format!("invalid weight '{weight}'")))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(parse_error(
            line,
            format!("weight must be finite and non-negative, got {weight}"),
        ));
    }

    Ok(EdgeRecord {
        from: parse_node(line, from, node_count)?,
        to: parse_node(line, to, node_count)?,
        weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(text: &str) -> (usize, String) {
        match parse_edge_list(text) {
            Err(LoadError::Parse { line, message }) => (line, message),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_basic() {
        let list = parse_edge_list("3\n3\n0 1 1.0\n1 2 1\n0 2 5.5\n").unwrap();
        assert_eq!(list.node_count, 3);
        assert_eq!(list.edge_count, 3);
        assert_eq!(
            list.edges[2],
            EdgeRecord {
                from: 0,
                to: 2,
                weight: 5.5
            }
        );
    }

    #[test]
    fn test_parse_tolerates_blank_lines_and_spacing() {
        let list = parse_edge_list("\n2\n\n1\n  0\t1   10.0  \n\n").unwrap();
        assert_eq!(list.edges.len(), 1);
        assert_eq!(list.edges[0].weight, 10.0);
    }

    #[test]
    fn test_parse_no_edges() {
        let list = parse_edge_list("4\n0\n").unwrap();
        assert_eq!(list.node_count, 4);
        assert!(list.edges.is_empty());
    }

    #[test]
    fn test_declared_count_mismatch_is_not_an_error() {
        let list = parse_edge_list("2\n5\n0 1 1\n").unwrap();
        assert_eq!(list.edge_count, 5);
        assert_eq!(list.edges.len(), 1);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_err("").0, 1);
        assert!(parse_err("  \n").1.contains("node count"));
    }

    #[test]
    fn test_parse_missing_edge_count() {
        let (line, message) = parse_err("3\n");
        assert_eq!(line, 2);
        assert!(message.contains("edge count"));
    }

    #[test]
    fn test_parse_bad_counts() {
        assert!(parse_err("three\n0\n").1.contains("invalid node count"));
        assert!(parse_err("3\n-1\n").1.contains("invalid edge count"));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let (line, message) = parse_err("3\n1\n0 1\n");
        assert_eq!(line, 3);
        assert!(message.contains("2 fields"));
        assert!(parse_err("3\n1\n0 1 2 3\n").1.contains("4 fields"));
    }

    #[test]
    fn test_parse_bad_numbers() {
        assert!(parse_err("3\n1\n0 x 1.0\n").1.contains("invalid node index 'x'"));
        assert!(parse_err("3\n1\n0 1 fast\n").1.contains("invalid weight 'fast'"));
        assert!(parse_err("3\n1\n0 1 -2\n").1.contains("non-negative"));
        assert!(parse_err("3\n1\n0 1 inf\n").1.contains("non-negative"));
    }

    #[test]
    fn test_parse_node_out_of_range() {
        let (line, message) = parse_err("3\n2\n0 1 1\n1 3 1\n");
        assert_eq!(line, 4);
        assert!(message.contains("node 3 is outside 0..3"));
    }

    #[test]
    fn test_load_graph_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.txt");
        fs::write(&path, "3\n2\n0 1 2.5\n1 2 2.5\n").unwrap();

        let loaded = load_graph(&path, 64).unwrap();
        assert_eq!(loaded.graph.node_count(), 3);
        assert_eq!(loaded.graph.edge_count(), 2);
        assert_eq!(loaded.declared_edge_count, 2);
        assert_eq!(loaded.source_path, path);
    }

    #[test]
    fn test_load_graph_huge_declared_edge_count() {
        let dir = tempfile::tempdir().unwrap();
        for header in ["1000000000000000000", "18446744073709551615"] {
            let path = dir.path().join("net.txt");
            fs::write(&path, format!("2\n{header}\n0 1 1\n")).unwrap();

            let loaded = load_graph(&path, 64).unwrap();
            assert_eq!(loaded.graph.edge_count(), 1);
            assert_eq!(loaded.declared_edge_count.to_string(), header);
        }
    }

    #[test]
    fn test_load_graph_too_many_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.txt");
        fs::write(&path, "100000000000000\n0\n").unwrap();

        let err = load_graph(&path, 64).unwrap_err();
        assert!(matches!(err, LoadError::MemoryLimit { max_mb: 64, .. }));
    }

    #[test]
    fn test_load_graph_over_memory_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.txt");
        let edges = 140_000;
        let mut text = format!("2\n{edges}\n");
        for _ in 0..edges {
            text.push_str("0 1 1\n");
        }
        fs::write(&path, text).unwrap();

        let err = load_graph(&path, 1).unwrap_err();
        match err {
            LoadError::MemoryLimit { used_mb, max_mb } => {
                assert_eq!(max_mb, 1);
                assert!(used_mb >= 2);
            }
            other => panic!("expected memory limit error, got {other:?}"),
        }
        assert!(load_graph(&path, 64).is_ok());
    }

    #[test]
    fn test_load_graph_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_graph(&dir.path().join("nope.txt"), 64).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }
}
