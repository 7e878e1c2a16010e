use std::path::PathBuf;

use roadnet_core::{Graph, NodeId};

/// A graph read from disk plus what we know about how it got here.
#[derive(Debug)]
pub struct LoadedGraph {
    pub graph: Graph,
    pub source_path: PathBuf,
    /// Edge count from the file header; informational only.
    pub declared_edge_count: usize,
    pub load_time_ms: f64,
}

impl LoadedGraph {
    /// Fill in the canonical endpoints: source 0, destination the last node.
    ///
    /// Range checking is left to the engine, which rejects out-of-range
    /// nodes (including any node of an empty graph).
    pub fn endpoints(&self, source: Option<NodeId>, destination: Option<NodeId>) -> (NodeId, NodeId) {
        let last = self.graph.node_count().saturating_sub(1);
        (source.unwrap_or(0), destination.unwrap_or(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(nodes: usize) -> LoadedGraph {
        LoadedGraph {
            graph: Graph::with_nodes(nodes),
            source_path: PathBuf::from("net.txt"),
            declared_edge_count: 0,
            load_time_ms: 0.0,
        }
    }

    #[test]
    fn test_default_endpoints() {
        assert_eq!(loaded(5).endpoints(None, None), (0, 4));
        assert_eq!(loaded(1).endpoints(None, None), (0, 0));
    }

    #[test]
    fn test_explicit_endpoints() {
        assert_eq!(loaded(5).endpoints(Some(3), None), (3, 4));
        assert_eq!(loaded(5).endpoints(None, Some(2)), (0, 2));
        assert_eq!(loaded(5).endpoints(Some(9), Some(9)), (9, 9));
    }
}
