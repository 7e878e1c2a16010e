use std::mem::size_of;

use thiserror::Error;

/// Dense node index in `[0, node_count)`.
pub type NodeId = usize;

/// A directed, weighted edge in the adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub weight: f64,
}

/// A single edge as read from a graph source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("edge {from} -> {to} references a node outside 0..{node_count}")]
    NodeOutOfRange {
        from: NodeId,
        to: NodeId,
        node_count: usize,
    },
}

/// Anything that can hand the engine a node count and a stream of edges.
///
/// `edge_count` is what the source declares, not a promise: the graph is
/// built from whatever `into_edges` yields.
pub trait GraphSource {
    type Edges: IntoIterator<Item = EdgeRecord>;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn into_edges(self) -> Self::Edges;
}

/// In-memory graph source, used by the text loader and by generators.
#[derive(Debug, Clone, Default)]
pub struct EdgeList {
    pub node_count: usize,
    pub edge_count: usize,
    pub edges: Vec<EdgeRecord>,
}

impl EdgeList {
    pub fn new(node_count: usize, edges: Vec<EdgeRecord>) -> Self {
        Self {
            node_count,
            edge_count: edges.len(),
            edges,
        }
    }
}

impl GraphSource for EdgeList {
    type Edges = Vec<EdgeRecord>;

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn into_edges(self) -> Self::Edges {
        self.edges
    }
}

/// In-memory directed graph: one insertion-ordered adjacency list per node.
///
/// The node set is fixed at construction. Edges may only be appended, and
/// only before the graph is handed to an engine (the engine borrows it
/// immutably for the duration of a query).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    outgoing: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// Graph with `node_count` nodes and no edges.
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            outgoing: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    /// Pre-allocate for a known graph size.
    ///
    /// Edge capacity is spread evenly over the adjacency lists; lists grow
    /// past their share as needed.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        let per_node = if node_count == 0 {
            0
        } else {
            edge_count / node_count
        };
        Self {
            outgoing: (0..node_count).map(|_| Vec::with_capacity(per_node)).collect(),
            edge_count: 0,
        }
    }

    /// Build a graph from a source, failing on the first out-of-range edge.
    ///
    /// Storage is sized from the records actually yielded; the declared
    /// edge count is never trusted for allocation.
    pub fn from_source<S: GraphSource>(source: S) -> Result<Self, GraphError> {
        let node_count = source.node_count();
        let records: Vec<EdgeRecord> = source.into_edges().into_iter().collect();
        let mut graph = Self::with_capacity(node_count, records.len());
        graph.load_edges(records)?;
        Ok(graph)
    }

    /// Append a directed edge `from -> to`.
    ///
    /// Weights must be finite and non-negative. That is a caller contract
    /// (the shortest-path guarantee depends on it), checked in debug builds only.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<(), GraphError> {
        let node_count = self.node_count();
        if from >= node_count || to >= node_count {
            return Err(GraphError::NodeOutOfRange {
                from,
                to,
                node_count,
            });
        }
        debug_assert!(
            weight.is_finite() && weight >= 0.0,
            "edge {from} -> {to} has invalid weight {weight}"
        );

        self.outgoing[from].push(Edge { target: to, weight });
        self.edge_count += 1;
        Ok(())
    }

    /// Bulk load edge records, all or nothing.
    ///
    /// Every record is range-checked before any is appended, so on error the
    /// graph is left exactly as it was.
    pub fn load_edges<I>(&mut self, edges: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        let records: Vec<EdgeRecord> = edges.into_iter().collect();
        let node_count = self.node_count();
        if let Some(bad) = records
            .iter()
            .find(|r| r.from >= node_count || r.to >= node_count)
        {
            return Err(GraphError::NodeOutOfRange {
                from: bad.from,
                to: bad.to,
                node_count,
            });
        }
        for record in records {
            self.add_edge(record.from, record.to, record.weight)?;
        }
        Ok(())
    }

    /// Outgoing edges of `node` in insertion order.
    pub fn edges_from(&self, node: NodeId) -> &[Edge] {
        self.outgoing.get(node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node < self.outgoing.len()
    }

    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        let lists = self.outgoing.capacity() * size_of::<Vec<Edge>>();
        let edges: usize = self
            .outgoing
            .iter()
            .map(|v| v.capacity() * size_of::<Edge>())
            .sum();

        lists + edges
    }

    /// Lower bound on [`memory_usage`](Self::memory_usage) for a graph of
    /// this size, computable before allocating anything. Saturates instead
    /// of overflowing.
    pub fn estimate_memory(node_count: usize, edge_count: usize) -> usize {
        node_count
            .saturating_mul(size_of::<Vec<Edge>>())
            .saturating_add(edge_count.saturating_mul(size_of::<Edge>()))
    }
}
