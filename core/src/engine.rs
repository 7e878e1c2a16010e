use serde::Serialize;
use thiserror::Error;
use tracing::{debug, debug_span, trace};

use crate::arrival::ArrivalCost;
use crate::frontier::Frontier;
use crate::graph::{Graph, NodeId};
use crate::path::reconstruct_path;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid query: node {node} is outside 0..{node_count}")]
    InvalidQuery { node: NodeId, node_count: usize },
}

/// Outcome of a single source/destination query.
#[derive(Debug, Clone, PartialEq)]
pub enum PathResult {
    /// Shortest arrival time and the nodes visited, source and destination included.
    Found { distance: f64, path: Vec<NodeId> },
    Unreachable,
}

impl PathResult {
    pub fn is_reachable(&self) -> bool {
        matches!(self, PathResult::Found { .. })
    }

    pub fn distance(&self) -> Option<f64> {
        match self {
            PathResult::Found { distance, .. } => Some(*distance),
            PathResult::Unreachable => None,
        }
    }

    pub fn path(&self) -> Option<&[NodeId]> {
        match self {
            PathResult::Found { path, .. } => Some(path),
            PathResult::Unreachable => None,
        }
    }
}

/// Counters collected while a search runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes marked visited (their distance is final).
    pub settled: usize,
    /// Relaxations that lowered a tentative distance.
    pub improved: usize,
    /// Entries pushed into the frontier, initial seeding included.
    pub inserts: usize,
    /// Popped entries whose node was already settled.
    pub stale_pops: usize,
    /// True when the loop ended by popping the destination at a finite distance.
    pub reached_destination: bool,
}

/// Per-query labels. Created fresh for every query and never shared.
#[derive(Debug, Clone)]
pub struct Search {
    source: NodeId,
    destination: NodeId,
    distance: Vec<f64>,
    predecessor: Vec<Option<NodeId>>,
    visited: Vec<bool>,
    stats: SearchStats,
}

impl Search {
    fn new(node_count: usize, source: NodeId, destination: NodeId) -> Self {
        let mut distance = vec![f64::INFINITY; node_count];
        distance[source] = 0.0;
        Self {
            source,
            destination,
            distance,
            predecessor: vec![None; node_count],
            visited: vec![false; node_count],
            stats: SearchStats::default(),
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    /// Tentative (or final, once settled) distance of `node`.
    pub fn distance(&self, node: NodeId) -> f64 {
        self.distance.get(node).copied().unwrap_or(f64::INFINITY)
    }

    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessor.get(node).copied().flatten()
    }

    pub fn is_settled(&self, node: NodeId) -> bool {
        self.visited.get(node).copied().unwrap_or(false)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Resolve the labels into a result for the destination.
    pub fn path_result(&self) -> PathResult {
        let distance = self.distance[self.destination];
        if distance == f64::INFINITY {
            return PathResult::Unreachable;
        }
        match reconstruct_path(&self.predecessor, self.source, self.destination) {
            Some(path) => PathResult::Found { distance, path },
            None => PathResult::Unreachable,
        }
    }
}

/// Label-setting shortest path search with a per-node arrival cost.
///
/// The engine borrows the graph immutably, so several engines (each with
/// its own cost function) may query the same graph at once.
pub struct ShortestPathEngine<'g, C> {
    graph: &'g Graph,
    cost: C,
}

impl<'g, C: ArrivalCost> ShortestPathEngine<'g, C> {
    pub fn new(graph: &'g Graph, cost: C) -> Self {
        Self { graph, cost }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Shortest path from `source` to `destination`.
    pub fn query(&mut self, source: NodeId, destination: NodeId) -> Result<PathResult, QueryError> {
        Ok(self.search(source, destination)?.path_result())
    }

    /// Run the search and return the raw labels.
    ///
    /// Every node is seeded into the frontier up front (the source at 0,
    /// the rest at infinity). Improvements push fresh entries; superseded
    /// ones are skipped when popped. The loop stops as soon as the
    /// destination is popped, since with non-negative weights and delays
    /// its distance can no longer change.
    pub fn search(&mut self, source: NodeId, destination: NodeId) -> Result<Search, QueryError> {
        let node_count = self.graph.node_count();
        for node in [source, destination] {
            if !self.graph.contains(node) {
                return Err(QueryError::InvalidQuery { node, node_count });
            }
        }

        let _span = debug_span!("search", source, destination).entered();
        self.cost.start_query();

        let mut search = Search::new(node_count, source, destination);
        let mut frontier = Frontier::with_capacity(node_count * 2);
        for node in 0..node_count {
            frontier.insert(node, search.distance[node]);
        }
        search.stats.inserts = node_count;

        while let Some(entry) = frontier.extract_min() {
            if entry.priority == f64::INFINITY {
                // Every node still pending is unreachable.
                break;
            }
            let u = entry.node;
            if u == destination {
                search.stats.reached_destination = true;
                break;
            }
            if search.visited[u] {
                search.stats.stale_pops += 1;
                continue;
            }

            search.visited[u] = true;
            search.stats.settled += 1;
            let base = search.distance[u];

            for edge in self.graph.edges_from(u) {
                let v = edge.target;
                let arrival = base + edge.weight;
                let delay = self.cost.delay(v, arrival);
                debug_assert!(delay >= 0.0, "negative arrival delay {delay} at node {v}");
                let candidate = arrival + delay;

                if !search.visited[v] && candidate < search.distance[v] {
                    trace!(from = u, to = v, candidate, "relax");
                    search.distance[v] = candidate;
                    search.predecessor[v] = Some(u);
                    frontier.insert(v, candidate);
                    search.stats.improved += 1;
                    search.stats.inserts += 1;
                }
            }
        }

        debug!(
            settled = search.stats.settled,
            improved = search.stats.improved,
            inserts = search.stats.inserts,
            stale_pops = search.stats.stale_pops,
            reached = search.stats.reached_destination,
            "search finished"
        );

        Ok(search)
    }
}

/// One-shot convenience wrapper around [`ShortestPathEngine::query`].
pub fn shortest_path<C: ArrivalCost>(
    graph: &Graph,
    source: NodeId,
    destination: NodeId,
    cost: C,
) -> Result<PathResult, QueryError> {
    ShortestPathEngine::new(graph, cost).query(source, destination)
}
