//! roadnet-core: time-dependent shortest path engine.
//!
//! A pure Rust library holding a directed, non-negatively weighted graph
//! and a label-setting (Dijkstra) search that stops at the destination.
//! Every relaxed edge is charged an extra arrival delay from a pluggable
//! [`ArrivalCost`] hook, e.g. the waiting time at a road intersection.
//! No I/O lives here: graphs arrive through [`GraphSource`].

mod arrival;
mod engine;
mod frontier;
mod graph;
mod path;

pub use arrival::{
    ArrivalCost, ConstantDelay, DelayFunction, DelayModel, DelayModelError, NoDelay, SeededDelay,
    DEFAULT_DELAY, DEFAULT_SEED,
};
pub use engine::{shortest_path, PathResult, QueryError, Search, SearchStats, ShortestPathEngine};
pub use frontier::{Frontier, FrontierEntry};
pub use graph::{Edge, EdgeList, EdgeRecord, Graph, GraphError, GraphSource, NodeId};
pub use path::reconstruct_path;
