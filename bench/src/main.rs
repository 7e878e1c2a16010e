use std::collections::VecDeque;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roadnet_core::{DelayModel, EdgeList, EdgeRecord, Graph, NodeId, ShortestPathEngine, DEFAULT_SEED};

#[derive(Parser)]
#[command(name = "roadnet-bench")]
#[command(about = "Time the canonical 0 -> n-1 query on synthetic road networks")]
struct Args {
    /// Which generator to run
    #[arg(value_enum, default_value = "all")]
    mode: Mode,

    /// Approximate node count per generated graph
    #[arg(default_value_t = 1_000_000)]
    nodes: usize,

    /// Seed for graph generation
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    All,
    /// Branching tree, deep paths
    Tree,
    /// Ring lattice with shortcuts
    SmallWorld,
    /// Uniform random edges
    Random,
    /// Two dense clusters joined by a thin chain
    Barbell,
    /// Bidirectional street grid
    Grid,
}

type Generator = fn(usize, &mut StdRng) -> Vec<EdgeRecord>;

fn main() -> Result<()> {
    let args = Args::parse();

    let generators: Vec<(&str, Generator)> = match args.mode {
        Mode::Tree => vec![("Branching tree", gen_tree)],
        Mode::SmallWorld => vec![("Small-world ring", gen_small_world)],
        Mode::Random => vec![("Uniform random", gen_random)],
        Mode::Barbell => vec![("Barbell", gen_barbell)],
        Mode::Grid => vec![("Street grid", gen_grid)],
        Mode::All => vec![
            ("Branching tree", gen_tree as Generator),
            ("Small-world ring", gen_small_world),
            ("Uniform random", gen_random),
            ("Barbell", gen_barbell),
            ("Street grid", gen_grid),
        ],
    };

    println!("roadnet-bench");
    println!("=============");
    println!();

    for (name, generator) in generators {
        run_benchmark(name, generator, args.nodes, args.seed)?;
    }
    Ok(())
}

fn run_benchmark(name: &str, generator: Generator, node_count: usize, seed: u64) -> Result<()> {
    println!("--- {name} ---");

    let t = Instant::now();
    let mut rng = StdRng::seed_from_u64(seed);
    let edges = generator(node_count, &mut rng);
    let n = edges
        .iter()
        .map(|e| e.from.max(e.to) + 1)
        .max()
        .unwrap_or(0);
    let graph = Graph::from_source(EdgeList::new(n, edges))?;
    println!(
        "Generated in {:.2}s: {} nodes, {} edges, ~{:.0}MB",
        t.elapsed().as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    let models = [
        DelayModel::None,
        DelayModel::default(),
        DelayModel::Random {
            scale: 10.0,
            seed: DEFAULT_SEED,
        },
    ];

    println!();
    println!(
        "{:>16} {:>14} {:>8} {:>10} {:>10} {:>10}",
        "delay", "distance", "hops", "settled", "stale", "time"
    );
    println!("{:->16} {:->14} {:->8} {:->10} {:->10} {:->10}", "", "", "", "", "", "");

    if graph.node_count() == 0 {
        println!("(graph too small, skipped)");
        println!();
        return Ok(());
    }
    let destination = graph.node_count() - 1;
    for model in models {
        let mut engine = ShortestPathEngine::new(&graph, model.build());
        let t = Instant::now();
        let search = engine.search(0, destination)?;
        let elapsed = t.elapsed();
        let result = search.path_result();
        let stats = search.stats();

        let (distance, hops) = match (result.distance(), result.path()) {
            (Some(d), Some(p)) => (format!("{d:.2}"), (p.len() - 1).to_string()),
            _ => ("unreachable".to_string(), "-".to_string()),
        };
        println!(
            "{:>16} {:>14} {:>8} {:>10} {:>10} {:>8.1}ms",
            model.to_string(),
            distance,
            hops,
            stats.settled,
            stats.stale_pops,
            elapsed.as_secs_f64() * 1000.0
        );
    }
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Generators: deterministic for a given seed, O(n + edges)
// ---------------------------------------------------------------------------

fn weight(rng: &mut StdRng) -> f64 {
    rng.gen_range(1.0..100.0)
}

fn edge(from: NodeId, to: NodeId, rng: &mut StdRng) -> EdgeRecord {
    EdgeRecord {
        from,
        to,
        weight: weight(rng),
    }
}

/// Every node gets three children; the last node sits at the deepest level.
fn gen_tree(node_count: usize, rng: &mut StdRng) -> Vec<EdgeRecord> {
    let branching = 3;
    let mut edges = Vec::with_capacity(node_count);
    let mut next_id = 1;
    let mut frontier: VecDeque<NodeId> = VecDeque::from([0]);

    while next_id < node_count {
        let Some(parent) = frontier.pop_front() else {
            break;
        };
        for _ in 0..branching {
            if next_id >= node_count {
                break;
            }
            edges.push(edge(parent, next_id, rng));
            frontier.push_back(next_id);
            next_id += 1;
        }
    }
    edges
}

/// Ring lattice, each node linked forward to its `k` nearest neighbours;
/// a small fraction of links are rewired to random nodes.
fn gen_small_world(node_count: usize, rng: &mut StdRng) -> Vec<EdgeRecord> {
    let k = 6;
    let p = 0.05;
    let mut edges = Vec::with_capacity(node_count * k);
    if node_count < 2 {
        return edges;
    }

    for i in 0..node_count {
        for j in 1..=k {
            let mut target = (i + j) % node_count;
            if rng.gen_bool(p) {
                let rewired = rng.gen_range(0..node_count);
                if rewired != i {
                    target = rewired;
                }
            }
            edges.push(edge(i, target, rng));
        }
    }
    edges
}

/// About ten uniformly random edges per node.
fn gen_random(node_count: usize, rng: &mut StdRng) -> Vec<EdgeRecord> {
    let target_edges = node_count * 10;
    let mut edges = Vec::with_capacity(target_edges);
    if node_count < 2 {
        return edges;
    }

    for _ in 0..target_edges {
        let from = rng.gen_range(0..node_count);
        let to = rng.gen_range(0..node_count);
        if from != to {
            edges.push(edge(from, to, rng));
        }
    }
    edges
}

/// Two random clusters joined by a one-way chain of bridge nodes.
fn gen_barbell(node_count: usize, rng: &mut StdRng) -> Vec<EdgeRecord> {
    let bridge_len = 10;
    let cluster = node_count.saturating_sub(bridge_len) / 2;
    let mut edges = Vec::with_capacity(cluster * 40 + bridge_len + 1);
    if cluster < 2 {
        return edges;
    }

    let degree = 20usize.min(cluster - 1);
    let b_start = cluster + bridge_len;
    for base in [0, b_start] {
        for i in 0..cluster {
            for _ in 0..degree {
                let target = rng.gen_range(0..cluster);
                if target != i {
                    edges.push(edge(base + i, base + target, rng));
                }
            }
        }
    }

    // Chain from the last node of the first cluster through the bridge
    // into the first node of the second cluster.
    for id in (cluster - 1)..b_start {
        edges.push(edge(id, id + 1, rng));
    }
    // Make the final node reachable from the second cluster's entry.
    edges.push(edge(b_start, b_start + cluster - 1, rng));
    edges
}

/// Square grid with two-way streets between horizontal and vertical neighbours.
fn gen_grid(node_count: usize, rng: &mut StdRng) -> Vec<EdgeRecord> {
    let side = (node_count as f64).sqrt() as usize;
    let mut edges = Vec::with_capacity(side * side * 4);

    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            if col + 1 < side {
                edges.push(edge(id, id + 1, rng));
                edges.push(edge(id + 1, id, rng));
            }
            if row + 1 < side {
                edges.push(edge(id, id + side, rng));
                edges.push(edge(id + side, id, rng));
            }
        }
    }
    edges
}
