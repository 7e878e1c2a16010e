use std::io;

use roadnet_core::{DelayModel, NodeId, PathResult, QueryError, SearchStats, ShortestPathEngine};
use tracing::info;

use crate::config::Settings;
use crate::sink::ResultSink;
use crate::state::LoadedGraph;

/// Outcome of one route query, ready to be written to a sink.
#[derive(Debug, Clone)]
pub struct RouteReport {
    pub source: NodeId,
    pub destination: NodeId,
    pub delay: DelayModel,
    pub result: PathResult,
    pub stats: SearchStats,
}

/// Run the configured query against a loaded graph.
///
/// Missing endpoints fall back to node 0 and the last node.
pub fn run_route(loaded: &LoadedGraph, settings: &Settings) -> Result<RouteReport, QueryError> {
    let (source, destination) = loaded.endpoints(settings.source, settings.destination);

    let mut engine = ShortestPathEngine::new(&loaded.graph, settings.delay.build());
    let search = engine.search(source, destination)?;
    let result = search.path_result();
    let stats = search.stats();

    info!(
        source,
        destination,
        delay = %settings.delay,
        reachable = result.is_reachable(),
        settled = stats.settled,
        "route computed"
    );

    Ok(RouteReport {
        source,
        destination,
        delay: settings.delay,
        result,
        stats,
    })
}

pub fn emit(report: &RouteReport, sink: &mut dyn ResultSink, with_stats: bool) -> io::Result<()> {
    match &report.result {
        PathResult::Found { distance, path } => sink.found(*distance, path)?,
        PathResult::Unreachable => sink.unreachable()?,
    }
    if with_stats {
        sink.stats(&report.stats)?;
    }
    sink.finish()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use roadnet_core::{EdgeList, EdgeRecord, Graph};

    use super::*;
    use crate::sink::TextSink;

    fn loaded(n: usize, edges: &[(usize, usize, f64)]) -> LoadedGraph {
        let records = edges
            .iter()
            .map(|&(from, to, weight)| EdgeRecord { from, to, weight })
            .collect();
        LoadedGraph {
            graph: Graph::from_source(EdgeList::new(n, records)).unwrap(),
            source_path: PathBuf::from("test.txt"),
            declared_edge_count: edges.len(),
            load_time_ms: 0.0,
        }
    }

    fn render(report: &RouteReport, with_stats: bool) -> String {
        let mut sink = TextSink::new(Vec::new());
        emit(report, &mut sink, with_stats).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_default_endpoints_and_delay() {
        let g = loaded(2, &[(0, 1, 10.0)]);
        let report = run_route(&g, &Settings::default()).unwrap();
        assert_eq!((report.source, report.destination), (0, 1));
        assert_eq!(report.result.distance(), Some(15.0));
        assert_eq!(render(&report, false), "15.00\n0 1\n");
    }

    #[test]
    fn test_no_delay_prefers_two_hops() {
        let g = loaded(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]);
        let settings = Settings {
            delay: DelayModel::None,
            ..Settings::default()
        };
        let report = run_route(&g, &settings).unwrap();
        assert_eq!(render(&report, false), "2.00\n0 1 2\n");
    }

    #[test]
    fn test_unreachable() {
        let g = loaded(3, &[(0, 1, 1.0)]);
        let report = run_route(&g, &Settings::default()).unwrap();
        assert!(!report.result.is_reachable());
        assert_eq!(render(&report, false), "unreachable\n");
    }

    #[test]
    fn test_explicit_endpoints() {
        let g = loaded(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let settings = Settings {
            source: Some(1),
            destination: Some(2),
            delay: DelayModel::None,
            ..Settings::default()
        };
        let report = run_route(&g, &settings).unwrap();
        assert_eq!(report.result.path(), Some(&[1, 2][..]));
    }

    #[test]
    fn test_invalid_destination() {
        let g = loaded(2, &[(0, 1, 1.0)]);
        let settings = Settings {
            destination: Some(5),
            ..Settings::default()
        };
        let err = run_route(&g, &settings).unwrap_err();
        assert!(matches!(err, QueryError::InvalidQuery { node: 5, .. }));
    }

    #[test]
    fn test_stats_line_is_appended() {
        let g = loaded(2, &[(0, 1, 1.0)]);
        let report = run_route(&g, &Settings::default()).unwrap();
        let out = render(&report, true);
        assert!(out.lines().last().unwrap().starts_with("# settled="));
    }
}
