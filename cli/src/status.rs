use std::io::{self, Write};

use serde::Serialize;

use crate::config::OutputFormat;
use crate::state::LoadedGraph;

/// Summary of a loaded road network.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub path: String,
    pub node_count: usize,
    pub declared_edge_count: usize,
    pub edge_count: usize,
    pub memory_bytes: usize,
    pub load_time_ms: f64,
}

impl StatusReport {
    pub fn from_loaded(loaded: &LoadedGraph) -> Self {
        Self {
            path: loaded.source_path.display().to_string(),
            node_count: loaded.graph.node_count(),
            declared_edge_count: loaded.declared_edge_count,
            edge_count: loaded.graph.edge_count(),
            memory_bytes: loaded.graph.memory_usage(),
            load_time_ms: loaded.load_time_ms,
        }
    }

    pub fn write(&self, out: &mut dyn Write, format: OutputFormat) -> io::Result<()> {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, self)?;
                writeln!(out)
            }
            OutputFormat::Text => {
                writeln!(out, "path:          {}", self.path)?;
                writeln!(out, "nodes:         {}", self.node_count)?;
                writeln!(out, "edges:         {}", self.edge_count)?;
                if self.declared_edge_count != self.edge_count {
                    writeln!(out, "declared:      {}", self.declared_edge_count)?;
                }
                writeln!(out, "memory_bytes:  {}", self.memory_bytes)?;
                writeln!(out, "load_time_ms:  {:.3}", self.load_time_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use roadnet_core::Graph;

    use super::*;

    fn report(declared: usize) -> StatusReport {
        let mut graph = Graph::with_nodes(3);
        graph.add_edge(0, 1, 2.0).unwrap();
        let loaded = LoadedGraph {
            graph,
            source_path: PathBuf::from("net.txt"),
            declared_edge_count: declared,
            load_time_ms: 1.5,
        };
        StatusReport::from_loaded(&loaded)
    }

    #[test]
    fn test_text_status() {
        let mut out = Vec::new();
        report(1).write(&mut out, OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("nodes:         3"));
        assert!(text.contains("edges:         1"));
        assert!(!text.contains("declared"));
    }

    #[test]
    fn test_text_status_shows_header_mismatch() {
        let mut out = Vec::new();
        report(4).write(&mut out, OutputFormat::Text).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("declared:      4"));
    }

    #[test]
    fn test_json_status() {
        let mut out = Vec::new();
        report(1).write(&mut out, OutputFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["node_count"], 3);
        assert_eq!(v["edge_count"], 1);
        assert_eq!(v["path"], "net.txt");
        assert!(v["memory_bytes"].as_u64().unwrap() > 0);
    }
}
