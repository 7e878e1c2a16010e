//! Result sinks: where a finished query is written.

use std::io::{self, Write};

use roadnet_core::{NodeId, SearchStats};
use serde::Serialize;

use crate::util::{format_distance, format_path};

pub trait ResultSink {
    fn found(&mut self, distance: f64, path: &[NodeId]) -> io::Result<()>;

    fn unreachable(&mut self) -> io::Result<()>;

    /// Search counters, when the caller asked for them.
    fn stats(&mut self, _stats: &SearchStats) -> io::Result<()> {
        Ok(())
    }

    /// Flush anything buffered. Called once, after everything else.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Plain text: the distance on one line and the path on the next, or `unreachable`.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for TextSink<W> {
    fn found(&mut self, distance: f64, path: &[NodeId]) -> io::Result<()> {
        writeln!(self.out, "{}", format_distance(distance))?;
        writeln!(self.out, "{}", format_path(path))
    }

    fn unreachable(&mut self) -> io::Result<()> {
        writeln!(self.out, "unreachable")
    }

    fn stats(&mut self, stats: &SearchStats) -> io::Result<()> {
        writeln!(
            self.out,
            "# settled={} improved={} inserts={} stale_pops={} reached={}",
            stats.settled, stats.improved, stats.inserts, stats.stale_pops, stats.reached_destination
        )
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[derive(Debug, Default, Serialize)]
struct JsonReport {
    reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<NodeId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SearchStats>,
}

/// One JSON object per query, written on `finish`.
pub struct JsonSink<W: Write> {
    out: W,
    report: JsonReport,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            report: JsonReport::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn found(&mut self, distance: f64, path: &[NodeId]) -> io::Result<()> {
        self.report.reachable = true;
        self.report.distance = Some(distance);
        self.report.path = Some(path.to_vec());
        Ok(())
    }

    fn unreachable(&mut self) -> io::Result<()> {
        self.report.reachable = false;
        self.report.distance = None;
        self.report.path = None;
        Ok(())
    }

    fn stats(&mut self, stats: &SearchStats) -> io::Result<()> {
        self.report.stats = Some(*stats);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &self.report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(f: impl FnOnce(&mut TextSink<Vec<u8>>)) -> String {
        let mut sink = TextSink::new(Vec::new());
        f(&mut sink);
        sink.finish().unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    fn json(f: impl FnOnce(&mut JsonSink<Vec<u8>>)) -> serde_json::Value {
        let mut sink = JsonSink::new(Vec::new());
        f(&mut sink);
        sink.finish().unwrap();
        serde_json::from_slice(&sink.into_inner()).unwrap()
    }

    #[test]
    fn test_text_found() {
        let out = text(|s| s.found(15.0, &[0, 1]).unwrap());
        assert_eq!(out, "15.00\n0 1\n");
    }

    #[test]
    fn test_text_unreachable() {
        assert_eq!(text(|s| s.unreachable().unwrap()), "unreachable\n");
    }

    #[test]
    fn test_text_stats_line() {
        let stats = SearchStats {
            settled: 2,
            improved: 1,
            inserts: 3,
            stale_pops: 0,
            reached_destination: true,
        };
        let out = text(|s| {
            s.found(1.0, &[0, 1]).unwrap();
            s.stats(&stats).unwrap();
        });
        assert!(out.ends_with("# settled=2 improved=1 inserts=3 stale_pops=0 reached=true\n"));
    }

    #[test]
    fn test_json_found() {
        let v = json(|s| s.found(2.0, &[0, 1, 2]).unwrap());
        assert_eq!(v["reachable"], true);
        assert_eq!(v["distance"], 2.0);
        assert_eq!(v["path"], serde_json::json!([0, 1, 2]));
        assert!(v.get("stats").is_none());
    }

    #[test]
    fn test_json_unreachable_with_stats() {
        let v = json(|s| {
            s.unreachable().unwrap();
            s.stats(&SearchStats::default()).unwrap();
        });
        assert_eq!(v["reachable"], false);
        assert!(v.get("distance").is_none());
        assert!(v.get("path").is_none());
        assert_eq!(v["stats"]["settled"], 0);
    }
}
