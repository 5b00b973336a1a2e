//! Run report: counters and timings collected during one corpus build.
//!
//! Serialized into `summary.json` and printed by the CLI. Field names are
//! lowercase with underscores and meant to stay stable for downstream tooling.
//!
//! ```ignore
//! let mut sw = SummaryStopwatch::start();
//! let scan = scan_repo(root, cfg)?;
//! sw.stop_scan();
//! // ... parse + segment, build graph, sample ...
//! let mut report = RunReport::new(root);
//! report.counts.record_scan(&scan);
//! report.counts.record_graph(&graph);
//! report.timings_ms = sw.into_timings();
//! ```

use crate::core::fs_scan::{ScanResult, ScanStats};
use crate::graph::SpsrGraph;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub root: String,
    pub counts: Counts,
    pub timings_ms: TimingsMs,
    /// Files isolated by a parse failure.
    pub failures: Vec<FileFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counts {
    /// Files that passed the scan filters.
    pub files_scanned: usize,
    pub files_by_language: BTreeMap<String, usize>,
    pub files_skipped: ScanStats,
    pub files_processed: usize,
    pub files_failed: usize,
    pub files_deduplicated: usize,
    /// Files whose syntax tree hit the depth limit.
    pub files_truncated: usize,

    pub units_total: usize,
    pub units_by_kind: BTreeMap<String, usize>,
    pub edges_total: usize,
    pub edges_by_kind: BTreeMap<String, usize>,
    pub unresolved_references: usize,
    pub self_references: usize,

    pub samples_produced: usize,
    pub samples_dropped: usize,
    pub samples_truncated: usize,
}

impl Counts {
    pub fn record_scan(&mut self, scan: &ScanResult) {
        self.files_scanned = scan.files.len();
        self.files_skipped = scan.stats.clone();
        self.files_by_language.clear();
        for f in &scan.files {
            *self
                .files_by_language
                .entry(f.language.to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn record_graph(&mut self, graph: &SpsrGraph) {
        self.units_total = graph.node_count();
        self.edges_total = graph.edge_count();
        self.units_by_kind.clear();
        self.unresolved_references = 0;
        self.self_references = 0;
        for u in graph.units() {
            *self.units_by_kind.entry(u.kind.to_string()).or_insert(0) += 1;
            self.unresolved_references += u.unresolved.len();
            self.self_references += u.self_references.len();
        }
        self.edges_by_kind = graph
            .edge_counts()
            .into_iter()
            .map(|(k, n)| (k.to_string(), n))
            .collect();
    }
}

/// Millisecond timings of pipeline phases; unmeasured phases stay zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingsMs {
    pub scan: u128,
    pub parse_segment: u128,
    pub graph_build: u128,
    pub sampling: u128,
    pub persist: u128,
    pub total: u128,
}

impl RunReport {
    pub fn new(root: &Path) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            root: root.to_string_lossy().into_owned(),
            counts: Counts::default(),
            timings_ms: TimingsMs::default(),
            failures: Vec::new(),
        }
    }

    pub fn record_failure(&mut self, file: impl Into<String>, reason: impl ToString) {
        self.counts.files_failed += 1;
        self.failures.push(FileFailure {
            file: file.into(),
            reason: reason.to_string(),
        });
    }
}

/// Phase stopwatch. Each `stop_*` records the time since the previous mark.
#[derive(Debug, Clone)]
pub struct SummaryStopwatch {
    started: Instant,
    last_mark: Instant,
    tm: TimingsMs,
}

impl SummaryStopwatch {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_mark: now,
            tm: TimingsMs::default(),
        }
    }

    pub fn stop_scan(&mut self) -> &mut Self {
        self.tm.scan = self.since_mark_ms();
        self
    }

    pub fn stop_parse_segment(&mut self) -> &mut Self {
        self.tm.parse_segment = self.since_mark_ms();
        self
    }

    pub fn stop_graph_build(&mut self) -> &mut Self {
        self.tm.graph_build = self.since_mark_ms();
        self
    }

    pub fn stop_sampling(&mut self) -> &mut Self {
        self.tm.sampling = self.since_mark_ms();
        self
    }

    pub fn stop_persist(&mut self) -> &mut Self {
        self.tm.persist = self.since_mark_ms();
        self
    }

    /// Snapshot with `total` measured from `start`.
    pub fn timings(&self) -> TimingsMs {
        let mut tm = self.tm.clone();
        tm.total = as_millis(self.started.elapsed());
        tm
    }

    pub fn into_timings(self) -> TimingsMs {
        self.timings()
    }

    fn since_mark_ms(&mut self) -> u128 {
        let now = Instant::now();
        let d = now.duration_since(self.last_mark);
        self.last_mark = now;
        as_millis(d)
    }
}

#[inline]
fn as_millis(d: Duration) -> u128 {
    (d.as_secs() as u128)
        .saturating_mul(1_000)
        .saturating_add((d.subsec_nanos() as u128) / 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_of;
    use crate::model::language::LanguageKind;

    #[test]
    fn graph_counts_by_kind() {
        let code = "import os\n\nclass A:\n    def f(self):\n        return self.g() + missing()\n\n    def g(self):\n        return self.g()\n";
        let g = graph_of(&[("a.py", LanguageKind::Python, code)]);

        let mut counts = Counts::default();
        counts.record_graph(&g);
        assert_eq!(counts.units_total, 4);
        assert_eq!(counts.units_by_kind["method"], 2);
        assert_eq!(counts.units_by_kind["block"], 1);
        assert_eq!(counts.edges_by_kind["defines"], 2);
        assert_eq!(counts.edges_by_kind["calls"], 1);
        assert_eq!(counts.unresolved_references, 1);
        assert_eq!(counts.self_references, 1);
        assert_eq!(counts.edges_total, counts.edges_by_kind.values().sum::<usize>());
    }

    #[test]
    fn failures_are_counted() {
        let mut report = RunReport::new(Path::new("/repo"));
        report.record_failure("a.c", "syntax error at 3:1");
        assert_eq!(report.counts.files_failed, 1);
        assert_eq!(report.failures[0].file, "a.c");
    }
}
