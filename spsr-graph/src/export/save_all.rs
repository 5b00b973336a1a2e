//! Persist all artifacts into the given output directory.
//!
//! Layout:
//!   out_dir/
//!     corpus.jsonl
//!     graph_nodes.jsonl     (toggle: output.write_graph_jsonl)
//!     graph_edges.jsonl     (toggle: output.write_graph_jsonl)
//!     graph.graphml         (toggle: output.write_graphml)
//!     summary.json
//!
//! `out_dir` is usually a timestamped folder; it is created if missing.

use crate::{
    config::model::OutputConfig,
    core::summary::RunReport,
    export::{graphml::write_graphml, jsonl},
    graph::SpsrGraph,
    model::sample::TrainingSample,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

/// Paths of the persisted artifacts; `None` when disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistFiles {
    pub corpus_jsonl: String,
    pub graph_nodes_jsonl: Option<String>,
    pub graph_edges_jsonl: Option<String>,
    pub graph_graphml: Option<String>,
    pub summary_json: String,
}

/// Returned to the caller and written to `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistSummary {
    pub out_dir: String,
    pub files: PersistFiles,
    pub report: RunReport,
}

pub fn persist_all(
    out_dir: &Path,
    graph: &SpsrGraph,
    samples: &[TrainingSample],
    report: RunReport,
    output: &OutputConfig,
) -> Result<PersistSummary> {
    fs::create_dir_all(out_dir).with_context(|| format!("create_dir_all {}", out_dir.display()))?;
    info!("persist: dir prepared -> {}", out_dir.display());

    let p_corpus = out_dir.join("corpus.jsonl");
    let p_summary = out_dir.join("summary.json");
    jsonl::write_corpus_jsonl(&p_corpus, samples)?;

    let (mut p_nodes, mut p_edges, mut p_graphml) = (None, None, None);
    if output.write_graph_jsonl {
        let n = out_dir.join("graph_nodes.jsonl");
        let e = out_dir.join("graph_edges.jsonl");
        jsonl::write_graph_jsonl(&n, &e, graph)?;
        p_nodes = Some(n.to_string_lossy().into_owned());
        p_edges = Some(e.to_string_lossy().into_owned());
    }
    if output.write_graphml {
        let p = out_dir.join("graph.graphml");
        write_graphml(&p, graph)?;
        p_graphml = Some(p.to_string_lossy().into_owned());
    }

    let persist = PersistSummary {
        out_dir: out_dir.to_string_lossy().into_owned(),
        files: PersistFiles {
            corpus_jsonl: p_corpus.to_string_lossy().into_owned(),
            graph_nodes_jsonl: p_nodes,
            graph_edges_jsonl: p_edges,
            graph_graphml: p_graphml,
            summary_json: p_summary.to_string_lossy().into_owned(),
        },
        report,
    };

    {
        let f = fs::File::create(&p_summary)
            .with_context(|| format!("create {}", p_summary.display()))?;
        let w = std::io::BufWriter::new(f);
        serde_json::to_writer_pretty(w, &persist)?;
    }

    info!("persist: all artifacts written");
    Ok(persist)
}
