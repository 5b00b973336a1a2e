//! JSONL writers for corpus and graph artifacts.
//!
//! One compact JSON object per line, in deterministic order (sample order,
//! unit insertion order, edge creation order), so two runs over the same
//! repository produce byte-identical files apart from timestamps.

use crate::graph::SpsrGraph;
use crate::model::sample::TrainingSample;
use anyhow::{Context, Result};
use serde_json::json;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

/// Write training samples to `corpus.jsonl`.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use spsr_graph::export::jsonl::write_corpus_jsonl;
///
/// write_corpus_jsonl(Path::new("corpus.jsonl"), &[]).unwrap();
/// ```
pub fn write_corpus_jsonl(path: &Path, samples: &[TrainingSample]) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);

    for s in samples {
        serde_json::to_writer(&mut w, s)?;
        w.write_all(b"\n")?;
    }

    w.flush()?;
    info!(samples = samples.len(), "jsonl: wrote corpus -> {}", path.display());
    Ok(())
}

/// Write graph nodes and edges (`graph_nodes.jsonl` + `graph_edges.jsonl`).
///
/// Nodes are full units plus their ordinal:
/// ```json
/// { "ord": 0, "id": "…", "file": "src/a.c", "kind": "function", "name": "main", "span": { … }, … }
/// ```
/// Edges reference unit ids:
/// ```json
/// { "src": "…", "dst": "…", "kind": "calls", "confidence": 1.0 }
/// ```
pub fn write_graph_jsonl(nodes_path: &Path, edges_path: &Path, graph: &SpsrGraph) -> Result<()> {
    {
        let f =
            File::create(nodes_path).with_context(|| format!("create {}", nodes_path.display()))?;
        let mut w = BufWriter::new(f);

        for (ord, unit) in graph.units().enumerate() {
            let mut rec = serde_json::to_value(unit)?;
            if let Some(obj) = rec.as_object_mut() {
                obj.insert("ord".into(), json!(ord));
            }
            serde_json::to_writer(&mut w, &rec)?;
            w.write_all(b"\n")?;
        }

        w.flush()?;
        info!("jsonl: wrote graph nodes -> {}", nodes_path.display());
    }

    {
        let f =
            File::create(edges_path).with_context(|| format!("create {}", edges_path.display()))?;
        let mut w = BufWriter::new(f);

        for (src, dst, edge) in graph.edges() {
            let rec = json!({
                "src": src.id,
                "dst": dst.id,
                "kind": edge.kind,
                "confidence": edge.confidence,
            });
            serde_json::to_writer(&mut w, &rec)?;
            w.write_all(b"\n")?;
        }

        w.flush()?;
        info!("jsonl: wrote graph edges -> {}", edges_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_of;
    use crate::model::language::LanguageKind;
    use std::fs;

    #[test]
    fn graph_lines_match_graph_size() {
        let g = graph_of(&[(
            "m.py",
            LanguageKind::Python,
            "def a():\n    return b()\n\ndef b():\n    return 1\n",
        )]);
        let dir = tempfile::tempdir().unwrap();
        let (n, e) = (dir.path().join("n.jsonl"), dir.path().join("e.jsonl"));
        write_graph_jsonl(&n, &e, &g).unwrap();

        let nodes = fs::read_to_string(&n).unwrap();
        let edges = fs::read_to_string(&e).unwrap();
        assert_eq!(nodes.lines().count(), g.node_count());
        assert_eq!(edges.lines().count(), g.edge_count());

        let first: serde_json::Value = serde_json::from_str(nodes.lines().next().unwrap()).unwrap();
        assert_eq!(first["ord"], 0);
        assert_eq!(first["name"], "a");
        let kinds: Vec<String> = edges
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["kind"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["calls", "same-file-precedes"]);
    }
}
