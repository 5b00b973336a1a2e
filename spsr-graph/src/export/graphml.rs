//! GraphML exporter for Gephi and similar tools.
//!
//! Units are flattened to a few attributes; edges carry kind and confidence.
//! Node ids are ordinals (`n0..nN-1`) in unit insertion order, matching the
//! `ord` field of `graph_nodes.jsonl`.

use crate::graph::SpsrGraph;
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

const KEYS: &[(&str, &str, &str, &str)] = &[
    ("d0", "node", "name", "string"),
    ("d1", "node", "kind", "string"),
    ("d2", "node", "file", "string"),
    ("d3", "node", "language", "string"),
    ("d4", "node", "start_line", "int"),
    ("d5", "node", "end_line", "int"),
    ("d6", "node", "unit_id", "string"),
    ("e0", "edge", "kind", "string"),
    ("e1", "edge", "confidence", "double"),
];

pub fn write_graphml(path: &Path, graph: &SpsrGraph) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    let g = graph.inner();

    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        w,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns
     http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#
    )?;
    for (id, target, name, ty) in KEYS {
        writeln!(
            w,
            r#"<key id="{id}" for="{target}" attr.name="{name}" attr.type="{ty}"/>"#
        )?;
    }

    writeln!(w, r#"<graph edgedefault="directed">"#)?;

    for nidx in g.node_indices() {
        let u = &g[nidx];
        writeln!(w, r#"<node id="n{}">"#, nidx.index())?;
        writeln!(w, r#"  <data key="d0">{}</data>"#, xml_escape(&u.name))?;
        writeln!(w, r#"  <data key="d1">{}</data>"#, u.kind)?;
        writeln!(w, r#"  <data key="d2">{}</data>"#, xml_escape(&u.file))?;
        writeln!(w, r#"  <data key="d3">{}</data>"#, u.language)?;
        writeln!(w, r#"  <data key="d4">{}</data>"#, u.span.start_line)?;
        writeln!(w, r#"  <data key="d5">{}</data>"#, u.span.end_line)?;
        writeln!(w, r#"  <data key="d6">{}</data>"#, u.id)?;
        writeln!(w, r#"</node>"#)?;
    }

    for eidx in g.edge_indices() {
        let Some((src, dst)) = g.edge_endpoints(eidx) else {
            continue;
        };
        let e = g[eidx];
        writeln!(
            w,
            r#"<edge id="e{}" source="n{}" target="n{}">"#,
            eidx.index(),
            src.index(),
            dst.index()
        )?;
        writeln!(w, r#"  <data key="e0">{}</data>"#, e.kind)?;
        writeln!(w, r#"  <data key="e1">{}</data>"#, e.confidence)?;
        writeln!(w, r#"</edge>"#)?;
    }

    writeln!(w, r#"</graph>"#)?;
    writeln!(w, r#"</graphml>"#)?;
    w.flush()?;
    info!("graphml: wrote -> {}", path.display());
    Ok(())
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
