//! Graph construction.
//!
//! Single-writer phase: waits for every file analysis, resolves references
//! against the immutable [`SymbolIndex`] (in parallel, read-only), then
//! inserts nodes and edges in a fixed order:
//! 1. units, in (file order, unit order);
//! 2. `calls` / `uses-type`, in (file order, unit order, reference order, candidate order);
//! 3. `same-file-precedes` between consecutive siblings;
//! 4. `defines` from parent to direct child.
//!
//! Cycles are kept. Duplicate (source, target, kind) triples are added once.

use crate::graph::spsr::{SourceFile, SpsrGraph};
use crate::model::{
    graph::{Edge, EdgeKind},
    unit::{RefKind, UnitId},
};
use crate::resolve::{FileAnalysis, FileResolution, Resolver, SymbolIndex};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::info;

pub struct GraphBuilder<'i> {
    index: &'i SymbolIndex,
}

impl<'i> GraphBuilder<'i> {
    pub fn new(index: &'i SymbolIndex) -> Self {
        Self { index }
    }

    #[tracing::instrument(level = "info", skip_all, fields(files = files.len()))]
    pub fn build(&self, mut files: Vec<FileAnalysis>) -> SpsrGraph {
        let resolver = Resolver::new(self.index);
        let resolutions: Vec<FileResolution> =
            files.par_iter().map(|fa| resolver.resolve_file(fa)).collect();

        for (fa, res) in files.iter_mut().zip(&resolutions) {
            for (unit, r) in fa.units.iter_mut().zip(&res.units) {
                unit.unresolved = r.unresolved.clone();
                unit.self_references = r.self_references.clone();
            }
        }

        let mut g = SpsrGraph::default();

        // 1) nodes
        let mut rows: Vec<Vec<NodeIndex>> = Vec::with_capacity(files.len());
        for fa in &mut files {
            let mut row = Vec::with_capacity(fa.units.len());
            for unit in std::mem::take(&mut fa.units) {
                let id = unit.id.clone();
                let idx = g.graph.add_node(unit);
                g.by_id.insert(id, idx);
                row.push(idx);
            }
            rows.push(row);

            g.file_pos.insert(fa.file.clone(), g.files.len());
            g.files.push(SourceFile {
                path: fa.file.clone(),
                language: fa.language,
                text: std::mem::take(&mut fa.source),
            });
        }

        // 2) dependency edges
        let mut seen: HashSet<(NodeIndex, NodeIndex, EdgeKind)> = HashSet::new();
        for (row, res) in rows.iter().zip(&resolutions) {
            for (&src, r) in row.iter().zip(&res.units) {
                for resolved in &r.resolved {
                    let kind = match resolved.reference.kind {
                        RefKind::Call => EdgeKind::Calls,
                        RefKind::Type => EdgeKind::UsesType,
                    };
                    for cand in &resolved.candidates {
                        let Some(&dst) = g.by_id.get(&cand.unit) else {
                            continue;
                        };
                        if dst == src || !seen.insert((src, dst, kind)) {
                            continue;
                        }
                        g.graph.add_edge(src, dst, Edge::new(kind, cand.confidence));
                    }
                }
            }
        }

        // 3) sibling order, per file and parent
        for row in &rows {
            let mut last: HashMap<Option<UnitId>, NodeIndex> = HashMap::new();
            for &idx in row {
                let parent = g.graph[idx].parent_id.clone();
                if let Some(prev) = last.insert(parent, idx) {
                    g.graph
                        .add_edge(prev, idx, Edge::structural(EdgeKind::SameFilePrecedes));
                }
            }
        }

        // 4) nesting
        for row in &rows {
            for &idx in row {
                let parent = g.graph[idx]
                    .parent_id
                    .as_ref()
                    .and_then(|p| g.by_id.get(p).copied());
                if let Some(p) = parent {
                    g.graph.add_edge(p, idx, Edge::structural(EdgeKind::Defines));
                }
            }
        }

        info!(
            nodes = g.node_count(),
            edges = g.edge_count(),
            symbols = self.index.symbol_count(),
            "graph built"
        );
        g
    }
}
