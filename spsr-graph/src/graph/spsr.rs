//! The repository-wide SPSR graph.
//!
//! A thin read-only facade over `petgraph::Graph<Unit, Edge>`. Nodes keep
//! insertion (discovery) order; adjacency views are returned in edge creation
//! order, which is the deterministic order the builder fixed.

use crate::model::{
    graph::{Edge, EdgeKind},
    language::LanguageKind,
    unit::{Unit, UnitId},
};
use petgraph::{
    Direction,
    graph::{EdgeIndex, Graph, NodeIndex},
    visit::EdgeRef,
};
use std::collections::{BTreeMap, HashMap};

/// Source text of one file, kept for assembly.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub language: LanguageKind,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct SpsrGraph {
    pub(crate) graph: Graph<Unit, Edge>,
    pub(crate) by_id: HashMap<UnitId, NodeIndex>,
    pub(crate) files: Vec<SourceFile>,
    pub(crate) file_pos: HashMap<String, usize>,
}

impl SpsrGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Units in insertion order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    pub fn unit(&self, idx: NodeIndex) -> &Unit {
        &self.graph[idx]
    }

    pub fn index_of(&self, id: &UnitId) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    pub fn unit_by_id(&self, id: &UnitId) -> Option<&Unit> {
        self.index_of(id).map(|i| &self.graph[i])
    }

    /// Outgoing edges of `kind` from `idx`, in edge creation order.
    pub fn outgoing(&self, idx: NodeIndex, kind: EdgeKind) -> Vec<(NodeIndex, Edge)> {
        // petgraph iterates adjacency newest-first
        let mut out: Vec<(EdgeIndex, NodeIndex, Edge)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|e| e.weight().kind == kind)
            .map(|e| (e.id(), e.target(), *e.weight()))
            .collect();
        out.sort_by_key(|(eid, _, _)| *eid);
        out.into_iter().map(|(_, t, e)| (t, e)).collect()
    }

    /// All edges as `(source, target, edge)` in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (&Unit, &Unit, Edge)> {
        self.graph.edge_indices().filter_map(move |e| {
            let (s, t) = self.graph.edge_endpoints(e)?;
            Some((&self.graph[s], &self.graph[t], self.graph[e]))
        })
    }

    pub fn edge_counts(&self) -> BTreeMap<EdgeKind, usize> {
        let mut counts = BTreeMap::new();
        for w in self.graph.edge_weights() {
            *counts.entry(w.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Source of a repo-relative file path.
    pub fn source(&self, file: &str) -> Option<&SourceFile> {
        self.file_pos.get(file).map(|&p| &self.files[p])
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// First unit named `name` in `file`.
    pub fn find(&self, file: &str, name: &str) -> Option<&Unit> {
        self.units().find(|u| u.file == file && u.name == name)
    }

    pub fn inner(&self) -> &Graph<Unit, Edge> {
        &self.graph
    }
}
