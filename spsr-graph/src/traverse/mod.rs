//! Chain generation: bounded breadth-first expansion over the SPSR graph.
//!
//! At every unit closer than `max_depth` to the start, edge kinds are visited
//! in [`EdgeKind::PRIORITY`] order (structure before dependencies). Per kind,
//! edges to unvisited units are ranked by descending confidence, ties kept in
//! edge creation order, and at most `max_children` are followed. A unit is
//! marked visited when discovered, so each appears in the chain once and
//! cycles cannot loop.

use crate::config::model::SamplingConfig;
use crate::error::{CorpusError, Result};
use crate::graph::SpsrGraph;
use crate::model::{
    chain::{Chain, ChainLink},
    graph::{Edge, EdgeKind},
    unit::{Unit, UnitId},
};
use petgraph::graph::NodeIndex;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy)]
pub struct ChainGenerator<'g> {
    graph: &'g SpsrGraph,
    cfg: &'g SamplingConfig,
}

impl<'g> ChainGenerator<'g> {
    pub fn new(graph: &'g SpsrGraph, cfg: &'g SamplingConfig) -> Self {
        Self { graph, cfg }
    }

    /// Chain rooted at `start`, in discovery order.
    pub fn chain_from(&self, start: &UnitId) -> Result<Chain> {
        let root = self
            .graph
            .index_of(start)
            .ok_or_else(|| CorpusError::UnknownUnit(start.clone()))?;

        let mut chain = Chain::start(start.clone());
        let mut visited: HashSet<NodeIndex> = HashSet::from([root]);
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(root, 0)]);

        while let Some((idx, depth)) = queue.pop_front() {
            if depth >= self.cfg.max_depth {
                continue;
            }
            let from = &self.graph.unit(idx).id;

            for kind in EdgeKind::PRIORITY {
                let mut next: Vec<(NodeIndex, Edge)> = self
                    .graph
                    .outgoing(idx, kind)
                    .into_iter()
                    .filter(|(t, _)| !visited.contains(t) && self.admits(kind, *t))
                    .collect();
                next.sort_by(|a, b| b.1.confidence.total_cmp(&a.1.confidence));

                for (t, edge) in next.into_iter().take(self.cfg.max_children) {
                    if !visited.insert(t) {
                        continue;
                    }
                    chain.links.push(ChainLink {
                        unit_id: self.graph.unit(t).id.clone(),
                        via: Some(from.clone()),
                        relation: Some(kind),
                        depth: depth + 1,
                        confidence: edge.confidence,
                    });
                    queue.push_back((t, depth + 1));
                }
            }
        }

        Ok(chain)
    }

    fn admits(&self, kind: EdgeKind, target: NodeIndex) -> bool {
        self.cfg.include_structs
            || kind != EdgeKind::UsesType
            || !self.graph.unit(target).kind.is_type_like()
    }

    /// Units eligible as completion targets, in graph order.
    pub fn targets(&self) -> impl Iterator<Item = &'g Unit> + use<'g> {
        let graph: &'g SpsrGraph = self.graph;
        let cfg: &'g SamplingConfig = self.cfg;
        graph
            .units()
            .filter(move |u| cfg.target_kinds.contains(&u.kind))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_of;
    use crate::model::language::LanguageKind;

    const RECURSIVE_C: &str = "int factorial(int n) {\n    return n <= 1 ? 1 : n * factorial(n - 1);\n}\n\nint fibonacci(int n) {\n    return n < 2 ? n : fibonacci(n - 1) + fibonacci(n - 2);\n}\n\nint main(void) {\n    return factorial(5) + fibonacci(6);\n}\n";

    fn cfg(max_depth: usize, max_children: usize) -> SamplingConfig {
        SamplingConfig {
            max_depth,
            max_children,
            ..SamplingConfig::default()
        }
    }

    fn chain_names(g: &SpsrGraph, chain: &Chain) -> Vec<String> {
        chain
            .unit_ids()
            .map(|id| g.unit_by_id(id).unwrap().name.clone())
            .collect()
    }

    fn start(g: &SpsrGraph, name: &str) -> UnitId {
        g.units().find(|u| u.name == name).unwrap().id.clone()
    }

    #[test]
    fn main_at_depth_one_reaches_its_callees() {
        let g = graph_of(&[("example.c", LanguageKind::C, RECURSIVE_C)]);
        let c = cfg(1, 5);
        let chain = ChainGenerator::new(&g, &c)
            .chain_from(&start(&g, "main"))
            .unwrap();
        assert_eq!(chain_names(&g, &chain), vec!["main", "factorial", "fibonacci"]);
        assert_eq!(chain.links[0].relation, None);
        assert_eq!(chain.links[1].relation, Some(EdgeKind::Calls));
        assert_eq!(chain.max_depth(), 1);
    }

    #[test]
    fn structure_is_expanded_before_dependencies() {
        let g = graph_of(&[("example.c", LanguageKind::C, RECURSIVE_C)]);
        let c = cfg(1, 5);
        let chain = ChainGenerator::new(&g, &c)
            .chain_from(&start(&g, "factorial"))
            .unwrap();
        assert_eq!(chain_names(&g, &chain), vec!["factorial", "fibonacci"]);
        assert_eq!(chain.links[1].relation, Some(EdgeKind::SameFilePrecedes));
    }

    #[test]
    fn mutual_recursion_terminates_without_repeats() {
        let code = "def ping(n):\n    return pong(n - 1)\n\ndef pong(n):\n    return ping(n - 1)\n";
        let g = graph_of(&[("cycle.py", LanguageKind::Python, code)]);
        let c = cfg(10, 5);
        let chain = ChainGenerator::new(&g, &c)
            .chain_from(&start(&g, "pong"))
            .unwrap();
        assert_eq!(chain_names(&g, &chain), vec!["pong", "ping"]);

        let mut ids: Vec<_> = chain.unit_ids().collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), chain.len());
    }

    #[test]
    fn depth_bound_is_respected() {
        let code = "def d():\n    return 0\n\n\
                    def c():\n    return d()\n\n\
                    def b():\n    return c()\n\n\
                    def a():\n    return b()\n";
        let g = graph_of(&[("calls.py", LanguageKind::Python, code)]);
        for depth in 1..=3 {
            let c = cfg(depth, 5);
            let chain = ChainGenerator::new(&g, &c)
                .chain_from(&start(&g, "a"))
                .unwrap();
            assert!(chain.links.iter().all(|l| l.depth <= depth));
            assert_eq!(chain.len(), depth + 1);
        }
    }

    #[test]
    fn max_children_caps_each_kind() {
        let code = "def x():\n    return 1\n\ndef y():\n    return 2\n\ndef z():\n    return 3\n\n\
                    def main():\n    return x() + y() + z()\n";
        let g = graph_of(&[("many.py", LanguageKind::Python, code)]);
        let c = cfg(1, 2);
        let chain = ChainGenerator::new(&g, &c)
            .chain_from(&start(&g, "main"))
            .unwrap();
        assert_eq!(chain_names(&g, &chain), vec!["main", "x", "y"]);
    }

    #[test]
    fn higher_confidence_wins_the_capped_slots() {
        // `other` is called first but its file is not imported
        let g = graph_of(&[
            (
                "app.py",
                LanguageKind::Python,
                "from util import helper\n\ndef main():\n    return other() + helper()\n",
            ),
            ("lib/other.py", LanguageKind::Python, "def other():\n    return 1\n"),
            ("util.py", LanguageKind::Python, "def helper():\n    return 2\n"),
        ]);
        let main = start(&g, "main");
        let calls = g.outgoing(g.index_of(&main).unwrap(), EdgeKind::Calls);
        let order: Vec<_> = calls.iter().map(|(t, _)| g.unit(*t).name.as_str()).collect();
        assert_eq!(order, vec!["other", "helper"]);
        assert!(calls[0].1.confidence < calls[1].1.confidence);

        let one = cfg(1, 1);
        let chain = ChainGenerator::new(&g, &one).chain_from(&main).unwrap();
        assert_eq!(chain_names(&g, &chain), vec!["main", "helper"]);

        let two = cfg(1, 2);
        let chain = ChainGenerator::new(&g, &two).chain_from(&main).unwrap();
        assert_eq!(chain_names(&g, &chain), vec!["main", "helper", "other"]);
    }

    #[test]
    fn excluding_structs_skips_type_edges_to_them() {
        let code = "struct Point { int x; int y; };\n\nint norm(struct Point p) {\n    return p.x + p.y;\n}\n";
        let g = graph_of(&[("point.c", LanguageKind::C, code)]);
        let norm = start(&g, "norm");

        let with = cfg(1, 5);
        let chain = ChainGenerator::new(&g, &with).chain_from(&norm).unwrap();
        assert_eq!(chain_names(&g, &chain), vec!["norm", "Point"]);
        assert_eq!(chain.links[1].relation, Some(EdgeKind::UsesType));

        let without = SamplingConfig {
            include_structs: false,
            ..with
        };
        let chain = ChainGenerator::new(&g, &without).chain_from(&norm).unwrap();
        assert_eq!(chain_names(&g, &chain), vec!["norm"]);
    }

    #[test]
    fn unknown_start_is_an_error() {
        let g = graph_of(&[("example.c", LanguageKind::C, RECURSIVE_C)]);
        let c = SamplingConfig::default();
        let err = ChainGenerator::new(&g, &c)
            .chain_from(&UnitId("missing".into()))
            .unwrap_err();
        assert!(matches!(err, CorpusError::UnknownUnit(_)));
    }

    #[test]
    fn every_target_kind_gets_a_chain() {
        let g = graph_of(&[("example.c", LanguageKind::C, RECURSIVE_C)]);
        let c = SamplingConfig::default();
        let generator = ChainGenerator::new(&g, &c);
        let chains: Vec<Chain> = generator
            .targets()
            .map(|u| generator.chain_from(&u.id).unwrap())
            .collect();
        assert_eq!(chains.len(), 3);
        assert!(chains.iter().all(|c| c.target().is_some()));
    }
}
