//! Training-sample assembly: chain → linearized context text.
//!
//! Units are grouped by file (files in order of first appearance in the
//! chain) and sorted by span start inside a file. A unit already covered by
//! an emitted unit of the same file is not repeated. Every file section opens
//! with `{separator}{path}`.
//!
//! Length is counted in Unicode scalar values over the whole context text,
//! file headers included. Over budget, links are dropped from the
//! least-recently-discovered end (deepest first, then latest) until the text
//! fits; the target is never dropped. A target whose own section (header plus
//! text) does not fit is rejected with `BudgetExceeded`.

use crate::error::{CorpusError, Result};
use crate::graph::SpsrGraph;
use crate::model::{
    chain::{Chain, ChainLink},
    sample::{ChainEntry, TargetUnit, TrainingSample},
    span::Span,
    unit::Unit,
};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct Assembler<'g> {
    graph: &'g SpsrGraph,
    budget: usize,
    separator: &'g str,
}

impl<'g> Assembler<'g> {
    pub fn new(graph: &'g SpsrGraph, budget: usize, separator: &'g str) -> Self {
        Self {
            graph,
            budget,
            separator,
        }
    }

    pub fn assemble(&self, chain: &Chain) -> Result<TrainingSample> {
        if chain.target().is_none() {
            return Err(CorpusError::InvalidConfig("empty chain".into()));
        }
        let units = chain
            .links
            .iter()
            .map(|l| {
                self.graph
                    .unit_by_id(&l.unit_id)
                    .ok_or_else(|| CorpusError::UnknownUnit(l.unit_id.clone()))
            })
            .collect::<Result<Vec<&Unit>>>()?;
        let target = units[0];

        let mut kept: Vec<usize> = (0..units.len()).collect();
        loop {
            let text = self.render(&units, &kept)?;
            let length = text.chars().count();
            if length <= self.budget {
                let dropped = units.len() - kept.len();
                if dropped > 0 {
                    debug!(target = %target.id, dropped, length, "chain truncated");
                }
                return Ok(TrainingSample {
                    target_unit: TargetUnit {
                        unit_id: target.id.clone(),
                        file: target.file.clone(),
                        span: target.span,
                        name: target.name.clone(),
                        kind: target.kind,
                    },
                    context_text: text,
                    chain: kept
                        .iter()
                        .map(|&i| entry(&chain.links[i], units[i]))
                        .collect(),
                    truncated: dropped > 0,
                    length,
                    dropped_links: dropped,
                });
            }
            if kept.len() == 1 {
                return Err(CorpusError::BudgetExceeded {
                    unit_id: target.id.clone(),
                    length,
                    budget: self.budget,
                });
            }

            // never the target at position 0
            let victim = kept
                .iter()
                .copied()
                .skip(1)
                .max_by_key(|&i| (chain.links[i].depth, i));
            if let Some(v) = victim {
                kept.retain(|&i| i != v);
            }
        }
    }

    fn render(&self, units: &[&Unit], kept: &[usize]) -> Result<String> {
        let mut by_file: Vec<(&str, Vec<&Unit>)> = Vec::new();
        for &i in kept {
            let unit = units[i];
            match by_file.iter_mut().find(|(f, _)| *f == unit.file) {
                Some((_, list)) => list.push(unit),
                None => by_file.push((unit.file.as_str(), vec![unit])),
            }
        }

        let mut out = String::new();
        for (file, mut list) in by_file {
            let src = self
                .graph
                .source(file)
                .ok_or_else(|| CorpusError::UnknownUnit(list[0].id.clone()))?;
            list.sort_by(|a, b| {
                a.span
                    .start_byte
                    .cmp(&b.span.start_byte)
                    .then(b.span.end_byte.cmp(&a.span.end_byte))
            });

            out.push_str(self.separator);
            out.push_str(file);
            out.push('\n');

            let mut emitted: Vec<Span> = Vec::new();
            for unit in list {
                if emitted.iter().any(|s| s.contains(&unit.span)) {
                    continue;
                }
                let text = unit.text(&src.text);
                out.push_str(text);
                if !text.ends_with('\n') {
                    out.push('\n');
                }
                emitted.push(unit.span);
            }
        }
        Ok(out)
    }
}

fn entry(link: &ChainLink, unit: &Unit) -> ChainEntry {
    ChainEntry {
        unit_id: link.unit_id.clone(),
        file: unit.file.clone(),
        span: unit.span,
        relation: link.relation,
        depth: link.depth,
        confidence: link.confidence,
    }
}
