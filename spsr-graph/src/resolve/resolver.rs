//! Reference resolution against the [`SymbolIndex`].
//!
//! Policy, per referenced symbol of a unit:
//! 1. same file, exact name: every other unit of the file defining it, with
//!    confidence `1.0 / n`. A match on the unit itself is recorded as a
//!    self-reference; no self-loop is ever produced;
//! 2. otherwise cross-file: every top-level definer in a linkable language,
//!    with `0.9 / n` when the defining file's stem appears in the referencing
//!    file's imports and `0.7 / n` otherwise;
//! 3. otherwise the reference is recorded as unresolved.

use crate::model::unit::{SymbolRef, Unit, UnitId};
use crate::resolve::{FileAnalysis, index::SymbolIndex};

pub const SAME_FILE_CONFIDENCE: f32 = 1.0;
pub const IMPORTED_CONFIDENCE: f32 = 0.9;
pub const CROSS_FILE_CONFIDENCE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub unit: UnitId,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRef {
    pub reference: SymbolRef,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitResolution {
    pub resolved: Vec<ResolvedRef>,
    pub unresolved: Vec<SymbolRef>,
    pub self_references: Vec<SymbolRef>,
}

/// Resolutions for one file, aligned with its `units`.
#[derive(Debug, Clone, Default)]
pub struct FileResolution {
    pub units: Vec<UnitResolution>,
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'i> {
    index: &'i SymbolIndex,
}

impl<'i> Resolver<'i> {
    pub fn new(index: &'i SymbolIndex) -> Self {
        Self { index }
    }

    pub fn resolve_file(&self, fa: &FileAnalysis) -> FileResolution {
        let Some(pos) = self.index.position(&fa.file) else {
            // not indexed: nothing can resolve
            return FileResolution {
                units: fa
                    .units
                    .iter()
                    .map(|u| UnitResolution {
                        unresolved: u.referenced_symbols.clone(),
                        ..Default::default()
                    })
                    .collect(),
            };
        };
        FileResolution {
            units: fa
                .units
                .iter()
                .map(|u| self.resolve_unit(pos, fa, u))
                .collect(),
        }
    }

    fn resolve_unit(&self, pos: usize, fa: &FileAnalysis, unit: &Unit) -> UnitResolution {
        let mut out = UnitResolution::default();

        for reference in &unit.referenced_symbols {
            let same_file = self.index.local(pos, &reference.name);
            if !same_file.is_empty() {
                if same_file.contains(&unit.id) {
                    out.self_references.push(reference.clone());
                }
                let others: Vec<&UnitId> = same_file.iter().filter(|id| **id != unit.id).collect();
                if !others.is_empty() {
                    let confidence = SAME_FILE_CONFIDENCE / others.len() as f32;
                    out.resolved.push(ResolvedRef {
                        reference: reference.clone(),
                        candidates: others
                            .into_iter()
                            .map(|id| Candidate {
                                unit: id.clone(),
                                confidence,
                            })
                            .collect(),
                    });
                }
                continue;
            }

            let cross: Vec<_> = self
                .index
                .global(&reference.name)
                .iter()
                .filter(|d| d.file != pos && fa.language.links_with(self.index.language(d.file)))
                .collect();
            if cross.is_empty() {
                out.unresolved.push(reference.clone());
                continue;
            }

            let n = cross.len() as f32;
            out.resolved.push(ResolvedRef {
                reference: reference.clone(),
                candidates: cross
                    .into_iter()
                    .map(|d| {
                        let base = if fa.import_hints.contains(self.index.stem(d.file)) {
                            IMPORTED_CONFIDENCE
                        } else {
                            CROSS_FILE_CONFIDENCE
                        };
                        Candidate {
                            unit: d.unit.clone(),
                            confidence: base / n,
                        }
                    })
                    .collect(),
            });
        }

        out
    }
}
