//! Repository symbol index.
//!
//! Built once from every analyzed file, then shared read-only by resolution.
//! Two views:
//! - per file: every unit's defined symbols (exact within-file matching);
//! - global: top-level defined symbols of every file (best-effort cross-file matching).
//!
//! Candidate lists keep (file order, unit order), which keeps edge order stable.

use crate::core::normalize::file_stem;
use crate::model::{language::LanguageKind, unit::UnitId};
use crate::resolve::FileAnalysis;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definer {
    /// Position of the defining file in file order.
    pub file: usize,
    pub unit: UnitId,
}

#[derive(Debug, Clone)]
struct IndexedFile {
    stem: String,
    language: LanguageKind,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    files: Vec<IndexedFile>,
    file_pos: HashMap<String, usize>,
    local: Vec<HashMap<String, Vec<UnitId>>>,
    global: HashMap<String, Vec<Definer>>,
}

impl SymbolIndex {
    pub fn build(files: &[FileAnalysis]) -> Self {
        let mut index = SymbolIndex::default();

        for (pos, fa) in files.iter().enumerate() {
            index.files.push(IndexedFile {
                stem: file_stem(&fa.file).to_string(),
                language: fa.language,
            });
            index.file_pos.insert(fa.file.clone(), pos);

            let mut local: HashMap<String, Vec<UnitId>> = HashMap::new();
            for unit in &fa.units {
                for sym in &unit.defined_symbols {
                    local.entry(sym.clone()).or_default().push(unit.id.clone());
                    if unit.parent_id.is_none() {
                        index.global.entry(sym.clone()).or_default().push(Definer {
                            file: pos,
                            unit: unit.id.clone(),
                        });
                    }
                }
            }
            index.local.push(local);
        }

        index
    }

    pub fn position(&self, file: &str) -> Option<usize> {
        self.file_pos.get(file).copied()
    }

    pub fn stem(&self, file: usize) -> &str {
        &self.files[file].stem
    }

    pub fn language(&self, file: usize) -> LanguageKind {
        self.files[file].language
    }

    /// Units of `file` defining `name`, in unit order.
    pub fn local(&self, file: usize, name: &str) -> &[UnitId] {
        self.local
            .get(file)
            .and_then(|m| m.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Top-level definers of `name` across the repository, in file order.
    pub fn global(&self, name: &str) -> &[Definer] {
        self.global.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct top-level symbol names.
    pub fn symbol_count(&self) -> usize {
        self.global.len()
    }
}
