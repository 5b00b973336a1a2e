//! Training samples as persisted to `corpus.jsonl`.
//!
//! One record per line:
//! ```json
//! { "target_unit": { "unit_id": "…", "file": "src/a.c", "span": { … }, "name": "main", "kind": "function" },
//!   "context_text": "<|file_sep|>src/a.c\n…",
//!   "chain": [ { "unit_id": "…", "file": "src/a.c", "span": { … }, "relation": null, "depth": 0, "confidence": 1.0 } ],
//!   "truncated": false,
//!   "length": 412 }
//! ```

use crate::model::{
    graph::EdgeKind,
    span::Span,
    unit::{UnitId, UnitKind},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetUnit {
    pub unit_id: UnitId,
    pub file: String,
    pub span: Span,
    pub name: String,
    pub kind: UnitKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub unit_id: UnitId,
    pub file: String,
    pub span: Span,
    pub relation: Option<EdgeKind>,
    pub depth: usize,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub target_unit: TargetUnit,
    pub context_text: String,
    /// Links kept after truncation, in discovery order.
    pub chain: Vec<ChainEntry>,
    pub truncated: bool,
    /// Length of `context_text` in Unicode scalar values.
    pub length: usize,
    /// Chain links removed to fit the budget.
    #[serde(default)]
    pub dropped_links: usize,
}
