//! Graph-related types shared by the builder, traversal and exporters.
//!
//! Edge kinds serialize to kebab-case strings, which keeps JSONL/GraphML
//! artifacts stable and grep-friendly.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Edge kind of the SPSR graph.
///
/// The declaration order is also the traversal priority: structural context
/// before dependency context. Avoid reordering variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Defines,
    SameFilePrecedes,
    Calls,
    UsesType,
}

impl EdgeKind {
    /// All kinds in traversal priority order.
    pub const PRIORITY: [EdgeKind; 4] = [
        EdgeKind::Defines,
        EdgeKind::SameFilePrecedes,
        EdgeKind::Calls,
        EdgeKind::UsesType,
    ];

    /// Dependency edges come from symbol resolution and may cross files.
    pub fn is_dependency(self) -> bool {
        matches!(self, EdgeKind::Calls | EdgeKind::UsesType)
    }
}

impl Display for EdgeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EdgeKind::Defines => "defines",
            EdgeKind::SameFilePrecedes => "same-file-precedes",
            EdgeKind::Calls => "calls",
            EdgeKind::UsesType => "uses-type",
        })
    }
}

/// Edge weight: relation kind plus resolution confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
    pub confidence: f32,
}

impl Edge {
    pub fn new(kind: EdgeKind, confidence: f32) -> Self {
        Self {
            kind,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Structural edges are exact by construction.
    pub fn structural(kind: EdgeKind) -> Self {
        Self::new(kind, 1.0)
    }
}
