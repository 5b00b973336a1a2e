//! Structural units: the nodes of the SPSR graph.
//!
//! A unit is a function, method, class, struct, or a maximal run of
//! module-level statements. Units never overlap their siblings and always
//! contain their descendants.

use crate::model::{language::LanguageKind, span::Span};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Deterministic unit identifier (UUID v5 string, see `core::ids::unit_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UnitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Function,
    Method,
    Class,
    Struct,
    Block,
}

impl UnitKind {
    /// Class-like units own methods and are subject to `include_structs`.
    pub fn is_type_like(self) -> bool {
        matches!(self, UnitKind::Class | UnitKind::Struct)
    }
}

impl Display for UnitKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UnitKind::Function => "function",
            UnitKind::Method => "method",
            UnitKind::Class => "class",
            UnitKind::Struct => "struct",
            UnitKind::Block => "block",
        })
    }
}

/// How a symbol is used at the reference site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    Call,
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolRef {
    pub name: String,
    pub kind: RefKind,
}

impl SymbolRef {
    pub fn new(name: impl Into<String>, kind: RefKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    /// Repo-relative path with `/` separators.
    pub file: String,
    pub language: LanguageKind,
    pub kind: UnitKind,
    /// Declared name; blocks are named [`BLOCK_NAME`].
    pub name: String,
    pub span: Span,
    pub parent_id: Option<UnitId>,

    /// Names introduced at this unit's top level.
    #[serde(default)]
    pub defined_symbols: BTreeSet<String>,
    /// Call/type references in first-occurrence order, unique per (name, kind).
    #[serde(default)]
    pub referenced_symbols: Vec<SymbolRef>,

    /// References with no definer anywhere in the repository.
    #[serde(default)]
    pub unresolved: Vec<SymbolRef>,
    /// References that only resolve to the unit itself (recursion).
    #[serde(default)]
    pub self_references: Vec<SymbolRef>,
}

/// Name given to module-level statement blocks.
pub const BLOCK_NAME: &str = "<block>";

impl Unit {
    /// Source text covered by this unit.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice_text(source)
    }
}
