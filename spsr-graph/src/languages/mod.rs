//! Per-language grammar binding and syntax tables.
//!
//! Segmentation and symbol extraction are written once against
//! [`LanguageProfile`]; each language only describes which node kinds play
//! which role in its grammar.

mod c;
mod javascript;
mod python;
mod rust;

use crate::core::parse::SyntaxNode;
use crate::model::{language::LanguageKind, unit::UnitKind};
use tree_sitter::Language;

/// Tree-sitter grammar for a language.
pub fn grammar(language: LanguageKind) -> Language {
    match language {
        LanguageKind::C => tree_sitter_c::LANGUAGE.into(),
        LanguageKind::Python => tree_sitter_python::LANGUAGE.into(),
        LanguageKind::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        LanguageKind::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        LanguageKind::Rust => tree_sitter_rust::LANGUAGE.into(),
    }
}

/// Syntax tables for a language.
pub fn profile(language: LanguageKind) -> &'static LanguageProfile {
    match language {
        LanguageKind::C => &c::PROFILE,
        LanguageKind::Python => &python::PROFILE,
        LanguageKind::JavaScript => &javascript::JAVASCRIPT,
        LanguageKind::TypeScript => &javascript::TYPESCRIPT,
        LanguageKind::Rust => &rust::PROFILE,
    }
}

/// How a definition node carries its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// `name` field (most grammars).
    NameField,
    /// C-style `declarator` chain ending in an identifier.
    Declarator,
    /// Anonymous container named after its `type` field (`impl Foo`).
    /// Defines no symbol.
    TypeField { prefix: &'static str },
}

#[derive(Debug, Clone, Copy)]
pub struct UnitRule {
    pub node_kind: &'static str,
    pub unit: UnitKind,
    pub naming: Naming,
    /// Only a definition when a `body` child is present (C `struct P;` is not).
    pub requires_body: bool,
    /// When non-empty, only a definition when the `value` child has one of
    /// these kinds (`const f = () => ..`).
    pub value_kinds: &'static [&'static str],
}

impl UnitRule {
    const fn new(node_kind: &'static str, unit: UnitKind) -> Self {
        Self {
            node_kind,
            unit,
            naming: Naming::NameField,
            requires_body: false,
            value_kinds: &[],
        }
    }

    const fn naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    const fn with_body(mut self) -> Self {
        self.requires_body = true;
        self
    }

    const fn with_value(mut self, kinds: &'static [&'static str]) -> Self {
        self.value_kinds = kinds;
        self
    }

    /// Whether `node` carries the parts this rule needs.
    pub fn accepts(&self, node: &SyntaxNode) -> bool {
        if self.requires_body && node.child_by_field("body").is_none() {
            return false;
        }
        self.value_kinds.is_empty()
            || node
                .child_by_field("value")
                .is_some_and(|v| self.value_kinds.contains(&v.kind))
    }
}

/// A node kind plus the field that holds the interesting child.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub node_kind: &'static str,
    pub field: &'static str,
}

const fn field(node_kind: &'static str, field: &'static str) -> FieldRule {
    FieldRule { node_kind, field }
}

/// Containers whose items are segmented as if written at the enclosing level.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceRule {
    pub node_kind: &'static str,
    /// Field holding the item list; `None` means the node's own children
    /// (minus its `name`/`condition`).
    pub body: Option<&'static str>,
}

/// Region in which identifiers are type references.
#[derive(Debug, Clone, Copy)]
pub struct TypeScope {
    pub node_kind: &'static str,
    /// Restrict the scope to this field of the node.
    pub field: Option<&'static str>,
}

#[derive(Debug)]
pub struct LanguageProfile {
    pub language: LanguageKind,
    pub units: &'static [UnitRule],
    /// Nodes looked through when searching a definition (decorators, `export`, typedef).
    pub wrappers: &'static [&'static str],
    pub namespaces: &'static [NamespaceRule],
    /// Comments and attributes; never a unit on their own.
    pub trivia: &'static [&'static str],
    /// Call sites and the field holding the callee expression.
    pub calls: &'static [FieldRule],
    /// Leaf kinds that always denote a type name.
    pub type_leaves: &'static [&'static str],
    pub type_scopes: &'static [TypeScope],
    /// Module-level bindings and the field holding the bound name.
    pub bindings: &'static [FieldRule],
    /// Import statements and the field holding the imported path.
    pub imports: &'static [FieldRule],
}

impl LanguageProfile {
    pub fn unit_rule(&self, node_kind: &str) -> Option<&UnitRule> {
        self.units.iter().find(|r| r.node_kind == node_kind)
    }

    pub fn is_wrapper(&self, node_kind: &str) -> bool {
        self.wrappers.contains(&node_kind)
    }

    pub fn namespace_rule(&self, node_kind: &str) -> Option<&NamespaceRule> {
        self.namespaces.iter().find(|r| r.node_kind == node_kind)
    }

    pub fn is_trivia(&self, node_kind: &str) -> bool {
        self.trivia.contains(&node_kind)
    }

    pub fn call_field(&self, node_kind: &str) -> Option<&'static str> {
        find_field(self.calls, node_kind)
    }

    pub fn binding_field(&self, node_kind: &str) -> Option<&'static str> {
        find_field(self.bindings, node_kind)
    }

    pub fn import_field(&self, node_kind: &str) -> Option<&'static str> {
        find_field(self.imports, node_kind)
    }

    pub fn is_type_leaf(&self, node_kind: &str) -> bool {
        self.type_leaves.contains(&node_kind)
    }
}

fn find_field(rules: &[FieldRule], node_kind: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|r| r.node_kind == node_kind)
        .map(|r| r.field)
}

/// Identifier-like leaf kinds across grammars (`identifier`, `type_identifier`,
/// `field_identifier`, `property_identifier`, ...). Scoped paths are composite.
pub fn is_identifier_like(node_kind: &str) -> bool {
    node_kind == "identifier"
        || (node_kind.ends_with("_identifier")
            && node_kind != "scoped_identifier"
            && node_kind != "scoped_type_identifier")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_classification() {
        assert!(is_identifier_like("identifier"));
        assert!(is_identifier_like("field_identifier"));
        assert!(is_identifier_like("type_identifier"));
        assert!(!is_identifier_like("scoped_identifier"));
        assert!(!is_identifier_like("call_expression"));
    }

    #[test]
    fn every_profile_has_units_and_calls() {
        for lang in [
            LanguageKind::C,
            LanguageKind::Python,
            LanguageKind::JavaScript,
            LanguageKind::TypeScript,
            LanguageKind::Rust,
        ] {
            let p = profile(lang);
            assert_eq!(p.language, lang);
            assert!(!p.units.is_empty());
            assert!(!p.calls.is_empty());
            assert!(p.unit_rule(p.units[0].node_kind).is_some());
        }
    }
}
