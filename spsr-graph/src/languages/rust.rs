//! Rust (tree-sitter-rust).

use super::{LanguageProfile, Naming, NamespaceRule, UnitRule, field};
use crate::model::{language::LanguageKind, unit::UnitKind};

pub(super) static PROFILE: LanguageProfile = LanguageProfile {
    language: LanguageKind::Rust,
    units: &[
        UnitRule::new("function_item", UnitKind::Function),
        UnitRule::new("function_signature_item", UnitKind::Function),
        UnitRule::new("struct_item", UnitKind::Struct),
        UnitRule::new("enum_item", UnitKind::Struct),
        UnitRule::new("union_item", UnitKind::Struct),
        UnitRule::new("trait_item", UnitKind::Class),
        UnitRule::new("impl_item", UnitKind::Class).naming(Naming::TypeField { prefix: "impl " }),
    ],
    wrappers: &[],
    namespaces: &[NamespaceRule {
        node_kind: "mod_item",
        body: Some("body"),
    }],
    trivia: &[
        "line_comment",
        "block_comment",
        "attribute_item",
        "inner_attribute_item",
    ],
    calls: &[field("call_expression", "function")],
    type_leaves: &["type_identifier"],
    type_scopes: &[],
    bindings: &[
        field("const_item", "name"),
        field("static_item", "name"),
        field("type_item", "name"),
    ],
    imports: &[field("use_declaration", "argument")],
};
