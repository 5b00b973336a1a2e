//! C (tree-sitter-c).

use super::{LanguageProfile, Naming, NamespaceRule, UnitRule, field};
use crate::model::{language::LanguageKind, unit::UnitKind};

pub(super) static PROFILE: LanguageProfile = LanguageProfile {
    language: LanguageKind::C,
    units: &[
        UnitRule::new("function_definition", UnitKind::Function).naming(Naming::Declarator),
        UnitRule::new("struct_specifier", UnitKind::Struct).with_body(),
        UnitRule::new("union_specifier", UnitKind::Struct).with_body(),
        UnitRule::new("enum_specifier", UnitKind::Struct).with_body(),
    ],
    // `struct P { .. } p;` and `typedef struct { .. } P;`
    wrappers: &["declaration", "type_definition"],
    namespaces: &[
        NamespaceRule {
            node_kind: "linkage_specification",
            body: Some("body"),
        },
        // include guards and conditional compilation
        NamespaceRule {
            node_kind: "preproc_ifdef",
            body: None,
        },
        NamespaceRule {
            node_kind: "preproc_if",
            body: None,
        },
        NamespaceRule {
            node_kind: "preproc_else",
            body: None,
        },
        NamespaceRule {
            node_kind: "preproc_elif",
            body: None,
        },
    ],
    trivia: &["comment"],
    calls: &[field("call_expression", "function")],
    type_leaves: &["type_identifier"],
    type_scopes: &[],
    bindings: &[
        field("declaration", "declarator"),
        field("type_definition", "declarator"),
    ],
    imports: &[field("preproc_include", "path")],
};
