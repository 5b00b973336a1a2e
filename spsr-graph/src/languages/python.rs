//! Python (tree-sitter-python).

use super::{LanguageProfile, TypeScope, UnitRule, field};
use crate::model::{language::LanguageKind, unit::UnitKind};

pub(super) static PROFILE: LanguageProfile = LanguageProfile {
    language: LanguageKind::Python,
    units: &[
        UnitRule::new("function_definition", UnitKind::Function),
        UnitRule::new("class_definition", UnitKind::Class),
    ],
    wrappers: &["decorated_definition"],
    namespaces: &[],
    trivia: &["comment"],
    calls: &[field("call", "function")],
    type_leaves: &[],
    type_scopes: &[
        // annotations: `x: Foo`, `-> Foo`
        TypeScope {
            node_kind: "type",
            field: None,
        },
        TypeScope {
            node_kind: "class_definition",
            field: Some("superclasses"),
        },
    ],
    bindings: &[field("assignment", "left")],
    imports: &[
        field("import_statement", "name"),
        field("import_from_statement", "module_name"),
    ],
};
