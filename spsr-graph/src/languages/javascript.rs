//! JavaScript and TypeScript (tree-sitter-javascript / tree-sitter-typescript).
//!
//! TypeScript extends the JavaScript tables with interfaces, abstract classes
//! and `type_identifier` leaves. A top-level `const f = () => ..` is a
//! function unit spanning the whole declaration.

use super::{FieldRule, LanguageProfile, TypeScope, UnitRule, field};
use crate::model::{language::LanguageKind, unit::UnitKind};

const CALLS: &[FieldRule] = &[
    field("call_expression", "function"),
    field("new_expression", "constructor"),
];

const HERITAGE: &[TypeScope] = &[TypeScope {
    node_kind: "class_heritage",
    field: None,
}];

const IMPORTS: &[FieldRule] = &[field("import_statement", "source")];

/// Values that turn a `variable_declarator` into a function unit.
const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

pub(super) static JAVASCRIPT: LanguageProfile = LanguageProfile {
    language: LanguageKind::JavaScript,
    units: &[
        UnitRule::new("function_declaration", UnitKind::Function),
        UnitRule::new("generator_function_declaration", UnitKind::Function),
        UnitRule::new("class_declaration", UnitKind::Class),
        UnitRule::new("method_definition", UnitKind::Method),
        UnitRule::new("variable_declarator", UnitKind::Function).with_value(FUNCTION_VALUES),
    ],
    wrappers: &["export_statement", "lexical_declaration", "variable_declaration"],
    namespaces: &[],
    trivia: &["comment"],
    calls: CALLS,
    type_leaves: &[],
    type_scopes: HERITAGE,
    bindings: &[field("variable_declarator", "name")],
    imports: IMPORTS,
};

pub(super) static TYPESCRIPT: LanguageProfile = LanguageProfile {
    language: LanguageKind::TypeScript,
    units: &[
        UnitRule::new("function_declaration", UnitKind::Function),
        UnitRule::new("generator_function_declaration", UnitKind::Function),
        UnitRule::new("class_declaration", UnitKind::Class),
        UnitRule::new("abstract_class_declaration", UnitKind::Class),
        UnitRule::new("interface_declaration", UnitKind::Class),
        UnitRule::new("enum_declaration", UnitKind::Struct),
        UnitRule::new("method_definition", UnitKind::Method),
        UnitRule::new("variable_declarator", UnitKind::Function).with_value(FUNCTION_VALUES),
    ],
    wrappers: &["export_statement", "lexical_declaration", "variable_declaration"],
    namespaces: &[],
    trivia: &["comment"],
    calls: CALLS,
    type_leaves: &["type_identifier"],
    type_scopes: HERITAGE,
    bindings: &[
        field("variable_declarator", "name"),
        field("type_alias_declaration", "name"),
    ],
    imports: IMPORTS,
};
