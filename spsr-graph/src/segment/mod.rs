//! Segmenter: split a file's syntax tree into structural units.
//!
//! - every function/method/class/struct definition is a unit, at any depth,
//!   with `parent_id` set to the nearest enclosing unit;
//! - a function whose nearest enclosing unit is class-like is a method;
//! - at file level, a maximal run of consecutive non-definition statements
//!   forms one `block` unit; comments and attributes alone never do;
//! - wrappers (decorators, `export`, C declarations/typedefs) are looked
//!   through, and the unit spans the whole wrapper;
//! - namespaces (Rust `mod`, C `extern "C"`, preprocessor conditionals) are
//!   segmented as if their items were written at the enclosing level.
//!
//! Units come out in preorder: parents before children, siblings in source order.

use crate::core::ids::unit_id;
use crate::core::parse::{SyntaxNode, SyntaxTree};
use crate::languages::{self, LanguageProfile, Naming, UnitRule, is_identifier_like};
use crate::model::{
    language::LanguageKind,
    span::Span,
    unit::{BLOCK_NAME, Unit, UnitKind},
};
use std::collections::BTreeSet;

/// A unit plus the syntax it was cut from.
#[derive(Debug)]
pub struct Segment<'t> {
    pub unit: Unit,
    /// Syntax roots covered by the unit: the (wrapper) node for definitions,
    /// the statement run for blocks.
    pub nodes: Vec<&'t SyntaxNode>,
    /// Definition node inside any wrapper; `None` for blocks.
    pub definition: Option<&'t SyntaxNode>,
    /// Node holding the declared name, excluded from reference extraction.
    pub name_node: Option<usize>,
    /// Anonymous containers (`impl Foo`) define no symbol.
    pub anonymous: bool,
}

#[derive(Debug)]
pub struct Segmentation<'t> {
    pub file: String,
    pub language: LanguageKind,
    pub segments: Vec<Segment<'t>>,
}

impl<'t> Segmentation<'t> {
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.segments.iter().map(|s| &s.unit)
    }

    pub fn into_units(self) -> Vec<Unit> {
        self.segments.into_iter().map(|s| s.unit).collect()
    }

    /// Ids of syntax nodes that root a definition unit.
    pub fn definition_roots(&self) -> BTreeSet<usize> {
        self.segments
            .iter()
            .filter(|s| s.definition.is_some())
            .flat_map(|s| s.nodes.iter().map(|n| n.id))
            .collect()
    }
}

/// Segment one parsed file.
///
/// `file` is the repo-relative path stored on every unit.
pub fn segment<'t>(tree: &'t SyntaxTree, source: &str, file: &str) -> Segmentation<'t> {
    let mut seg = Segmenter {
        profile: languages::profile(tree.language),
        language: tree.language,
        source,
        file,
        out: Vec::new(),
    };
    seg.top_level(&tree.root);

    Segmentation {
        file: file.to_string(),
        language: tree.language,
        segments: seg.out,
    }
}

struct Segmenter<'t, 'a> {
    profile: &'static LanguageProfile,
    language: LanguageKind,
    source: &'a str,
    file: &'a str,
    out: Vec<Segment<'t>>,
}

impl<'t, 'a> Segmenter<'t, 'a> {
    fn top_level(&mut self, root: &'t SyntaxNode) {
        let mut items = Vec::new();
        self.flatten_into(&root.children, &mut items);

        let mut run: Vec<&'t SyntaxNode> = Vec::new();
        for item in items {
            if self.profile.is_trivia(item.kind) {
                // leading trivia never opens a block
                if !run.is_empty() {
                    run.push(item);
                }
                continue;
            }
            match self.definition_of(item) {
                Some((def, rule)) => {
                    self.flush_block(&mut run);
                    self.emit(item, def, rule, None);
                }
                None => run.push(item),
            }
        }
        self.flush_block(&mut run);
    }

    /// Expand namespace containers in place.
    fn flatten_into(&self, nodes: &'t [SyntaxNode], out: &mut Vec<&'t SyntaxNode>) {
        for node in nodes {
            match self.profile.namespace_rule(node.kind) {
                Some(rule) => match rule.body {
                    Some(body_field) => match node.child_by_field(body_field) {
                        Some(body) => self.flatten_into(&body.children, out),
                        None => out.push(node),
                    },
                    None => {
                        for child in &node.children {
                            // the guard of `#ifdef X` is not an item
                            if matches!(child.field, Some("name") | Some("condition")) {
                                continue;
                            }
                            self.flatten_into(std::slice::from_ref(child), out);
                        }
                    }
                },
                None => out.push(node),
            }
        }
    }

    /// The definition carried by `node`, directly or through wrappers.
    fn definition_of(&self, node: &'t SyntaxNode) -> Option<(&'t SyntaxNode, &'static UnitRule)> {
        if let Some(rule) = self.profile.unit_rule(node.kind) {
            return rule.accepts(node).then_some((node, rule));
        }
        if self.profile.is_wrapper(node.kind) {
            return node.children.iter().find_map(|c| self.definition_of(c));
        }
        None
    }

    fn emit(
        &mut self,
        root: &'t SyntaxNode,
        def: &'t SyntaxNode,
        rule: &'static UnitRule,
        parent: Option<usize>,
    ) {
        let parent_unit = parent.map(|p| &self.out[p].unit);
        let kind = match (rule.unit, parent_unit) {
            (UnitKind::Function, Some(p)) if p.kind.is_type_like() => UnitKind::Method,
            (kind, _) => kind,
        };
        let parent_id = parent_unit.map(|p| p.id.clone());

        let (name, name_node, anonymous) = self.name_of(root, def, rule.naming);
        let span = root.span;
        let id = unit_id(self.language, self.file, &span, &name, kind);

        self.out.push(Segment {
            unit: Unit {
                id,
                file: self.file.to_string(),
                language: self.language,
                kind,
                name,
                span,
                parent_id,
                defined_symbols: BTreeSet::new(),
                referenced_symbols: Vec::new(),
                unresolved: Vec::new(),
                self_references: Vec::new(),
            },
            nodes: vec![root],
            definition: Some(def),
            name_node,
            anonymous,
        });

        let idx = self.out.len() - 1;
        self.nested(def, idx);
    }

    /// Find definitions anywhere below `node` (not crossing into other units).
    fn nested(&mut self, node: &'t SyntaxNode, parent: usize) {
        for child in &node.children {
            if self.profile.is_trivia(child.kind) {
                continue;
            }
            match self.definition_of(child) {
                Some((def, rule)) => self.emit(child, def, rule, Some(parent)),
                None => self.nested(child, parent),
            }
        }
    }

    fn name_of(
        &self,
        root: &'t SyntaxNode,
        def: &'t SyntaxNode,
        naming: Naming,
    ) -> (String, Option<usize>, bool) {
        let named = match naming {
            Naming::NameField => def.child_by_field("name"),
            Naming::Declarator => declarator_name(def),
            Naming::TypeField { prefix } => {
                let ty = def
                    .child_by_field("type")
                    .map(|t| collapse_ws(t.text(self.source)))
                    .unwrap_or_default();
                return (format!("{prefix}{ty}"), None, true);
            }
        };
        // `typedef struct { .. } Point;` takes the typedef name
        let named = named.or_else(|| {
            (root.id != def.id)
                .then(|| declarator_name(root))
                .flatten()
        });

        match named {
            Some(n) => (n.text(self.source).to_string(), Some(n.id), false),
            None => ("<anonymous>".to_string(), None, true),
        }
    }

    fn flush_block(&mut self, run: &mut Vec<&'t SyntaxNode>) {
        while run.last().is_some_and(|n| self.profile.is_trivia(n.kind)) {
            run.pop();
        }
        if run.is_empty() {
            return;
        }

        let span = Span::merge(&run[0].span, &run[run.len() - 1].span);
        let id = unit_id(self.language, self.file, &span, BLOCK_NAME, UnitKind::Block);
        self.out.push(Segment {
            unit: Unit {
                id,
                file: self.file.to_string(),
                language: self.language,
                kind: UnitKind::Block,
                name: BLOCK_NAME.to_string(),
                span,
                parent_id: None,
                defined_symbols: BTreeSet::new(),
                referenced_symbols: Vec::new(),
                unresolved: Vec::new(),
                self_references: Vec::new(),
            },
            nodes: std::mem::take(run),
            definition: None,
            name_node: None,
            anonymous: false,
        });
    }
}

/// Follow C-style `declarator` fields down to the declared identifier.
pub(crate) fn declarator_name(node: &SyntaxNode) -> Option<&SyntaxNode> {
    let mut cur = node.child_by_field("declarator")?;
    loop {
        if is_identifier_like(cur.kind) {
            return Some(cur);
        }
        cur = match cur.child_by_field("declarator") {
            Some(next) => next,
            // e.g. parenthesized declarators carry no field
            None => cur.children.first()?,
        };
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Structural problems in a unit list: overlapping or unordered siblings,
/// children escaping their parent. Empty when the list is well-formed.
pub fn nesting_violations(units: &[Unit]) -> Vec<String> {
    let mut problems = Vec::new();
    let by_id: std::collections::HashMap<_, _> = units.iter().map(|u| (&u.id, u)).collect();

    let mut last_child: std::collections::HashMap<Option<&crate::model::unit::UnitId>, &Unit> =
        std::collections::HashMap::new();
    for u in units {
        if let Some(pid) = &u.parent_id {
            match by_id.get(pid) {
                Some(p) if !p.span.contains(&u.span) => {
                    problems.push(format!("{} `{}` escapes parent `{}`", u.kind, u.name, p.name));
                }
                None => problems.push(format!("{} `{}` has unknown parent", u.kind, u.name)),
                _ => {}
            }
        }
        if let Some(prev) = last_child.insert(u.parent_id.as_ref(), u) {
            if prev.span.start_byte > u.span.start_byte || prev.span.overlaps(&u.span) {
                problems.push(format!(
                    "siblings `{}` and `{}` overlap or are out of order",
                    prev.name, u.name
                ));
            }
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse::TreeSitterParser;
    use crate::core::traits::SourceParser;

    fn units(code: &str, lang: LanguageKind, file: &str) -> Vec<Unit> {
        let tree = TreeSitterParser::default().parse(code, lang).unwrap();
        segment(&tree, code, file).into_units()
    }

    fn summary(units: &[Unit]) -> Vec<(UnitKind, &str)> {
        units.iter().map(|u| (u.kind, u.name.as_str())).collect()
    }

    const RECURSIVE_C: &str = r#"/* recursion demo */
int factorial(int n) {
    if (n <= 1) return 1;
    return n * factorial(n - 1);
}

int fibonacci(int n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

int main(void) {
    int n = 5;
    printf("%d %d\n", factorial(n), fibonacci(n));
    return 0;
}
"#;

    #[test]
    fn c_functions_become_three_units() {
        let us = units(RECURSIVE_C, LanguageKind::C, "example.c");
        assert_eq!(
            summary(&us),
            vec![
                (UnitKind::Function, "factorial"),
                (UnitKind::Function, "fibonacci"),
                (UnitKind::Function, "main"),
            ]
        );
        assert!(us.iter().all(|u| u.parent_id.is_none()));
        assert!(nesting_violations(&us).is_empty());
        assert_eq!(us[0].span.start_line, 2);
    }

    #[test]
    fn c_statement_runs_form_blocks() {
        let code = "#include <stdio.h>\n#include \"util.h\"\n\nstatic int counter = 0;\n\nint tick(void) { return ++counter; }\n\n// trailing\n";
        let us = units(code, LanguageKind::C, "tick.c");
        assert_eq!(
            summary(&us),
            vec![(UnitKind::Block, BLOCK_NAME), (UnitKind::Function, "tick")]
        );
        assert_eq!(us[0].span.start_line, 1);
        assert_eq!(us[0].span.end_line, 4);
    }

    #[test]
    fn c_structs_need_a_body_and_typedefs_name_them() {
        let code = "struct Node;\n\ntypedef struct {\n    int x;\n    int y;\n} Point;\n\nstruct List {\n    struct Node *head;\n};\n";
        let us = units(code, LanguageKind::C, "types.c");
        assert_eq!(
            summary(&us),
            vec![
                (UnitKind::Block, BLOCK_NAME),
                (UnitKind::Struct, "Point"),
                (UnitKind::Struct, "List"),
            ]
        );
        // the typedef wrapper is part of the unit
        assert_eq!(us[1].span.start_line, 3);
        assert_eq!(us[1].span.end_line, 6);
    }

    #[test]
    fn include_guards_are_looked_through() {
        let code = "#ifndef UTIL_H\n#define UTIL_H\n\nint helper(int x) { return x * 2; }\n\n#endif\n";
        let us = units(code, LanguageKind::C, "util.h");
        assert_eq!(
            summary(&us),
            vec![(UnitKind::Block, BLOCK_NAME), (UnitKind::Function, "helper")]
        );
    }

    #[test]
    fn nested_conditionals_are_flattened() {
        let code = "#ifndef API_H\n#define API_H\n\n#if defined(FAST)\nint step(int x) { return x + 2; }\n#else\nint step(int x) { return x + 1; }\n#endif\n\nint run(void) { return step(0); }\n\n#endif\n";
        let us = units(code, LanguageKind::C, "api.h");
        let functions: Vec<_> = us
            .iter()
            .filter(|u| u.kind == UnitKind::Function)
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(functions, vec!["step", "step", "run"]);
        assert!(us.iter().all(|u| u.parent_id.is_none()));
        assert!(nesting_violations(&us).is_empty());
    }

    #[test]
    fn bound_arrow_functions_are_function_units() {
        let code = "import { log } from './log';\n\nconst double = (x) => x * 2;\n\nexport const main = function () {\n  log(double(2));\n};\n\nconst LIMIT = 10;\n";
        let us = units(code, LanguageKind::JavaScript, "app.js");
        assert_eq!(
            summary(&us),
            vec![
                (UnitKind::Block, BLOCK_NAME),
                (UnitKind::Function, "double"),
                (UnitKind::Function, "main"),
                (UnitKind::Block, BLOCK_NAME),
            ]
        );
        // the unit spans the whole declaration
        assert_eq!(us[1].text(code), "const double = (x) => x * 2;");
        assert!(us[2].text(code).starts_with("export const main"));
    }

    #[test]
    fn python_methods_nest_under_classes() {
        let code = "import os\n\nclass Stack:\n    def push(self, x):\n        def inner():\n            pass\n        self.items.append(x)\n\n    @property\n    def size(self):\n        return len(self.items)\n\n\ndef main():\n    Stack().push(1)\n";
        let us = units(code, LanguageKind::Python, "stack.py");
        assert_eq!(
            summary(&us),
            vec![
                (UnitKind::Block, BLOCK_NAME),
                (UnitKind::Class, "Stack"),
                (UnitKind::Method, "push"),
                (UnitKind::Function, "inner"),
                (UnitKind::Method, "size"),
                (UnitKind::Function, "main"),
            ]
        );
        let stack = &us[1];
        assert_eq!(us[2].parent_id.as_ref(), Some(&stack.id));
        assert_eq!(us[3].parent_id.as_ref(), Some(&us[2].id));
        // decorator belongs to the method
        assert_eq!(us[4].span.start_line, 9);
        assert!(nesting_violations(&us).is_empty());
    }

    #[test]
    fn comment_only_file_has_no_units() {
        let us = units("# just a note\n# and another\n", LanguageKind::Python, "notes.py");
        assert!(us.is_empty());
    }

    #[test]
    fn rust_impl_is_an_anonymous_container() {
        let code = "use std::fmt;\n\n#[derive(Debug)]\npub struct Meters(f64);\n\nimpl Meters {\n    pub fn value(&self) -> f64 { self.0 }\n}\n\nmod inner {\n    pub fn helper() {}\n}\n";
        let tree = TreeSitterParser::default()
            .parse(code, LanguageKind::Rust)
            .unwrap();
        let seg = segment(&tree, code, "src/lib.rs");
        let names: Vec<_> = seg
            .segments
            .iter()
            .map(|s| (s.unit.kind, s.unit.name.as_str(), s.anonymous))
            .collect();
        assert_eq!(
            names,
            vec![
                (UnitKind::Block, BLOCK_NAME, false),
                (UnitKind::Struct, "Meters", false),
                (UnitKind::Class, "impl Meters", true),
                (UnitKind::Method, "value", false),
                (UnitKind::Function, "helper", false),
            ]
        );
    }

    #[test]
    fn typescript_exports_and_interfaces() {
        let code = "export interface Shape { area(): number; }\n\nexport class Square implements Shape {\n  constructor(private s: number) {}\n  area(): number { return this.s * this.s; }\n}\n\nconst unit = new Square(1);\n";
        let us = units(code, LanguageKind::TypeScript, "shape.ts");
        assert_eq!(
            summary(&us),
            vec![
                (UnitKind::Class, "Shape"),
                (UnitKind::Class, "Square"),
                (UnitKind::Method, "constructor"),
                (UnitKind::Method, "area"),
                (UnitKind::Block, BLOCK_NAME),
            ]
        );
        assert_eq!(us[1].span.start_line, 3);
        assert!(us[1].text(code).starts_with("export class"));
    }

    #[test]
    fn ids_are_stable_across_runs() {
        let a = units(RECURSIVE_C, LanguageKind::C, "example.c");
        let b = units(RECURSIVE_C, LanguageKind::C, "example.c");
        let ids_a: Vec<_> = a.iter().map(|u| u.id.clone()).collect();
        let ids_b: Vec<_> = b.iter().map(|u| u.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }
}
