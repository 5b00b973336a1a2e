//! Per-unit symbol extraction.
//!
//! Defined symbols: a definition's own name (anonymous containers define
//! nothing); for blocks, the names bound by module-level assignments,
//! declarations, constants and type aliases.
//!
//! Referenced symbols: callee names at call sites and names in type position,
//! collected from the unit's own syntax only. Nested units are skipped, as is
//! the unit's name token. Deduplicated per (name, kind) in first-occurrence order.

use crate::core::parse::{SyntaxNode, SyntaxTree};
use crate::languages::{LanguageProfile, is_identifier_like, profile};
use crate::model::unit::{RefKind, SymbolRef};
use crate::segment::{Segmentation, declarator_name};
use std::collections::{BTreeSet, HashSet};

/// Fill `defined_symbols` and `referenced_symbols` on every unit.
pub fn annotate_symbols(seg: &mut Segmentation<'_>, source: &str) {
    let profile = profile(seg.language);
    let roots = seg.definition_roots();

    for s in &mut seg.segments {
        let mut defined = BTreeSet::new();
        match s.definition {
            Some(_) if !s.anonymous => {
                defined.insert(s.unit.name.clone());
            }
            Some(_) => {}
            None => {
                for node in &s.nodes {
                    collect_bindings(profile, node, source, &mut defined);
                }
            }
        }

        let mut refs = RefCollector {
            profile,
            source,
            skip: &roots,
            name_node: s.name_node,
            seen: HashSet::new(),
            out: Vec::new(),
        };
        for node in &s.nodes {
            refs.walk(node, false, true);
        }
        if s.definition.is_none() {
            // typedef'd names sit in type position
            refs.out
                .retain(|r| !(r.kind == RefKind::Type && defined.contains(&r.name)));
        }

        s.unit.defined_symbols = defined;
        s.unit.referenced_symbols = refs.out;
    }
}

/// Import hints of a file: identifier segments of every imported path
/// (`#include "net/util.h"` gives `net`, `util`, `h`).
pub fn import_hints(tree: &SyntaxTree, source: &str) -> (Vec<String>, BTreeSet<String>) {
    let profile = profile(tree.language);
    let mut raw = Vec::new();
    let mut stack = vec![&tree.root];
    while let Some(node) = stack.pop() {
        if let Some(f) = profile.import_field(node.kind) {
            for target in node.children_by_field(f) {
                let target = match target.kind {
                    "aliased_import" => target.child_by_field("name").unwrap_or(target),
                    "use_as_clause" => target.child_by_field("path").unwrap_or(target),
                    _ => target,
                };
                raw.push(target.text(source).to_string());
            }
            continue;
        }
        stack.extend(node.children.iter().rev());
    }

    let hints = raw
        .iter()
        .flat_map(|r| r.split(|c: char| !(c.is_alphanumeric() || c == '_')))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (raw, hints)
}

fn collect_bindings(
    profile: &LanguageProfile,
    node: &SyntaxNode,
    source: &str,
    out: &mut BTreeSet<String>,
) {
    if let Some(f) = profile.binding_field(node.kind) {
        for target in node.children_by_field(f) {
            bound_names(target, source, out);
        }
    }
    for child in &node.children {
        collect_bindings(profile, child, source, out);
    }
}

/// Names introduced by a binding target. Prototypes (`int f(void);`) and
/// attribute targets (`self.x = ..`) bind nothing.
fn bound_names(target: &SyntaxNode, source: &str, out: &mut BTreeSet<String>) {
    if is_identifier_like(target.kind) {
        out.insert(target.text(source).to_string());
        return;
    }
    match target.kind {
        "function_declarator" => {}
        "pattern_list" | "tuple_pattern" => {
            for c in &target.children {
                bound_names(c, source, out);
            }
        }
        _ => {
            if target.child_by_field("declarator").is_some() && !declares_function(target) {
                if let Some(n) = declarator_name(target) {
                    out.insert(n.text(source).to_string());
                }
            }
        }
    }
}

fn declares_function(node: &SyntaxNode) -> bool {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n.kind == "function_declarator" {
            return true;
        }
        cur = n.child_by_field("declarator");
    }
    false
}

struct RefCollector<'a> {
    profile: &'static LanguageProfile,
    source: &'a str,
    skip: &'a BTreeSet<usize>,
    name_node: Option<usize>,
    seen: HashSet<(String, RefKind)>,
    out: Vec<SymbolRef>,
}

impl<'a> RefCollector<'a> {
    fn push(&mut self, name: &str, kind: RefKind) {
        if name.is_empty() {
            return;
        }
        if self.seen.insert((name.to_string(), kind)) {
            self.out.push(SymbolRef::new(name, kind));
        }
    }

    fn walk(&mut self, node: &SyntaxNode, in_type: bool, is_root: bool) {
        if !is_root && self.skip.contains(&node.id) {
            return;
        }
        if Some(node.id) == self.name_node {
            return;
        }

        if let Some(f) = self.profile.call_field(node.kind) {
            if let Some(name) = node.child_by_field(f).and_then(|c| callee_name(c, self.source)) {
                self.push(name, RefKind::Call);
            }
        }

        if self.profile.is_type_leaf(node.kind) {
            self.push(node.text(self.source), RefKind::Type);
            return;
        }
        if in_type {
            if is_identifier_like(node.kind) {
                self.push(node.text(self.source), RefKind::Type);
                return;
            }
            // `pkg.Base` names `Base`
            if node.child_by_field("attribute").is_some() || node.child_by_field("property").is_some()
            {
                if let Some(name) = callee_name(node, self.source) {
                    self.push(name, RefKind::Type);
                }
                return;
            }
            if node.kind == "keyword_argument" {
                if let Some(v) = node.child_by_field("value") {
                    self.walk(v, true, false);
                }
                return;
            }
        }

        let profile = self.profile;
        let scope = profile.type_scopes.iter().find(|s| s.node_kind == node.kind);
        for child in &node.children {
            let child_in_type = in_type
                || match scope {
                    Some(s) => s.field.is_none_or(|f| child.field == Some(f)),
                    None => false,
                };
            self.walk(child, child_in_type, false);
        }
    }
}

/// Rightmost identifier of a callee expression: `obj.method` -> `method`,
/// `pkg::func::<T>` -> `func`, `new ns.Widget` -> `Widget`.
pub(crate) fn callee_name<'s>(node: &SyntaxNode, source: &'s str) -> Option<&'s str> {
    if is_identifier_like(node.kind) {
        return Some(node.text(source));
    }
    node.children
        .iter()
        .rev()
        .filter(|c| !c.kind.contains("argument") && c.kind != "type_parameters")
        .find_map(|c| callee_name(c, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse::TreeSitterParser;
    use crate::core::traits::SourceParser;
    use crate::model::{language::LanguageKind, unit::Unit};
    use crate::segment::segment;

    fn analyzed(code: &str, lang: LanguageKind) -> Vec<Unit> {
        let tree = TreeSitterParser::default().parse(code, lang).unwrap();
        let mut seg = segment(&tree, code, "f");
        annotate_symbols(&mut seg, code);
        seg.into_units()
    }

    fn refs(u: &Unit) -> Vec<(&str, RefKind)> {
        u.referenced_symbols
            .iter()
            .map(|r| (r.name.as_str(), r.kind))
            .collect()
    }

    #[test]
    fn c_calls_in_occurrence_order_without_own_name() {
        let code = "int main(void) {\n    printf(\"%d\", factorial(5));\n    factorial(3);\n    return fibonacci(2);\n}\n";
        let us = analyzed(code, LanguageKind::C);
        assert_eq!(us.len(), 1);
        assert_eq!(
            refs(&us[0]),
            vec![
                ("printf", RefKind::Call),
                ("factorial", RefKind::Call),
                ("fibonacci", RefKind::Call),
            ]
        );
        assert_eq!(us[0].defined_symbols.iter().collect::<Vec<_>>(), vec!["main"]);
    }

    #[test]
    fn c_block_bindings_skip_prototypes() {
        let code = "int counter = 0, limit;\nint helper(int x);\ntypedef unsigned long ulong;\nstruct Point *origin;\n\nint helper(int x) { return x; }\n";
        let us = analyzed(code, LanguageKind::C);
        let block = &us[0];
        assert_eq!(
            block.defined_symbols.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["counter", "limit", "origin", "ulong"]
        );
        assert_eq!(refs(block), vec![("Point", RefKind::Type)]);
    }

    #[test]
    fn nested_units_do_not_leak_references() {
        let code = "class Repo(Base, metaclass=Meta):\n    def load(self, key: Key) -> Record:\n        return fetch(key)\n\n    def save(self):\n        store(self)\n";
        let us = analyzed(code, LanguageKind::Python);
        let class = &us[0];
        assert_eq!(
            refs(class),
            vec![("Base", RefKind::Type), ("Meta", RefKind::Type)]
        );
        assert_eq!(
            refs(&us[1]),
            vec![
                ("Key", RefKind::Type),
                ("Record", RefKind::Type),
                ("fetch", RefKind::Call),
            ]
        );
        assert_eq!(refs(&us[2]), vec![("store", RefKind::Call)]);
    }

    #[test]
    fn rust_method_calls_and_types() {
        let code = "struct Cache;\n\nimpl Cache {\n    fn get(&self, k: Key) -> Option<Value> {\n        let v = self.lookup(k);\n        helpers::decode::<Value>(v)\n    }\n}\n";
        let us = analyzed(code, LanguageKind::Rust);
        let imp = &us[1];
        assert!(imp.defined_symbols.is_empty());
        assert_eq!(refs(imp), vec![("Cache", RefKind::Type)]);
        assert_eq!(
            refs(&us[2]),
            vec![
                ("Key", RefKind::Type),
                ("Option", RefKind::Type),
                ("Value", RefKind::Type),
                ("lookup", RefKind::Call),
                ("decode", RefKind::Call),
            ]
        );
    }

    #[test]
    fn javascript_new_and_heritage() {
        let code = "import { Base } from './base';\n\nclass Widget extends Base {\n  render() {\n    return new Frame(this.draw());\n  }\n}\n";
        let us = analyzed(code, LanguageKind::JavaScript);
        let class = us.iter().find(|u| u.name == "Widget").unwrap();
        assert_eq!(refs(class), vec![("Base", RefKind::Type)]);
        let render = us.iter().find(|u| u.name == "render").unwrap();
        assert_eq!(
            refs(render),
            vec![("Frame", RefKind::Call), ("draw", RefKind::Call)]
        );
    }

    #[test]
    fn import_hints_split_paths() {
        let code = "#include <stdio.h>\n#include \"net/util.h\"\nint x;\n";
        let tree = TreeSitterParser::default()
            .parse(code, LanguageKind::C)
            .unwrap();
        let (raw, hints) = import_hints(&tree, code);
        assert_eq!(raw, vec!["<stdio.h>", "\"net/util.h\""]);
        assert!(hints.contains("util"));
        assert!(hints.contains("stdio"));
        assert!(hints.contains("net"));
    }

    #[test]
    fn python_aliased_imports_use_module_path() {
        let code = "import numpy as np\nfrom pkg.store import save\n";
        let tree = TreeSitterParser::default()
            .parse(code, LanguageKind::Python)
            .unwrap();
        let (raw, hints) = import_hints(&tree, code);
        assert_eq!(raw, vec!["numpy", "pkg.store"]);
        assert!(!hints.contains("np"));
        assert!(hints.contains("store"));
    }
}
