//! Parsing layer: Tree-sitter adapter and the owned syntax-tree model.
//!
//! Segmentation and symbol extraction only ever see [`SyntaxTree`]. The tree
//! keeps named nodes with their grammar kind, the field they occupy in their
//! parent, and their span; anonymous tokens (`;`, `(`, keywords) are dropped.
//! Every node gets a preorder `id` unique within its tree.

use crate::core::traits::SourceParser;
use crate::languages;
use crate::model::{language::LanguageKind, span::Span};
use thiserror::Error;
use tree_sitter::{Node, Parser, TreeCursor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("grammar for {0} could not be loaded")]
    Grammar(LanguageKind),

    #[error("parser produced no tree")]
    NoTree,

    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("content is not valid UTF-8")]
    NotUtf8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub id: usize,
    pub kind: &'static str,
    /// Field name under which this node hangs in its parent, if any.
    pub field: Option<&'static str>,
    pub span: Span,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// First child stored under `field`.
    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// All children stored under `field`, in source order.
    pub fn children_by_field<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a SyntaxNode> + 'a {
        self.children.iter().filter(move |c| c.field == Some(field))
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.slice_text(source)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::subtree_len).sum::<usize>()
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub language: LanguageKind,
    pub root: SyntaxNode,
    /// `true` when nodes beyond the depth limit were not materialized.
    pub truncated: bool,
    /// `true` when the parser recovered from syntax errors (lenient mode only).
    pub has_errors: bool,
}

/// Default [`SourceParser`] backed by Tree-sitter grammars.
#[derive(Debug, Clone)]
pub struct TreeSitterParser {
    max_depth: usize,
    strict: bool,
}

impl TreeSitterParser {
    pub fn new(max_depth: usize, strict: bool) -> Self {
        Self {
            max_depth: max_depth.max(1),
            strict,
        }
    }
}

impl Default for TreeSitterParser {
    fn default() -> Self {
        Self::new(256, true)
    }
}

impl SourceParser for TreeSitterParser {
    #[tracing::instrument(level = "trace", skip_all, fields(language = %language))]
    fn parse(&self, code: &str, language: LanguageKind) -> Result<SyntaxTree, ParseFailure> {
        // tree_sitter::Parser is not Sync; one per call
        let mut parser = Parser::new();
        parser
            .set_language(&languages::grammar(language))
            .map_err(|_| ParseFailure::Grammar(language))?;
        let tree = parser.parse(code, None).ok_or(ParseFailure::NoTree)?;

        let root = tree.root_node();
        let has_errors = root.has_error();
        if has_errors && self.strict {
            let at = first_error(root).unwrap_or(root).start_position();
            return Err(ParseFailure::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let mut cursor = root.walk();
        let mut next_id = 0usize;
        let mut truncated = false;
        let root = convert(
            &mut cursor,
            0,
            self.max_depth,
            &mut next_id,
            &mut truncated,
        );

        Ok(SyntaxTree {
            language,
            root,
            truncated,
            has_errors,
        })
    }
}

fn convert(
    cursor: &mut TreeCursor,
    depth: usize,
    max_depth: usize,
    next_id: &mut usize,
    truncated: &mut bool,
) -> SyntaxNode {
    let node = cursor.node();
    let id = *next_id;
    *next_id += 1;

    let mut children = Vec::new();
    if node.named_child_count() > 0 {
        if depth + 1 >= max_depth {
            *truncated = true;
        } else if cursor.goto_first_child() {
            loop {
                if cursor.node().is_named() {
                    let field = cursor.field_name();
                    let mut child = convert(cursor, depth + 1, max_depth, next_id, truncated);
                    child.field = field;
                    children.push(child);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
    }

    SyntaxNode {
        id,
        kind: node.kind(),
        field: None,
        span: node_span(&node),
        children,
    }
}

fn node_span(node: &Node) -> Span {
    let sp = node.start_position();
    let ep = node.end_position();
    Span::new(sp.row + 1, ep.row + 1, node.start_byte(), node.end_byte())
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(root: Node) -> Option<Node> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_named_nodes_with_fields() {
        let code = "int add(int a, int b) { return a + b; }\n";
        let tree = TreeSitterParser::default()
            .parse(code, LanguageKind::C)
            .unwrap();
        assert_eq!(tree.root.kind, "translation_unit");

        let func = &tree.root.children[0];
        assert_eq!(func.kind, "function_definition");
        let declarator = func.child_by_field("declarator").unwrap();
        assert_eq!(declarator.kind, "function_declarator");
        let name = declarator.child_by_field("declarator").unwrap();
        assert_eq!(name.text(code), "add");
        assert!(func.child_by_field("body").is_some());
        assert_eq!(func.span.start_line, 1);
    }

    #[test]
    fn ids_are_preorder_and_unique() {
        let code = "def f(x):\n    return g(x)\n";
        let tree = TreeSitterParser::default()
            .parse(code, LanguageKind::Python)
            .unwrap();
        let mut ids = Vec::new();
        let mut stack = vec![&tree.root];
        while let Some(n) = stack.pop() {
            ids.push(n.id);
            stack.extend(n.children.iter().rev());
        }
        let expected: Vec<usize> = (0..ids.len()).collect();
        assert_eq!(ids, expected);
        assert_eq!(tree.root.subtree_len(), ids.len());
    }

    #[test]
    fn strict_mode_rejects_syntax_errors() {
        let code = "int main( { return 0; }\n";
        let err = TreeSitterParser::new(256, true)
            .parse(code, LanguageKind::C)
            .unwrap_err();
        assert!(matches!(err, ParseFailure::Syntax { line: 1, .. }));

        let tree = TreeSitterParser::new(256, false)
            .parse(code, LanguageKind::C)
            .unwrap();
        assert!(tree.has_errors);
    }

    #[test]
    fn depth_limit_truncates() {
        let code = "x = ((((((1))))))\n";
        let tree = TreeSitterParser::new(3, true)
            .parse(code, LanguageKind::Python)
            .unwrap();
        assert!(tree.truncated);
    }
}
