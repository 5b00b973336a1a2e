//! Seams of the pipeline.
//!
//! The segmenter and resolver consume [`SyntaxTree`]s only, so the parser
//! behind them can be swapped (or stubbed in tests) without touching them.

use crate::core::parse::{ParseFailure, SyntaxTree};
use crate::model::language::LanguageKind;

/// Turns source text into a library-independent syntax tree.
pub trait SourceParser: Send + Sync {
    fn parse(&self, code: &str, language: LanguageKind) -> Result<SyntaxTree, ParseFailure>;
}
