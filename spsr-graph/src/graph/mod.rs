//! SPSR graph: the repository-wide unit graph and its builder.

pub mod builder;
pub mod spsr;

pub use builder::GraphBuilder;
pub use spsr::{SourceFile, SpsrGraph};

/// Analyze in-memory sources and build their graph.
#[cfg(test)]
pub(crate) fn graph_of(files: &[(&str, crate::model::language::LanguageKind, &str)]) -> SpsrGraph {
    use crate::core::parse::TreeSitterParser;
    use crate::resolve::{FileAnalysis, SymbolIndex, analyze_source};

    let parser = TreeSitterParser::default();
    let analyses: Vec<FileAnalysis> = files
        .iter()
        .map(|(f, l, c)| analyze_source(&parser, f, *l, c.to_string()).unwrap())
        .collect();
    let index = SymbolIndex::build(&analyses);
    GraphBuilder::new(&index).build(analyses)
}
