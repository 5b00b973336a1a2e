//! Symbol resolution: per-file analysis, the repository index, and resolution.
//!
//! [`analyze_source`] runs parse → segment → symbol extraction for one file
//! and returns an owned [`FileAnalysis`]; it shares nothing with other files
//! and is safe to run on any worker.

pub mod extract;
pub mod index;
pub mod resolver;

use crate::core::parse::ParseFailure;
use crate::core::traits::SourceParser;
use crate::model::{language::LanguageKind, unit::Unit};
use crate::segment;
use std::collections::BTreeSet;
use tracing::debug;

pub use index::SymbolIndex;
pub use resolver::{Candidate, FileResolution, ResolvedRef, Resolver, UnitResolution};

/// Everything known about one file before graph construction.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    /// Repo-relative path.
    pub file: String,
    pub language: LanguageKind,
    pub source: String,
    /// Units in segmentation order, with symbols filled.
    pub units: Vec<Unit>,
    /// Imported paths as written.
    pub imports: Vec<String>,
    /// Identifier segments of `imports`.
    pub import_hints: BTreeSet<String>,
    /// Syntax nodes beyond the depth limit were dropped.
    pub truncated: bool,
}

/// Parse, segment and extract symbols for one file.
pub fn analyze_source(
    parser: &dyn SourceParser,
    file: &str,
    language: LanguageKind,
    source: String,
) -> Result<FileAnalysis, ParseFailure> {
    let tree = parser.parse(&source, language)?;

    let mut seg = segment::segment(&tree, &source, file);
    extract::annotate_symbols(&mut seg, &source);
    let units = seg.into_units();
    let (imports, import_hints) = extract::import_hints(&tree, &source);

    debug!(
        file,
        units = units.len(),
        imports = imports.len(),
        truncated = tree.truncated,
        "analyzed"
    );

    Ok(FileAnalysis {
        file: file.to_string(),
        language,
        truncated: tree.truncated,
        source,
        units,
        imports,
        import_hints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse::TreeSitterParser;
    use crate::model::unit::RefKind;

    fn analyze(file: &str, lang: LanguageKind, code: &str) -> FileAnalysis {
        analyze_source(&TreeSitterParser::default(), file, lang, code.to_string()).unwrap()
    }

    fn unit<'a>(fa: &'a FileAnalysis, name: &str) -> &'a Unit {
        fa.units.iter().find(|u| u.name == name).unwrap()
    }

    #[test]
    fn recursion_is_a_self_reference_not_an_edge() {
        let fa = analyze(
            "example.c",
            LanguageKind::C,
            "int factorial(int n) { return n <= 1 ? 1 : n * factorial(n - 1); }\n\
             int main(void) { return factorial(5); }\n",
        );
        let files = vec![fa];
        let index = SymbolIndex::build(&files);
        let res = Resolver::new(&index).resolve_file(&files[0]);

        let fact = &res.units[0];
        assert!(fact.resolved.is_empty());
        assert_eq!(fact.self_references.len(), 1);
        assert_eq!(fact.self_references[0].name, "factorial");

        let main = &res.units[1];
        assert_eq!(main.resolved.len(), 1);
        let target = &main.resolved[0].candidates;
        assert_eq!(target.len(), 1);
        assert_eq!(target[0].unit, files[0].units[0].id);
        assert_eq!(target[0].confidence, 1.0);
    }

    #[test]
    fn cross_file_ambiguity_splits_confidence_and_prefers_imports() {
        let util = analyze("util.c", LanguageKind::C, "int helper(int x) { return x; }\n");
        let other = analyze("other.c", LanguageKind::C, "int helper(int x) { return -x; }\n");
        let app = analyze(
            "app.c",
            LanguageKind::C,
            "#include \"util.h\"\nint run(void) { return helper(1) + missing(); }\n",
        );
        let py = analyze("helper.py", LanguageKind::Python, "def helper():\n    pass\n");
        let files = vec![app, other, py, util];
        let index = SymbolIndex::build(&files);
        let res = Resolver::new(&index).resolve_file(&files[0]);

        let run = files[0].units.iter().position(|u| u.name == "run").unwrap();
        let r = &res.units[run];
        assert_eq!(r.resolved.len(), 1);
        let cands = &r.resolved[0].candidates;
        // file order: other.c, util.c; the Python definer never links
        assert_eq!(cands.len(), 2);
        assert_eq!(cands[0].unit, unit(&files[1], "helper").id);
        assert!((cands[0].confidence - 0.35).abs() < 1e-6);
        assert_eq!(cands[1].unit, unit(&files[3], "helper").id);
        assert!((cands[1].confidence - 0.45).abs() < 1e-6);

        assert_eq!(r.unresolved.len(), 1);
        assert_eq!(r.unresolved[0].name, "missing");
        assert_eq!(r.unresolved[0].kind, RefKind::Call);
    }

    #[test]
    fn same_file_match_wins_over_cross_file() {
        let a = analyze(
            "a.py",
            LanguageKind::Python,
            "def load():\n    return parse()\n\ndef parse():\n    return 1\n",
        );
        let b = analyze("b.py", LanguageKind::Python, "def parse():\n    return 2\n");
        let files = vec![a, b];
        let index = SymbolIndex::build(&files);
        let res = Resolver::new(&index).resolve_file(&files[0]);

        let cands = &res.units[0].resolved[0].candidates;
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].unit, files[0].units[1].id);
        assert_eq!(cands[0].confidence, 1.0);
    }

    #[test]
    fn methods_resolve_within_file_only() {
        let code = "class A:\n    def run(self):\n        return self.step()\n\n    def step(self):\n        return 0\n";
        let fa = analyze("a.py", LanguageKind::Python, code);
        let other = analyze("b.py", LanguageKind::Python, "def caller():\n    return step()\n");
        let files = vec![fa, other];
        let index = SymbolIndex::build(&files);

        let res_a = Resolver::new(&index).resolve_file(&files[0]);
        let run = &res_a.units[1];
        assert_eq!(run.resolved[0].candidates[0].unit, files[0].units[2].id);

        // `step` is a method, not a top-level symbol of a.py
        let res_b = Resolver::new(&index).resolve_file(&files[1]);
        assert_eq!(res_b.units[0].unresolved[0].name, "step");
    }
}
