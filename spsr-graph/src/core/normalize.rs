//! Normalization helpers for paths, language detection, and glob handling.
//!
//! Persisted artifacts and unit IDs use repository-relative paths with `/`
//! separators, so the same repository yields the same keys on any machine.

use crate::model::language::LanguageKind;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::warn;

/// Convert a path into a repository-relative string with stable `/` separators.
///
/// Both paths are canonicalized best-effort; when `p` is not under `root`
/// the (normalized) path is returned as is.
///
/// # Example
/// ```
/// use std::path::Path;
/// use spsr_graph::core::normalize::repo_rel_str;
///
/// let rel = repo_rel_str(Path::new("/no/such/repo"), Path::new("/no/such/repo/src/main.c"));
/// assert_eq!(rel, "src/main.c");
/// ```
pub fn repo_rel_str(root: &Path, p: &Path) -> String {
    let root_abs = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let abs = dunce::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            root_abs.join(p)
        }
    });

    let rel = abs.strip_prefix(&root_abs).unwrap_or(&abs);
    to_unix_sep(rel.to_string_lossy())
}

/// Replace OS-specific separators with `/`.
///
/// # Example
/// ```
/// use spsr_graph::core::normalize::to_unix_sep;
///
/// assert_eq!(to_unix_sep(r"src\util\list.c"), "src/util/list.c");
/// ```
pub fn to_unix_sep<S: AsRef<str>>(s: S) -> String {
    s.as_ref().replace('\\', "/")
}

/// Detect programming language from file extension.
///
/// # Example
/// ```
/// use std::path::Path;
/// use spsr_graph::core::normalize::detect_language;
/// use spsr_graph::model::language::LanguageKind;
///
/// assert_eq!(detect_language(Path::new("lib/list.c")), Some(LanguageKind::C));
/// assert_eq!(detect_language(Path::new("README.md")), None);
/// ```
pub fn detect_language(path: &Path) -> Option<LanguageKind> {
    let ext = path.extension()?.to_str()?;
    LanguageKind::from_extension(ext)
}

/// File stem without extension, used to match import hints (`util.h` -> `util`).
pub fn file_stem(rel_path: &str) -> &str {
    let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
    match name.find('.') {
        Some(0) | None => name,
        Some(pos) => &name[..pos],
    }
}

/// Build a [`GlobSet`] from patterns, skipping invalid or empty ones.
///
/// Returns `None` if the input list is empty or all patterns are invalid.
///
/// # Example
/// ```
/// use spsr_graph::core::normalize::build_globset;
///
/// let gs = build_globset(&["**/third_party/**".to_string()]).unwrap();
/// assert!(gs.is_match("deps/third_party/zlib/inflate.c"));
/// ```
pub fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        match Glob::new(pat) {
            Ok(g) => {
                builder.add(g);
            }
            Err(err) => warn!("normalize: skip invalid glob {:?}: {}", pat, err),
        }
    }
    builder.build().ok()
}

/// Return `true` if a repo-relative path matches the ignore glob set.
///
/// # Example
/// ```
/// use spsr_graph::core::normalize::{build_globset, is_ignored_by};
///
/// let gs = build_globset(&["**/tests/fixtures/**".to_string()]);
/// assert!(is_ignored_by("pkg/tests/fixtures/bad.c", gs.as_ref()));
/// assert!(!is_ignored_by("pkg/src/good.c", gs.as_ref()));
/// ```
pub fn is_ignored_by(rel_path: &str, set: Option<&GlobSet>) -> bool {
    set.is_some_and(|gs| gs.is_match(rel_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_ignore_directories_and_extensions() {
        assert_eq!(file_stem("src/util.h"), "util");
        assert_eq!(file_stem("pkg/mod.test.ts"), "mod");
        assert_eq!(file_stem("Makefile"), "Makefile");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }
}
