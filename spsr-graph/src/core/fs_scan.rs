//! Filesystem scanning: discover candidate source files under a repository root.
//!
//! Files are filtered by language, ignore globs and size bounds, then sorted
//! by repo-relative path. That order is the "file order" every later stage
//! relies on for determinism.

use crate::{
    config::model::CorpusConfig,
    core::normalize::{build_globset, detect_language, is_ignored_by, repo_rel_str},
    error::{CorpusError, Result},
    model::language::LanguageKind,
};
use globset::GlobSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Repo-relative path with `/` separators.
    pub rel_path: String,
    pub language: LanguageKind,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub ignored: usize,
    pub unsupported: usize,
    pub too_small: usize,
    pub too_big: usize,
}

#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: PathBuf,
    pub files: Vec<ScannedFile>,
    pub stats: ScanStats,
}

pub fn scan_repo(root: &Path, cfg: &CorpusConfig) -> Result<ScanResult> {
    if !root.is_dir() {
        return Err(CorpusError::RepositoryNotFound(root.to_path_buf()));
    }

    info!("fs_scan: start -> {}", root.display());

    let ignore_globs: Option<GlobSet> = build_globset(&cfg.filters.ignore_globs);
    let allowed = cfg.filters.language_set();

    let mut stats = ScanStats::default();
    let mut files = Vec::<ScannedFile>::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(keep_entry);

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("fs_scan: walk error: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        let Some(language) = detect_language(path) else {
            stats.unsupported += 1;
            continue;
        };
        if allowed.as_ref().is_some_and(|set| !set.contains(&language)) {
            stats.unsupported += 1;
            continue;
        }

        let rel_path = repo_rel_str(root, path);
        if is_ignored_by(&rel_path, ignore_globs.as_ref()) {
            stats.ignored += 1;
            debug!("fs_scan: ignore (glob) {}", rel_path);
            continue;
        }

        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(err) => {
                warn!("fs_scan: metadata failed for {}: {}", path.display(), err);
                continue;
            }
        };
        if (size as usize) < cfg.limits.min_file_bytes {
            stats.too_small += 1;
            debug!(
                "fs_scan: skip (size {} < min {}) {}",
                size, cfg.limits.min_file_bytes, rel_path
            );
            continue;
        }
        if size as usize > cfg.limits.max_file_bytes {
            stats.too_big += 1;
            debug!(
                "fs_scan: skip (size {} > max {}) {}",
                size, cfg.limits.max_file_bytes, rel_path
            );
            continue;
        }

        files.push(ScannedFile {
            path: path.to_path_buf(),
            rel_path,
            language,
            size,
        });
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

    info!(
        "fs_scan: done, total={} (ignored={}, unsupported={}, too_small={}, too_big={})",
        files.len(),
        stats.ignored,
        stats.unsupported,
        stats.too_small,
        stats.too_big
    );

    Ok(ScanResult {
        root: root.to_path_buf(),
        files,
        stats,
    })
}

/// Coarse directory filter to avoid descending into VCS/vendor/build folders.
fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() > 0 && entry.file_type().is_dir() {
        if let Some(name) = entry.file_name().to_str() {
            return !matches!(
                name,
                ".git"
                    | ".hg"
                    | ".svn"
                    | "node_modules"
                    | "__pycache__"
                    | "target"
                    | ".venv"
                    | ".idea"
                    | ".vscode"
                    | "spsr_corpus"
            );
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
    }

    #[test]
    fn filters_and_sorts_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let body = "int f(void) { return 0; }\n".repeat(8);
        write(root, "src/z.c", &body);
        write(root, "src/a.py", &"x = 1\n".repeat(30));
        write(root, "src/tiny.c", "int x;\n");
        write(root, "docs/readme.md", &body);
        write(root, "vendor/lib.c", &body);
        write(root, "node_modules/dep/index.js", &body);

        let mut cfg = CorpusConfig::default();
        cfg.filters.ignore_globs.push("vendor/**".into());
        cfg.limits.min_file_bytes = 16;

        let scan = scan_repo(root, &cfg).unwrap();
        let rels: Vec<&str> = scan.files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["src/a.py", "src/z.c"]);
        assert_eq!(scan.stats.too_small, 1);
        assert_eq!(scan.stats.ignored, 1);
        assert_eq!(scan.files[1].language, LanguageKind::C);
    }

    #[test]
    fn language_allow_list_applies() {
        let dir = tempfile::tempdir().unwrap();
        let body = "def f():\n    return 1\n".repeat(8);
        write(dir.path(), "a.py", &body);
        write(dir.path(), "b.rs", &"fn f() {}\n".repeat(20));

        let mut cfg = CorpusConfig::default();
        cfg.filters.languages = vec!["rust".into()];
        let scan = scan_repo(dir.path(), &cfg).unwrap();
        assert_eq!(scan.files.len(), 1);
        assert_eq!(scan.files[0].rel_path, "b.rs");
    }

    #[test]
    fn missing_root_is_fatal() {
        let err = scan_repo(Path::new("/definitely/not/here"), &CorpusConfig::default());
        assert!(matches!(err, Err(CorpusError::RepositoryNotFound(_))));
    }
}
