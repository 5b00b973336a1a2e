//! Configuration data structures for the corpus pipeline.
//!
//! Groups:
//! - [`CorpusConfig`]   — top-level container for all config groups
//! - [`Filters`]        — which files to include/exclude
//! - [`Limits`]         — file size bounds and parser limits
//! - [`SamplingConfig`] — chain traversal and assembly parameters
//! - [`OutputConfig`]   — artifact layout and toggles
//!
//! All structs are `serde`-friendly so they can be loaded from YAML/JSON;
//! missing fields fall back to defaults.

use crate::error::{CorpusError, Result};
use crate::model::{language::LanguageKind, unit::UnitKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub filters: Filters,
    pub limits: Limits,
    pub sampling: SamplingConfig,
    pub output: OutputConfig,
    /// Worker threads for parsing and sampling (0 = rayon default).
    pub threads: usize,
}

impl CorpusConfig {
    /// Validate config sanity (no degenerate values).
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_file_bytes == 0 {
            return Err(invalid("`max_file_bytes` must be greater than 0"));
        }
        if self.limits.min_file_bytes > self.limits.max_file_bytes {
            return Err(invalid(format!(
                "`min_file_bytes` ({}) exceeds `max_file_bytes` ({})",
                self.limits.min_file_bytes, self.limits.max_file_bytes
            )));
        }
        if self.limits.max_ast_depth == 0 {
            return Err(invalid("`max_ast_depth` must be greater than 0"));
        }
        self.sampling.validate()?;
        if self.output.file_separator.is_empty() {
            return Err(invalid("`file_separator` must not be empty"));
        }
        for name in &self.filters.languages {
            if LanguageKind::from_name(name).is_none() {
                return Err(invalid(format!("unknown language `{name}`")));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> CorpusError {
    CorpusError::InvalidConfig(msg.into())
}

/// File filtering rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Glob patterns (matched against repo-relative paths) to skip.
    pub ignore_globs: Vec<String>,
    /// Language allow-list by name; empty means every supported language.
    pub languages: Vec<String>,
    /// Skip files whose content is byte-identical to an earlier file.
    pub dedupe_by_content: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            ignore_globs: vec![
                "**/.git/**".into(),
                "**/node_modules/**".into(),
                "**/__pycache__/**".into(),
                "**/build/**".into(),
                "**/dist/**".into(),
                "**/target/**".into(),
                "**/venv/**".into(),
                "**/.venv/**".into(),
                "**/*.min.js".into(),
            ],
            languages: Vec::new(),
            dedupe_by_content: true,
        }
    }
}

impl Filters {
    /// Resolved language allow-list; `None` means no restriction.
    pub fn language_set(&self) -> Option<Vec<LanguageKind>> {
        if self.languages.is_empty() {
            return None;
        }
        Some(
            self.languages
                .iter()
                .filter_map(|n| LanguageKind::from_name(n))
                .collect(),
        )
    }
}

/// Size and parser limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Files smaller than this are skipped (bytes). 0 keeps everything.
    pub min_file_bytes: usize,
    /// Files larger than this are skipped (bytes).
    pub max_file_bytes: usize,
    /// Syntax nodes deeper than this are not materialized.
    pub max_ast_depth: usize,
    /// Treat any syntax error node as a parse failure for the file.
    pub strict_syntax: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_file_bytes: 0,
            max_file_bytes: 2 * 1024 * 1024, // 2 MB
            max_ast_depth: 256,
            strict_syntax: true,
        }
    }
}

/// Chain generation and assembly parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Maximum expansion steps from the target unit (>= 1).
    pub max_depth: usize,
    /// Maximum edges followed per kind at each unit (>= 1).
    pub max_children: usize,
    /// Follow `uses-type` edges into class/struct units.
    pub include_structs: bool,
    /// Context length budget in Unicode scalar values.
    pub length_budget: usize,
    /// Unit kinds that become completion targets.
    pub target_kinds: Vec<UnitKind>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_children: 5,
            include_structs: true,
            length_budget: 8192,
            target_kinds: vec![
                UnitKind::Function,
                UnitKind::Method,
                UnitKind::Class,
                UnitKind::Struct,
            ],
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(invalid("`max_depth` must be at least 1"));
        }
        if self.max_children == 0 {
            return Err(invalid("`max_children` must be at least 1"));
        }
        if self.length_budget == 0 {
            return Err(invalid("`length_budget` must be greater than 0"));
        }
        Ok(())
    }
}

/// Artifact layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory; default is `<root>/spsr_corpus/<timestamp>`.
    pub out_dir: Option<PathBuf>,
    /// Marker line opening every file section of a context text.
    pub file_separator: String,
    pub write_graphml: bool,
    pub write_graph_jsonl: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: None,
            file_separator: "<|file_sep|>".into(),
            write_graphml: true,
            write_graph_jsonl: true,
        }
    }
}
