//! Language taxonomy and helpers.
//!
//! This module stays free of Tree-sitter grammars; the grammar mapping and
//! the per-language syntax tables live under `crate::languages`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Supported source languages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    C,
    Python,
    JavaScript,
    TypeScript,
    Rust,
}

impl Display for LanguageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LanguageKind::C => "c",
            LanguageKind::Python => "python",
            LanguageKind::JavaScript => "javascript",
            LanguageKind::TypeScript => "typescript",
            LanguageKind::Rust => "rust",
        })
    }
}

impl LanguageKind {
    /// Best-effort detection by file extension.
    ///
    /// Returns `None` for unsupported extensions. C++ sources are not mapped:
    /// the C grammar rejects most of them.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let e = ext.to_ascii_lowercase();
        match e.as_str() {
            "c" | "h" => Some(Self::C),
            "py" => Some(Self::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "tsx" => Some(Self::TypeScript),
            "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    /// Whether symbols may resolve across files of these two languages.
    pub fn links_with(self, other: Self) -> bool {
        self == other
            || matches!(
                (self, other),
                (Self::JavaScript, Self::TypeScript) | (Self::TypeScript, Self::JavaScript)
            )
    }

    /// Parse a language name as written in configs (`"c"`, `"python"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "c" => Some(Self::C),
            "python" | "py" => Some(Self::Python),
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "rust" | "rs" => Some(Self::Rust),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping_is_case_insensitive() {
        assert_eq!(LanguageKind::from_extension("C"), Some(LanguageKind::C));
        assert_eq!(LanguageKind::from_extension("h"), Some(LanguageKind::C));
        assert_eq!(LanguageKind::from_extension("tsx"), Some(LanguageKind::TypeScript));
        assert_eq!(LanguageKind::from_extension("cpp"), None);
    }

    #[test]
    fn names_round_trip_through_display() {
        for lang in [
            LanguageKind::C,
            LanguageKind::Python,
            LanguageKind::JavaScript,
            LanguageKind::TypeScript,
            LanguageKind::Rust,
        ] {
            assert_eq!(LanguageKind::from_name(&lang.to_string()), Some(lang));
        }
    }
}
