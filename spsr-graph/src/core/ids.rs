//! Stable identifiers and content hashing utilities.
//!
//! - UUID v5 (namespace/name-based) for deterministic unit IDs;
//! - Simple FNV-1a 64-bit content hash used for duplicate-file detection.

use crate::model::{
    language::LanguageKind,
    span::Span,
    unit::{UnitId, UnitKind},
};
use uuid::Uuid;

/// Compute a deterministic UUID v5 from a logical key.
#[inline]
pub fn uuid_v5_from_key(key: &str) -> String {
    Uuid::new_v5(&Uuid::nil(), key.as_bytes()).to_string()
}

/// Stable unit ID: language + file + byte range + name + kind.
pub fn unit_id(
    language: LanguageKind,
    file: &str,
    span: &Span,
    name: &str,
    kind: UnitKind,
) -> UnitId {
    let key = format!(
        "unit|{}|{}|{}-{}|{}|{}",
        language, file, span.start_byte, span.end_byte, name, kind
    );
    UnitId(uuid_v5_from_key(&key))
}

/// FNV-1a 64-bit content hash as a lowercase hex string.
pub fn hash_content(bytes: &[u8]) -> String {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{:016x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ids_are_deterministic_and_distinct() {
        let span = Span::new(1, 3, 0, 42);
        let a = unit_id(LanguageKind::C, "src/a.c", &span, "main", UnitKind::Function);
        let b = unit_id(LanguageKind::C, "src/a.c", &span, "main", UnitKind::Function);
        let c = unit_id(LanguageKind::C, "src/b.c", &span, "main", UnitKind::Function);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fnv_hash_known_values() {
        assert_eq!(hash_content(b""), "cbf29ce484222325");
        assert_eq!(hash_content(b"a"), "af63dc4c8601ec8c");
    }
}
