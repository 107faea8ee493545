//! Content hashing for values.
//!
//! A value's identity is the BLAKE3 hash of its canonical serialization,
//! rendered `blake3:<lowercase hex>`. Identical content always yields the
//! same hash; nothing else participates in identity.
//!
//! # Canonical serialization
//!
//! The hash input is the compact JSON encoding of the value model. It is
//! deterministic by construction: struct fields serialize in declared
//! (name-sorted) order, set elements are pre-sorted by their own content
//! hash, and references contribute their target hash, height, and target
//! type rather than the referenced content. The same logical value always
//! produces the same byte sequence.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::Value;

// ---------------------------------------------------------------------------
// ContentHash
// ---------------------------------------------------------------------------

/// A 32-byte BLAKE3 content hash identifying a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// View the raw hash bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("blake3:")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error parsing a `blake3:<hex>` hash string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("content hash must look like blake3:<64 hex chars>, got `{0}`")]
pub struct ParseHashError(String);

impl FromStr for ContentHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("blake3:")
            .ok_or_else(|| ParseHashError(s.to_owned()))?;
        let hash = blake3::Hash::from_hex(hex).map_err(|_| ParseHashError(s.to_owned()))?;
        Ok(Self(*hash.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Compute the content hash of a value.
#[must_use]
pub fn content_hash(value: &Value) -> ContentHash {
    let hash = blake3::hash(&canonical_bytes(value));
    ContentHash(*hash.as_bytes())
}

/// The canonical byte encoding a value's hash is computed over.
#[must_use]
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).expect("value serialization cannot fail")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{SetValue, StructValue};

    #[test]
    fn hash_is_deterministic() {
        let v = Value::Int(42);
        assert_eq!(content_hash(&v), content_hash(&v.clone()));
    }

    #[test]
    fn different_content_different_hash() {
        assert_ne!(content_hash(&Value::Int(1)), content_hash(&Value::Int(2)));
        assert_ne!(
            content_hash(&Value::Int(1)),
            content_hash(&Value::String("1".to_owned()))
        );
    }

    #[test]
    fn display_and_parse_roundtrip() {
        let h = content_hash(&Value::Bool(true));
        let rendered = h.to_string();
        assert!(rendered.starts_with("blake3:"));
        assert_eq!(rendered.len(), "blake3:".len() + 64);
        let parsed: ContentHash = rendered.parse().expect("rendered hash parses");
        assert_eq!(parsed, h);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(ContentHash::from_str("sha256:abc").is_err());
        assert!(ContentHash::from_str("blake3:zz").is_err());
        assert!(ContentHash::from_str("").is_err());
    }

    #[test]
    fn set_hash_ignores_insertion_order() {
        let a = SetValue::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = SetValue::new(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
        assert_eq!(content_hash(&Value::Set(a)), content_hash(&Value::Set(b)));
    }

    #[test]
    fn struct_hash_ignores_field_declaration_order() {
        let a = StructValue::new(
            "Point",
            vec![
                ("x".to_owned(), Value::Int(1)),
                ("y".to_owned(), Value::Int(2)),
            ],
        );
        let b = StructValue::new(
            "Point",
            vec![
                ("y".to_owned(), Value::Int(2)),
                ("x".to_owned(), Value::Int(1)),
            ],
        );
        assert_eq!(
            content_hash(&Value::Struct(a)),
            content_hash(&Value::Struct(b))
        );
    }
}
