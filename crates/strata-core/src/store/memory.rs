//! In-memory value store.
//!
//! The reference [`ValueReader`]/[`ValueWriter`] implementation: a hash map
//! keyed by content hash. Used as the deterministic fixture throughout the
//! test suite and suitable as a scratch store for small in-process work.

use std::collections::HashMap;

use super::{StoreError, ValueReader, ValueWriter};
use crate::value::{ContentHash, Ref, Value};

/// An in-memory, content-addressed value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<ContentHash, Value>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if the store holds content for `hash`.
    #[must_use]
    pub fn contains(&self, hash: ContentHash) -> bool {
        self.values.contains_key(&hash)
    }
}

impl ValueReader for MemoryStore {
    fn read_value(&self, hash: ContentHash) -> Result<Value, StoreError> {
        self.values
            .get(&hash)
            .cloned()
            .ok_or(StoreError::Missing { hash })
    }
}

impl ValueWriter for MemoryStore {
    fn write_value(&mut self, value: Value) -> Ref {
        let r = Ref::new(&value);
        self.values.insert(r.target_hash(), value);
        tracing::trace!(hash = %r.target_hash(), height = r.height(), "stored value");
        r
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
