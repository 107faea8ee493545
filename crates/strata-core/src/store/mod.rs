//! Value-store capability boundary.
//!
//! The commit core never owns storage. It consumes two capabilities:
//! [`ValueReader`] (resolve a content hash to its value) and
//! [`ValueWriter`] (persist a new immutable value, receiving a reference).
//! Both are injected explicitly into every operation that needs them, so
//! tests run against the in-memory [`MemoryStore`] and production callers
//! can supply whatever chunk store, cache, or network tier they own.
//!
//! Dereference may block on I/O and may fail when content is absent;
//! failures propagate unchanged through ancestry traversal — no retry, no
//! partial-result caching. A caller wanting resilience wraps the reader.

mod memory;

pub use memory::MemoryStore;

use crate::value::{ContentHash, Ref, Value};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by value-store capabilities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The requested content is not present in the store.
    #[error("value {hash} is not present in the store")]
    Missing {
        /// The hash that could not be resolved.
        hash: ContentHash,
    },
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Read capability: resolve content hashes to values.
pub trait ValueReader {
    /// Resolve a content hash to its value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if the content is not available.
    fn read_value(&self, hash: ContentHash) -> Result<Value, StoreError>;

    /// Dereference a reference to its target value.
    ///
    /// # Errors
    ///
    /// Same as [`ValueReader::read_value`].
    fn deref(&self, r: &Ref) -> Result<Value, StoreError> {
        self.read_value(r.target_hash())
    }
}

/// Write capability: persist a new immutable value.
pub trait ValueWriter {
    /// Persist `value` and return a reference to it.
    fn write_value(&mut self, value: Value) -> Ref;
}
