//! Content-derived references with intrinsic height.
//!
//! A [`Ref`] is an opaque handle to a value: its content hash, the type of
//! the referenced value, and its *height*. Height is
//! `1 + max(height of every reference transitively contained within the
//! referenced value)`; a value containing no references gives its
//! references height 1. Because height is a function of content, any two
//! references to the same content carry the same height — no external
//! bookkeeping is needed, and comparing heights is free.
//!
//! The ancestry engine leans on one invariant: height strictly decreases
//! along parent edges, since a commit contains references to its parents.

use serde::Serialize;

use super::hash::{ContentHash, content_hash};
use super::Value;
use crate::types::Type;

/// An opaque reference to a value: content hash, intrinsic height, and the
/// target's type.
///
/// Two references to the same content are equal in every component; the
/// ancestry engine compares references by [`Ref::target_hash`] alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ref {
    target_hash: ContentHash,
    height: u64,
    target_type: Type,
}

impl Ref {
    /// Build a reference to `value`, computing its hash and height.
    #[must_use]
    pub fn new(value: &Value) -> Self {
        Self {
            target_hash: content_hash(value),
            height: value.max_ref_height() + 1,
            target_type: value.type_of(),
        }
    }

    /// The content hash identifying the referenced value.
    #[must_use]
    pub fn target_hash(&self) -> ContentHash {
        self.target_hash
    }

    /// The reference's intrinsic height (≥ 1).
    #[must_use]
    pub fn height(&self) -> u64 {
        self.height
    }

    /// The structural type of the referenced value.
    #[must_use]
    pub fn target_type(&self) -> &Type {
        &self.target_type
    }
}
