//! Named head bookkeeping.
//!
//! A [`Dataset`] maps a human-readable name to the current head commit of
//! one line of history. It is a thin wrapper over the commit core:
//! "updating history" constructs a new commit whose parents are the
//! current head, persists it, and moves the name — nothing is ever
//! mutated or deleted.

use crate::commit::Commit;
use crate::store::{StoreError, ValueReader, ValueWriter};
use crate::value::{Ref, SetValue, Value};

/// Errors from dataset bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// The dataset name contains characters outside `[a-zA-Z0-9\-_/]`.
    #[error("invalid dataset name `{0}`: allowed characters are a-z A-Z 0-9 - _ /")]
    InvalidName(String),
}

/// True iff `name` is a legal dataset name: non-empty, drawn entirely
/// from `[a-zA-Z0-9\-_/]`.
#[must_use]
pub fn is_valid_dataset_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/'))
}

/// A named pointer to a current head commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    id: String,
    head: Option<Ref>,
}

impl Dataset {
    /// Create a dataset handle. `head` is `None` for a dataset with no
    /// history yet.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidName`] if the name is not legal.
    pub fn new(id: impl Into<String>, head: Option<Ref>) -> Result<Self, DatasetError> {
        let id = id.into();
        if !is_valid_dataset_name(&id) {
            return Err(DatasetError::InvalidName(id));
        }
        Ok(Self { id, head })
    }

    /// The dataset's name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The reference to the current head commit, if any.
    #[must_use]
    pub fn head_ref(&self) -> Option<&Ref> {
        self.head.as_ref()
    }

    /// The current head commit, if any.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] if the head cannot be dereferenced.
    pub fn head<R: ValueReader>(&self, reader: &R) -> Result<Option<Commit>, StoreError> {
        self.head
            .as_ref()
            .map(|r| reader.deref(r).map(Commit::from_value))
            .transpose()
    }

    /// The `value` field of the current head commit, if any.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] if the head cannot be dereferenced.
    pub fn head_value<R: ValueReader>(&self, reader: &R) -> Result<Option<Value>, StoreError> {
        Ok(self.head(reader)?.map(|c| c.value().clone()))
    }

    /// Commit `value` with `meta` on top of the current head, persist the
    /// new commit, and return the moved dataset alongside it.
    ///
    /// The new commit's parents are `{head}`, or the empty set for a
    /// dataset with no history.
    pub fn advance<W: ValueWriter>(
        self,
        value: Value,
        meta: Value,
        writer: &mut W,
    ) -> (Self, Commit) {
        let parents = match &self.head {
            Some(head) => SetValue::new(vec![Value::Ref(head.clone())]),
            None => SetValue::empty(),
        };
        let commit = Commit::new(value, parents, meta);
        let head = writer.write_value(commit.to_value());
        tracing::debug!(
            dataset = %self.id,
            head = %head.target_hash(),
            height = head.height(),
            "advanced dataset head"
        );
        (
            Self {
                id: self.id,
                head: Some(head),
            },
            commit,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
