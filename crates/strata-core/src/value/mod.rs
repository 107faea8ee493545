//! Immutable, structurally-typed values.
//!
//! A [`Value`] is an immutable datum whose identity is its content: two
//! values with structurally identical content are indistinguishable and
//! hash identically (see [`hash`]). The variant set mirrors the type
//! algebra in [`crate::types`]:
//!
//! - primitives: [`Value::Bool`], [`Value::Int`], [`Value::String`];
//! - [`Value::Struct`]: named record carrying its *declared* type — the
//!   self-referential commit type is not derivable from field values
//!   alone, so struct values must remember what they were built as;
//! - [`Value::Set`]: canonically ordered by element content hash,
//!   deduplicated on construction;
//! - [`Value::Ref`]: an opaque content-derived pointer with intrinsic
//!   height (see [`refs`]).

pub mod hash;
pub mod refs;

pub use hash::{ContentHash, ParseHashError, content_hash};
pub use refs::Ref;

use serde::Serialize;

use crate::types::{StructType, Type};

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// An immutable, structurally-typed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Value {
    /// Boolean primitive.
    Bool(bool),
    /// Signed 64-bit integer primitive.
    Int(i64),
    /// UTF-8 string primitive.
    String(String),
    /// A struct value with a declared type.
    Struct(StructValue),
    /// A set of values, canonically ordered by content hash.
    Set(SetValue),
    /// A reference to another value.
    Ref(Ref),
}

impl Value {
    /// The structural type of this value.
    ///
    /// Struct values return their declared type; sets derive their element
    /// type as the union of the distinct element types present.
    #[must_use]
    pub fn type_of(&self) -> Type {
        match self {
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::String(_) => Type::String,
            Self::Struct(st) => st.ty().clone(),
            Self::Set(set) => Type::set_of(set.element_type()),
            Self::Ref(r) => Type::ref_of(r.target_type().clone()),
        }
    }

    /// The content hash identifying this value.
    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        content_hash(self)
    }

    /// The maximum height among references contained in this value, not
    /// following reference targets. Zero for values containing none.
    #[must_use]
    pub fn max_ref_height(&self) -> u64 {
        match self {
            Self::Bool(_) | Self::Int(_) | Self::String(_) => 0,
            Self::Struct(st) => st
                .fields()
                .iter()
                .map(|(_, v)| v.max_ref_height())
                .max()
                .unwrap_or(0),
            Self::Set(set) => set.iter().map(Self::max_ref_height).max().unwrap_or(0),
            Self::Ref(r) => r.height(),
        }
    }
}

// ---------------------------------------------------------------------------
// StructValue
// ---------------------------------------------------------------------------

/// A struct value: a declared struct type plus field values in declared
/// (name-sorted) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructValue {
    ty: Type,
    fields: Vec<(String, Value)>,
}

impl StructValue {
    /// Build a struct value, deriving its type from the field values.
    #[must_use]
    pub fn new(name: &str, mut fields: Vec<(String, Value)>) -> Self {
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let field_types = fields
            .iter()
            .map(|(field_name, value)| (field_name.clone(), value.type_of()))
            .collect();
        let ty = Type::Struct(StructType::new(name, field_types));
        Self { ty, fields }
    }

    /// Build a struct value against an already-computed type, supplying
    /// field values in the type's declared field order.
    ///
    /// This is the construction path for commits, whose declared type
    /// (cyclic or union-widened) is not derivable from the field values.
    ///
    /// # Panics
    ///
    /// Panics if `ty` is not a struct type, or if the number of values
    /// does not match the number of declared fields.
    #[must_use]
    pub fn with_type(ty: Type, values: Vec<Value>) -> Self {
        let Type::Struct(st) = &ty else {
            panic!("expected a struct type, got {ty}");
        };
        assert_eq!(
            st.fields().len(),
            values.len(),
            "struct `{}` declares {} fields but {} values were supplied",
            st.name(),
            st.fields().len(),
            values.len()
        );
        let fields = st
            .fields()
            .iter()
            .map(|(name, _)| name.clone())
            .zip(values)
            .collect();
        Self { ty, fields }
    }

    /// The declared type of this struct value.
    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Fields in declared (name-sorted) order.
    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Look up a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, value)| value)
    }
}

// ---------------------------------------------------------------------------
// SetValue
// ---------------------------------------------------------------------------

/// A set of values with content-hash-canonical ordering.
///
/// Construction sorts elements by their content hash and drops duplicates,
/// so two sets holding the same content are structurally equal regardless
/// of insertion order. Iteration order is deterministic, but callers must
/// not rely on it carrying meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetValue {
    elems: Vec<Value>,
}

impl SetValue {
    /// Build a set from elements, sorting canonically and deduplicating.
    #[must_use]
    pub fn new(elems: Vec<Value>) -> Self {
        let mut keyed: Vec<(ContentHash, Value)> = elems
            .into_iter()
            .map(|value| (content_hash(&value), value))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.dedup_by(|a, b| a.0 == b.0);
        Self {
            elems: keyed.into_iter().map(|(_, value)| value).collect(),
        }
    }

    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self { elems: Vec::new() }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// True if the set holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// True if the set holds a value with the given content hash.
    #[must_use]
    pub fn contains_hash(&self, hash: ContentHash) -> bool {
        self.elems.iter().any(|v| content_hash(v) == hash)
    }

    /// Iterate elements in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elems.iter()
    }

    /// The element type: the union of the distinct element types present.
    /// The empty set's element type is the empty union.
    #[must_use]
    pub fn element_type(&self) -> Type {
        Type::union_of(self.elems.iter().map(Value::type_of).collect())
    }
}

impl<'a> IntoIterator for &'a SetValue {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
