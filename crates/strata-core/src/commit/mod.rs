//! Commits and the commit type algebra.
//!
//! A commit is an immutable struct named `Commit` with exactly three
//! fields, in fixed order: `meta` (arbitrary caller-supplied metadata),
//! `parents` (a set of references to parent commits), and `value` (the
//! committed payload). That shape — the literal struct name and the field
//! order — is the binary-compatibility contract of the whole store: it
//! determines content hashes, so it must never drift.
//!
//! # Type evolution
//!
//! The type of a commit is computed from the types of its value, its meta,
//! and its parents. For a first commit with value type `T` and meta type
//! `M`:
//!
//! ```text
//! struct Commit {
//!   meta: M,
//!   parents: Set<Ref<Cycle<0>>>,
//!   value: T,
//! }
//! ```
//!
//! As long as commits keep value type `T` and meta type `M`, the type is
//! literally recursive via the cyclic placeholder and stays identical
//! along the whole chain. When a commit introduces a value of type `U`
//! (or a meta of a new type), the ancestors' shapes are folded into the
//! parents field as unions:
//!
//! ```text
//! struct Commit {
//!   meta: M,
//!   parents: Set<Ref<struct Commit {
//!     meta: M,
//!     parents: Set<Ref<Cycle<0>>>,
//!     value: T | U,
//!   }>>,
//!   value: U,
//! }
//! ```
//!
//! Commits of evolving schema thereby co-exist in one ancestry with no
//! lossy coercion: widening happens in the type, via union, not in the
//! data. The union lives in the type of the commit that merges divergent
//! shapes; a later commit whose own value and meta types already equal
//! the union of its parents' declared field types regains the cyclic
//! form.

use std::sync::LazyLock;

use crate::types::{StructType, Type, is_subtype};
use crate::value::{ContentHash, Ref, SetValue, StructValue, Value};

/// Field name for commit metadata.
pub const META_FIELD: &str = "meta";
/// Field name for the parent reference set.
pub const PARENTS_FIELD: &str = "parents";
/// Field name for the committed payload.
pub const VALUE_FIELD: &str = "value";
/// The contractual struct name of every commit.
pub const COMMIT_NAME: &str = "Commit";

/// The maximally-general commit type: any value usable as a commit is a
/// structural subtype of this.
static GENERAL_COMMIT_TYPE: LazyLock<Type> = LazyLock::new(|| {
    Type::Struct(StructType::new(
        COMMIT_NAME,
        vec![
            (META_FIELD.to_owned(), Type::Value),
            (
                PARENTS_FIELD.to_owned(),
                Type::set_of(Type::ref_of(Type::Struct(StructType::new("", vec![])))),
            ),
            (VALUE_FIELD.to_owned(), Type::Value),
        ],
    ))
});

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// An immutable commit: one node of the Merkle-DAG version history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    inner: StructValue,
}

impl Commit {
    /// Construct a commit, computing its minimal structural type.
    ///
    /// The parents' declared value and meta types are collected from the
    /// parent set, unioned with the new commit's own types, and the
    /// homogeneous (cyclic) or heterogeneous (union-widened) commit type
    /// is emitted accordingly. Construction is total over well-typed
    /// inputs and has no side effects; persisting the result is the
    /// caller's job.
    ///
    /// # Panics
    ///
    /// Panics if `parents` contains anything other than references to
    /// commit-typed values — a contract violation by the caller, not a
    /// recoverable error.
    #[must_use]
    pub fn new(value: Value, parents: SetValue, meta: Value) -> Self {
        let ty = make_commit_type(
            &value.type_of(),
            field_types_from_parents(&parents, VALUE_FIELD),
            &meta.type_of(),
            field_types_from_parents(&parents, META_FIELD),
        );
        tracing::debug!(parents = parents.len(), commit_type = %ty, "constructing commit");
        let inner = StructValue::with_type(ty, vec![meta, Value::Set(parents), value]);
        Self { inner }
    }

    /// Treat an arbitrary value as a commit.
    ///
    /// This is the single validation gate for values arriving from the
    /// store: ancestry traversal funnels every dereferenced parent
    /// through here.
    ///
    /// # Panics
    ///
    /// Panics with an expected-vs-actual diagnostic if the value's type
    /// does not satisfy [`is_commit_type`].
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let ty = value.type_of();
        assert!(
            is_commit_type(&ty),
            "expected a value of Commit type, got {ty}"
        );
        match value {
            Value::Struct(inner) => Self { inner },
            _ => unreachable!("non-struct value cannot satisfy the Commit type"),
        }
    }

    /// The commit's computed structural type.
    #[must_use]
    pub fn ty(&self) -> &Type {
        self.inner.ty()
    }

    /// The commit metadata.
    #[must_use]
    pub fn meta(&self) -> &Value {
        self.field(META_FIELD)
    }

    /// The committed payload.
    #[must_use]
    pub fn value(&self) -> &Value {
        self.field(VALUE_FIELD)
    }

    /// The set of references to parent commits.
    #[must_use]
    pub fn parents(&self) -> &SetValue {
        match self.field(PARENTS_FIELD) {
            Value::Set(set) => set,
            other => panic!(
                "commit `parents` field must be a set, got {}",
                other.type_of()
            ),
        }
    }

    /// This commit as a plain value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Struct(self.inner.clone())
    }

    /// A reference to this commit.
    #[must_use]
    pub fn to_ref(&self) -> Ref {
        Ref::new(&self.to_value())
    }

    /// The commit's content hash.
    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        self.to_value().content_hash()
    }

    fn field(&self, name: &str) -> &Value {
        self.inner
            .get(name)
            .unwrap_or_else(|| panic!("commit struct is missing field `{name}`"))
    }
}

// ---------------------------------------------------------------------------
// Type predicates
// ---------------------------------------------------------------------------

/// True iff `t` is structurally usable as a commit type.
#[must_use]
pub fn is_commit_type(t: &Type) -> bool {
    is_subtype(&GENERAL_COMMIT_TYPE, t)
}

/// True iff `t` is a reference type whose target is a commit type.
#[must_use]
pub fn is_ref_of_commit_type(t: &Type) -> bool {
    matches!(t, Type::Ref(target) if is_commit_type(target))
}

// ---------------------------------------------------------------------------
// Type computation
// ---------------------------------------------------------------------------

fn cyclic_parents_type() -> Type {
    Type::set_of(Type::ref_of(Type::Cycle(0)))
}

/// Compute the commit type for a new commit.
///
/// `parents_value_types` / `parents_meta_types` are the field types the
/// parents' declared commit types expose. If unioning them with the new
/// commit's own types widens nothing, every ancestor already shares the
/// new commit's exact shape and the cyclic form is emitted; otherwise the
/// parents field declares one explicit inner `Commit` struct whose value
/// and meta fields carry the unions.
fn make_commit_type(
    value_type: &Type,
    parents_value_types: Vec<Type>,
    meta_type: &Type,
    parents_meta_types: Vec<Type>,
) -> Type {
    let mut value_members = parents_value_types;
    value_members.push(value_type.clone());
    let value_union = Type::union_of(value_members);

    let mut meta_members = parents_meta_types;
    meta_members.push(meta_type.clone());
    let meta_union = Type::union_of(meta_members);

    let parents_type = if value_union == *value_type && meta_union == *meta_type {
        cyclic_parents_type()
    } else {
        Type::set_of(Type::ref_of(Type::Struct(StructType::new(
            COMMIT_NAME,
            vec![
                (META_FIELD.to_owned(), meta_union),
                (PARENTS_FIELD.to_owned(), cyclic_parents_type()),
                (VALUE_FIELD.to_owned(), value_union),
            ],
        ))))
    };

    Type::Struct(StructType::new(
        COMMIT_NAME,
        vec![
            (META_FIELD.to_owned(), meta_type.clone()),
            (PARENTS_FIELD.to_owned(), parents_type),
            (VALUE_FIELD.to_owned(), value_type.clone()),
        ],
    ))
}

/// Collect the distinct types a named field takes across the parents'
/// declared commit types.
///
/// The parent set's element type is a `Ref<Commit...>` when every parent
/// shares one commit type, a union of such refs when shapes differ, and
/// the empty union for the empty set (no parents, no contributed types).
fn field_types_from_parents(parents: &SetValue, field: &str) -> Vec<Type> {
    match parents.element_type() {
        Type::Union(members) => members
            .iter()
            .map(|member| commit_field_type(ref_target_type(member), field))
            .collect(),
        single => vec![commit_field_type(ref_target_type(&single), field)],
    }
}

/// The target type of a reference type.
fn ref_target_type(t: &Type) -> &Type {
    match t {
        Type::Ref(target) => target,
        other => panic!("expected a Ref type, got {other}"),
    }
}

/// The type a named field takes in a commit struct type.
fn commit_field_type(t: &Type, field: &str) -> Type {
    let Type::Struct(st) = t else {
        panic!("expected a Commit struct type, got {t}");
    };
    assert!(
        st.name() == COMMIT_NAME,
        "expected a struct named `{COMMIT_NAME}`, got `{}`",
        st.name()
    );
    st.field(field)
        .cloned()
        .unwrap_or_else(|| panic!("commit type is missing field `{field}`"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
