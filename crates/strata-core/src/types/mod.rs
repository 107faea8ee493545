//! Structural type algebra for commit-typed values.
//!
//! Types here are *structural*: a type is described entirely by its shape
//! (field names and types, element types), never by a declared identity.
//! Two types with identical shape are the same type, compare equal, and
//! hash identically. The commit type computation in [`crate::commit`]
//! depends on three semantics that must stay exact:
//!
//! - **Union normalization**: nested unions flatten, duplicate members
//!   collapse structurally, and members sit in one canonical order. Thus
//!   `union(T, T) == T`, and member order never leaks into content hashes.
//! - **Cyclic placeholders**: self-referential struct types are expressed
//!   with [`Type::Cycle`], a De Bruijn-style back-reference to an enclosing
//!   struct, instead of infinite expansion. `Cycle<0>` names the nearest
//!   enclosing struct.
//! - **Structural subtyping**: [`is_subtype`] answers whether a concrete
//!   type fits a required bound, resolving cyclic placeholders against the
//!   enclosing structs they point at.
//!
//! Struct fields are kept sorted by field name. This makes the Commit
//! struct's contractual field order (`meta`, `parents`, `value`) the
//! natural order with no special casing.

mod subtype;

pub use subtype::is_subtype;

use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

/// A structural type.
///
/// The variant set is deliberately closed and small so that every
/// introspection site in the commit algebra is a total match over it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Type {
    /// Boolean primitive.
    Bool,
    /// Signed 64-bit integer primitive.
    Int,
    /// UTF-8 string primitive.
    String,
    /// The top type: every value is usable where `Value` is required.
    Value,
    /// A named (possibly anonymously-named) struct with typed fields.
    Struct(StructType),
    /// A set whose elements satisfy the given element type.
    Set(Box<Type>),
    /// A reference to a value of the given target type.
    Ref(Box<Type>),
    /// One of a set of alternative types. Always normalized: flattened,
    /// deduplicated, members in canonical order. The empty union is the
    /// element type of an empty set.
    Union(Vec<Type>),
    /// Back-reference to the i-th enclosing struct (0 = nearest). Used to
    /// express self-referential struct types without infinite expansion.
    Cycle(u32),
}

impl Type {
    /// `Set<elem>`.
    #[must_use]
    pub fn set_of(elem: Self) -> Self {
        Self::Set(Box::new(elem))
    }

    /// `Ref<target>`.
    #[must_use]
    pub fn ref_of(target: Self) -> Self {
        Self::Ref(Box::new(target))
    }

    /// Build the normalized union of `members`.
    ///
    /// Nested unions are flattened one level (members are already
    /// normalized, so one level suffices), duplicates are removed by
    /// structural equality, and the result is sorted into canonical order.
    /// A single surviving member is returned as itself, so
    /// `union_of([T]) == T` and `union_of([T, T]) == T`.
    #[must_use]
    pub fn union_of(members: Vec<Self>) -> Self {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Self::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Self::Union(flat)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("Bool"),
            Self::Int => f.write_str("Int"),
            Self::String => f.write_str("String"),
            Self::Value => f.write_str("Value"),
            Self::Struct(st) => st.fmt(f),
            Self::Set(elem) => write!(f, "Set<{elem}>"),
            Self::Ref(target) => write!(f, "Ref<{target}>"),
            Self::Union(members) => {
                if members.is_empty() {
                    return f.write_str("Union<>");
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    member.fmt(f)?;
                }
                Ok(())
            }
            Self::Cycle(index) => write!(f, "Cycle<{index}>"),
        }
    }
}

// ---------------------------------------------------------------------------
// StructType
// ---------------------------------------------------------------------------

/// The shape of a struct type: a name plus fields sorted by field name.
///
/// An empty name is the struct wildcard for subtyping purposes: a required
/// struct with an empty name matches a concrete struct of any name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StructType {
    name: String,
    fields: Vec<(String, Type)>,
}

impl StructType {
    /// Build a struct type. Fields are sorted by name on construction.
    ///
    /// # Panics
    ///
    /// Panics if two fields share a name; a struct type declaring the same
    /// field twice is a construction bug.
    #[must_use]
    pub fn new(name: impl Into<String>, mut fields: Vec<(String, Type)>) -> Self {
        let name = name.into();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for pair in fields.windows(2) {
            assert!(
                pair[0].0 != pair[1].0,
                "duplicate field `{}` in struct `{name}`",
                pair[0].0
            );
        }
        Self { name, fields }
    }

    /// The struct's name. Empty for the anonymous wildcard struct.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declared (name-sorted) order.
    #[must_use]
    pub fn fields(&self) -> &[(String, Type)] {
        &self.fields
    }

    /// Look up a field's type by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, ty)| ty)
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("struct ")?;
        if !self.name.is_empty() {
            write!(f, "{} ", self.name)?;
        }
        f.write_str("{")?;
        for (i, (name, ty)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {ty}")?;
        }
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_of_single_member_is_the_member() {
        assert_eq!(Type::union_of(vec![Type::Int]), Type::Int);
    }

    #[test]
    fn union_is_idempotent() {
        assert_eq!(Type::union_of(vec![Type::Int, Type::Int]), Type::Int);
    }

    #[test]
    fn union_is_commutative() {
        let a = Type::union_of(vec![Type::Int, Type::String]);
        let b = Type::union_of(vec![Type::String, Type::Int]);
        assert_eq!(a, b);
    }

    #[test]
    fn union_flattens_nested_unions() {
        let inner = Type::union_of(vec![Type::Int, Type::Bool]);
        let outer = Type::union_of(vec![inner, Type::String]);
        assert_eq!(
            outer,
            Type::union_of(vec![Type::Bool, Type::Int, Type::String])
        );
        // No nested union survives normalization.
        let Type::Union(members) = &outer else {
            panic!("expected a union, got {outer}");
        };
        assert!(members.iter().all(|m| !matches!(m, Type::Union(_))));
    }

    #[test]
    fn union_of_nothing_is_the_empty_union() {
        assert_eq!(Type::union_of(vec![]), Type::Union(vec![]));
    }

    #[test]
    fn struct_fields_sorted_by_name() {
        let st = StructType::new(
            "Commit",
            vec![
                ("value".to_owned(), Type::Int),
                ("meta".to_owned(), Type::String),
                ("parents".to_owned(), Type::set_of(Type::ref_of(Type::Cycle(0)))),
            ],
        );
        let names: Vec<&str> = st.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["meta", "parents", "value"]);
    }

    #[test]
    #[should_panic(expected = "duplicate field")]
    fn struct_rejects_duplicate_fields() {
        let _ = StructType::new(
            "Bad",
            vec![("a".to_owned(), Type::Int), ("a".to_owned(), Type::Bool)],
        );
    }

    #[test]
    fn display_renders_shapes() {
        assert_eq!(Type::set_of(Type::ref_of(Type::Cycle(0))).to_string(), "Set<Ref<Cycle<0>>>");
        assert_eq!(
            Type::union_of(vec![Type::Int, Type::String]).to_string(),
            "Int | String"
        );
        assert_eq!(Type::Union(vec![]).to_string(), "Union<>");
        let st = StructType::new("Commit", vec![("value".to_owned(), Type::Int)]);
        assert_eq!(st.to_string(), "struct Commit {value: Int}");
    }

    #[test]
    fn structural_equality_ignores_declaration_order() {
        let a = StructType::new(
            "S",
            vec![("x".to_owned(), Type::Int), ("y".to_owned(), Type::Bool)],
        );
        let b = StructType::new(
            "S",
            vec![("y".to_owned(), Type::Bool), ("x".to_owned(), Type::Int)],
        );
        assert_eq!(a, b);
    }
}
