//! Coinductive structural subtype checking.
//!
//! `is_subtype(required, concrete)` answers: can a value of type `concrete`
//! be used where `required` is demanded? The check is purely structural.
//!
//! # Rules
//!
//! - `Value` (the top type) accepts everything.
//! - A concrete union fits only if *every* member fits the requirement; a
//!   required union is satisfied if the concrete type fits *any* member.
//! - Sets and refs are covariant in their element/target type.
//! - A required struct matches a concrete struct when the names agree (an
//!   empty required name is the wildcard) and every required field exists
//!   in the concrete struct with a fitting type. Extra concrete fields are
//!   allowed.
//!
//! # Cycle handling
//!
//! A concrete [`Type::Cycle`] stands for an enclosing struct, so the walk
//! carries the stack of concrete structs it has descended through and
//! resolves the back-reference against it. Resolution can re-enter the
//! same struct pair; an assumption set makes the check coinductive (a pair
//! already under comparison is assumed to hold), which guarantees
//! termination on self-referential types.

use std::collections::HashSet;

use super::{StructType, Type};

/// Structural subtype test: true iff `concrete` can be used where
/// `required` is demanded.
#[must_use]
pub fn is_subtype(required: &Type, concrete: &Type) -> bool {
    check(required, concrete, &mut Vec::new(), &mut HashSet::new())
}

fn check(
    required: &Type,
    concrete: &Type,
    enclosing: &mut Vec<StructType>,
    assumed: &mut HashSet<(Type, Type)>,
) -> bool {
    match (required, concrete) {
        (Type::Value, _) => true,
        (_, Type::Union(members)) => members
            .iter()
            .all(|member| check(required, member, enclosing, assumed)),
        (Type::Union(members), _) => members
            .iter()
            .any(|member| check(member, concrete, enclosing, assumed)),
        (Type::Bool, Type::Bool) | (Type::Int, Type::Int) | (Type::String, Type::String) => true,
        (Type::Set(required_elem), Type::Set(concrete_elem))
        | (Type::Ref(required_elem), Type::Ref(concrete_elem)) => {
            check(required_elem, concrete_elem, enclosing, assumed)
        }
        (Type::Struct(required_st), Type::Struct(concrete_st)) => {
            check_struct(required_st, concrete_st, enclosing, assumed)
        }
        (Type::Struct(_), Type::Cycle(index)) => {
            // Resolve the back-reference against the enclosing concrete
            // structs. A free cycle variable has nothing to stand for and
            // cannot satisfy a struct requirement.
            let Some(position) = enclosing.len().checked_sub(1 + *index as usize) else {
                return false;
            };
            let resolved = Type::Struct(enclosing[position].clone());
            // Indices inside the resolved struct are relative to its own
            // nesting depth, so the stack is trimmed back to that depth.
            let mut trimmed = enclosing[..position].to_vec();
            check(required, &resolved, &mut trimmed, assumed)
        }
        (Type::Cycle(required_index), Type::Cycle(concrete_index)) => {
            required_index == concrete_index
        }
        _ => false,
    }
}

fn check_struct(
    required: &StructType,
    concrete: &StructType,
    enclosing: &mut Vec<StructType>,
    assumed: &mut HashSet<(Type, Type)>,
) -> bool {
    if !required.name().is_empty() && required.name() != concrete.name() {
        return false;
    }
    let pair = (
        Type::Struct(required.clone()),
        Type::Struct(concrete.clone()),
    );
    if !assumed.insert(pair.clone()) {
        // Already comparing this pair further up the walk: assume it holds.
        return true;
    }
    enclosing.push(concrete.clone());
    let ok = required.fields().iter().all(|(name, required_field)| {
        concrete
            .field(name)
            .is_some_and(|concrete_field| check(required_field, concrete_field, enclosing, assumed))
    });
    enclosing.pop();
    if !ok {
        // A failed assumption must not satisfy later queries of the same
        // pair; only pairs that held stay cached.
        assumed.remove(&pair);
    }
    ok
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
