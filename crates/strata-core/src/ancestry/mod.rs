//! Ancestry queries over the commit Merkle-DAG.
//!
//! Commits are reachable only by dereferencing content hashes against an
//! injected [`ValueReader`], potentially from remote or lazy storage, so
//! neither query ever materializes the full graph. Both lean on the same
//! pruning bound: a reference's intrinsic height strictly decreases along
//! parent edges, so a branch that has fallen below the height of interest
//! can never climb back to it.
//!
//! # Operations
//!
//! - [`descends_from`]: does a commit reach a given reference by following
//!   zero or more `parents` edges? A breadth-expanding frontier walks
//!   outward in decreasing height bands, discarding refs at or below the
//!   target height.
//! - [`find_common_ancestor`]: the most recent common ancestor of two
//!   commits, if any. A synchronized dual-BFS over two height-ordered
//!   max-priority frontiers, advanced in lock-step by height — the only
//!   total order available without a full topological sort.
//!
//! # Edge Cases
//!
//! - A commit does not descend from itself unless its own reference sits
//!   among its ancestors.
//! - Disjoint histories (independent roots, no shared reference) yield
//!   `Ok(false)` / `Ok(None)` — a valid outcome, not an error.
//! - When several common references share the shallowest height, the one
//!   with the lexicographically smallest hash is returned, so results are
//!   deterministic across runs.
//!
//! Store failures (missing content, I/O) propagate unchanged; these
//! operations perform no retry and hold no state between calls.

mod frontier;

pub use frontier::HeightFrontier;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::commit::Commit;
use crate::store::{StoreError, ValueReader};
use crate::value::{ContentHash, Ref, Value};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// True iff `commit` descends from `ancestor` — that is, `ancestor` is
/// reachable by following one or more `parents` edges.
///
/// # Errors
///
/// Propagates [`StoreError`] from the reader unchanged.
///
/// # Panics
///
/// Panics if a dereferenced parent is not a commit-typed value (a
/// corrupted or mis-built parent set is a contract violation).
pub fn descends_from<R: ValueReader>(
    commit: &Commit,
    ancestor: &Ref,
    reader: &R,
) -> Result<bool, StoreError> {
    let mut frontier: HashMap<ContentHash, Ref> = commit
        .parents()
        .iter()
        .map(|parent| {
            let r = ref_from_parent(parent);
            (r.target_hash(), r)
        })
        .collect();

    loop {
        if frontier.contains_key(&ancestor.target_hash()) {
            return Ok(true);
        }
        if frontier.is_empty() {
            return Ok(false);
        }
        frontier = expand_above(&frontier, ancestor.height(), reader)?;
    }
}

/// Find the most recent common ancestor of `c1` and `c2`, if one exists.
///
/// Both search frontiers advance in lock-step by decreasing height. When
/// the two sides pop bands of equal height, any reference shared between
/// the bands is a most-recent common ancestor; ties at that height are
/// broken by smallest hash.
///
/// # Errors
///
/// Propagates [`StoreError`] from the reader unchanged.
///
/// # Panics
///
/// Panics if a dereferenced parent is not a commit-typed value.
pub fn find_common_ancestor<R: ValueReader>(
    c1: &Commit,
    c2: &Commit,
    reader: &R,
) -> Result<Option<Commit>, StoreError> {
    let mut q1 = HeightFrontier::new();
    let mut q2 = HeightFrontier::new();
    q1.push(c1.to_ref());
    q2.push(c2.to_ref());

    while let (Some(h1), Some(h2)) = (q1.max_height(), q2.max_height()) {
        match h1.cmp(&h2) {
            Ordering::Equal => {
                let band1 = q1.pop_max_band();
                let band2 = q2.pop_max_band();
                if let Some(common) = find_common_ref(&band1, &band2) {
                    tracing::debug!(
                        height = h1,
                        hash = %common.target_hash(),
                        "found common ancestor"
                    );
                    return Ok(Some(Commit::from_value(reader.deref(&common)?)));
                }
                push_parents(&band1, &mut q1, reader)?;
                push_parents(&band2, &mut q2, reader)?;
            }
            Ordering::Greater => {
                let band = q1.pop_max_band();
                push_parents(&band, &mut q1, reader)?;
            }
            Ordering::Less => {
                let band = q2.pop_max_band();
                push_parents(&band, &mut q2, reader)?;
            }
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// A parent-set element, as a reference.
fn ref_from_parent(parent: &Value) -> Ref {
    match parent {
        Value::Ref(r) => r.clone(),
        other => panic!(
            "commit parents must contain references, got {}",
            other.type_of()
        ),
    }
}

/// One breadth step: replace the frontier with the parents of every
/// member strictly above `min_height`, keeping only parents at or above
/// `min_height`.
///
/// Members at or below `min_height` are discarded outright — their
/// parents sit strictly below it and can never reach the target.
fn expand_above<R: ValueReader>(
    frontier: &HashMap<ContentHash, Ref>,
    min_height: u64,
    reader: &R,
) -> Result<HashMap<ContentHash, Ref>, StoreError> {
    let mut next = HashMap::new();
    for r in frontier.values() {
        if r.height() <= min_height {
            continue;
        }
        let commit = Commit::from_value(reader.deref(r)?);
        for parent in commit.parents() {
            let p = ref_from_parent(parent);
            if p.height() >= min_height {
                next.insert(p.target_hash(), p);
            }
        }
    }
    tracing::trace!(min_height, frontier = next.len(), "expanded ancestor frontier");
    Ok(next)
}

/// Dereference each band member and push its parents into the frontier.
fn push_parents<R: ValueReader>(
    band: &[Ref],
    frontier: &mut HeightFrontier,
    reader: &R,
) -> Result<(), StoreError> {
    for r in band {
        let commit = Commit::from_value(reader.deref(r)?);
        for parent in commit.parents() {
            frontier.push(ref_from_parent(parent));
        }
    }
    Ok(())
}

/// A reference present in both bands, smallest hash first; `None` if the
/// bands share nothing.
fn find_common_ref(a: &[Ref], b: &[Ref]) -> Option<Ref> {
    let b_hashes: HashSet<ContentHash> = b.iter().map(Ref::target_hash).collect();
    a.iter()
        .filter(|r| b_hashes.contains(&r.target_hash()))
        .min_by_key(|r| r.target_hash())
        .cloned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, ValueWriter};
    use crate::value::{SetValue, StructValue};

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    fn meta() -> Value {
        Value::Struct(StructValue::new(
            "Meta",
            vec![("by".to_owned(), Value::String("tester".to_owned()))],
        ))
    }

    /// Build a commit on the given parents and persist it.
    fn commit_on(store: &mut MemoryStore, value: i64, parents: &[&Commit]) -> Commit {
        let parent_set = SetValue::new(
            parents
                .iter()
                .map(|c| Value::Ref(c.to_ref()))
                .collect(),
        );
        let commit = Commit::new(Value::Int(value), parent_set, meta());
        store.write_value(commit.to_value());
        commit
    }

    fn lca_hash(result: Option<Commit>) -> Option<ContentHash> {
        result.map(|c| c.content_hash())
    }

    // -------------------------------------------------------------------
    // descends_from
    // -------------------------------------------------------------------

    #[test]
    fn direct_parent_is_an_ancestor() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 1, &[]);
        let child = commit_on(&mut store, 2, &[&root]);
        assert_eq!(descends_from(&child, &root.to_ref(), &store), Ok(true));
    }

    #[test]
    fn transitive_ancestors_are_found() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 1, &[]);
        let mid = commit_on(&mut store, 2, &[&root]);
        let tip = commit_on(&mut store, 3, &[&mid]);
        assert_eq!(descends_from(&tip, &root.to_ref(), &store), Ok(true));
        assert_eq!(descends_from(&tip, &mid.to_ref(), &store), Ok(true));
    }

    #[test]
    fn a_commit_is_not_its_own_ancestor() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 1, &[]);
        assert_eq!(descends_from(&root, &root.to_ref(), &store), Ok(false));
    }

    #[test]
    fn descent_does_not_run_backwards() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 1, &[]);
        let child = commit_on(&mut store, 2, &[&root]);
        assert_eq!(descends_from(&root, &child.to_ref(), &store), Ok(false));
    }

    #[test]
    fn unrelated_commits_do_not_descend() {
        let mut store = MemoryStore::new();
        let a = commit_on(&mut store, 1, &[]);
        let b = commit_on(&mut store, 2, &[]);
        assert_eq!(descends_from(&a, &b.to_ref(), &store), Ok(false));
    }

    #[test]
    fn diamond_descent() {
        //      r
        //     / \
        //    a   b
        //     \ /
        //      c
        let mut store = MemoryStore::new();
        let r = commit_on(&mut store, 0, &[]);
        let a = commit_on(&mut store, 1, &[&r]);
        let b = commit_on(&mut store, 2, &[&r]);
        let c = commit_on(&mut store, 3, &[&a, &b]);
        assert_eq!(descends_from(&c, &r.to_ref(), &store), Ok(true));
        assert_eq!(descends_from(&r, &c.to_ref(), &store), Ok(false));
    }

    #[test]
    fn missing_content_propagates() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 1, &[]);
        let mid = commit_on(&mut store, 2, &[&root]);
        let tip = commit_on(&mut store, 3, &[&mid]);
        // Search from a store that never saw the history.
        let empty = MemoryStore::new();
        let err = descends_from(&tip, &root.to_ref(), &empty)
            .expect_err("dereference against an empty store must fail");
        assert!(matches!(err, StoreError::Missing { .. }));
    }

    // -------------------------------------------------------------------
    // find_common_ancestor
    // -------------------------------------------------------------------

    #[test]
    fn fork_meets_at_the_fork_point() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 0, &[]);
        let left = commit_on(&mut store, 1, &[&root]);
        let right = commit_on(&mut store, 2, &[&root]);
        let lca = find_common_ancestor(&left, &right, &store).expect("store is complete");
        assert_eq!(lca_hash(lca), Some(root.content_hash()));
    }

    #[test]
    fn ancestor_tip_is_the_answer() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 0, &[]);
        let tip = commit_on(&mut store, 1, &[&root]);
        let lca = find_common_ancestor(&root, &tip, &store).expect("store is complete");
        assert_eq!(lca_hash(lca), Some(root.content_hash()));
    }

    #[test]
    fn same_commit_is_its_own_common_ancestor() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 0, &[]);
        let lca = find_common_ancestor(&root, &root, &store).expect("store is complete");
        assert_eq!(lca_hash(lca), Some(root.content_hash()));
    }

    #[test]
    fn disjoint_roots_share_nothing() {
        let mut store = MemoryStore::new();
        let a = commit_on(&mut store, 1, &[]);
        let b = commit_on(&mut store, 2, &[]);
        let lca = find_common_ancestor(&a, &b, &store).expect("store is complete");
        assert_eq!(lca, None);
    }

    #[test]
    fn asymmetric_depths_still_meet() {
        //  root → m1 → m2 → m3 → deep
        //      \→ shallow
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 0, &[]);
        let m1 = commit_on(&mut store, 1, &[&root]);
        let m2 = commit_on(&mut store, 2, &[&m1]);
        let m3 = commit_on(&mut store, 3, &[&m2]);
        let deep = commit_on(&mut store, 4, &[&m3]);
        let shallow = commit_on(&mut store, 5, &[&root]);
        let lca = find_common_ancestor(&deep, &shallow, &store).expect("store is complete");
        assert_eq!(lca_hash(lca), Some(root.content_hash()));
    }

    #[test]
    fn diamond_then_fork_meets_at_the_merge() {
        //     root
        //    /    \
        //  a1      b1
        //    \    /
        //    merge
        //    /    \
        //  a2      b2
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 0, &[]);
        let a1 = commit_on(&mut store, 1, &[&root]);
        let b1 = commit_on(&mut store, 2, &[&root]);
        let merge = commit_on(&mut store, 3, &[&a1, &b1]);
        let a2 = commit_on(&mut store, 4, &[&merge]);
        let b2 = commit_on(&mut store, 5, &[&merge]);
        let lca = find_common_ancestor(&a2, &b2, &store).expect("store is complete");
        assert_eq!(lca_hash(lca), Some(merge.content_hash()));
    }

    #[test]
    fn result_is_symmetric() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 0, &[]);
        let left = commit_on(&mut store, 1, &[&root]);
        let right = commit_on(&mut store, 2, &[&root]);
        let ab = find_common_ancestor(&left, &right, &store).expect("store is complete");
        let ba = find_common_ancestor(&right, &left, &store).expect("store is complete");
        assert_eq!(lca_hash(ab), lca_hash(ba));
    }

    #[test]
    fn missing_history_propagates() {
        let mut store = MemoryStore::new();
        let root = commit_on(&mut store, 0, &[]);
        let left = commit_on(&mut store, 1, &[&root]);
        let right = commit_on(&mut store, 2, &[&root]);
        let empty = MemoryStore::new();
        let err = find_common_ancestor(&left, &right, &empty)
            .expect_err("dereference against an empty store must fail");
        assert!(matches!(err, StoreError::Missing { .. }));
    }
}
