//! Commit-graph core of a content-addressed, versioned value store.
//!
//! Every commit is an immutable struct identified by the BLAKE3 hash of
//! its content, linked to its predecessors through a set of parent
//! references — a Merkle-DAG of version history. This crate defines what
//! a commit *is*, how its structural type is computed and evolved as data
//! shapes change over time, and how ancestry is decided without ever
//! materializing the full graph.
//!
//! # Modules
//!
//! - [`types`]: the structural type algebra — primitives, structs, sets,
//!   refs, normalized unions, cyclic placeholders, and subtype checking.
//! - [`value`]: immutable structurally-typed values, content hashing, and
//!   references carrying intrinsic heights.
//! - [`store`]: the injected [`ValueReader`]/[`ValueWriter`] capability
//!   boundary plus the in-memory [`MemoryStore`].
//! - [`commit`]: the [`Commit`] record and its type algebra — homogeneous
//!   chains get a self-referential cyclic type, shape changes widen via
//!   union.
//! - [`ancestry`]: [`descends_from`] and [`find_common_ancestor`],
//!   height-pruned graph searches over lazily dereferenced commits.
//! - [`dataset`]: named head bookkeeping, a thin wrapper over the core.
//!
//! # Conventions
//!
//! - Errors: per-module `thiserror` enums; store failures propagate
//!   unchanged through traversal. Contract violations (non-commit values
//!   where commits are required) fail loudly instead of coercing.
//! - Logging: `tracing` macros with structured fields.

pub mod ancestry;
pub mod commit;
pub mod dataset;
pub mod store;
pub mod types;
pub mod value;

pub use ancestry::{HeightFrontier, descends_from, find_common_ancestor};
pub use commit::{Commit, is_commit_type, is_ref_of_commit_type};
pub use dataset::{Dataset, DatasetError, is_valid_dataset_name};
pub use store::{MemoryStore, StoreError, ValueReader, ValueWriter};
pub use types::{StructType, Type, is_subtype};
pub use value::{ContentHash, ParseHashError, Ref, SetValue, StructValue, Value, content_hash};
