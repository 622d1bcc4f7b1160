//! `sawit-hierarchy` — scope tree builder and filter projector.
//!
//! Assembles the four-level Company → Estate → Division → Block tree from an
//! entity snapshot and attaches users per node under the per-role assignment
//! rules. Pure, deterministic domain logic (no IO, no HTTP, no storage).

pub mod builder;
pub mod filter;
pub mod node;

pub use builder::build_scope_tree;
pub use filter::TreeFilter;
pub use node::{AttachedUser, HierarchyNode, ScopeLevel, ScopeRef, ScopeTree};
