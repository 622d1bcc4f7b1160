//! `sawit-validation` — cross-validation of scope assignments against the
//! reporting chain.
//!
//! Conflicts are the primary product here: they are always returned as data,
//! never raised, and nothing is ever mutated. The one hard failure is mixing
//! derived structures from different snapshots.

pub mod conflict;
pub mod validator;

pub use conflict::{AssignmentConflict, ConflictKind, ValidationReport};
pub use validator::validate;
