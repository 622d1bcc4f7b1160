//! `sawit-core` — domain foundation for the plantation org engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the role table, scope entities, the immutable input
//! snapshot, and the engine error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod role;
pub mod snapshot;

pub use entity::{Block, Company, Division, Estate, User};
pub use error::{EngineError, EngineResult};
pub use id::{BlockId, CompanyId, DivisionId, EstateId, SnapshotId, UserId};
pub use role::{AssignmentField, Role, UserStatus};
pub use snapshot::EntitySnapshot;
