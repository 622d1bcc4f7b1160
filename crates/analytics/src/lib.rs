//! `sawit-analytics` — multi-assignment analytics over the validated
//! structure.
//!
//! Consumes the scope tree and validation report for one snapshot and
//! computes counts, efficiency and coverage scores, per-role breakdowns, and
//! hotspot classifications. Pure, deterministic domain logic.

pub mod aggregate;
pub mod summary;

pub use aggregate::{AggregatorConfig, aggregate};
pub use summary::{
    Hotspot, HotspotKind, HotspotUser, MultiAssignmentSummary, RoleBreakdown, Severity,
};
