//! `sawit-reporting` — manager reporting graph and role-scoped visibility.
//!
//! Builds the supervisor/subordinate adjacency from flat `manager_id`
//! pointers, enforcing the AREA_MANAGER < MANAGER < ASISTEN order, and
//! produces "need to know" subgraph views bounded by the viewer's role.
//! Pure, deterministic domain logic (no IO, no HTTP, no storage).

pub mod graph;
pub mod visibility;

pub use graph::{RankViolation, ReportingGraph, build_reporting_graph};
pub use visibility::{AncestorTrail, ReportingNode, VisibleSubgraph, ancestor_trail, visible_subgraph};
