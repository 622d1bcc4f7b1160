//! Immutable entity-store snapshot.
//!
//! All derived structures (scope tree, reporting graph, validation report,
//! summary) are pure functions of one snapshot and record its id. Builders are
//! re-invoked on a fresh snapshot when entities change; nothing is mutated in
//! place, which also makes concurrent read access trivially safe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Block, Company, Division, Estate, User};
use crate::id::SnapshotId;

/// One materialized read of the entity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: SnapshotId,
    pub taken_at: DateTime<Utc>,
    pub companies: Vec<Company>,
    pub estates: Vec<Estate>,
    pub divisions: Vec<Division>,
    pub blocks: Vec<Block>,
    pub users: Vec<User>,
}

impl EntitySnapshot {
    /// Capture a snapshot from already-loaded collections.
    ///
    /// Stamps a fresh id; two captures of identical collections are distinct
    /// snapshots and must not be mixed downstream.
    pub fn new(
        companies: Vec<Company>,
        estates: Vec<Estate>,
        divisions: Vec<Division>,
        blocks: Vec<Block>,
        users: Vec<User>,
    ) -> Self {
        Self {
            id: SnapshotId::new(),
            taken_at: Utc::now(),
            companies,
            estates,
            divisions,
            blocks,
            users,
        }
    }

    /// Snapshot with no entities at all ("nothing configured yet").
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
            && self.estates.is_empty()
            && self.divisions.is_empty()
            && self.blocks.is_empty()
            && self.users.is_empty()
    }
}
