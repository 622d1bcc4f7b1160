//! Typed assignment conflicts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sawit_core::{SnapshotId, UserId};

/// Classification of a structural inconsistency.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    /// Role requires a scope assignment and the authoritative set is empty.
    Orphaned,
    /// A manager's estate belongs to a company their area manager does not
    /// hold, or they have no resolvable area manager at all.
    AreaMismatch,
    /// A reporting edge rejected for violating the role-rank order.
    RoleRankViolation,
    /// The `manager_id` chain revisits an id.
    CycleDetected,
}

/// One advisory finding about one user.
///
/// Advisory only: consumers decide remediation; the engine reports the
/// current state and never touches assignment data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentConflict {
    pub subject_user_id: UserId,
    /// The scope entity involved, when one is (e.g. the estate of an area
    /// mismatch).
    pub scope_id: Option<Uuid>,
    pub kind: ConflictKind,
    pub detail: String,
}

/// All conflicts found against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub snapshot_id: SnapshotId,
    pub conflicts: Vec<AssignmentConflict>,
}

impl ValidationReport {
    pub fn conflicts_for(&self, user_id: UserId) -> Vec<&AssignmentConflict> {
        self.conflicts
            .iter()
            .filter(|c| c.subject_user_id == user_id)
            .collect()
    }

    pub fn count_of(&self, kind: ConflictKind) -> usize {
        self.conflicts.iter().filter(|c| c.kind == kind).count()
    }

    /// Users carrying at least one conflict, deduplicated.
    pub fn conflicted_user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.conflicts.iter().map(|c| c.subject_user_id).collect();
        ids.sort_by_key(|id| *id.as_uuid());
        ids.dedup();
        ids
    }
}
