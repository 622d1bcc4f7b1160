//! Analytics output value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sawit_core::{Role, SnapshotId, UserId};

/// Aggregated multi-assignment analytics for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAssignmentSummary {
    pub snapshot_id: SnapshotId,
    pub generated_at: DateTime<Utc>,
    /// Users whose authoritative assignment set has cardinality > 1, counted
    /// once each across all roles.
    pub total_multi_assigned_users: usize,
    /// Count of ORPHANED conflicts.
    pub orphaned_users: usize,
    /// 0–100. Monotone under conflict removal.
    pub efficiency_score: f64,
    /// 0–100. Share of estates and divisions with at least one active,
    /// conflict-free responsible user.
    pub coverage_score: f64,
    pub role_breakdown: Vec<RoleBreakdown>,
    pub hotspots: Vec<Hotspot>,
}

/// Per-role assignment statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleBreakdown {
    pub role: Role,
    pub total_users: usize,
    pub multi_assigned: usize,
    pub avg_assignments: f64,
    pub max_assignments: usize,
    /// Same formula and monotonicity invariant as the global score,
    /// restricted to this role.
    pub efficiency: f64,
}

/// Classified area of concern.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HotspotKind {
    Overloaded,
    Underutilized,
    Orphaned,
    Critical,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotUser {
    pub id: UserId,
    pub name: String,
}

/// One non-empty hotspot class with the users it affects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub kind: HotspotKind,
    pub severity: Severity,
    pub users: Vec<HotspotUser>,
}

impl MultiAssignmentSummary {
    pub fn hotspot(&self, kind: HotspotKind) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.kind == kind)
    }
}
