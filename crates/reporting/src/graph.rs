//! Reporting graph construction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use sawit_core::{EntitySnapshot, SnapshotId, User, UserId};

/// A reporting edge rejected at build time.
///
/// Either the subordinate's rank is not strictly greater than the manager's
/// (lateral or backward link), or one side holds a role outside the reporting
/// order entirely. Recorded so the cross-validator can surface it as a named
/// conflict instead of it vanishing silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankViolation {
    pub subordinate: UserId,
    pub manager: UserId,
}

/// Manager → subordinate adjacency for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportingGraph {
    pub snapshot_id: SnapshotId,
    pub user_by_id: HashMap<UserId, User>,
    pub children_by_manager: HashMap<UserId, Vec<UserId>>,
    pub rank_violations: Vec<RankViolation>,
}

impl ReportingGraph {
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.user_by_id.get(&id)
    }

    pub fn children_of(&self, manager: UserId) -> &[UserId] {
        self.children_by_manager
            .get(&manager)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Build the reporting graph from flat `manager_id` pointers.
///
/// Unresolvable manager ids are logged and skipped (incomplete data is
/// expected during administration). Edges violating the rank order are
/// dropped from the adjacency but recorded in `rank_violations`. Each
/// manager's children are sorted by (reporting rank, case-folded name) for
/// deterministic presentation.
pub fn build_reporting_graph(snapshot: &EntitySnapshot) -> ReportingGraph {
    let user_by_id: HashMap<UserId, User> =
        snapshot.users.iter().map(|u| (u.id, u.clone())).collect();

    let mut children_by_manager: HashMap<UserId, Vec<UserId>> = HashMap::new();
    let mut rank_violations = Vec::new();

    for user in &snapshot.users {
        let Some(manager_id) = user.manager_id else {
            continue;
        };
        let Some(manager) = user_by_id.get(&manager_id) else {
            warn!(
                user_id = %user.id,
                manager_id = %manager_id,
                "manager pointer resolves to no known user; edge skipped"
            );
            continue;
        };

        let child_rank = user.role.reporting_rank();
        let manager_rank = manager.role.reporting_rank();
        match (child_rank, manager_rank) {
            (Some(c), Some(m)) if c > m => {
                children_by_manager.entry(manager_id).or_default().push(user.id);
            }
            _ => {
                rank_violations.push(RankViolation {
                    subordinate: user.id,
                    manager: manager_id,
                });
            }
        }
    }

    for children in children_by_manager.values_mut() {
        children.sort_by(|a, b| {
            let ka = child_sort_key(&user_by_id, *a);
            let kb = child_sort_key(&user_by_id, *b);
            ka.cmp(&kb)
        });
    }

    ReportingGraph {
        snapshot_id: snapshot.id,
        user_by_id,
        children_by_manager,
        rank_violations,
    }
}

fn child_sort_key(user_by_id: &HashMap<UserId, User>, id: UserId) -> (u8, String) {
    match user_by_id.get(&id) {
        Some(user) => (
            user.role.reporting_rank().unwrap_or(u8::MAX),
            user.name.to_lowercase(),
        ),
        None => (u8::MAX, String::new()),
    }
}
