//! The cross-validation pass.

use std::collections::HashMap;

use sawit_core::{EngineError, EngineResult, EntitySnapshot, Estate, EstateId, Role, User};
use sawit_hierarchy::ScopeTree;
use sawit_reporting::{ReportingGraph, ancestor_trail};

use crate::conflict::{AssignmentConflict, ConflictKind, ValidationReport};

/// Cross-validate the scope tree against the reporting graph.
///
/// All four rules are checked independently; a user may carry several
/// conflicts. Fails only when the inputs were not derived from the same
/// snapshot — mixing snapshots would silently corrupt downstream scores, so
/// that is a hard error rather than a finding.
pub fn validate(
    tree: &ScopeTree,
    graph: &ReportingGraph,
    snapshot: &EntitySnapshot,
) -> EngineResult<ValidationReport> {
    if tree.snapshot_id != snapshot.id {
        return Err(EngineError::snapshot_mismatch(snapshot.id, tree.snapshot_id));
    }
    if graph.snapshot_id != snapshot.id {
        return Err(EngineError::snapshot_mismatch(snapshot.id, graph.snapshot_id));
    }

    let estate_by_id: HashMap<EstateId, &Estate> =
        snapshot.estates.iter().map(|e| (e.id, e)).collect();

    let mut conflicts = Vec::new();

    for user in &snapshot.users {
        check_orphaned(user, &mut conflicts);
        check_area_mismatch(user, graph, &estate_by_id, &mut conflicts);
        check_cycle(user, graph, &mut conflicts);
    }
    surface_rank_violations(graph, &mut conflicts);

    Ok(ValidationReport {
        snapshot_id: snapshot.id,
        conflicts,
    })
}

fn check_orphaned(user: &User, conflicts: &mut Vec<AssignmentConflict>) {
    if user.is_orphaned() {
        conflicts.push(AssignmentConflict {
            subject_user_id: user.id,
            scope_id: None,
            kind: ConflictKind::Orphaned,
            detail: format!(
                "{} holds role {:?} which requires a scope assignment, but none is set",
                user.name, user.role
            ),
        });
    }
}

/// A manager's estate assignment is only legitimate if their area-manager
/// ancestor holds company access to that estate's company.
fn check_area_mismatch(
    user: &User,
    graph: &ReportingGraph,
    estate_by_id: &HashMap<EstateId, &Estate>,
    conflicts: &mut Vec<AssignmentConflict>,
) {
    if user.role != Role::Manager {
        return;
    }

    let area_manager = ancestor_trail(graph, user.id)
        .chain
        .iter()
        .filter_map(|id| graph.user(*id))
        .find(|ancestor| ancestor.role == Role::AreaManager);

    for estate_id in &user.assigned_estates {
        // Assignment to an unknown estate is a data-integrity gap handled at
        // tree build; nothing to judge here.
        let Some(estate) = estate_by_id.get(estate_id) else {
            continue;
        };

        match area_manager {
            None => conflicts.push(AssignmentConflict {
                subject_user_id: user.id,
                scope_id: Some(*estate_id.as_uuid()),
                kind: ConflictKind::AreaMismatch,
                detail: format!(
                    "{} is assigned to estate {} but has no resolvable area manager",
                    user.name, estate.code
                ),
            }),
            Some(am) if !am.assigned_companies.contains(&estate.company_id) => {
                conflicts.push(AssignmentConflict {
                    subject_user_id: user.id,
                    scope_id: Some(*estate_id.as_uuid()),
                    kind: ConflictKind::AreaMismatch,
                    detail: format!(
                        "{} is assigned to estate {} but area manager {} lacks company access",
                        user.name, estate.code, am.name
                    ),
                });
            }
            Some(_) => {}
        }
    }
}

fn check_cycle(user: &User, graph: &ReportingGraph, conflicts: &mut Vec<AssignmentConflict>) {
    if user.manager_id.is_none() {
        return;
    }
    if ancestor_trail(graph, user.id).cycle_detected {
        conflicts.push(AssignmentConflict {
            subject_user_id: user.id,
            scope_id: None,
            kind: ConflictKind::CycleDetected,
            detail: format!("reporting chain starting at {} revisits a user", user.name),
        });
    }
}

/// Edges already excluded at graph build time, re-surfaced as named conflicts
/// for visibility rather than silent dropping.
fn surface_rank_violations(graph: &ReportingGraph, conflicts: &mut Vec<AssignmentConflict>) {
    for violation in &graph.rank_violations {
        let subject = graph
            .user(violation.subordinate)
            .map(|u| u.name.as_str())
            .unwrap_or("unknown");
        let manager = graph
            .user(violation.manager)
            .map(|u| u.name.as_str())
            .unwrap_or("unknown");
        conflicts.push(AssignmentConflict {
            subject_user_id: violation.subordinate,
            scope_id: None,
            kind: ConflictKind::RoleRankViolation,
            detail: format!("{subject} reports to {manager} against the role-rank order"),
        });
    }
}
