//! The aggregation pass: counts, scores, and hotspot classification.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use sawit_core::{EngineError, EngineResult, EntitySnapshot, Role, User, UserId};
use sawit_hierarchy::{ScopeLevel, ScopeTree};
use sawit_validation::{ConflictKind, ValidationReport};

use crate::summary::{
    Hotspot, HotspotKind, HotspotUser, MultiAssignmentSummary, RoleBreakdown, Severity,
};

/// Tunable thresholds and per-role assignment targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Assignment-set size at which a user counts as overloaded.
    overload_threshold: usize,
    /// Per-role target overrides; roles not present use the default target
    /// (1 for single-valued roles, 2 for multi-capable ones).
    role_targets: HashMap<Role, usize>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            overload_threshold: 4,
            role_targets: HashMap::new(),
        }
    }
}

impl AggregatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overload_threshold(mut self, threshold: usize) -> Self {
        self.overload_threshold = threshold.max(1);
        self
    }

    pub fn with_role_target(mut self, role: Role, target: usize) -> Self {
        self.role_targets.insert(role, target.max(1));
        self
    }

    pub fn overload_threshold(&self) -> usize {
        self.overload_threshold
    }

    pub fn target_for(&self, role: Role) -> usize {
        if let Some(&target) = self.role_targets.get(&role) {
            return target;
        }
        if role.multi_capable() { 2 } else { 1 }
    }
}

/// Aggregate the validated structure into a summary.
///
/// Inputs must all derive from the same snapshot; mixing fails fast. An empty
/// snapshot yields the all-zero summary — "nothing configured yet" is a
/// legitimate state, not a fault.
pub fn aggregate(
    tree: &ScopeTree,
    report: &ValidationReport,
    snapshot: &EntitySnapshot,
    config: &AggregatorConfig,
) -> EngineResult<MultiAssignmentSummary> {
    if tree.snapshot_id != snapshot.id {
        return Err(EngineError::snapshot_mismatch(snapshot.id, tree.snapshot_id));
    }
    if report.snapshot_id != snapshot.id {
        return Err(EngineError::snapshot_mismatch(
            snapshot.id,
            report.snapshot_id,
        ));
    }

    let conflicted: HashSet<UserId> = report.conflicted_user_ids().into_iter().collect();

    let total_multi_assigned_users = snapshot
        .users
        .iter()
        .filter(|u| u.is_multi_assigned())
        .count();
    let orphaned_users = report.count_of(ConflictKind::Orphaned);

    let scoped: Vec<&User> = snapshot
        .users
        .iter()
        .filter(|u| u.role.requires_scope())
        .collect();

    let efficiency_score = efficiency(&scoped, &conflicted, config);
    let coverage_score = coverage(tree, snapshot, &conflicted);
    let role_breakdown = breakdown_by_role(&scoped, &conflicted, config);
    let hotspots = classify_hotspots(snapshot, report, config);

    Ok(MultiAssignmentSummary {
        snapshot_id: snapshot.id,
        generated_at: Utc::now(),
        total_multi_assigned_users,
        orphaned_users,
        efficiency_score,
        coverage_score,
        role_breakdown,
        hotspots,
    })
}

/// Weighted efficiency in 0–100.
///
/// 0.7 × share of users with a conflict-free assignment, plus 0.3 × the
/// inverse of the excess-assignment penalty. Removing a conflict can only
/// grow the first term and never touches the second, so the score is
/// monotone under conflict removal.
fn efficiency(scoped: &[&User], conflicted: &HashSet<UserId>, config: &AggregatorConfig) -> f64 {
    if scoped.is_empty() {
        return 0.0;
    }

    let clean = scoped
        .iter()
        .filter(|u| u.assignment_count() >= 1 && !conflicted.contains(&u.id))
        .count();
    let clean_fraction = clean as f64 / scoped.len() as f64;

    let penalty = excess_penalty(scoped, config);

    100.0 * (0.7 * clean_fraction + 0.3 * (1.0 - penalty))
}

/// Average over present roles of how far the mean assignment count overshoots
/// the role target, clamped to [0, 1].
fn excess_penalty(scoped: &[&User], config: &AggregatorConfig) -> f64 {
    let mut by_role: HashMap<Role, Vec<usize>> = HashMap::new();
    for user in scoped {
        by_role.entry(user.role).or_default().push(user.assignment_count());
    }
    if by_role.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for (role, counts) in &by_role {
        let avg = mean_usize(counts);
        let target = config.target_for(*role) as f64;
        total += ((avg - target) / target).clamp(0.0, 1.0);
    }
    total / by_role.len() as f64
}

/// Share of estate and division nodes with at least one active, conflict-free
/// responsible user at the right level.
fn coverage(tree: &ScopeTree, snapshot: &EntitySnapshot, conflicted: &HashSet<UserId>) -> f64 {
    let status_by_id: HashMap<UserId, bool> = snapshot
        .users
        .iter()
        .map(|u| (u.id, u.status.is_active()))
        .collect();

    let responsible_role = |level: ScopeLevel| match level {
        ScopeLevel::Estate => Some(Role::Manager),
        ScopeLevel::Division => Some(Role::Asisten),
        _ => None,
    };

    let mut total = 0usize;
    let mut covered = 0usize;
    tree.walk(&mut |node| {
        let Some(role) = responsible_role(node.scope.level()) else {
            return;
        };
        total += 1;
        let has_responsible = node
            .users
            .iter()
            .chain(&node.multi_assignment_users)
            .any(|u| {
                u.role == role
                    && !conflicted.contains(&u.id)
                    && status_by_id.get(&u.id).copied().unwrap_or(false)
            });
        if has_responsible {
            covered += 1;
        }
    });

    if total == 0 {
        return 0.0;
    }
    100.0 * covered as f64 / total as f64
}

fn breakdown_by_role(
    scoped: &[&User],
    conflicted: &HashSet<UserId>,
    config: &AggregatorConfig,
) -> Vec<RoleBreakdown> {
    let mut out = Vec::new();
    for role in Role::ALL {
        let users: Vec<&User> = scoped.iter().filter(|u| u.role == role).copied().collect();
        if users.is_empty() {
            continue;
        }
        let counts: Vec<usize> = users.iter().map(|u| u.assignment_count()).collect();
        out.push(RoleBreakdown {
            role,
            total_users: users.len(),
            multi_assigned: users.iter().filter(|u| u.is_multi_assigned()).count(),
            avg_assignments: mean_usize(&counts),
            max_assignments: counts.iter().copied().max().unwrap_or(0),
            efficiency: efficiency(&users, conflicted, config),
        });
    }
    out
}

fn classify_hotspots(
    snapshot: &EntitySnapshot,
    report: &ValidationReport,
    config: &AggregatorConfig,
) -> Vec<Hotspot> {
    let mut hotspots = Vec::new();

    // Critical: anyone carrying an area mismatch or a cycle.
    let critical_ids: HashSet<UserId> = report
        .conflicts
        .iter()
        .filter(|c| {
            matches!(
                c.kind,
                ConflictKind::AreaMismatch | ConflictKind::CycleDetected
            )
        })
        .map(|c| c.subject_user_id)
        .collect();
    push_hotspot(
        &mut hotspots,
        HotspotKind::Critical,
        Severity::High,
        collect_users(snapshot, |u| critical_ids.contains(&u.id)),
    );

    // Overloaded: authoritative set at or beyond the threshold.
    let threshold = config.overload_threshold();
    let overloaded = collect_users(snapshot, |u| u.assignment_count() >= threshold);
    let worst = snapshot
        .users
        .iter()
        .map(|u| u.assignment_count())
        .max()
        .unwrap_or(0);
    let overloaded_severity = if worst > threshold + 2 {
        Severity::High
    } else {
        Severity::Medium
    };
    let overloaded_roles: HashSet<Role> = snapshot
        .users
        .iter()
        .filter(|u| u.assignment_count() >= threshold)
        .map(|u| u.role)
        .collect();
    push_hotspot(
        &mut hotspots,
        HotspotKind::Overloaded,
        overloaded_severity,
        overloaded,
    );

    // Underutilized: at the minimum in a multi-capable role while a same-role
    // peer is overloaded (capacity exists elsewhere).
    let underutilized = collect_users(snapshot, |u| {
        u.role.multi_capable() && u.assignment_count() == 1 && overloaded_roles.contains(&u.role)
    });
    push_hotspot(
        &mut hotspots,
        HotspotKind::Underutilized,
        Severity::Low,
        underutilized,
    );

    // Orphaned: ties straight back to the validator's findings.
    let orphan_ids: HashSet<UserId> = report
        .conflicts
        .iter()
        .filter(|c| c.kind == ConflictKind::Orphaned)
        .map(|c| c.subject_user_id)
        .collect();
    push_hotspot(
        &mut hotspots,
        HotspotKind::Orphaned,
        Severity::Medium,
        collect_users(snapshot, |u| orphan_ids.contains(&u.id)),
    );

    hotspots
}

fn collect_users(snapshot: &EntitySnapshot, mut pick: impl FnMut(&User) -> bool) -> Vec<HotspotUser> {
    snapshot
        .users
        .iter()
        .filter(|u| pick(u))
        .map(|u| HotspotUser {
            id: u.id,
            name: u.name.clone(),
        })
        .collect()
}

fn push_hotspot(
    hotspots: &mut Vec<Hotspot>,
    kind: HotspotKind,
    severity: Severity,
    users: Vec<HotspotUser>,
) {
    if users.is_empty() {
        return;
    }
    hotspots.push(Hotspot {
        kind,
        severity,
        users,
    });
}

fn mean_usize(xs: &[usize]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<usize>() as f64 / xs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sawit_core::{Company, CompanyId, Estate, EstateId, UserStatus};
    use sawit_hierarchy::build_scope_tree;
    use sawit_reporting::build_reporting_graph;
    use sawit_validation::validate;

    fn company(code: &str) -> Company {
        Company {
            id: CompanyId::new(),
            code: code.to_string(),
            name: format!("PT {code}"),
            active: true,
        }
    }

    fn estate(company_id: CompanyId, code: &str) -> Estate {
        Estate {
            id: EstateId::new(),
            company_id,
            code: code.to_string(),
            name: format!("Estate {code}"),
            active: true,
            area_ha: 700.0,
        }
    }

    fn user(name: &str, role: Role) -> User {
        User {
            id: UserId::new(),
            name: name.to_string(),
            role,
            status: UserStatus::Active,
            assigned_companies: vec![],
            assigned_estates: vec![],
            assigned_divisions: vec![],
            manager_id: None,
        }
    }

    fn run(snapshot: &EntitySnapshot) -> MultiAssignmentSummary {
        let tree = build_scope_tree(snapshot);
        let graph = build_reporting_graph(snapshot);
        let report = validate(&tree, &graph, snapshot).unwrap();
        aggregate(&tree, &report, snapshot, &AggregatorConfig::default()).unwrap()
    }

    #[test]
    fn empty_snapshot_yields_all_zeros() {
        let snapshot = EntitySnapshot::empty();
        let summary = run(&snapshot);

        assert_eq!(summary.total_multi_assigned_users, 0);
        assert_eq!(summary.orphaned_users, 0);
        assert_eq!(summary.efficiency_score, 0.0);
        assert_eq!(summary.coverage_score, 0.0);
        assert!(summary.role_breakdown.is_empty());
        assert!(summary.hotspots.is_empty());
    }

    #[test]
    fn clean_estate_counts_as_covered() {
        let ksk = company("KSK");
        let e1 = estate(ksk.id, "E1");
        let mut am1 = user("AM1", Role::AreaManager);
        am1.assigned_companies = vec![ksk.id];
        let mut m1 = user("M1", Role::Manager);
        m1.assigned_estates = vec![e1.id];
        m1.manager_id = Some(am1.id);

        let snapshot = EntitySnapshot::new(vec![ksk], vec![e1], vec![], vec![], vec![am1, m1]);
        let summary = run(&snapshot);

        assert_eq!(summary.coverage_score, 100.0);
        assert!(summary.hotspot(HotspotKind::Critical).is_none());
    }

    #[test]
    fn area_mismatch_surfaces_as_critical_hotspot() {
        let ksk = company("KSK");
        let e1 = estate(ksk.id, "E1");
        let am1 = user("AM1", Role::AreaManager); // no companies
        let mut m1 = user("M1", Role::Manager);
        m1.assigned_estates = vec![e1.id];
        m1.manager_id = Some(am1.id);

        let snapshot =
            EntitySnapshot::new(vec![ksk], vec![e1], vec![], vec![], vec![am1, m1.clone()]);
        let summary = run(&snapshot);

        let critical = summary.hotspot(HotspotKind::Critical).unwrap();
        assert_eq!(critical.severity, Severity::High);
        assert!(critical.users.iter().any(|u| u.id == m1.id));
        // The conflicted estate no longer counts as covered.
        assert_eq!(summary.coverage_score, 0.0);
    }

    #[test]
    fn orphaned_user_increments_count_and_hotspot() {
        let o1 = user("O1", Role::Mandor);
        let snapshot = EntitySnapshot::new(vec![], vec![], vec![], vec![], vec![o1.clone()]);
        let summary = run(&snapshot);

        assert_eq!(summary.orphaned_users, 1);
        let orphaned = summary.hotspot(HotspotKind::Orphaned).unwrap();
        assert_eq!(orphaned.users[0].id, o1.id);
        assert_eq!(orphaned.severity, Severity::Medium);
    }

    #[test]
    fn multi_assigned_user_is_counted_once() {
        let c1 = company("C1");
        let c2 = company("C2");
        let mut am2 = user("AM2", Role::AreaManager);
        am2.assigned_companies = vec![c1.id, c2.id];

        let snapshot = EntitySnapshot::new(vec![c1, c2], vec![], vec![], vec![], vec![am2]);
        let summary = run(&snapshot);

        assert_eq!(summary.total_multi_assigned_users, 1);
        let breakdown = summary
            .role_breakdown
            .iter()
            .find(|b| b.role == Role::AreaManager)
            .unwrap();
        assert_eq!(breakdown.total_users, 1);
        assert_eq!(breakdown.multi_assigned, 1);
        assert_eq!(breakdown.max_assignments, 2);
    }

    #[test]
    fn overload_threshold_drives_hotspots() {
        let companies: Vec<Company> = (0..5).map(|i| company(&format!("C{i}"))).collect();
        let mut heavy = user("Heavy", Role::AreaManager);
        heavy.assigned_companies = companies.iter().map(|c| c.id).collect();
        let mut light = user("Light", Role::AreaManager);
        light.assigned_companies = vec![companies[0].id];

        let snapshot = EntitySnapshot::new(
            companies,
            vec![],
            vec![],
            vec![],
            vec![heavy.clone(), light.clone()],
        );
        let summary = run(&snapshot);

        let overloaded = summary.hotspot(HotspotKind::Overloaded).unwrap();
        assert_eq!(overloaded.users.len(), 1);
        assert_eq!(overloaded.users[0].id, heavy.id);

        // Capacity exists elsewhere, so the one-company peer is underutilized.
        let under = summary.hotspot(HotspotKind::Underutilized).unwrap();
        assert_eq!(under.users[0].id, light.id);
        assert_eq!(under.severity, Severity::Low);
    }

    #[test]
    fn mixed_snapshots_fail_fast() {
        let snapshot_a = EntitySnapshot::empty();
        let snapshot_b = EntitySnapshot::empty();
        let tree = build_scope_tree(&snapshot_a);
        let graph = build_reporting_graph(&snapshot_b);
        let report = validate(&tree, &graph, &snapshot_b);
        assert!(report.is_err());

        let graph_a = build_reporting_graph(&snapshot_a);
        let report_a = validate(&tree, &graph_a, &snapshot_a).unwrap();
        let err = aggregate(&tree, &report_a, &snapshot_b, &AggregatorConfig::default());
        assert!(matches!(err, Err(EngineError::SnapshotMismatch { .. })));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any conflict set C and any subset C' of C, the
        /// efficiency score under C' is at least the score under C.
        #[test]
        fn efficiency_is_monotone_under_conflict_removal(
            flags in prop::collection::vec(any::<bool>(), 6),
            keep in prop::collection::vec(any::<bool>(), 6),
        ) {
            use sawit_validation::{AssignmentConflict, ConflictKind, ValidationReport};

            let ksk = company("KSK");
            let estates: Vec<Estate> =
                (0..flags.len()).map(|i| estate(ksk.id, &format!("E{i}"))).collect();
            let managers: Vec<User> = estates
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let mut m = user(&format!("M{i}"), Role::Manager);
                    m.assigned_estates = vec![e.id];
                    m
                })
                .collect();

            let snapshot = EntitySnapshot::new(
                vec![ksk],
                estates,
                vec![],
                vec![],
                managers.clone(),
            );
            let tree = build_scope_tree(&snapshot);

            let conflict_for = |m: &User| AssignmentConflict {
                subject_user_id: m.id,
                scope_id: None,
                kind: ConflictKind::AreaMismatch,
                detail: String::new(),
            };

            // C: conflicts where flags[i]; C': the kept subset of C.
            let full: Vec<AssignmentConflict> = managers
                .iter()
                .zip(&flags)
                .filter(|(_, f)| **f)
                .map(|(m, _)| conflict_for(m))
                .collect();
            let subset: Vec<AssignmentConflict> = managers
                .iter()
                .zip(flags.iter().zip(&keep))
                .filter(|(_, (f, k))| **f && **k)
                .map(|(m, _)| conflict_for(m))
                .collect();

            let report_full = ValidationReport {
                snapshot_id: snapshot.id,
                conflicts: full,
            };
            let report_subset = ValidationReport {
                snapshot_id: snapshot.id,
                conflicts: subset,
            };

            let config = AggregatorConfig::default();
            let score_full = aggregate(&tree, &report_full, &snapshot, &config)
                .unwrap()
                .efficiency_score;
            let score_subset = aggregate(&tree, &report_subset, &snapshot, &config)
                .unwrap()
                .efficiency_score;

            prop_assert!(score_subset >= score_full - 1e-9);
        }
    }
}
