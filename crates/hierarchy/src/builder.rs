//! Scope tree construction.

use std::collections::HashSet;

use tracing::warn;

use sawit_core::{Block, Company, Division, EntitySnapshot, Estate, Role, User};

use crate::node::{AttachedUser, HierarchyNode, ScopeRef, ScopeTree};

/// Build the four-level scope tree for one snapshot.
///
/// Node order follows input entity order (stable, no re-sorting). Inactive
/// scope entities are retained; status filtering is presentational and happens
/// in [`crate::filter`]. Entities referencing a missing parent are dropped
/// from the tree with a data-integrity warning, never an error — partial
/// organizational data is expected during administration.
///
/// User attachment per level:
/// - Company: COMPANY_ADMIN and AREA_MANAGER via `assigned_companies`.
/// - Estate: MANAGER via `assigned_estates`.
/// - Division: ASISTEN via `assigned_divisions`.
/// - Block: MANDOR, inherited from the block's division membership.
///
/// At every node, attached users with authoritative-set cardinality > 1 land
/// in `multi_assignment_users`, the rest in `users`. A user with an empty
/// authoritative set attaches nowhere (the cross-validator reports them as
/// orphaned).
pub fn build_scope_tree(snapshot: &EntitySnapshot) -> ScopeTree {
    warn_dangling_parents(snapshot);

    let roots = snapshot
        .companies
        .iter()
        .map(|company| build_company_node(company, snapshot))
        .collect();

    ScopeTree {
        snapshot_id: snapshot.id,
        roots,
    }
}

fn build_company_node(company: &Company, snapshot: &EntitySnapshot) -> HierarchyNode {
    let company_uuid = *company.id.as_uuid();
    let (users, multi) = partition_attached(&snapshot.users, |user| {
        matches!(user.role, Role::CompanyAdmin | Role::AreaManager)
            && user.assignment_ids().contains(&company_uuid)
    });

    let children = snapshot
        .estates
        .iter()
        .filter(|estate| estate.company_id == company.id)
        .map(|estate| build_estate_node(estate, snapshot))
        .collect();

    HierarchyNode {
        scope: ScopeRef::Company(company.id),
        code: company.code.clone(),
        name: company.name.clone(),
        active: company.active,
        children,
        users,
        multi_assignment_users: multi,
    }
}

fn build_estate_node(estate: &Estate, snapshot: &EntitySnapshot) -> HierarchyNode {
    let estate_uuid = *estate.id.as_uuid();
    let (users, multi) = partition_attached(&snapshot.users, |user| {
        user.role == Role::Manager && user.assignment_ids().contains(&estate_uuid)
    });

    let children = snapshot
        .divisions
        .iter()
        .filter(|division| division.estate_id == estate.id)
        .map(|division| build_division_node(division, snapshot))
        .collect();

    HierarchyNode {
        scope: ScopeRef::Estate(estate.id),
        code: estate.code.clone(),
        name: estate.name.clone(),
        active: estate.active,
        children,
        users,
        multi_assignment_users: multi,
    }
}

fn build_division_node(division: &Division, snapshot: &EntitySnapshot) -> HierarchyNode {
    let division_uuid = *division.id.as_uuid();
    let (users, multi) = partition_attached(&snapshot.users, |user| {
        user.role == Role::Asisten && user.assignment_ids().contains(&division_uuid)
    });

    let children = snapshot
        .blocks
        .iter()
        .filter(|block| block.division_id == division.id)
        .map(|block| build_block_node(block, snapshot))
        .collect();

    HierarchyNode {
        scope: ScopeRef::Division(division.id),
        code: division.code.clone(),
        name: division.name.clone(),
        active: division.active,
        children,
        users,
        multi_assignment_users: multi,
    }
}

fn build_block_node(block: &Block, snapshot: &EntitySnapshot) -> HierarchyNode {
    // Mandor attachment is inherited: a Mandor assigned to the block's
    // division works every block of that division. Single/multi is judged on
    // the division-set cardinality.
    let division_uuid = *block.division_id.as_uuid();
    let (users, multi) = partition_attached(&snapshot.users, |user| {
        user.role == Role::Mandor && user.assignment_ids().contains(&division_uuid)
    });

    HierarchyNode {
        scope: ScopeRef::Block(block.id),
        code: block.code.clone(),
        name: block.name.clone(),
        active: block.active,
        children: Vec::new(),
        users,
        multi_assignment_users: multi,
    }
}

/// Partition matching users into (single, multi) in input order.
fn partition_attached(
    users: &[User],
    mut attaches_here: impl FnMut(&User) -> bool,
) -> (Vec<AttachedUser>, Vec<AttachedUser>) {
    let mut single = Vec::new();
    let mut multi = Vec::new();
    for user in users {
        if !attaches_here(user) {
            continue;
        }
        let attached = AttachedUser::from_user(user);
        if user.is_multi_assigned() {
            multi.push(attached);
        } else {
            single.push(attached);
        }
    }
    (single, multi)
}

fn warn_dangling_parents(snapshot: &EntitySnapshot) {
    let company_ids: HashSet<_> = snapshot.companies.iter().map(|c| c.id).collect();
    let estate_ids: HashSet<_> = snapshot.estates.iter().map(|e| e.id).collect();
    let division_ids: HashSet<_> = snapshot.divisions.iter().map(|d| d.id).collect();

    for estate in &snapshot.estates {
        if !company_ids.contains(&estate.company_id) {
            warn!(
                estate_id = %estate.id,
                company_id = %estate.company_id,
                "estate references missing company; dropped from scope tree"
            );
        }
    }
    for division in &snapshot.divisions {
        if !estate_ids.contains(&division.estate_id) {
            warn!(
                division_id = %division.id,
                estate_id = %division.estate_id,
                "division references missing estate; dropped from scope tree"
            );
        }
    }
    for block in &snapshot.blocks {
        if !division_ids.contains(&block.division_id) {
            warn!(
                block_id = %block.id,
                division_id = %block.division_id,
                "block references missing division; dropped from scope tree"
            );
        }
    }
}
