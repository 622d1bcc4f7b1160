//! Role-scoped visibility over the reporting graph.
//!
//! Every traversal carries an explicit visited set; re-visitation is treated
//! as a detected cycle and terminates the walk instead of recursing forever.

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use sawit_core::{Role, User, UserId, UserStatus};

use crate::graph::ReportingGraph;

/// Result of walking `manager_id` pointers upward from one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorTrail {
    /// Resolvable ancestors, nearest first. Does not include the start user.
    pub chain: Vec<UserId>,
    /// The walk revisited an id; the chain is malformed and was cut there.
    pub cycle_detected: bool,
}

/// Walk `manager_id` upward from `start`.
///
/// Terminates in O(depth) even on a corrupted cyclic chain: the moment an id
/// is revisited the walk stops and flags the cycle.
pub fn ancestor_trail(graph: &ReportingGraph, start: UserId) -> AncestorTrail {
    let mut chain = Vec::new();
    let mut visited: HashSet<UserId> = HashSet::new();
    visited.insert(start);

    let mut current = start;
    loop {
        let Some(user) = graph.user(current) else {
            break;
        };
        let Some(manager_id) = user.manager_id else {
            break;
        };
        if !visited.insert(manager_id) {
            return AncestorTrail {
                chain,
                cycle_detected: true,
            };
        }
        if graph.user(manager_id).is_none() {
            // Dangling pointer; builder already warned about it.
            break;
        }
        chain.push(manager_id);
        current = manager_id;
    }

    AncestorTrail {
        chain,
        cycle_detected: false,
    }
}

/// One user in a materialized reporting subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingNode {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub children: Vec<ReportingNode>,
}

/// A viewer's "need to know" slice of the reporting graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSubgraph {
    pub roots: Vec<ReportingNode>,
    pub visible_ids: BTreeSet<UserId>,
    pub cycle_detected: bool,
}

/// Compute the subgraph visible to `viewer` under their role.
///
/// The viewer and all resolvable ancestors are always visible. AreaManager
/// and Manager viewers additionally see their full descendant closure (BFS,
/// visited-guarded). The root set is the viewer themselves for an
/// AreaManager, otherwise their topmost resolvable ancestor. Running this
/// twice on an unchanged graph yields identical results.
pub fn visible_subgraph(
    graph: &ReportingGraph,
    viewer: UserId,
    viewer_role: Role,
) -> VisibleSubgraph {
    if graph.user(viewer).is_none() {
        return VisibleSubgraph {
            roots: Vec::new(),
            visible_ids: BTreeSet::new(),
            cycle_detected: false,
        };
    }

    let mut visible: BTreeSet<UserId> = BTreeSet::new();
    visible.insert(viewer);

    let trail = ancestor_trail(graph, viewer);
    let mut cycle_detected = trail.cycle_detected;
    visible.extend(trail.chain.iter().copied());

    if matches!(viewer_role, Role::AreaManager | Role::Manager) {
        cycle_detected |= collect_descendants(graph, viewer, &mut visible);
    }

    let root_id = if viewer_role == Role::AreaManager {
        viewer
    } else {
        trail.chain.last().copied().unwrap_or(viewer)
    };

    let mut materialize_visited: HashSet<UserId> = HashSet::new();
    let roots = match materialize(graph, root_id, &visible, &mut materialize_visited) {
        Some(node) => vec![node],
        None => Vec::new(),
    };

    VisibleSubgraph {
        roots,
        visible_ids: visible,
        cycle_detected,
    }
}

/// BFS over the adjacency; returns whether a revisit was hit.
fn collect_descendants(
    graph: &ReportingGraph,
    start: UserId,
    visible: &mut BTreeSet<UserId>,
) -> bool {
    let mut cycle = false;
    let mut seen: HashSet<UserId> = HashSet::new();
    seen.insert(start);
    let mut queue: VecDeque<UserId> = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for &child in graph.children_of(current) {
            if !seen.insert(child) {
                cycle = true;
                continue;
            }
            visible.insert(child);
            queue.push_back(child);
        }
    }
    cycle
}

fn materialize(
    graph: &ReportingGraph,
    id: UserId,
    visible: &BTreeSet<UserId>,
    visited: &mut HashSet<UserId>,
) -> Option<ReportingNode> {
    if !visible.contains(&id) || !visited.insert(id) {
        return None;
    }
    let user = graph.user(id)?;
    let children = graph
        .children_of(id)
        .iter()
        .filter_map(|&child| materialize(graph, child, visible, visited))
        .collect();
    Some(node_summary(user, children))
}

fn node_summary(user: &User, children: Vec<ReportingNode>) -> ReportingNode {
    ReportingNode {
        id: user.id,
        name: user.name.clone(),
        role: user.role,
        status: user.status,
        children,
    }
}
