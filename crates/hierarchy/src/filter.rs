//! Filter/search projection over the scope tree.
//!
//! Applies a text/role/status predicate recursively, preserving ancestors of
//! any match. The projection clones the matched part of the tree; the source
//! tree is never modified.

use sawit_core::{Role, UserStatus};

use crate::node::{AttachedUser, HierarchyNode, ScopeTree};

/// Presentational filter over a built scope tree.
///
/// An empty filter is the identity projection. The query matches node codes
/// and names as well as attached user names, case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeFilter {
    query: Option<String>,
    role: Option<Role>,
    status: Option<UserStatus>,
}

impl TreeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into().to_lowercase());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.role.is_none() && self.status.is_none()
    }

    /// Project the tree down to matching nodes plus their ancestors.
    pub fn apply(&self, tree: &ScopeTree) -> ScopeTree {
        if self.is_empty() {
            return tree.clone();
        }
        ScopeTree {
            snapshot_id: tree.snapshot_id,
            roots: tree
                .roots
                .iter()
                .filter_map(|root| self.project_node(root))
                .collect(),
        }
    }

    /// Keep a node if it matches directly, any attached user matches, or any
    /// descendant survives. Returns the pruned clone, or None.
    fn project_node(&self, node: &HierarchyNode) -> Option<HierarchyNode> {
        let children: Vec<HierarchyNode> = node
            .children
            .iter()
            .filter_map(|child| self.project_node(child))
            .collect();

        let node_matches = self.node_matches(node);
        let users = self.narrow_users(&node.users, node_matches);
        let multi = self.narrow_users(&node.multi_assignment_users, node_matches);
        let any_user_matches = node.users.iter().chain(&node.multi_assignment_users).any(|u| self.user_matches(u));

        if !node_matches && !any_user_matches && children.is_empty() {
            return None;
        }

        Some(HierarchyNode {
            scope: node.scope,
            code: node.code.clone(),
            name: node.name.clone(),
            active: node.active,
            children,
            users,
            multi_assignment_users: multi,
        })
    }

    fn node_matches(&self, node: &HierarchyNode) -> bool {
        // Role/status predicates apply to users, not scope nodes; a node can
        // only match directly through the text query.
        if self.role.is_some() || self.status.is_some() {
            return false;
        }
        match &self.query {
            None => false,
            Some(q) => {
                node.code.to_lowercase().contains(q) || node.name.to_lowercase().contains(q)
            }
        }
    }

    fn user_matches(&self, user: &AttachedUser) -> bool {
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        if let Some(status) = self.status {
            if user.status != status {
                return false;
            }
        }
        match &self.query {
            None => self.role.is_some() || self.status.is_some(),
            Some(q) => user.name.to_lowercase().contains(q),
        }
    }

    /// When a user predicate is set, narrow attachments to matching users; a
    /// node-only match keeps all attachments.
    fn narrow_users(&self, users: &[AttachedUser], node_matches: bool) -> Vec<AttachedUser> {
        if node_matches {
            return users.to_vec();
        }
        users
            .iter()
            .filter(|u| self.user_matches(u))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawit_core::{
        Company, CompanyId, Division, DivisionId, EntitySnapshot, Estate, EstateId, User, UserId,
    };

    use crate::builder::build_scope_tree;
    use crate::node::ScopeLevel;

    fn fixture() -> EntitySnapshot {
        let company = Company {
            id: CompanyId::new(),
            code: "KSK".to_string(),
            name: "PT Kebun Sawit Kita".to_string(),
            active: true,
        };
        let estate = Estate {
            id: EstateId::new(),
            company_id: company.id,
            code: "E1".to_string(),
            name: "Sungai Besar".to_string(),
            active: true,
            area_ha: 900.0,
        };
        let division = Division {
            id: DivisionId::new(),
            estate_id: estate.id,
            code: "D1".to_string(),
            name: "Divisi Utara".to_string(),
            active: true,
            area_ha: 300.0,
        };
        let manager = User {
            id: UserId::new(),
            name: "Rina Manager".to_string(),
            role: Role::Manager,
            status: UserStatus::Active,
            assigned_companies: vec![],
            assigned_estates: vec![estate.id],
            assigned_divisions: vec![],
            manager_id: None,
        };
        let asisten = User {
            id: UserId::new(),
            name: "Dewi Asisten".to_string(),
            role: Role::Asisten,
            status: UserStatus::Suspended,
            assigned_companies: vec![],
            assigned_estates: vec![],
            assigned_divisions: vec![division.id],
            manager_id: None,
        };
        EntitySnapshot::new(
            vec![company],
            vec![estate],
            vec![division],
            vec![],
            vec![manager, asisten],
        )
    }

    #[test]
    fn empty_filter_is_identity() {
        let tree = build_scope_tree(&fixture());
        let projected = TreeFilter::new().apply(&tree);
        assert_eq!(tree, projected);
    }

    #[test]
    fn query_match_preserves_ancestors() {
        let tree = build_scope_tree(&fixture());
        let projected = TreeFilter::new().with_query("utara").apply(&tree);

        // Division matched; company and estate survive as ancestors.
        assert_eq!(projected.roots.len(), 1);
        assert_eq!(projected.nodes_at(ScopeLevel::Estate).len(), 1);
        assert_eq!(projected.nodes_at(ScopeLevel::Division).len(), 1);
    }

    #[test]
    fn role_filter_narrows_attachments() {
        let tree = build_scope_tree(&fixture());
        let projected = TreeFilter::new().with_role(Role::Asisten).apply(&tree);

        let estates = projected.nodes_at(ScopeLevel::Estate);
        assert_eq!(estates.len(), 1);
        // Manager attachment at the estate is narrowed away.
        assert!(estates[0].users.is_empty());
        let divisions = projected.nodes_at(ScopeLevel::Division);
        assert_eq!(divisions[0].users.len(), 1);
        assert_eq!(divisions[0].users[0].role, Role::Asisten);
    }

    #[test]
    fn status_filter_drops_unmatched_branches() {
        let tree = build_scope_tree(&fixture());
        let projected = TreeFilter::new()
            .with_status(UserStatus::Suspended)
            .apply(&tree);

        let divisions = projected.nodes_at(ScopeLevel::Division);
        assert_eq!(divisions.len(), 1);
        assert_eq!(divisions[0].users.len(), 1);
        assert_eq!(divisions[0].users[0].status, UserStatus::Suspended);
    }

    #[test]
    fn no_match_yields_empty_tree() {
        let tree = build_scope_tree(&fixture());
        let projected = TreeFilter::new().with_query("nonexistent").apply(&tree);
        assert!(projected.roots.is_empty());
        assert_eq!(projected.snapshot_id, tree.snapshot_id);
    }
}
