//! Derived scope-tree value objects.
//!
//! Built fresh per query from one snapshot, never mutated in place after
//! construction. Plain serializable data so presentation, search, and
//! analytics consumers can use them without touching engine internals.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sawit_core::{BlockId, CompanyId, DivisionId, EstateId, Role, SnapshotId, User, UserId, UserStatus};

/// Which level of the scope tree a node sits at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLevel {
    Company,
    Estate,
    Division,
    Block,
}

/// Typed reference to the scope entity a node wraps.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", content = "id", rename_all = "lowercase")]
pub enum ScopeRef {
    Company(CompanyId),
    Estate(EstateId),
    Division(DivisionId),
    Block(BlockId),
}

impl ScopeRef {
    pub fn level(&self) -> ScopeLevel {
        match self {
            ScopeRef::Company(_) => ScopeLevel::Company,
            ScopeRef::Estate(_) => ScopeLevel::Estate,
            ScopeRef::Division(_) => ScopeLevel::Division,
            ScopeRef::Block(_) => ScopeLevel::Block,
        }
    }

    /// The wrapped id, erased to a raw uuid.
    pub fn scope_uuid(&self) -> Uuid {
        match self {
            ScopeRef::Company(id) => *id.as_uuid(),
            ScopeRef::Estate(id) => *id.as_uuid(),
            ScopeRef::Division(id) => *id.as_uuid(),
            ScopeRef::Block(id) => *id.as_uuid(),
        }
    }
}

/// Projection of a user as attached at one tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedUser {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    /// Cardinality of the user's authoritative assignment set.
    pub assignment_count: usize,
}

impl AttachedUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
            status: user.status,
            assignment_count: user.assignment_count(),
        }
    }
}

/// One node of the derived scope tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub scope: ScopeRef,
    pub code: String,
    pub name: String,
    pub active: bool,
    pub children: Vec<HierarchyNode>,
    /// Users attached here whose authoritative set has cardinality <= 1.
    pub users: Vec<AttachedUser>,
    /// Users attached here whose authoritative set has cardinality > 1.
    pub multi_assignment_users: Vec<AttachedUser>,
}

impl HierarchyNode {
    /// Depth-first walk over this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a HierarchyNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// The full derived tree for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeTree {
    pub snapshot_id: SnapshotId,
    pub roots: Vec<HierarchyNode>,
}

impl ScopeTree {
    /// Depth-first walk over every node in the tree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a HierarchyNode)) {
        for root in &self.roots {
            root.walk(visit);
        }
    }

    /// All nodes at one level, in tree order.
    pub fn nodes_at(&self, level: ScopeLevel) -> Vec<&HierarchyNode> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if node.scope.level() == level {
                out.push(node);
            }
        });
        out
    }
}
