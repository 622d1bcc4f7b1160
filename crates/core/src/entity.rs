//! Scope entities and users, exactly as handed over by the entity store.
//!
//! These are plain data carriers. The engine assumes ids are unique within
//! each collection (enforced upstream) and never mutates them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::{BlockId, CompanyId, DivisionId, EstateId, UserId};
use crate::role::{AssignmentField, Role, UserStatus};

/// Top-level scope node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub code: String,
    pub name: String,
    pub active: bool,
}

/// Second-level scope node, owned by a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estate {
    pub id: EstateId,
    pub company_id: CompanyId,
    pub code: String,
    pub name: String,
    pub active: bool,
    /// Planted area in hectares. Opaque to the engine.
    pub area_ha: f64,
}

/// Third-level scope node, owned by an estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    pub estate_id: EstateId,
    pub code: String,
    pub name: String,
    pub active: bool,
    pub area_ha: f64,
}

/// Leaf scope node, owned by a division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub division_id: DivisionId,
    pub code: String,
    pub name: String,
    pub active: bool,
    pub area_ha: f64,
    /// Year the block was planted. Opaque to the engine.
    pub planting_year: Option<i32>,
}

/// A role holder with their scope assignments and reporting pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    /// Meaningful only for COMPANY_ADMIN / AREA_MANAGER.
    #[serde(default)]
    pub assigned_companies: Vec<CompanyId>,
    /// Meaningful only for MANAGER.
    #[serde(default)]
    pub assigned_estates: Vec<EstateId>,
    /// Meaningful only for ASISTEN / MANDOR / SATPAM / TIMBANGAN / GRADING.
    #[serde(default)]
    pub assigned_divisions: Vec<DivisionId>,
    /// Direct reporting link (AREA_MANAGER / MANAGER / ASISTEN only).
    #[serde(default)]
    pub manager_id: Option<UserId>,
}

impl User {
    /// The authoritative assignment set for this user's role, erased to raw
    /// uuids. Every other stored set is treated as empty.
    pub fn assignment_ids(&self) -> Vec<Uuid> {
        match self.role.assignment_field() {
            None => Vec::new(),
            Some(AssignmentField::Companies) => {
                self.assigned_companies.iter().map(|id| *id.as_uuid()).collect()
            }
            Some(AssignmentField::Estates) => {
                self.assigned_estates.iter().map(|id| *id.as_uuid()).collect()
            }
            Some(AssignmentField::Divisions) => {
                self.assigned_divisions.iter().map(|id| *id.as_uuid()).collect()
            }
        }
    }

    /// Cardinality of the authoritative assignment set.
    pub fn assignment_count(&self) -> usize {
        match self.role.assignment_field() {
            None => 0,
            Some(AssignmentField::Companies) => self.assigned_companies.len(),
            Some(AssignmentField::Estates) => self.assigned_estates.len(),
            Some(AssignmentField::Divisions) => self.assigned_divisions.len(),
        }
    }

    /// More than one element in the authoritative set.
    pub fn is_multi_assigned(&self) -> bool {
        self.assignment_count() > 1
    }

    /// Role requires a scope assignment but the authoritative set is empty.
    pub fn is_orphaned(&self) -> bool {
        self.role.requires_scope() && self.assignment_count() == 0
    }
}
