//! Role table: the closed role enumeration and its static lookups.
//!
//! Which assignment field is authoritative for a role, whether the role
//! requires a scope assignment at all, and where the role sits in the
//! reporting order are all compile-time-checked lookups on the enum — never
//! runtime string comparison.

use serde::{Deserialize, Serialize};

/// Organizational role, as stored by the entity store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    CompanyAdmin,
    AreaManager,
    Manager,
    Asisten,
    Mandor,
    Satpam,
    Timbangan,
    Grading,
}

/// Which of a user's assignment sets is authoritative for their role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentField {
    Companies,
    Estates,
    Divisions,
}

impl Role {
    /// All roles, in rank order where ranked.
    pub const ALL: [Role; 9] = [
        Role::SuperAdmin,
        Role::CompanyAdmin,
        Role::AreaManager,
        Role::Manager,
        Role::Asisten,
        Role::Mandor,
        Role::Satpam,
        Role::Timbangan,
        Role::Grading,
    ];

    /// The assignment set that is meaningful for this role.
    ///
    /// All other stored sets must be treated as empty regardless of content.
    pub fn assignment_field(self) -> Option<AssignmentField> {
        match self {
            Role::SuperAdmin => None,
            Role::CompanyAdmin | Role::AreaManager => Some(AssignmentField::Companies),
            Role::Manager => Some(AssignmentField::Estates),
            Role::Asisten | Role::Mandor | Role::Satpam | Role::Timbangan | Role::Grading => {
                Some(AssignmentField::Divisions)
            }
        }
    }

    /// Whether this role requires a scope assignment to be well-placed.
    ///
    /// A scope-requiring user with an empty authoritative set is orphaned.
    pub fn requires_scope(self) -> bool {
        self.assignment_field().is_some()
    }

    /// Position in the reporting order, if this role participates.
    ///
    /// AreaManager(0) < Manager(1) < Asisten(2); a reporting edge is only
    /// valid when the subordinate's rank is strictly greater.
    pub fn reporting_rank(self) -> Option<u8> {
        match self {
            Role::AreaManager => Some(0),
            Role::Manager => Some(1),
            Role::Asisten => Some(2),
            _ => None,
        }
    }

    /// Whether a multi-element assignment set is a legitimate configuration
    /// for this role (as opposed to data drift).
    pub fn multi_capable(self) -> bool {
        matches!(
            self,
            Role::AreaManager | Role::Manager | Role::Asisten | Role::Mandor
        )
    }
}

/// Account status of a user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn is_active(self) -> bool {
        self == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_except_super_admin_requires_scope() {
        for role in Role::ALL {
            let expected = role != Role::SuperAdmin;
            assert_eq!(role.requires_scope(), expected, "role {role:?}");
        }
    }

    #[test]
    fn reporting_ranks_strictly_increase_down_the_chain() {
        let am = Role::AreaManager.reporting_rank().unwrap();
        let mgr = Role::Manager.reporting_rank().unwrap();
        let asst = Role::Asisten.reporting_rank().unwrap();
        assert!(am < mgr && mgr < asst);
        assert_eq!(Role::Mandor.reporting_rank(), None);
        assert_eq!(Role::SuperAdmin.reporting_rank(), None);
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&Role::AreaManager).unwrap();
        assert_eq!(json, "\"AREA_MANAGER\"");
        let role: Role = serde_json::from_str("\"TIMBANGAN\"").unwrap();
        assert_eq!(role, Role::Timbangan);
    }
}
