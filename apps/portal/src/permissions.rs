//! Role → permission mapping.
//!
//! A static table: the identity provider supplies the role, this module
//! answers what it may do. Reps see and submit their own sales; managers
//! and operations additionally approve and see everything; admin also
//! holds the full-record edit.

use canvass_core::Role;

/// Portal permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Submit sales (own).
    SubmitSales,
    /// View own sales and stats.
    ViewSales,
    /// View any rep's sales, stats, and the full leaderboard detail.
    ViewAllSales,
    /// Approve or reject pending sales.
    ApproveSales,
    /// Full-record administrative edit, including status overrides.
    AdminEditSales,
}

/// The static permission table.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    use Permission::*;

    match role {
        Role::Admin => &[
            SubmitSales,
            ViewSales,
            ViewAllSales,
            ApproveSales,
            AdminEditSales,
        ],
        Role::Operations => &[SubmitSales, ViewSales, ViewAllSales, ApproveSales],
        Role::SalesManager => &[SubmitSales, ViewSales, ViewAllSales, ApproveSales],
        Role::SalesRep => &[SubmitSales, ViewSales],
    }
}

/// Checks one permission against the table.
pub fn role_can(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// Handler guard: 403 unless the role holds the permission.
pub fn require(role: Role, permission: Permission) -> Result<(), crate::error::ApiError> {
    if role_can(role, permission) {
        Ok(())
    } else {
        Err(crate::error::ApiError::forbidden(format!(
            "Role {role:?} lacks {permission:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rep_permissions() {
        assert!(role_can(Role::SalesRep, Permission::SubmitSales));
        assert!(role_can(Role::SalesRep, Permission::ViewSales));
        assert!(!role_can(Role::SalesRep, Permission::ViewAllSales));
        assert!(!role_can(Role::SalesRep, Permission::ApproveSales));
        assert!(!role_can(Role::SalesRep, Permission::AdminEditSales));
    }

    #[test]
    fn test_approvers() {
        for role in [Role::Admin, Role::Operations, Role::SalesManager] {
            assert!(role_can(role, Permission::ApproveSales), "{role:?}");
            assert!(role_can(role, Permission::ViewAllSales), "{role:?}");
        }
    }

    #[test]
    fn test_only_admin_edits() {
        assert!(role_can(Role::Admin, Permission::AdminEditSales));
        for role in [Role::Operations, Role::SalesManager, Role::SalesRep] {
            assert!(!role_can(role, Permission::AdminEditSales), "{role:?}");
        }
    }
}
