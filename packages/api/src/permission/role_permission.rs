/// Actions a dashboard user may perform, derived from their role.
use bitflags::bitflags;

use crate::entity::sea_orm_active_enums::UserRole;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct RolePermissions: i64 {
        const ReadUnits         =   0b00000000_00000000_00000001;
        const WriteUnits        =   0b00000000_00000000_00000010;
        const DeleteUnits       =   0b00000000_00000000_00000100;
        const RentUnits         =   0b00000000_00000000_00001000;
        const ReadCustomers     =   0b00000000_00000000_00010000;
        const WriteCustomers    =   0b00000000_00000000_00100000;
        const DeleteCustomers   =   0b00000000_00000000_01000000;
        const ReadMetrics       =   0b00000000_00000000_10000000;
        const CalculateMetrics  =   0b00000000_00000001_00000000;
        const ManageUsers       =   0b00000000_00000010_00000000;
    }
}

pub fn permissions_for_role(role: UserRole) -> RolePermissions {
    match role {
        UserRole::Admin => RolePermissions::all(),
        UserRole::Manager => {
            RolePermissions::ReadUnits
                | RolePermissions::WriteUnits
                | RolePermissions::RentUnits
                | RolePermissions::ReadCustomers
                | RolePermissions::WriteCustomers
                | RolePermissions::ReadMetrics
                | RolePermissions::CalculateMetrics
        }
        UserRole::Staff => {
            RolePermissions::ReadUnits
                | RolePermissions::ReadCustomers
                | RolePermissions::ReadMetrics
        }
    }
}

pub fn has_permission(role: UserRole, permission: RolePermissions) -> bool {
    permissions_for_role(role).contains(permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_do_everything() {
        for permission in RolePermissions::all().iter() {
            assert!(has_permission(UserRole::Admin, permission));
        }
    }

    #[test]
    fn test_manager_permissions() {
        assert!(has_permission(UserRole::Manager, RolePermissions::WriteUnits));
        assert!(has_permission(UserRole::Manager, RolePermissions::RentUnits));
        assert!(has_permission(UserRole::Manager, RolePermissions::WriteCustomers));
        assert!(has_permission(UserRole::Manager, RolePermissions::CalculateMetrics));
        assert!(!has_permission(UserRole::Manager, RolePermissions::DeleteUnits));
        assert!(!has_permission(UserRole::Manager, RolePermissions::DeleteCustomers));
        assert!(!has_permission(UserRole::Manager, RolePermissions::ManageUsers));
    }

    #[test]
    fn test_staff_is_read_only() {
        let staff = permissions_for_role(UserRole::Staff);
        assert_eq!(
            staff,
            RolePermissions::ReadUnits | RolePermissions::ReadCustomers | RolePermissions::ReadMetrics
        );
        assert!(!has_permission(UserRole::Staff, RolePermissions::CalculateMetrics));
        assert!(!has_permission(UserRole::Staff, RolePermissions::RentUnits));
    }

    #[test]
    fn test_combined_permission_requires_every_flag() {
        let both = RolePermissions::ReadMetrics | RolePermissions::ManageUsers;
        assert!(!has_permission(UserRole::Manager, both));
        assert!(has_permission(UserRole::Admin, both));
    }
}
