pub mod role_permission;

pub use role_permission::{RolePermissions, has_permission, permissions_for_role};
