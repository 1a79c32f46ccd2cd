//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20250101000001_create_users_table.sql`.

/// Operator role: may manage scheduled posts.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AUTHOR: &str = "author";

/// Returns `true` if `role` is one of the known role names.
pub fn is_known_role(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_AUTHOR)
}
