//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `20260805000001_create_users.sql`.

pub const ROLE_READER: &str = "reader";
pub const ROLE_WRITER: &str = "writer";
pub const ROLE_PUBLISHER: &str = "publisher";
pub const ROLE_ADMIN: &str = "admin";

/// All roles a user may self-register with. Admins are promoted out of band.
pub const REGISTRABLE_ROLES: &[&str] = &[ROLE_READER, ROLE_WRITER, ROLE_PUBLISHER];

/// Roles allowed to create (and therefore own) books.
pub fn can_own_books(role: &str) -> bool {
    role == ROLE_WRITER || role == ROLE_PUBLISHER
}

/// Owner-or-admin rule shared by book, rating, and comment mutation paths.
pub fn can_modify(owner_id: crate::types::DbId, requester_id: crate::types::DbId, role: &str) -> bool {
    owner_id == requester_id || role == ROLE_ADMIN
}
