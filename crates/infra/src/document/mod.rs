//! Persisted document layout, backend agnostic.
//!
//! These are the shapes a document store reads and writes. Converting a
//! document back into an aggregate re-runs the aggregate's validation.

mod permission;
mod user;
mod workspace;

pub use permission::{PermittableDocument, RoleDocument};
pub use user::{PasswordResetDocument, UserDocument, UserMetadataDocument, VerificationDocument};
pub use workspace::{MemberDocument, WorkspaceDocument};

/// Map key for an id. Some stores forbid dots in keys, so they are stripped.
pub fn member_key(id: &impl core::fmt::Display) -> String {
    id.to_string().replace('.', "")
}
