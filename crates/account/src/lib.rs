//! `tenantry-account`: users, workspaces and their memberships.
//!
//! Pure domain logic: every mutation goes through an aggregate method that
//! enforces its invariant. Time, token generation and password hashing are
//! injected through [`Registry`]; nothing here touches storage.

pub mod initializer;
pub mod registry;
pub mod user;
pub mod workspace;

pub use initializer::{InitParams, init};
pub use registry::{FixedTokens, RandomTokens, Registry, TokenGenerator};
pub use user::{
    Lang, Metadata, PasswordReset, Theme, User, UserBuilder, Verification, is_valid_email,
};
pub use workspace::{Member, Members, Workspace, WorkspaceBuilder, WorkspaceList};
