//! In-memory reference backend.
//!
//! One lock per repository; every method holds it only for its own duration.
//! Intended for tests/dev.

mod permission;
mod table;
mod transaction;
mod user;
mod workspace;

use std::sync::Arc;

pub use permission::{InMemoryPermittableRepository, InMemoryRoleRepository};
pub use transaction::InMemoryTransaction;
pub use user::{InMemoryUserRepository, MIN_SEARCH_KEYWORD_LEN};
pub use workspace::InMemoryWorkspaceRepository;

use crate::repo::Container;

/// Container over fresh in-memory repositories and transaction.
pub fn new_container() -> Container {
    new_container_with(InMemoryTransaction::new())
}

/// Same as [`new_container`], sharing the given transaction recorder.
pub fn new_container_with(transaction: InMemoryTransaction) -> Container {
    Container {
        user: Arc::new(InMemoryUserRepository::new()),
        workspace: Arc::new(InMemoryWorkspaceRepository::new()),
        role: Arc::new(InMemoryRoleRepository::new()),
        permittable: Arc::new(InMemoryPermittableRepository::new()),
        transaction: Some(Arc::new(transaction)),
    }
}
