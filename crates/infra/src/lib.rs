//! Infrastructure layer: repository contracts, transactions, in-memory
//! backends and the persisted document layout.

pub mod document;
pub mod memory;
pub mod repo;
pub mod transaction;

pub use repo::{Container, PermittableRepository, RoleRepository, UserRepository, WorkspaceRepository};
pub use transaction::{Transaction, Tx, with_retry};
