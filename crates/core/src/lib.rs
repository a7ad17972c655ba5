//! `tenantry-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the account model,
//! the authorization layer and the repositories (no storage or transport).

pub mod aggregate;
pub mod clock;
pub mod context;
pub mod error;
pub mod id;
pub mod id_list;

pub use aggregate::AggregateRoot;
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::Context;
pub use error::{DomainError, DomainResult, PasswordViolation};
pub use id::{IntegrationId, PermittableId, PolicyId, RoleId, UserId, WorkspaceId};
pub use id_list::{IdList, IdSet};
