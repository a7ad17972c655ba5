//! Repository contracts.
//!
//! Every backend must behave identically:
//! - every method honours `ctx` and returns `Cancelled` without touching
//!   state once it is cancelled;
//! - single reads return `NotFound` on a miss;
//! - `find_by_ids` returns one slot per requested id, `None` where missing;
//! - other list results are sorted by ascending id;
//! - `save` upserts, `create` is a strict insert.

mod container;
mod permission;
mod user;
mod workspace;

pub use container::Container;
pub use permission::{PermittableRepository, RoleRepository};
pub use user::UserRepository;
pub use workspace::WorkspaceRepository;
