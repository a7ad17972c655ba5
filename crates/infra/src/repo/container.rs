use std::sync::Arc;

use crate::transaction::Transaction;

use super::{PermittableRepository, RoleRepository, UserRepository, WorkspaceRepository};

/// The set of repositories a usecase works against.
///
/// `transaction` is optional: without it, transactional usecases simply run
/// their handler directly.
#[derive(Clone)]
pub struct Container {
    pub user: Arc<dyn UserRepository>,
    pub workspace: Arc<dyn WorkspaceRepository>,
    pub role: Arc<dyn RoleRepository>,
    pub permittable: Arc<dyn PermittableRepository>,
    pub transaction: Option<Arc<dyn Transaction>>,
}

impl core::fmt::Debug for Container {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Container")
            .field("transaction", &self.transaction.is_some())
            .finish_non_exhaustive()
    }
}
