//! Use-case runner: permission gate plus optional transaction.
//!
//! ```text
//! Usecase requirements
//!   ↓
//! 1. Check operator against readable/writable/maintainable/ownable sets
//!    (denied → OperationDenied, nothing touched)
//!   ↓
//! 2. Begin transaction (if requested and the container has one)
//!   ↓
//! 3. Run handler under the transaction's context
//!   ↓
//! 4. Commit if the handler succeeded
//!   ↓
//! 5. End the transaction, always
//! ```
//!
//! When several steps fail, the first error is the one returned.

use tenantry_auth::Operator;
use tenantry_core::{Context, DomainError, DomainResult, WorkspaceId};
use tenantry_infra::Container;

/// Requirements of one use-case invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usecase {
    readable: Vec<WorkspaceId>,
    writable: Vec<WorkspaceId>,
    maintainable: Vec<WorkspaceId>,
    ownable: Vec<WorkspaceId>,
    transactional: bool,
}

impl Usecase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readable_workspaces(mut self, ids: impl IntoIterator<Item = WorkspaceId>) -> Self {
        self.readable.extend(ids);
        self
    }

    pub fn with_writable_workspaces(mut self, ids: impl IntoIterator<Item = WorkspaceId>) -> Self {
        self.writable.extend(ids);
        self
    }

    pub fn with_maintainable_workspaces(mut self, ids: impl IntoIterator<Item = WorkspaceId>) -> Self {
        self.maintainable.extend(ids);
        self
    }

    pub fn with_ownable_workspaces(mut self, ids: impl IntoIterator<Item = WorkspaceId>) -> Self {
        self.ownable.extend(ids);
        self
    }

    pub fn transaction(mut self) -> Self {
        self.transactional = true;
        self
    }

    pub fn is_transactional(&self) -> bool {
        self.transactional
    }

    /// Each non-empty requirement needs an operator holding at least one of
    /// its workspaces at that level.
    pub fn check_permission(&self, op: Option<&Operator>) -> DomainResult<()> {
        let granted = |ids: &[WorkspaceId], allowed: fn(&Operator, &[WorkspaceId]) -> bool| {
            ids.is_empty() || op.is_some_and(|op| allowed(op, ids))
        };
        if granted(&self.readable, Operator::is_readable_workspace)
            && granted(&self.writable, Operator::is_writable_workspace)
            && granted(&self.maintainable, Operator::is_maintaining_workspace)
            && granted(&self.ownable, Operator::is_owning_workspace)
        {
            Ok(())
        } else {
            Err(DomainError::OperationDenied)
        }
    }

    pub fn run<T, F>(&self, ctx: &Context, op: Option<&Operator>, repos: &Container, f: F) -> DomainResult<T>
    where
        F: FnOnce(&Context) -> DomainResult<T>,
    {
        if let Err(e) = self.check_permission(op) {
            tracing::debug!(user_id = ?op.and_then(|o| o.user), "operation denied");
            return Err(e);
        }
        ctx.check()?;

        let transaction = match (&repos.transaction, self.transactional) {
            (Some(t), true) => t,
            _ => return f(ctx),
        };

        let mut tx = transaction.begin(ctx)?;
        let tx_ctx = tx.context();
        let result = f(&tx_ctx).and_then(|v| tx.commit().map(|()| v));
        let ended = tx.end(ctx);
        match (result, ended) {
            (Err(e), ended) => {
                if let Err(end_err) = ended {
                    tracing::warn!(error = %end_err, "transaction end failed after handler error");
                }
                Err(e)
            }
            (Ok(_), Err(e)) => Err(e),
            (Ok(v), Ok(())) => Ok(v),
        }
    }
}

/// Shorthand for [`Usecase::run`].
pub fn run<T, F>(ctx: &Context, op: Option<&Operator>, repos: &Container, usecase: &Usecase, f: F) -> DomainResult<T>
where
    F: FnOnce(&Context) -> DomainResult<T>,
{
    usecase.run(ctx, op, repos, f)
}
