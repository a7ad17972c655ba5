//! Transaction contract: `begin → work → commit? → end`.

use std::sync::Arc;

use tenantry_core::{Context, DomainError, DomainResult};

/// Opens transactions against a backend.
pub trait Transaction: Send + Sync {
    fn begin(&self, ctx: &Context) -> DomainResult<Box<dyn Tx>>;
}

impl<T> Transaction for Arc<T>
where
    T: Transaction + ?Sized,
{
    fn begin(&self, ctx: &Context) -> DomainResult<Box<dyn Tx>> {
        (**self).begin(ctx)
    }
}

/// One open transaction.
///
/// `commit` only marks the transaction; the work is applied (or rolled back
/// when uncommitted) by `end`, which must be called exactly once.
pub trait Tx: Send {
    fn commit(&mut self) -> DomainResult<()>;

    fn end(self: Box<Self>, ctx: &Context) -> DomainResult<()>;

    fn is_committed(&self) -> bool;

    /// Context to run the transactional work under.
    fn context(&self) -> Context;
}

/// Run `f` in a transaction, retrying the whole attempt while it (or the
/// transaction end) fails with `TransactionConflict`, at most `retries` extra
/// times. Any other error is returned immediately.
pub fn with_retry<T, F>(
    ctx: &Context,
    transaction: &dyn Transaction,
    retries: usize,
    mut f: F,
) -> DomainResult<T>
where
    F: FnMut(&Context) -> DomainResult<T>,
{
    let mut attempt = 0;
    loop {
        ctx.check()?;
        let result = run_once(ctx, transaction, &mut f);
        match result {
            Err(DomainError::TransactionConflict) if attempt < retries => {
                attempt += 1;
                tracing::debug!(attempt, "transaction conflict, retrying");
            }
            other => return other,
        }
    }
}

fn run_once<T, F>(ctx: &Context, transaction: &dyn Transaction, f: &mut F) -> DomainResult<T>
where
    F: FnMut(&Context) -> DomainResult<T>,
{
    let mut tx = transaction.begin(ctx)?;
    let tx_ctx = tx.context();
    let result = f(&tx_ctx).and_then(|v| tx.commit().map(|()| v));
    let ended = tx.end(ctx);
    match (result, ended) {
        (Err(e), _) => Err(e),
        (Ok(_), Err(e)) => Err(e),
        (Ok(v), Ok(())) => Ok(v),
    }
}
