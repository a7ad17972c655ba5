use std::collections::BTreeMap;
use std::sync::RwLock;

use tenantry_core::{AggregateRoot, Context, DomainError, DomainResult};

/// Id-keyed map of aggregates behind one lock.
///
/// Ordered by id so listings come out ascending without an extra sort.
#[derive(Debug)]
pub(crate) struct Table<A: AggregateRoot> {
    rows: RwLock<BTreeMap<A::Id, A>>,
}

impl<A: AggregateRoot> Default for Table<A> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<A> Table<A>
where
    A: AggregateRoot + Clone,
{
    /// Direct insert for seeding fixtures.
    pub(crate) fn seed(&self, row: A) {
        if let Ok(mut rows) = self.rows.write() {
            rows.insert(row.id(), row);
        }
    }

    pub(crate) fn read<R>(&self, ctx: &Context, f: impl FnOnce(&BTreeMap<A::Id, A>) -> R) -> DomainResult<R> {
        ctx.check()?;
        let rows = self
            .rows
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(f(&rows))
    }

    pub(crate) fn write<R>(
        &self,
        ctx: &Context,
        f: impl FnOnce(&mut BTreeMap<A::Id, A>) -> DomainResult<R>,
    ) -> DomainResult<R> {
        ctx.check()?;
        let mut rows = self
            .rows
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        f(&mut rows)
    }

    pub(crate) fn get(&self, ctx: &Context, id: A::Id) -> DomainResult<A> {
        self.read(ctx, |rows| rows.get(&id).cloned())?
            .ok_or(DomainError::NotFound)
    }

    pub(crate) fn get_many(&self, ctx: &Context, ids: &[A::Id]) -> DomainResult<Vec<Option<A>>> {
        self.read(ctx, |rows| ids.iter().map(|id| rows.get(id).cloned()).collect())
    }

    pub(crate) fn all(&self, ctx: &Context) -> DomainResult<Vec<A>> {
        self.read(ctx, |rows| rows.values().cloned().collect())
    }

    /// First row matching `pred`, in id order.
    pub(crate) fn find(&self, ctx: &Context, pred: impl Fn(&A) -> bool) -> DomainResult<A> {
        self.read(ctx, |rows| rows.values().find(|a| pred(a)).cloned())?
            .ok_or(DomainError::NotFound)
    }

    pub(crate) fn filter(&self, ctx: &Context, pred: impl Fn(&A) -> bool) -> DomainResult<Vec<A>> {
        self.read(ctx, |rows| rows.values().filter(|a| pred(a)).cloned().collect())
    }

    pub(crate) fn upsert(&self, ctx: &Context, row: &A) -> DomainResult<()> {
        self.write(ctx, |rows| {
            rows.insert(row.id(), row.clone());
            Ok(())
        })
    }

    pub(crate) fn upsert_all(&self, ctx: &Context, batch: &[A]) -> DomainResult<()> {
        self.write(ctx, |rows| {
            for row in batch {
                rows.insert(row.id(), row.clone());
            }
            Ok(())
        })
    }

    /// Missing ids are ignored.
    pub(crate) fn delete_all(&self, ctx: &Context, ids: &[A::Id]) -> DomainResult<()> {
        self.write(ctx, |rows| {
            for id in ids {
                rows.remove(id);
            }
            Ok(())
        })
    }
}
