use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tenantry_core::{Context, DomainError, DomainResult};

use crate::transaction::{Transaction, Tx};

#[derive(Debug, Default)]
struct Counters {
    begun: AtomicUsize,
    committed: AtomicUsize,
    ended: AtomicUsize,
    last_committed: AtomicBool,
    begin_errors: Mutex<VecDeque<DomainError>>,
    end_errors: Mutex<VecDeque<DomainError>>,
}

impl Counters {
    fn pop(queue: &Mutex<VecDeque<DomainError>>) -> Option<DomainError> {
        queue.lock().ok().and_then(|mut q| q.pop_front())
    }

    fn push(queue: &Mutex<VecDeque<DomainError>>, err: DomainError) {
        if let Ok(mut q) = queue.lock() {
            q.push_back(err);
        }
    }
}

/// No-op transaction that records what happened to it.
///
/// Writes go straight to the in-memory repositories; the counters let tests
/// assert the begin/commit/end protocol. Errors can be queued for upcoming
/// `begin` or `end` calls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransaction {
    counters: Arc<Counters>,
}

impl InMemoryTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begun(&self) -> usize {
        self.counters.begun.load(Ordering::SeqCst)
    }

    pub fn committed(&self) -> usize {
        self.counters.committed.load(Ordering::SeqCst)
    }

    pub fn ended(&self) -> usize {
        self.counters.ended.load(Ordering::SeqCst)
    }

    /// Whether the most recently ended transaction had been committed.
    pub fn is_committed(&self) -> bool {
        self.counters.last_committed.load(Ordering::SeqCst)
    }

    pub fn fail_next_begin(&self, err: DomainError) {
        Counters::push(&self.counters.begin_errors, err);
    }

    pub fn fail_next_end(&self, err: DomainError) {
        Counters::push(&self.counters.end_errors, err);
    }
}

impl Transaction for InMemoryTransaction {
    fn begin(&self, ctx: &Context) -> DomainResult<Box<dyn Tx>> {
        ctx.check()?;
        if let Some(err) = Counters::pop(&self.counters.begin_errors) {
            return Err(err);
        }
        self.counters.begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryTx {
            counters: Arc::clone(&self.counters),
            ctx: ctx.child(),
            committed: false,
        }))
    }
}

struct InMemoryTx {
    counters: Arc<Counters>,
    ctx: Context,
    committed: bool,
}

impl Tx for InMemoryTx {
    fn commit(&mut self) -> DomainResult<()> {
        self.committed = true;
        self.counters.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn end(self: Box<Self>, _ctx: &Context) -> DomainResult<()> {
        self.counters.ended.fetch_add(1, Ordering::SeqCst);
        self.counters
            .last_committed
            .store(self.committed, Ordering::SeqCst);
        match Counters::pop(&self.counters.end_errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn is_committed(&self) -> bool {
        self.committed
    }

    fn context(&self) -> Context {
        self.ctx.clone()
    }
}
