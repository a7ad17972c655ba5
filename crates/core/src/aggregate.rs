//! Aggregate root trait for the account domain.

/// Aggregate root marker + minimal interface.
///
/// An aggregate owns a consistency boundary: callers mutate it only through its
/// methods and persist it as a whole. Repositories key their storage on `Id`.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + Send + Sync;

    /// Returns the aggregate identifier.
    fn id(&self) -> Self::Id;
}
