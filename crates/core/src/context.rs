//! Request-scoped context carried through every repository call.

use tokio_util::sync::CancellationToken;

use crate::error::{DomainError, DomainResult};

/// Cancellation scope of one logical request.
///
/// Cloning shares the scope; [`Context::child`] derives a scope that is
/// cancelled with its parent but can also be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
}

impl Context {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// `Err(Cancelled)` once the scope has been cancelled.
    pub fn check(&self) -> DomainResult<()> {
        if self.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_follows_parent() {
        let parent = Context::background();
        let child = parent.child();
        assert!(child.check().is_ok());
        parent.cancel();
        assert_eq!(child.check(), Err(DomainError::Cancelled));
    }

    #[test]
    fn child_cancel_does_not_leak_upwards() {
        let parent = Context::background();
        let child = parent.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }
}
