//! External collaborators: mail delivery and the federated identity manager.

use std::sync::{Arc, Mutex};

use tenantry_core::{Context, DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub email: String,
    pub name: String,
}

pub trait Mailer: Send + Sync {
    fn send(&self, to: &[Contact], subject: &str, text: &str, html: &str) -> DomainResult<()>;
}

/// Fields to push to the external identity record. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticatorUpdateUserParam {
    /// The user's sub at the external provider.
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub trait Authenticator: Send + Sync {
    fn update_user(&self, ctx: &Context, param: AuthenticatorUpdateUserParam) -> DomainResult<()>;
}

#[derive(Clone)]
pub struct Gateways {
    pub mailer: Arc<dyn Mailer>,
    pub authenticator: Option<Arc<dyn Authenticator>>,
}

impl core::fmt::Debug for Gateways {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Gateways")
            .field("authenticator", &self.authenticator.is_some())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory doubles
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: Vec<Contact>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Mailer that records instead of sending.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<SentMail>>,
    fail_with: Mutex<Option<DomainError>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<SentMail> {
        self.sent().pop()
    }

    /// Make every following `send` fail with `err`.
    pub fn fail_with(&self, err: Option<DomainError>) {
        if let Ok(mut f) = self.fail_with.lock() {
            *f = err;
        }
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, to: &[Contact], subject: &str, text: &str, html: &str) -> DomainResult<()> {
        if let Some(err) = self.fail_with.lock().ok().and_then(|f| f.clone()) {
            return Err(err);
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| DomainError::gateway("mailer lock poisoned"))?;
        sent.push(SentMail {
            to: to.to_vec(),
            subject: subject.to_string(),
            text: text.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Authenticator that records update requests.
#[derive(Debug, Default)]
pub struct MemoryAuthenticator {
    updates: Mutex<Vec<AuthenticatorUpdateUserParam>>,
}

impl MemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<AuthenticatorUpdateUserParam> {
        self.updates.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

impl Authenticator for MemoryAuthenticator {
    fn update_user(&self, ctx: &Context, param: AuthenticatorUpdateUserParam) -> DomainResult<()> {
        ctx.check()?;
        self.updates
            .lock()
            .map_err(|_| DomainError::gateway("authenticator lock poisoned"))?
            .push(param);
        Ok(())
    }
}
