//! User aggregate.

mod builder;
mod email;
mod metadata;
mod password_reset;
mod verification;

pub use builder::UserBuilder;
pub use email::is_valid_email;
pub use metadata::{Lang, Metadata, Theme};
pub use password_reset::{PASSWORD_RESET_TTL_HOURS, PasswordReset};
pub use verification::{VERIFICATION_TTL_HOURS, Verification};

use tenantry_auth::{Auth, Auths, PasswordEncoder, validate_password_format};
use tenantry_core::{AggregateRoot, DomainError, DomainResult, UserId, WorkspaceId};

/// Aggregate root: a human principal.
///
/// Built through [`User::builder`]. The password is only ever stored as the
/// output of a [`PasswordEncoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    alias: String,
    email: String,
    metadata: Metadata,
    password: Vec<u8>,
    workspace: WorkspaceId,
    auths: Auths,
    verification: Option<Verification>,
    password_reset: Option<PasswordReset>,
    host: Option<String>,
}

impl User {
    pub fn builder() -> UserBuilder {
        UserBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Id of the user's personal workspace.
    pub fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    pub fn auths(&self) -> &Auths {
        &self.auths
    }

    pub fn verification(&self) -> Option<&Verification> {
        self.verification.as_ref()
    }

    pub fn verification_mut(&mut self) -> Option<&mut Verification> {
        self.verification.as_mut()
    }

    pub fn is_verified(&self) -> bool {
        self.verification.as_ref().is_some_and(Verification::is_verified)
    }

    pub fn password_reset(&self) -> Option<&PasswordReset> {
        self.password_reset.as_ref()
    }

    /// Tenant tag attached by the serving host. Never persisted.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn encoded_password(&self) -> &[u8] {
        &self.password
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Profile
    // ─────────────────────────────────────────────────────────────────────

    pub fn update_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidName);
        }
        self.name = name;
        Ok(())
    }

    pub fn update_alias(&mut self, alias: impl Into<String>) {
        self.alias = alias.into();
    }

    pub fn update_email(&mut self, email: impl Into<String>) -> DomainResult<()> {
        let email = email.into();
        if !is_valid_email(&email) {
            return Err(DomainError::InvalidEmail);
        }
        self.email = email;
        Ok(())
    }

    pub fn update_lang(&mut self, lang: Option<Lang>) {
        self.metadata.lang = lang;
    }

    pub fn update_theme(&mut self, theme: Theme) {
        self.metadata.theme = theme;
    }

    pub fn update_workspace(&mut self, workspace: WorkspaceId) {
        self.workspace = workspace;
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Auths
    // ─────────────────────────────────────────────────────────────────────

    /// `false` when the user already holds an auth for that provider.
    pub fn add_auth(&mut self, auth: Auth) -> bool {
        self.auths.add(auth)
    }

    /// `false` for auth0 auths and for auths the user does not hold.
    pub fn remove_auth(&mut self, auth: &Auth) -> bool {
        self.auths.remove(auth)
    }

    pub fn remove_auth_by_provider(&mut self, provider: &str) -> bool {
        self.auths.remove_by_provider(provider)
    }

    pub fn get_auth_by_provider(&self, provider: &str) -> Option<&Auth> {
        self.auths.get_by_provider(provider)
    }

    pub fn has_auth_provider(&self, provider: &str) -> bool {
        self.auths.has_provider(provider)
    }

    pub fn contains_auth(&self, auth: &Auth) -> bool {
        self.auths.contains(auth)
    }

    pub fn contains_sub(&self, sub: &str) -> bool {
        self.auths.contains_sub(sub)
    }

    pub fn clear_auths(&mut self) {
        self.auths.clear();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Credentials
    // ─────────────────────────────────────────────────────────────────────

    /// Check the format rule, then store the encoded password. On any error
    /// the previous password is kept.
    pub fn set_password(&mut self, password: &str, encoder: &dyn PasswordEncoder) -> DomainResult<()> {
        validate_password_format(password)?;
        self.password = encoder.encode(password)?;
        Ok(())
    }

    /// `Ok(false)` when either side is empty.
    pub fn match_password(&self, password: &str, encoder: &dyn PasswordEncoder) -> DomainResult<bool> {
        if password.is_empty() || self.password.is_empty() {
            return Ok(false);
        }
        encoder.verify(password, &self.password)
    }

    pub fn set_verification(&mut self, verification: Option<Verification>) {
        self.verification = verification;
    }

    pub fn set_password_reset(&mut self, password_reset: Option<PasswordReset>) {
        self.password_reset = password_reset;
    }
}

impl AggregateRoot for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}
