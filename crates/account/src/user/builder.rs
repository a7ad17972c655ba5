use std::sync::Arc;

use tenantry_auth::{Auths, BcryptPasswordEncoder, PasswordEncoder};
use tenantry_core::{DomainError, DomainResult, UserId, WorkspaceId};

use super::{Metadata, PasswordReset, User, Verification, is_valid_email};

/// Assembles a [`User`].
///
/// `build` fails with the first of: `InvalidId`, `InvalidEmail`, then
/// whatever setting the plaintext password returns. A plaintext password is
/// encoded exactly once, with the configured encoder (bcrypt if none).
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    name: String,
    alias: String,
    email: String,
    metadata: Metadata,
    workspace: Option<WorkspaceId>,
    auths: Auths,
    password: Option<String>,
    encoded_password: Vec<u8>,
    verification: Option<Verification>,
    password_reset: Option<PasswordReset>,
    encoder: Option<Arc<dyn PasswordEncoder>>,
}

impl UserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn new_id(self) -> Self {
        self.id(UserId::new())
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn workspace(mut self, workspace: WorkspaceId) -> Self {
        self.workspace = Some(workspace);
        self
    }

    pub fn auths(mut self, auths: Auths) -> Self {
        self.auths = auths;
        self
    }

    /// Plaintext password, checked against the format rule and encoded on build.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Already-encoded bytes, e.g. loaded from storage.
    pub fn encoded_password(mut self, encoded: Vec<u8>) -> Self {
        self.encoded_password = encoded;
        self
    }

    pub fn verification(mut self, verification: Option<Verification>) -> Self {
        self.verification = verification;
        self
    }

    pub fn password_reset(mut self, password_reset: Option<PasswordReset>) -> Self {
        self.password_reset = password_reset;
        self
    }

    pub fn encoder(mut self, encoder: Arc<dyn PasswordEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn build(self) -> DomainResult<User> {
        let id = match self.id {
            Some(id) if !id.is_nil() => id,
            _ => return Err(DomainError::InvalidId),
        };
        if !is_valid_email(&self.email) {
            return Err(DomainError::InvalidEmail);
        }

        let mut user = User {
            id,
            name: self.name,
            alias: self.alias,
            email: self.email,
            metadata: self.metadata,
            password: self.encoded_password,
            workspace: self.workspace.unwrap_or_else(WorkspaceId::nil),
            auths: self.auths,
            verification: self.verification,
            password_reset: self.password_reset,
            host: None,
        };

        if let Some(password) = self.password {
            match self.encoder {
                Some(encoder) => user.set_password(&password, encoder.as_ref())?,
                None => user.set_password(&password, &BcryptPasswordEncoder::default())?,
            }
        }
        Ok(user)
    }

    /// Panics on error. Tests only.
    pub fn must_build(self) -> User {
        match self.build() {
            Ok(u) => u,
            Err(e) => panic!("user: {e}"),
        }
    }
}
