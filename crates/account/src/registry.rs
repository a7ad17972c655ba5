//! Injected collaborators of the account domain.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

use tenantry_auth::{BcryptPasswordEncoder, PasswordEncoder};
use tenantry_core::{Clock, SystemClock};

use crate::user::{PasswordReset, Verification};

/// Source of verification codes and password-reset tokens.
pub trait TokenGenerator: Send + Sync + core::fmt::Debug {
    fn generate(&self) -> String;
}

/// Random alphanumeric tokens from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomTokens {
    len: usize,
}

impl RandomTokens {
    pub const DEFAULT_LEN: usize = 32;

    pub fn with_len(len: usize) -> Self {
        Self { len }
    }
}

impl Default for RandomTokens {
    fn default() -> Self {
        Self::with_len(Self::DEFAULT_LEN)
    }
}

impl TokenGenerator for RandomTokens {
    fn generate(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.len)
            .map(char::from)
            .collect()
    }
}

/// Always returns the same token.
#[derive(Debug, Clone, Default)]
pub struct FixedTokens(pub String);

impl FixedTokens {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenGenerator for FixedTokens {
    fn generate(&self) -> String {
        self.0.clone()
    }
}

/// Password encoder, clock and token generator used by the domain.
///
/// One registry is built at startup and shared; tests build their own with
/// fixed collaborators instead of swapping globals.
#[derive(Debug, Clone)]
pub struct Registry {
    pub encoder: Arc<dyn PasswordEncoder>,
    pub clock: Arc<dyn Clock>,
    pub tokens: Arc<dyn TokenGenerator>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            encoder: Arc::new(BcryptPasswordEncoder::default()),
            clock: Arc::new(SystemClock),
            tokens: Arc::new(RandomTokens::default()),
        }
    }
}

impl Registry {
    pub fn with_encoder(mut self, encoder: Arc<dyn PasswordEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenGenerator>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Fresh, unverified verification expiring one day from now.
    pub fn new_verification(&self) -> Verification {
        Verification::issue(self.tokens.generate(), self.now())
    }

    pub fn new_password_reset(&self) -> PasswordReset {
        PasswordReset::issue(self.tokens.generate(), self.now())
    }
}
