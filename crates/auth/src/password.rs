use std::sync::Arc;

use tenantry_core::{DomainError, DomainResult, PasswordViolation};

/// Minimum number of characters (not bytes) a password must have.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// One-way password hashing.
///
/// Implementations are shared between threads; `verify` returns `Ok(false)`
/// on a mismatch and reserves `Err` for malformed hashes or backend failures.
pub trait PasswordEncoder: Send + Sync + core::fmt::Debug {
    fn encode(&self, password: &str) -> DomainResult<Vec<u8>>;

    fn verify(&self, password: &str, encoded: &[u8]) -> DomainResult<bool>;
}

impl<E> PasswordEncoder for Arc<E>
where
    E: PasswordEncoder + ?Sized,
{
    fn encode(&self, password: &str) -> DomainResult<Vec<u8>> {
        (**self).encode(password)
    }

    fn verify(&self, password: &str, encoded: &[u8]) -> DomainResult<bool> {
        (**self).verify(password, encoded)
    }
}

/// Production encoder backed by bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower costs make tests fast; `4` is the smallest bcrypt accepts.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, password: &str) -> DomainResult<Vec<u8>> {
        bcrypt::hash(password, self.cost)
            .map(String::into_bytes)
            .map_err(|e| DomainError::PasswordEncoding(e.to_string()))
    }

    fn verify(&self, password: &str, encoded: &[u8]) -> DomainResult<bool> {
        let hash = std::str::from_utf8(encoded)
            .map_err(|e| DomainError::PasswordEncoding(e.to_string()))?;
        bcrypt::verify(password, hash).map_err(|e| DomainError::PasswordEncoding(e.to_string()))
    }
}

/// Stores the plaintext as-is. Tests only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPasswordEncoder;

impl PasswordEncoder for NoopPasswordEncoder {
    fn encode(&self, password: &str) -> DomainResult<Vec<u8>> {
        Ok(password.as_bytes().to_vec())
    }

    fn verify(&self, password: &str, encoded: &[u8]) -> DomainResult<bool> {
        Ok(password.as_bytes() == encoded)
    }
}

/// Encodes every password to a fixed value. Tests only.
#[derive(Debug, Clone, Default)]
pub struct MockPasswordEncoder {
    mock: Vec<u8>,
}

impl MockPasswordEncoder {
    pub fn new(mock: impl Into<Vec<u8>>) -> Self {
        Self { mock: mock.into() }
    }
}

impl PasswordEncoder for MockPasswordEncoder {
    fn encode(&self, _password: &str) -> DomainResult<Vec<u8>> {
        Ok(self.mock.clone())
    }

    fn verify(&self, password: &str, _encoded: &[u8]) -> DomainResult<bool> {
        Ok(password.as_bytes() == self.mock.as_slice())
    }
}

/// Password format rule: at least eight characters with one upper case
/// letter, one lower case letter and one digit. Character classes are
/// Unicode-aware.
pub fn validate_password_format(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::InvalidPassword(PasswordViolation::TooShort));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(DomainError::InvalidPassword(PasswordViolation::NoUppercase));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(DomainError::InvalidPassword(PasswordViolation::NoLowercase));
    }
    if !password.chars().any(char::is_numeric) {
        return Err(DomainError::InvalidPassword(PasswordViolation::NoDigit));
    }
    Ok(())
}
