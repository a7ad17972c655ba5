//! Domain error model.

use thiserror::Error;

/// Result type used across the domain, repository and usecase layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Which password-format rule a candidate password broke.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PasswordViolation {
    TooShort,
    NoUppercase,
    NoLowercase,
    NoDigit,
}

impl core::fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PasswordViolation::TooShort => f.write_str("password must be at least 8 characters"),
            PasswordViolation::NoUppercase => f.write_str("password must contain an upper case letter"),
            PasswordViolation::NoLowercase => f.write_str("password must contain a lower case letter"),
            PasswordViolation::NoDigit => f.write_str("password must contain a digit"),
        }
    }
}

/// Error taxonomy shared by every layer.
///
/// Domain invariants, operator denials and repository failures all surface
/// through this one enum so usecases can propagate them unwrapped. Use
/// [`DomainError::kind`] for a stable machine-readable code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier failed to parse, or is nil where one is required.
    #[error("invalid id")]
    InvalidId,

    #[error("invalid email")]
    InvalidEmail,

    #[error("invalid password: {0}")]
    InvalidPassword(PasswordViolation),

    #[error("invalid password confirmation")]
    InvalidPasswordConfirmation,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid alias")]
    InvalidAlias,

    #[error("invalid lang")]
    InvalidLang,

    /// Unknown role literal; carries the lowercased input.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// Signup collision, whether or not the existing user is verified.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository-level uniqueness violation.
    #[error("duplicated user")]
    DuplicatedUser,

    #[error("invalid user email")]
    InvalidUserEmail,

    #[error("invalid email or password")]
    InvalidEmailOrPassword,

    #[error("not verified user")]
    NotVerifiedUser,

    #[error("verification expired")]
    VerificationExpired,

    #[error("verification code mismatch")]
    VerificationCodeMismatch,

    #[error("user already verified")]
    AlreadyVerified,

    #[error("invalid password reset request")]
    InvalidPasswordReset,

    #[error("user already joined")]
    UserAlreadyJoined,

    #[error("target user does not exist in the workspace")]
    TargetUserNotInTheWorkspace,

    #[error("personal workspace cannot be modified")]
    CannotModifyPersonalWorkspace,

    #[error("owner cannot leave the workspace")]
    OwnerCannotLeaveTheWorkspace,

    #[error("cannot change owner role")]
    CannotChangeOwnerRole,

    /// The operator lacks the capability the usecase requires.
    #[error("operation denied")]
    OperationDenied,

    /// A write was attempted without an authenticated user.
    #[error("invalid operator")]
    InvalidOperator,

    #[error("invalid secret")]
    InvalidSecret,

    #[error("not found")]
    NotFound,

    /// Transient transaction conflict; safe to retry the whole handler.
    #[error("transaction conflict")]
    TransactionConflict,

    /// The request context was cancelled before the operation ran.
    #[error("operation cancelled")]
    Cancelled,

    #[error("password encoding failed: {0}")]
    PasswordEncoding(String),

    #[error("storage error: {0}")]
    Storage(String),

    /// Mailer or authenticator failure.
    #[error("gateway error: {0}")]
    Gateway(String),
}

impl DomainError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound)
    }

    /// Stable kebab-case code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InvalidId => "invalid-id",
            DomainError::InvalidEmail => "invalid-email",
            DomainError::InvalidPassword(PasswordViolation::TooShort) => "password-length",
            DomainError::InvalidPassword(_) => "invalid-password",
            DomainError::InvalidPasswordConfirmation => "invalid-password-confirmation",
            DomainError::InvalidName => "invalid-name",
            DomainError::InvalidAlias => "invalid-alias",
            DomainError::InvalidLang => "invalid-lang",
            DomainError::InvalidRole(_) => "invalid-role",
            DomainError::UserAlreadyExists => "user-already-exists",
            DomainError::DuplicatedUser => "duplicated-user",
            DomainError::InvalidUserEmail => "invalid-user-email",
            DomainError::InvalidEmailOrPassword => "invalid-email-or-password",
            DomainError::NotVerifiedUser => "not-verified-user",
            DomainError::VerificationExpired => "verification-expired",
            DomainError::VerificationCodeMismatch => "verification-code-mismatch",
            DomainError::AlreadyVerified => "already-verified",
            DomainError::InvalidPasswordReset => "invalid-password-reset",
            DomainError::UserAlreadyJoined => "user-already-joined",
            DomainError::TargetUserNotInTheWorkspace => "target-user-not-in-the-workspace",
            DomainError::CannotModifyPersonalWorkspace => "cannot-modify-personal-workspace",
            DomainError::OwnerCannotLeaveTheWorkspace => "owner-cannot-leave-the-workspace",
            DomainError::CannotChangeOwnerRole => "cannot-change-owner-role",
            DomainError::OperationDenied => "operation-denied",
            DomainError::InvalidOperator => "invalid-operator",
            DomainError::InvalidSecret => "invalid-secret",
            DomainError::NotFound => "not-found",
            DomainError::TransactionConflict => "transaction-conflict",
            DomainError::Cancelled => "cancelled",
            DomainError::PasswordEncoding(_) => "password-encoding",
            DomainError::Storage(_) => "storage",
            DomainError::Gateway(_) => "gateway",
        }
    }
}
