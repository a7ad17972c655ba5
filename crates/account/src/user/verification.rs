use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use tenantry_core::{DomainError, DomainResult};

/// How long a verification code stays usable.
pub const VERIFICATION_TTL_HOURS: i64 = 24;

/// E-mail confirmation record attached to a user between signup and their
/// first verified login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    code: String,
    expiration: DateTime<Utc>,
    verified: bool,
}

impl Verification {
    /// Unverified record expiring [`VERIFICATION_TTL_HOURS`] after `now`.
    pub fn issue(code: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            expiration: now + Duration::hours(VERIFICATION_TTL_HOURS),
            verified: false,
        }
    }

    pub fn from_parts(code: impl Into<String>, expiration: DateTime<Utc>, verified: bool) -> Self {
        Self {
            code: code.into(),
            expiration,
            verified,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }

    /// Consume the code. Expired codes cannot be renewed; mint a new record.
    pub fn verify(&mut self, code: &str, now: DateTime<Utc>) -> DomainResult<()> {
        if self.verified {
            return Err(DomainError::AlreadyVerified);
        }
        if self.is_expired(now) {
            return Err(DomainError::VerificationExpired);
        }
        if self.code != code {
            return Err(DomainError::VerificationCodeMismatch);
        }
        self.verified = true;
        Ok(())
    }

    pub fn set_verified(&mut self, verified: bool) {
        self.verified = verified;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn verify_before_expiry() {
        let mut v = Verification::issue("abc", t0());
        v.verify("abc", t0() + Duration::hours(23)).unwrap();
        assert!(v.is_verified());
        assert_eq!(v.verify("abc", t0()), Err(DomainError::AlreadyVerified));
    }

    #[test]
    fn expiry_is_inclusive() {
        let mut v = Verification::issue("abc", t0());
        assert_eq!(
            v.verify("abc", t0() + Duration::hours(24)),
            Err(DomainError::VerificationExpired)
        );
        assert!(!v.is_verified());
    }

    #[test]
    fn wrong_code() {
        let mut v = Verification::issue("abc", t0());
        assert_eq!(v.verify("abd", t0()), Err(DomainError::VerificationCodeMismatch));
    }
}
