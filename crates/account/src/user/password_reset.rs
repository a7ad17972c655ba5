use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const PASSWORD_RESET_TTL_HOURS: i64 = 24;

/// Pending password-reset request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    token: String,
    created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn issue(token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            created_at: now,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(PASSWORD_RESET_TTL_HOURS)
    }

    /// Matching token, presented strictly before the window closes.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.token == token && now < self.expires_at()
    }
}
