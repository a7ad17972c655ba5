use std::sync::LazyLock;

use regex::Regex;

// addr-spec without quoted local parts or domain literals
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex is valid")
});

/// Syntactic e-mail check. No DNS or mailbox lookups.
pub fn is_valid_email(s: &str) -> bool {
    !s.is_empty() && s.len() <= 254 && EMAIL_REGEX.is_match(s)
}
