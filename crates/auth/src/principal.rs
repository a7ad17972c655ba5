use serde::{Deserialize, Serialize};

use tenantry_core::UserId;

/// Provider of first-party (password) logins. Its sub is `reearth|<userID>`.
pub const REEARTH_PROVIDER: &str = "reearth";

/// Federated provider whose entry is protected against removal.
pub const AUTH0_PROVIDER: &str = "auth0";

/// A federated-login credential: `(provider, sub)`.
///
/// `sub` is always the full `provider|rest` string as issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Auth {
    provider: String,
    sub: String,
}

impl Auth {
    pub fn new(provider: impl Into<String>, sub: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            sub: sub.into(),
        }
    }

    /// Parse the `provider|rest` form. The provider is everything before the
    /// first `|`; the sub keeps the full input. Input without a separator has
    /// no provider.
    pub fn from_sub(sub: &str) -> Self {
        let provider = match sub.split_once('|') {
            Some((provider, _)) => provider,
            None => "",
        };
        Self::new(provider, sub)
    }

    /// The first-party auth of a user.
    pub fn reearth(user_id: UserId) -> Self {
        Self::new(REEARTH_PROVIDER, format!("{REEARTH_PROVIDER}|{user_id}"))
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn sub(&self) -> &str {
        &self.sub
    }

    pub fn is_empty(&self) -> bool {
        self.provider.is_empty() && self.sub.is_empty()
    }

    pub fn is_reearth(&self) -> bool {
        self.provider == REEARTH_PROVIDER
    }

    pub fn is_auth0(&self) -> bool {
        self.provider == AUTH0_PROVIDER
    }
}

impl core::fmt::Display for Auth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.sub)
    }
}

/// Auths of one user, unique by provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Auths(Vec<Auth>);

impl Auths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Auth> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Auth] {
        &self.0
    }

    /// Returns `false` (and changes nothing) when an auth for the same
    /// provider is already held.
    pub fn add(&mut self, auth: Auth) -> bool {
        if self.has_provider(auth.provider()) || self.contains(&auth) {
            return false;
        }
        self.0.push(auth);
        true
    }

    /// Returns `false` for auth0 entries and for unknown auths.
    pub fn remove(&mut self, auth: &Auth) -> bool {
        if auth.is_auth0() {
            return false;
        }
        let before = self.0.len();
        self.0.retain(|a| a != auth);
        self.0.len() != before
    }

    /// Returns `false` for the auth0 provider and for unknown providers.
    pub fn remove_by_provider(&mut self, provider: &str) -> bool {
        if provider == AUTH0_PROVIDER {
            return false;
        }
        let before = self.0.len();
        self.0.retain(|a| a.provider() != provider);
        self.0.len() != before
    }

    pub fn get_by_provider(&self, provider: &str) -> Option<&Auth> {
        self.0.iter().find(|a| a.provider() == provider)
    }

    pub fn has_provider(&self, provider: &str) -> bool {
        self.get_by_provider(provider).is_some()
    }

    pub fn contains(&self, auth: &Auth) -> bool {
        self.0.contains(auth)
    }

    pub fn contains_sub(&self, sub: &str) -> bool {
        self.0.iter().any(|a| a.sub() == sub)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<Auth> for Auths {
    /// Later auths for an already-seen provider are dropped.
    fn from_iter<I: IntoIterator<Item = Auth>>(iter: I) -> Self {
        let mut auths = Auths::new();
        for a in iter {
            auths.add(a);
        }
        auths
    }
}
