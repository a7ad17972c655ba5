use serde::Deserialize;

use tenantry_core::{DomainResult, PolicyId};

pub const ENV_SIGNUP_SECRET: &str = "TENANTRY_SIGNUP_SECRET";
pub const ENV_AUTH_SRV_UI_DOMAIN: &str = "TENANTRY_AUTH_SRV_UI_DOMAIN";
pub const ENV_DEFAULT_POLICY: &str = "TENANTRY_DEFAULT_POLICY";

/// Settings consumed by the interactors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// When set, signups must present this exact secret.
    pub signup_secret: Option<String>,
    /// Base URL of the auth UI, used in verification and reset links.
    pub auth_srv_ui_domain: String,
    /// Stamped on workspaces that carry no policy of their own.
    pub default_policy: Option<PolicyId>,
}

impl Config {
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DomainResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let default_policy = match get(ENV_DEFAULT_POLICY) {
            Some(p) => Some(PolicyId::parse(&p)?),
            None => None,
        };
        Ok(Self {
            signup_secret: get(ENV_SIGNUP_SECRET),
            auth_srv_ui_domain: get(ENV_AUTH_SRV_UI_DOMAIN).unwrap_or_default(),
            default_policy,
        })
    }

    /// Whether `secret` satisfies the configured signup secret.
    pub fn check_signup_secret(&self, secret: Option<&str>) -> bool {
        match self.signup_secret.as_deref() {
            Some(expected) if !expected.is_empty() => secret == Some(expected),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tenantry_core::DomainError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_values_are_unset() {
        let cfg = Config::from_lookup(lookup(&[(ENV_SIGNUP_SECRET, ""), (ENV_DEFAULT_POLICY, "")])).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.check_signup_secret(None));
    }

    #[test]
    fn reads_all_keys() {
        let policy = PolicyId::new();
        let cfg = Config::from_lookup(lookup(&[
            (ENV_SIGNUP_SECRET, "SECRET"),
            (ENV_AUTH_SRV_UI_DOMAIN, "https://auth.example.com"),
            (ENV_DEFAULT_POLICY, &policy.to_string()),
        ]))
        .unwrap();
        assert_eq!(cfg.signup_secret.as_deref(), Some("SECRET"));
        assert_eq!(cfg.auth_srv_ui_domain, "https://auth.example.com");
        assert_eq!(cfg.default_policy, Some(policy));
    }

    #[test]
    fn bad_policy_id() {
        assert_eq!(
            Config::from_lookup(lookup(&[(ENV_DEFAULT_POLICY, "nope")])),
            Err(DomainError::InvalidId)
        );
    }

    #[test]
    fn secret_must_match_exactly() {
        let cfg = Config {
            signup_secret: Some("SECRET".into()),
            ..Config::default()
        };
        assert!(cfg.check_signup_secret(Some("SECRET")));
        assert!(!cfg.check_signup_secret(Some("SECRET!")));
        assert!(!cfg.check_signup_secret(None));
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"auth_srv_ui_domain":"x"}"#).unwrap();
        assert_eq!(cfg.auth_srv_ui_domain, "x");
        assert!(cfg.signup_secret.is_none());
    }
}
