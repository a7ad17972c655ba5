use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use tenantry_core::{DomainError, DomainResult};

static LANG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,8}(?:-[A-Za-z0-9]{1,8})*$").expect("lang regex is valid")
});

/// UI colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Light,
    Dark,
}

impl Theme {
    /// Unknown or empty values fall back to [`Theme::Default`].
    pub fn parse_lossy(s: &str) -> Theme {
        match s.to_ascii_lowercase().as_str() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl core::fmt::Display for Theme {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BCP-47 shaped language tag, e.g. `ja` or `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lang(String);

impl Lang {
    pub fn parse(s: &str) -> DomainResult<Lang> {
        if LANG_REGEX.is_match(s) {
            Ok(Lang(s.to_string()))
        } else {
            Err(DomainError::InvalidLang)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Lang {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Lang::parse(&value)
    }
}

impl From<Lang> for String {
    fn from(value: Lang) -> Self {
        value.0
    }
}

impl core::str::FromStr for Lang {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::parse(s)
    }
}

impl core::fmt::Display for Lang {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile data that carries no invariant beyond the theme enum and the
/// language tag shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub photo_url: String,
    pub description: String,
    pub website: String,
    pub lang: Option<Lang>,
    pub theme: Theme,
}

impl Metadata {
    pub fn with_lang(mut self, lang: Option<Lang>) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}
