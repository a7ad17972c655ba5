use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use tenantry_core::DomainError;

/// Workspace role.
///
/// The known roles are totally ordered: `owner > maintainer > writer > reader`.
/// Any other literal can still be carried (e.g. read from storage) but is not
/// [`valid`](Role::is_valid) and takes no part in inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const OWNER: Role = Role(Cow::Borrowed("owner"));
    pub const MAINTAINER: Role = Role(Cow::Borrowed("maintainer"));
    pub const WRITER: Role = Role(Cow::Borrowed("writer"));
    pub const READER: Role = Role(Cow::Borrowed("reader"));

    /// Wrap a literal without validation.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive parse. The error carries the lowercased input.
    pub fn parse(s: &str) -> Result<Role, DomainError> {
        let role = Role::new(s.to_lowercase());
        if role.is_valid() {
            Ok(role)
        } else {
            Err(DomainError::InvalidRole(role.0.into_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.rank().is_some()
    }

    fn rank(&self) -> Option<u8> {
        match self.as_str() {
            "owner" => Some(4),
            "maintainer" => Some(3),
            "writer" => Some(2),
            "reader" => Some(1),
            _ => None,
        }
    }

    /// Whether `other` sits at or below `self` in the role order.
    pub fn includes(&self, other: &Role) -> bool {
        matches!((self.rank(), other.rank()), (Some(a), Some(b)) if a >= b)
    }

    /// Every valid role, highest first.
    pub fn all() -> [Role; 4] {
        [Role::OWNER, Role::MAINTAINER, Role::WRITER, Role::READER]
    }
}

impl core::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
