//! Strongly-typed identifiers used across the domain.
//!
//! Every id wraps a time-ordered UUIDv7 and renders as 26 lowercase Crockford
//! base-32 characters. Generation order, string order and `Ord` all agree.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::DomainError;

/// Length of the string form of every id.
pub const ENCODED_LEN: usize = 26;

const ALPHABET: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

fn encode(value: u128) -> String {
    let mut out = [0u8; ENCODED_LEN];
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(rest & 0x1f) as usize];
        rest >>= 5;
    }
    out.iter().map(|b| *b as char).collect()
}

fn decode_digit(b: u8) -> Option<u128> {
    let v = match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'h' => b - b'a' + 10,
        b'j' | b'k' => b - b'j' + 18,
        b'm' | b'n' => b - b'm' + 20,
        b'p'..=b't' => b - b'p' + 22,
        b'v'..=b'z' => b - b'v' + 27,
        _ => return None,
    };
    Some(u128::from(v))
}

fn decode(s: &str) -> Result<u128, DomainError> {
    let bytes = s.as_bytes();
    if bytes.len() != ENCODED_LEN {
        return Err(DomainError::InvalidId);
    }
    // 26 digits carry 130 bits; the top two must be zero.
    if bytes[0] > b'7' {
        return Err(DomainError::InvalidId);
    }
    let mut value = 0u128;
    for b in bytes {
        let digit = decode_digit(*b).ok_or(DomainError::InvalidId)?;
        value = (value << 5) | digit;
    }
    Ok(value)
}

macro_rules! define_id {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $t(Uuid);

        impl $t {
            /// Generate a fresh identifier (UUIDv7, monotonic within the process).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The zero value. Aggregates refuse to be built with it.
            pub const fn nil() -> Self {
                Self(Uuid::nil())
            }

            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// Parse the 26-char lowercase string form.
            pub fn parse(s: &str) -> Result<Self, DomainError> {
                decode(s).map(|v| Self(Uuid::from_u128(v)))
            }

            /// Lenient parse: absent or unparsable input yields `None`.
            pub fn from_ref(s: Option<&str>) -> Option<Self> {
                s.and_then(|s| Self::parse(s).ok())
            }

            /// Parse or panic. Intended for tests and constants.
            pub fn must(s: &str) -> Self {
                match Self::parse(s) {
                    Ok(id) => id,
                    Err(e) => panic!("{}: {e}: {s:?}", $name),
                }
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn compare(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&encode(self.0.as_u128()))
            }
        }

        impl core::fmt::Debug for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({})", $name, self)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(|e| serde::de::Error::custom(format!("{}: {e}", $name)))
            }
        }
    };
}

define_id!(
    /// Identifier of a human principal.
    UserId,
    "UserId"
);
define_id!(
    /// Identifier of a workspace (tenant boundary).
    WorkspaceId,
    "WorkspaceId"
);
define_id!(
    /// Identifier of a machine principal (integration).
    IntegrationId,
    "IntegrationId"
);
define_id!(
    /// Opaque quota-policy identifier; propagated, never evaluated.
    PolicyId,
    "PolicyId"
);
define_id!(RoleId, "RoleId");
define_id!(PermittableId, "PermittableId");
