//! `tenantry-auth`: authentication and authorization primitives.
//!
//! Roles and their inclusion order, federated auth records, password hashing
//! and policy, and the per-request [`Operator`] capability bundle. Decoupled
//! from storage and from the account aggregates.

pub mod operator;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use operator::Operator;
pub use password::{
    BcryptPasswordEncoder, MIN_PASSWORD_LENGTH, MockPasswordEncoder, NoopPasswordEncoder,
    PasswordEncoder, validate_password_format,
};
pub use permissions::{Permittable, RoleDefinition};
pub use principal::{AUTH0_PROVIDER, Auth, Auths, REEARTH_PROVIDER};
pub use roles::Role;
