//! `tenantry-usecase`: application services over the account domain.
//!
//! Every public operation takes a request [`Context`](tenantry_core::Context)
//! and, where it acts on behalf of someone, an
//! [`Operator`](tenantry_auth::Operator). Writes go through the [`runner`],
//! which checks the operator before any repository is touched.

pub mod config;
pub mod gateway;
mod mail;
pub mod runner;
pub mod user;
pub mod workspace;

pub use config::Config;
pub use gateway::{
    Authenticator, AuthenticatorUpdateUserParam, Contact, Gateways, Mailer, MemoryAuthenticator,
    MemoryMailer, SentMail,
};
pub use runner::{Usecase, run};
pub use user::{SignupOidcParam, SignupParam, UpdateMeParam, UserInteractor};
pub use workspace::WorkspaceInteractor;
