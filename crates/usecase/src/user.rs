//! User lifecycle: signup, verification, password reset, login and profile
//! changes.

use tenantry_account::{InitParams, Lang, Registry, Theme, User, init, is_valid_email};
use tenantry_auth::{AUTH0_PROVIDER, Auth, Operator, REEARTH_PROVIDER, validate_password_format};
use tenantry_core::{AggregateRoot, Context, DomainError, DomainResult, UserId, WorkspaceId};
use tenantry_infra::Container;

use crate::config::Config;
use crate::gateway::{AuthenticatorUpdateUserParam, Gateways};
use crate::mail::{self, Mail};
use crate::runner::Usecase;

#[derive(Debug, Clone, Default)]
pub struct SignupParam {
    pub email: String,
    pub name: String,
    pub password: String,
    pub secret: Option<String>,
    pub lang: Option<Lang>,
    pub theme: Option<Theme>,
    pub user_id: Option<UserId>,
    pub workspace_id: Option<WorkspaceId>,
}

#[derive(Debug, Clone, Default)]
pub struct SignupOidcParam {
    /// `provider|id` as issued by the identity provider.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub secret: Option<String>,
    pub lang: Option<Lang>,
    pub user_id: Option<UserId>,
    pub workspace_id: Option<WorkspaceId>,
}

/// Fields left `None` are not touched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMeParam {
    pub name: Option<String>,
    pub email: Option<String>,
    pub lang: Option<Lang>,
    pub theme: Option<Theme>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserInteractor {
    repos: Container,
    gateways: Gateways,
    registry: Registry,
    config: Config,
}

impl UserInteractor {
    pub fn new(repos: Container, gateways: Gateways, registry: Registry, config: Config) -> Self {
        Self {
            repos,
            gateways,
            registry,
            config,
        }
    }

    fn send(&self, mail: Mail) -> DomainResult<()> {
        self.gateways
            .mailer
            .send(&mail.to, mail.subject, &mail.text, &mail.html)
    }

    fn check_secret(&self, secret: Option<&str>) -> DomainResult<()> {
        if self.config.check_signup_secret(secret) {
            Ok(())
        } else {
            Err(DomainError::InvalidSecret)
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// One slot per requested id, `None` where no user exists.
    pub fn fetch_by_id(&self, ctx: &Context, ids: &[UserId]) -> DomainResult<Vec<Option<User>>> {
        self.repos.user.find_by_ids(ctx, ids)
    }

    pub fn fetch_by_sub(&self, ctx: &Context, sub: &str) -> DomainResult<User> {
        self.repos.user.find_by_sub(ctx, sub)
    }

    pub fn fetch_by_name_or_email(&self, ctx: &Context, name_or_email: &str) -> DomainResult<User> {
        self.repos.user.find_by_name_or_email(ctx, name_or_email)
    }

    pub fn search_user(&self, ctx: &Context, keyword: &str) -> DomainResult<Vec<User>> {
        self.repos.user.search_by_keyword(ctx, keyword)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Signup & verification
    // ─────────────────────────────────────────────────────────────────────

    /// Password signup: creates the user and their personal workspace, then
    /// mails a verification link.
    pub fn signup(&self, ctx: &Context, param: SignupParam) -> DomainResult<User> {
        self.check_secret(param.secret.as_deref())?;
        if !is_valid_email(&param.email) {
            return Err(DomainError::InvalidEmail);
        }
        validate_password_format(&param.password)?;

        Usecase::new().transaction().run(ctx, None, &self.repos, |ctx| {
            match self.repos.user.find_by_email(ctx, &param.email) {
                Ok(_) => return Err(DomainError::UserAlreadyExists),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }

            let (mut user, workspace) = init(
                InitParams {
                    email: param.email.clone(),
                    name: param.name.clone(),
                    password: Some(param.password.clone()),
                    lang: param.lang.clone(),
                    theme: param.theme,
                    user_id: param.user_id,
                    workspace_id: param.workspace_id,
                    sub: None,
                },
                &self.registry,
            )?;
            let verification = self.registry.new_verification();
            let code = verification.code().to_string();
            user.set_verification(Some(verification));

            self.repos.workspace.save(ctx, &workspace)?;
            self.repos.user.save(ctx, &user)?;
            self.send(mail::verification(&self.config.auth_srv_ui_domain, &user, &code))?;

            tracing::info!(user_id = %user.id(), workspace_id = %workspace.id(), "user signed up");
            Ok(user)
        })
    }

    /// Signup through an external identity provider. The user is created
    /// already verified; a repeated call with the same sub returns the
    /// existing user.
    pub fn signup_oidc(&self, ctx: &Context, param: SignupOidcParam) -> DomainResult<User> {
        self.check_secret(param.secret.as_deref())?;
        let auth = Auth::from_sub(&param.sub);
        if auth.is_empty() {
            return Err(DomainError::InvalidId);
        }
        if !is_valid_email(&param.email) {
            return Err(DomainError::InvalidEmail);
        }

        Usecase::new().transaction().run(ctx, None, &self.repos, |ctx| {
            match self.repos.user.find_by_sub(ctx, &param.sub) {
                Ok(existing) => return Ok(existing),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
            match self.repos.user.find_by_email(ctx, &param.email) {
                Ok(_) => return Err(DomainError::UserAlreadyExists),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }

            let (mut user, workspace) = init(
                InitParams {
                    email: param.email.clone(),
                    name: param.name.clone(),
                    sub: Some(auth.clone()),
                    lang: param.lang.clone(),
                    user_id: param.user_id,
                    workspace_id: param.workspace_id,
                    ..InitParams::default()
                },
                &self.registry,
            )?;
            let mut verification = self.registry.new_verification();
            verification.set_verified(true);
            user.set_verification(Some(verification));

            // The user row decides whether this call won a concurrent race,
            // so it goes first here.
            let new_id = user.id();
            let stored = self.repos.user.find_by_sub_or_create(ctx, user, &param.sub)?;
            if stored.id() == new_id {
                self.repos.workspace.save(ctx, &workspace)?;
                tracing::info!(user_id = %new_id, provider = auth.provider(), "user signed up via oidc");
            }
            Ok(stored)
        })
    }

    /// Issue a fresh verification code and mail it. Verified users are left
    /// alone.
    pub fn create_verification(&self, ctx: &Context, email: &str) -> DomainResult<()> {
        Usecase::new().transaction().run(ctx, None, &self.repos, |ctx| {
            let mut user = self.repos.user.find_by_email(ctx, email)?;
            if user.is_verified() {
                tracing::debug!(user_id = %user.id(), "already verified, nothing to reissue");
                return Ok(());
            }
            let verification = self.registry.new_verification();
            let code = verification.code().to_string();
            user.set_verification(Some(verification));
            self.repos.user.save(ctx, &user)?;
            self.send(mail::verification(&self.config.auth_srv_ui_domain, &user, &code))?;
            tracing::info!(user_id = %user.id(), "verification reissued");
            Ok(())
        })
    }

    pub fn verify_user(&self, ctx: &Context, code: &str) -> DomainResult<User> {
        Usecase::new().transaction().run(ctx, None, &self.repos, |ctx| {
            let mut user = self.repos.user.find_by_verification(ctx, code)?;
            let now = self.registry.now();
            let verification = user.verification_mut().ok_or(DomainError::NotFound)?;
            if verification.is_expired(now) {
                return Err(DomainError::VerificationExpired);
            }
            verification.set_verified(true);
            self.repos.user.save(ctx, &user)?;
            tracing::info!(user_id = %user.id(), "user verified");
            Ok(user)
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Password reset & login
    // ─────────────────────────────────────────────────────────────────────

    pub fn start_password_reset(&self, ctx: &Context, email: &str) -> DomainResult<()> {
        Usecase::new().transaction().run(ctx, None, &self.repos, |ctx| {
            let mut user = self.repos.user.find_by_email(ctx, email)?;
            if !user
                .get_auth_by_provider(REEARTH_PROVIDER)
                .is_some_and(|a| !a.sub().is_empty())
            {
                return Err(DomainError::InvalidPasswordReset);
            }
            let reset = self.registry.new_password_reset();
            let token = reset.token().to_string();
            user.set_password_reset(Some(reset));
            self.repos.user.save(ctx, &user)?;
            self.send(mail::password_reset(&self.config.auth_srv_ui_domain, &user, &token))?;
            tracing::info!(user_id = %user.id(), "password reset started");
            Ok(())
        })
    }

    pub fn password_reset(&self, ctx: &Context, password: &str, token: &str) -> DomainResult<()> {
        Usecase::new().transaction().run(ctx, None, &self.repos, |ctx| {
            let mut user = self.repos.user.find_by_password_reset_request(ctx, token)?;
            let now = self.registry.now();
            let valid = user
                .password_reset()
                .is_some_and(|pr| pr.validate(token, now));
            if !valid || !user.has_auth_provider(REEARTH_PROVIDER) {
                return Err(DomainError::InvalidPasswordReset);
            }
            user.set_password(password, self.registry.encoder.as_ref())?;
            user.set_password_reset(None);
            self.repos.user.save(ctx, &user)?;
            tracing::info!(user_id = %user.id(), "password reset completed");
            Ok(())
        })
    }

    /// Password login by name or email. Only verified users get through.
    pub fn get_user_by_credentials(&self, ctx: &Context, email: &str, password: &str) -> DomainResult<User> {
        let user = match self.repos.user.find_by_name_or_email(ctx, email) {
            Ok(u) => u,
            Err(e) if e.is_not_found() => return Err(DomainError::InvalidUserEmail),
            Err(e) => return Err(e),
        };
        if !user.match_password(password, self.registry.encoder.as_ref())? {
            return Err(DomainError::InvalidEmailOrPassword);
        }
        if !user.is_verified() {
            return Err(DomainError::NotVerifiedUser);
        }
        Ok(user)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Self-service
    // ─────────────────────────────────────────────────────────────────────

    pub fn update_me(&self, ctx: &Context, op: &Operator, param: UpdateMeParam) -> DomainResult<User> {
        let uid = op.require_user()?;
        if let Some(password) = &param.password {
            if param.password_confirmation.as_deref() != Some(password.as_str()) {
                return Err(DomainError::InvalidPasswordConfirmation);
            }
        }

        Usecase::new().transaction().run(ctx, Some(op), &self.repos, |ctx| {
            let mut user = self.repos.user.find_by_id(ctx, uid)?;
            let mut renamed_workspace = None;

            if let Some(name) = param.name.as_deref().filter(|n| *n != user.name()) {
                if is_valid_email(name) {
                    return Err(DomainError::InvalidName);
                }
                match self.repos.user.find_by_name(ctx, name) {
                    Ok(_) => return Err(DomainError::DuplicatedUser),
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
                let old_name = user.name().to_string();
                user.update_name(name)?;

                let mut workspace = self.repos.workspace.find_by_id(ctx, user.workspace())?;
                if workspace.name().is_empty() || workspace.name() == old_name {
                    workspace.rename(name);
                    renamed_workspace = Some(workspace);
                }
            }
            if let Some(email) = &param.email {
                user.update_email(email.as_str())?;
            }
            if let Some(lang) = &param.lang {
                user.update_lang(Some(lang.clone()));
            }
            if let Some(theme) = param.theme {
                user.update_theme(theme);
            }
            if let Some(password) = &param.password {
                if user.has_auth_provider(REEARTH_PROVIDER) {
                    user.set_password(password, self.registry.encoder.as_ref())?;
                }
            }

            if param.name.is_some() || param.email.is_some() || param.password.is_some() {
                if let Some(authenticator) = &self.gateways.authenticator {
                    for auth in user.auths().iter().filter(|a| a.provider() == AUTH0_PROVIDER) {
                        authenticator.update_user(
                            ctx,
                            AuthenticatorUpdateUserParam {
                                id: auth.sub().to_string(),
                                name: param.name.clone(),
                                email: param.email.clone(),
                                password: param.password.clone(),
                            },
                        )?;
                    }
                }
            }

            if let Some(workspace) = &renamed_workspace {
                self.repos.workspace.save(ctx, workspace)?;
            }
            self.repos.user.save(ctx, &user)?;
            tracing::info!(user_id = %uid, "user updated");
            Ok(user)
        })
    }

    /// Unlink an identity provider. The auth0 link is never removed.
    pub fn remove_my_auth(&self, ctx: &Context, op: &Operator, provider: &str) -> DomainResult<User> {
        let uid = op.require_user()?;
        Usecase::new().transaction().run(ctx, Some(op), &self.repos, |ctx| {
            let mut user = self.repos.user.find_by_id(ctx, uid)?;
            if user.remove_auth_by_provider(provider) {
                tracing::info!(user_id = %uid, provider, "auth removed");
            }
            self.repos.user.save(ctx, &user)?;
            Ok(user)
        })
    }

    /// Delete the operator's own account. Shared workspaces they co-own or
    /// merely belong to are left; the rest are deleted with them.
    pub fn delete_me(&self, ctx: &Context, op: &Operator, user_id: UserId) -> DomainResult<()> {
        let uid = op.require_user()?;
        if uid != user_id {
            return Err(DomainError::OperationDenied);
        }

        Usecase::new().transaction().run(ctx, Some(op), &self.repos, |ctx| {
            let user = self.repos.user.find_by_id(ctx, uid)?;
            let workspaces = self.repos.workspace.find_by_user(ctx, uid)?;

            let mut left = Vec::new();
            let mut deleted = Vec::new();
            for mut workspace in workspaces {
                if !workspace.is_personal() && !workspace.members().is_only_owner(&uid) {
                    workspace.members_mut().leave(&uid)?;
                    left.push(workspace);
                } else {
                    deleted.push(workspace.id());
                }
            }

            self.repos.workspace.save_all(ctx, &left)?;
            self.repos.workspace.remove_all(ctx, &deleted)?;
            self.repos.user.remove(ctx, user.id())?;
            tracing::info!(
                user_id = %uid,
                left = left.len(),
                deleted = deleted.len(),
                "user deleted"
            );
            Ok(())
        })
    }
}
