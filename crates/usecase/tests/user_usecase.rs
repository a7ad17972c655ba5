use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tenantry_account::{FixedTokens, Registry, Theme, User};
use tenantry_auth::{Auth, BcryptPasswordEncoder, Operator, Role};
use tenantry_core::{AggregateRoot, Context, DomainError, FixedClock, PasswordViolation, UserId, WorkspaceId};
use tenantry_infra::Container;
use tenantry_infra::memory::{InMemoryTransaction, new_container_with};
use tenantry_usecase::{
    Config, Gateways, MemoryAuthenticator, MemoryMailer, SignupOidcParam, SignupParam, UpdateMeParam,
    UserInteractor,
};

const EMAIL: &str = "aaa@bbb.com";
const PASSWORD: &str = "PAss00!!";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

struct Harness {
    ctx: Context,
    repos: Container,
    tx: InMemoryTransaction,
    clock: Arc<FixedClock>,
    mailer: Arc<MemoryMailer>,
    authenticator: Arc<MemoryAuthenticator>,
    users: UserInteractor,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(Config {
            auth_srv_ui_domain: "https://auth.example.com".into(),
            ..Config::default()
        })
    }

    fn with_config(config: Config) -> Self {
        tenantry_observability::init_for_tests();
        let tx = InMemoryTransaction::new();
        let repos = new_container_with(tx.clone());
        let clock = Arc::new(FixedClock::new(t0()));
        let mailer = Arc::new(MemoryMailer::new());
        let authenticator = Arc::new(MemoryAuthenticator::new());
        let registry = Registry::default()
            .with_encoder(Arc::new(BcryptPasswordEncoder::with_cost(4)))
            .with_clock(clock.clone())
            .with_tokens(Arc::new(FixedTokens::new("CODECODE")));
        let gateways = Gateways {
            mailer: mailer.clone(),
            authenticator: Some(authenticator.clone()),
        };
        let users = UserInteractor::new(repos.clone(), gateways, registry, config);
        Self {
            ctx: Context::background(),
            repos,
            tx,
            clock,
            mailer,
            authenticator,
            users,
        }
    }

    fn signup(&self) -> User {
        self.users
            .signup(
                &self.ctx,
                SignupParam {
                    email: EMAIL.into(),
                    name: "NAME".into(),
                    password: PASSWORD.into(),
                    ..SignupParam::default()
                },
            )
            .unwrap()
    }

    fn operator(&self, user: &User) -> Operator {
        let mut op = Operator::for_user(user.id());
        op.add_new_workspace(user.workspace());
        op
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Signup
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn signup_creates_user_and_personal_workspace() {
    let h = Harness::new();
    let user = h.signup();

    assert_eq!(user.email(), EMAIL);
    assert_eq!(user.name(), "NAME");
    assert!(user.has_auth_provider("reearth"));
    assert!(!user.is_verified());
    let v = user.verification().unwrap();
    assert_eq!(v.code(), "CODECODE");
    assert_eq!(v.expiration(), t0() + Duration::hours(24));

    let stored = h.repos.user.find_by_email(&h.ctx, EMAIL).unwrap();
    assert_eq!(stored.id(), user.id());

    let ws = h.repos.workspace.find_by_id(&h.ctx, user.workspace()).unwrap();
    assert!(ws.is_personal());
    assert_eq!(ws.name(), "NAME");
    assert!(ws.members().is_only_owner(&user.id()));

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to[0].email, EMAIL);
    assert_eq!(sent[0].subject, "email verification");
    assert!(sent[0].text.contains("/?user-verification-token=CODECODE"));
    assert!(sent[0].html.contains("/?user-verification-token=CODECODE"));

    assert_eq!((h.tx.begun(), h.tx.committed(), h.tx.ended()), (1, 1, 1));
}

#[test]
fn signup_honours_requested_ids() {
    let h = Harness::new();
    let (uid, wid) = (UserId::new(), WorkspaceId::new());
    let user = h
        .users
        .signup(
            &h.ctx,
            SignupParam {
                email: EMAIL.into(),
                name: "NAME".into(),
                password: PASSWORD.into(),
                theme: Some(Theme::Dark),
                user_id: Some(uid),
                workspace_id: Some(wid),
                ..SignupParam::default()
            },
        )
        .unwrap();
    assert_eq!(user.id(), uid);
    assert_eq!(user.workspace(), wid);
    assert_eq!(user.metadata().theme, Theme::Dark);
}

#[test]
fn signup_mail_escapes_the_name() {
    let h = Harness::new();
    h.users
        .signup(
            &h.ctx,
            SignupParam {
                email: EMAIL.into(),
                name: "<b>x</b>".into(),
                password: PASSWORD.into(),
                ..SignupParam::default()
            },
        )
        .unwrap();
    let mail = h.mailer.last().unwrap();
    assert!(mail.html.contains("Hi &lt;b&gt;x&lt;/b&gt;,"));
    assert!(!mail.html.contains("<b>"));
    assert!(mail.text.contains("Hi <b>x</b>,"));
}

#[test]
fn signup_twice_fails() {
    let h = Harness::new();
    h.signup();
    let err = h
        .users
        .signup(
            &h.ctx,
            SignupParam {
                email: EMAIL.into(),
                name: "OTHER".into(),
                password: PASSWORD.into(),
                ..SignupParam::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, DomainError::UserAlreadyExists);
    assert_eq!(h.mailer.sent().len(), 1);
    assert!(!h.tx.is_committed());
}

#[test]
fn signup_secret_must_match() {
    let h = Harness::with_config(Config {
        signup_secret: Some("SECRET".into()),
        ..Config::default()
    });
    let param = |secret: &str| SignupParam {
        email: EMAIL.into(),
        name: "NAME".into(),
        password: PASSWORD.into(),
        secret: Some(secret.into()),
        ..SignupParam::default()
    };

    assert_eq!(h.users.signup(&h.ctx, param("SECRET!")).unwrap_err(), DomainError::InvalidSecret);
    assert!(h.repos.user.find_by_email(&h.ctx, EMAIL).unwrap_err().is_not_found());
    assert_eq!(h.tx.begun(), 0);

    assert!(h.users.signup(&h.ctx, param("SECRET")).is_ok());
}

#[test]
fn signup_rejects_bad_input() {
    let h = Harness::new();
    let bad_email = SignupParam {
        email: "not-an-email".into(),
        name: "NAME".into(),
        password: PASSWORD.into(),
        ..SignupParam::default()
    };
    assert_eq!(h.users.signup(&h.ctx, bad_email).unwrap_err(), DomainError::InvalidEmail);

    let short = SignupParam {
        email: EMAIL.into(),
        name: "NAME".into(),
        password: "Aa1".into(),
        ..SignupParam::default()
    };
    assert_eq!(
        h.users.signup(&h.ctx, short).unwrap_err(),
        DomainError::InvalidPassword(PasswordViolation::TooShort)
    );
    assert!(h.mailer.sent().is_empty());
}

#[test]
fn signup_mail_failure_rolls_back_the_transaction() {
    let h = Harness::new();
    h.mailer.fail_with(Some(DomainError::gateway("smtp down")));
    let err = h
        .users
        .signup(
            &h.ctx,
            SignupParam {
                email: EMAIL.into(),
                name: "NAME".into(),
                password: PASSWORD.into(),
                ..SignupParam::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, DomainError::gateway("smtp down"));
    assert_eq!((h.tx.committed(), h.tx.ended()), (0, 1));
}

#[test]
fn oidc_signup_is_verified_and_idempotent() {
    let h = Harness::new();
    let param = SignupOidcParam {
        sub: "auth0|abc".into(),
        email: EMAIL.into(),
        name: "NAME".into(),
        ..SignupOidcParam::default()
    };
    let first = h.users.signup_oidc(&h.ctx, param.clone()).unwrap();
    assert!(first.is_verified());
    assert!(first.contains_auth(&Auth::from_sub("auth0|abc")));
    assert!(h.repos.workspace.find_by_id(&h.ctx, first.workspace()).is_ok());
    assert!(h.mailer.sent().is_empty());

    let again = h.users.signup_oidc(&h.ctx, param).unwrap();
    assert_eq!(again.id(), first.id());
    assert_eq!(h.repos.user.find_all(&h.ctx).unwrap().len(), 1);
}

#[test]
fn oidc_signup_rejects_taken_email() {
    let h = Harness::new();
    h.signup();
    let err = h
        .users
        .signup_oidc(
            &h.ctx,
            SignupOidcParam {
                sub: "auth0|abc".into(),
                email: EMAIL.into(),
                name: "X".into(),
                ..SignupOidcParam::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, DomainError::UserAlreadyExists);
}

// ─────────────────────────────────────────────────────────────────────────────
// Verification & login
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn login_requires_verification() {
    let h = Harness::new();
    h.signup();

    assert_eq!(
        h.users.get_user_by_credentials(&h.ctx, EMAIL, PASSWORD).unwrap_err(),
        DomainError::NotVerifiedUser
    );

    let verified = h.users.verify_user(&h.ctx, "CODECODE").unwrap();
    assert!(verified.is_verified());

    let user = h.users.get_user_by_credentials(&h.ctx, EMAIL, PASSWORD).unwrap();
    assert_eq!(user.id(), verified.id());
    let by_name = h.users.get_user_by_credentials(&h.ctx, "NAME", PASSWORD).unwrap();
    assert_eq!(by_name.id(), verified.id());
}

#[test]
fn login_errors() {
    let h = Harness::new();
    h.signup();
    h.users.verify_user(&h.ctx, "CODECODE").unwrap();

    assert_eq!(
        h.users.get_user_by_credentials(&h.ctx, "nobody@bbb.com", PASSWORD).unwrap_err(),
        DomainError::InvalidUserEmail
    );
    assert_eq!(
        h.users.get_user_by_credentials(&h.ctx, EMAIL, "WRong00!!").unwrap_err(),
        DomainError::InvalidEmailOrPassword
    );
}

#[test]
fn expired_verification_is_rejected() {
    let h = Harness::new();
    h.signup();
    h.clock.advance(Duration::hours(25));
    assert_eq!(
        h.users.verify_user(&h.ctx, "CODECODE").unwrap_err(),
        DomainError::VerificationExpired
    );
    assert!(h.users.verify_user(&h.ctx, "OTHER").unwrap_err().is_not_found());
}

#[test]
fn reissued_verification_sends_new_mail() {
    let h = Harness::new();
    h.signup();
    h.clock.advance(Duration::hours(25));
    h.users.create_verification(&h.ctx, EMAIL).unwrap();
    assert_eq!(h.mailer.sent().len(), 2);

    let user = h.users.verify_user(&h.ctx, "CODECODE").unwrap();
    assert!(user.is_verified());

    h.users.create_verification(&h.ctx, EMAIL).unwrap();
    assert_eq!(h.mailer.sent().len(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Password reset
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn password_reset_flow() {
    let h = Harness::new();
    h.signup();
    h.users.verify_user(&h.ctx, "CODECODE").unwrap();

    h.users.start_password_reset(&h.ctx, EMAIL).unwrap();
    let mail = h.mailer.last().unwrap();
    assert_eq!(mail.subject, "Password reset");
    assert!(mail.text.contains("/?pwd-reset-token=CODECODE"));

    h.users.password_reset(&h.ctx, "NEWpass11", "CODECODE").unwrap();
    assert!(h.users.get_user_by_credentials(&h.ctx, EMAIL, "NEWpass11").is_ok());
    assert_eq!(
        h.users.get_user_by_credentials(&h.ctx, EMAIL, PASSWORD).unwrap_err(),
        DomainError::InvalidEmailOrPassword
    );

    let stored = h.repos.user.find_by_email(&h.ctx, EMAIL).unwrap();
    assert!(stored.password_reset().is_none());
}

#[test]
fn expired_reset_token_is_rejected() {
    let h = Harness::new();
    h.signup();
    h.users.start_password_reset(&h.ctx, EMAIL).unwrap();
    h.clock.advance(Duration::hours(25));
    assert_eq!(
        h.users.password_reset(&h.ctx, "NEWpass11", "CODECODE").unwrap_err(),
        DomainError::InvalidPasswordReset
    );
}

#[test]
fn reset_needs_a_password_account() {
    let h = Harness::new();
    h.users
        .signup_oidc(
            &h.ctx,
            SignupOidcParam {
                sub: "auth0|abc".into(),
                email: EMAIL.into(),
                name: "NAME".into(),
                ..SignupOidcParam::default()
            },
        )
        .unwrap();
    assert_eq!(
        h.users.start_password_reset(&h.ctx, EMAIL).unwrap_err(),
        DomainError::InvalidPasswordReset
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Self-service
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn update_me_renames_personal_workspace() {
    let h = Harness::new();
    let user = h.signup();
    let op = h.operator(&user);

    let updated = h
        .users
        .update_me(
            &h.ctx,
            &op,
            UpdateMeParam {
                name: Some("RENAMED".into()),
                theme: Some(Theme::Light),
                ..UpdateMeParam::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name(), "RENAMED");
    assert_eq!(updated.metadata().theme, Theme::Light);

    let ws = h.repos.workspace.find_by_id(&h.ctx, user.workspace()).unwrap();
    assert_eq!(ws.name(), "RENAMED");
}

#[test]
fn update_me_failure_keeps_workspace_name() {
    let h = Harness::new();
    let user = h.signup();
    let op = h.operator(&user);

    let err = h
        .users
        .update_me(
            &h.ctx,
            &op,
            UpdateMeParam {
                name: Some("RENAMED".into()),
                email: Some("not-an-email".into()),
                ..UpdateMeParam::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, DomainError::InvalidEmail);

    let ws = h.repos.workspace.find_by_id(&h.ctx, user.workspace()).unwrap();
    assert_eq!(ws.name(), "NAME");
    let stored = h.repos.user.find_by_id(&h.ctx, user.id()).unwrap();
    assert_eq!(stored.name(), "NAME");
    assert_eq!(stored.email(), EMAIL);
}

#[test]
fn update_me_keeps_custom_workspace_name() {
    let h = Harness::new();
    let user = h.signup();
    let mut ws = h.repos.workspace.find_by_id(&h.ctx, user.workspace()).unwrap();
    ws.rename("my space");
    h.repos.workspace.save(&h.ctx, &ws).unwrap();

    h.users
        .update_me(
            &h.ctx,
            &h.operator(&user),
            UpdateMeParam {
                name: Some("RENAMED".into()),
                ..UpdateMeParam::default()
            },
        )
        .unwrap();
    let ws = h.repos.workspace.find_by_id(&h.ctx, user.workspace()).unwrap();
    assert_eq!(ws.name(), "my space");
}

#[test]
fn update_me_validation() {
    let h = Harness::new();
    let user = h.signup();
    let op = h.operator(&user);

    let mismatch = UpdateMeParam {
        password: Some("NEWpass11".into()),
        password_confirmation: Some("NEWpass12".into()),
        ..UpdateMeParam::default()
    };
    assert_eq!(
        h.users.update_me(&h.ctx, &op, mismatch).unwrap_err(),
        DomainError::InvalidPasswordConfirmation
    );

    let email_as_name = UpdateMeParam {
        name: Some("x@y.com".into()),
        ..UpdateMeParam::default()
    };
    assert_eq!(
        h.users.update_me(&h.ctx, &op, email_as_name).unwrap_err(),
        DomainError::InvalidName
    );

    assert_eq!(
        h.users
            .update_me(&h.ctx, &Operator::default(), UpdateMeParam::default())
            .unwrap_err(),
        DomainError::InvalidOperator
    );
}

#[test]
fn update_me_rejects_taken_name() {
    let h = Harness::new();
    let user = h.signup();
    h.users
        .signup(
            &h.ctx,
            SignupParam {
                email: "ccc@ddd.com".into(),
                name: "TAKEN".into(),
                password: PASSWORD.into(),
                ..SignupParam::default()
            },
        )
        .unwrap();
    let err = h
        .users
        .update_me(
            &h.ctx,
            &h.operator(&user),
            UpdateMeParam {
                name: Some("TAKEN".into()),
                ..UpdateMeParam::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, DomainError::DuplicatedUser);
}

#[test]
fn update_me_pushes_changes_to_auth0() {
    let h = Harness::new();
    let user = h
        .users
        .signup_oidc(
            &h.ctx,
            SignupOidcParam {
                sub: "auth0|abc".into(),
                email: EMAIL.into(),
                name: "NAME".into(),
                ..SignupOidcParam::default()
            },
        )
        .unwrap();
    h.users
        .update_me(
            &h.ctx,
            &h.operator(&user),
            UpdateMeParam {
                email: Some("new@bbb.com".into()),
                ..UpdateMeParam::default()
            },
        )
        .unwrap();
    let updates = h.authenticator.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, "auth0|abc");
    assert_eq!(updates[0].email.as_deref(), Some("new@bbb.com"));
    assert_eq!(updates[0].name, None);
}

#[test]
fn remove_my_auth_keeps_auth0() {
    let h = Harness::new();
    let user = h
        .users
        .signup_oidc(
            &h.ctx,
            SignupOidcParam {
                sub: "auth0|abc".into(),
                email: EMAIL.into(),
                name: "NAME".into(),
                ..SignupOidcParam::default()
            },
        )
        .unwrap();
    let op = h.operator(&user);
    let after = h.users.remove_my_auth(&h.ctx, &op, "auth0").unwrap();
    assert!(after.has_auth_provider("auth0"));
}

#[test]
fn delete_me_leaves_shared_and_drops_owned() {
    let h = Harness::new();
    let me = h.signup();
    let other = h
        .users
        .signup(
            &h.ctx,
            SignupParam {
                email: "ccc@ddd.com".into(),
                name: "OTHER".into(),
                password: PASSWORD.into(),
                ..SignupParam::default()
            },
        )
        .unwrap();

    let mut shared = tenantry_account::Workspace::builder().new_id().name("shared").must_build();
    shared.members_mut().join(&other, Role::OWNER, other.id()).unwrap();
    shared.members_mut().join(&me, Role::WRITER, other.id()).unwrap();
    h.repos.workspace.save(&h.ctx, &shared).unwrap();

    let mut mine = tenantry_account::Workspace::builder().new_id().name("mine").must_build();
    mine.members_mut().join(&me, Role::OWNER, me.id()).unwrap();
    h.repos.workspace.save(&h.ctx, &mine).unwrap();

    let op = h.operator(&me);
    assert_eq!(
        h.users.delete_me(&h.ctx, &op, other.id()).unwrap_err(),
        DomainError::OperationDenied
    );

    h.users.delete_me(&h.ctx, &op, me.id()).unwrap();

    assert!(h.repos.user.find_by_id(&h.ctx, me.id()).unwrap_err().is_not_found());
    assert!(h.repos.workspace.find_by_id(&h.ctx, me.workspace()).unwrap_err().is_not_found());
    assert!(h.repos.workspace.find_by_id(&h.ctx, mine.id()).unwrap_err().is_not_found());
    let shared = h.repos.workspace.find_by_id(&h.ctx, shared.id()).unwrap();
    assert!(!shared.members().has_user(&me.id()));
    assert!(shared.members().is_owner(&other.id()));
}

#[test]
fn queries() {
    let h = Harness::new();
    let user = h.signup();

    let found = h.users.fetch_by_id(&h.ctx, &[user.id(), UserId::new()]).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].as_ref().map(|u| u.id()), Some(user.id()));
    assert!(found[1].is_none());

    let sub = user.auths().iter().next().unwrap().to_string();
    assert_eq!(h.users.fetch_by_sub(&h.ctx, &sub).unwrap().id(), user.id());
    assert_eq!(h.users.fetch_by_name_or_email(&h.ctx, "NAME").unwrap().id(), user.id());
    assert_eq!(h.users.search_user(&h.ctx, "aaa").unwrap().len(), 1);
}
