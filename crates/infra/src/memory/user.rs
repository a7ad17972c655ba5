use tenantry_account::User;
use tenantry_core::{AggregateRoot, Context, DomainError, DomainResult, UserId};

use crate::repo::UserRepository;

use super::table::Table;

/// Minimum keyword length for [`UserRepository::search_by_keyword`].
pub const MIN_SEARCH_KEYWORD_LEN: usize = 3;

/// In-memory user repository for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Table<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with `users`, for tests.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        for u in users {
            repo.table.seed(u);
        }
        repo
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_all(&self, ctx: &Context) -> DomainResult<Vec<User>> {
        self.table.all(ctx)
    }

    fn find_by_id(&self, ctx: &Context, id: UserId) -> DomainResult<User> {
        self.table.get(ctx, id)
    }

    fn find_by_ids(&self, ctx: &Context, ids: &[UserId]) -> DomainResult<Vec<Option<User>>> {
        self.table.get_many(ctx, ids)
    }

    fn find_by_sub(&self, ctx: &Context, sub: &str) -> DomainResult<User> {
        ctx.check()?;
        if sub.is_empty() {
            return Err(DomainError::NotFound);
        }
        self.table.find(ctx, |u| u.contains_sub(sub))
    }

    fn find_by_email(&self, ctx: &Context, email: &str) -> DomainResult<User> {
        ctx.check()?;
        if email.is_empty() {
            return Err(DomainError::NotFound);
        }
        self.table.find(ctx, |u| u.email() == email)
    }

    fn find_by_name(&self, ctx: &Context, name: &str) -> DomainResult<User> {
        ctx.check()?;
        if name.is_empty() {
            return Err(DomainError::NotFound);
        }
        self.table.find(ctx, |u| u.name() == name)
    }

    fn find_by_name_or_email(&self, ctx: &Context, name_or_email: &str) -> DomainResult<User> {
        ctx.check()?;
        if name_or_email.is_empty() {
            return Err(DomainError::NotFound);
        }
        self.table
            .find(ctx, |u| u.email() == name_or_email || u.name() == name_or_email)
    }

    fn search_by_keyword(&self, ctx: &Context, keyword: &str) -> DomainResult<Vec<User>> {
        ctx.check()?;
        if keyword.chars().count() < MIN_SEARCH_KEYWORD_LEN {
            return Ok(Vec::new());
        }
        let needle = keyword.to_lowercase();
        self.table.filter(ctx, |u| {
            u.email().to_lowercase().contains(&needle) || u.name().to_lowercase().contains(&needle)
        })
    }

    fn find_by_verification(&self, ctx: &Context, code: &str) -> DomainResult<User> {
        ctx.check()?;
        if code.is_empty() {
            return Err(DomainError::NotFound);
        }
        self.table
            .find(ctx, |u| u.verification().is_some_and(|v| v.code() == code))
    }

    fn find_by_password_reset_request(&self, ctx: &Context, token: &str) -> DomainResult<User> {
        ctx.check()?;
        if token.is_empty() {
            return Err(DomainError::NotFound);
        }
        self.table
            .find(ctx, |u| u.password_reset().is_some_and(|pr| pr.token() == token))
    }

    fn find_by_sub_or_create(&self, ctx: &Context, user: User, sub: &str) -> DomainResult<User> {
        self.table.write(ctx, |rows| {
            if let Some(existing) = rows.values().find(|u| u.contains_sub(sub)) {
                return Ok(existing.clone());
            }
            if rows.contains_key(&user.id()) {
                return Err(DomainError::DuplicatedUser);
            }
            rows.insert(user.id(), user.clone());
            Ok(user)
        })
    }

    fn create(&self, ctx: &Context, user: &User) -> DomainResult<()> {
        self.table.write(ctx, |rows| {
            if rows.contains_key(&user.id()) {
                return Err(DomainError::DuplicatedUser);
            }
            rows.insert(user.id(), user.clone());
            Ok(())
        })
    }

    fn save(&self, ctx: &Context, user: &User) -> DomainResult<()> {
        self.table.upsert(ctx, user)
    }

    fn remove(&self, ctx: &Context, id: UserId) -> DomainResult<()> {
        self.table.delete_all(ctx, &[id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tenantry_account::{PasswordReset, Verification};
    use tenantry_auth::{Auth, NoopPasswordEncoder};

    fn user(name: &str, email: &str) -> User {
        User::builder()
            .new_id()
            .name(name)
            .email(email)
            .encoder(Arc::new(NoopPasswordEncoder))
            .must_build()
    }

    fn ctx() -> Context {
        Context::background()
    }

    #[test]
    fn find_by_ids_keeps_positions() {
        let (a, b) = (user("a", "a@x.com"), user("b", "b@x.com"));
        let repo = InMemoryUserRepository::with_users([a.clone(), b.clone()]);
        let missing = UserId::new();
        let out = repo.find_by_ids(&ctx(), &[b.id(), missing, a.id()]).unwrap();
        assert_eq!(out, vec![Some(b), None, Some(a)]);
    }

    #[test]
    fn misses_are_not_found() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(repo.find_by_id(&ctx(), UserId::new()), Err(DomainError::NotFound));
        assert_eq!(repo.find_by_email(&ctx(), "a@x.com"), Err(DomainError::NotFound));
        assert_eq!(repo.find_by_sub(&ctx(), ""), Err(DomainError::NotFound));
        assert_eq!(repo.find_by_verification(&ctx(), ""), Err(DomainError::NotFound));
    }

    #[test]
    fn lookups() {
        let mut u = user("NAME", "aaa@bbb.com");
        u.add_auth(Auth::from_sub("auth0|abc"));
        u.set_verification(Some(Verification::issue("CODE", chrono::Utc::now())));
        u.set_password_reset(Some(PasswordReset::issue("TOKEN", chrono::Utc::now())));
        let repo = InMemoryUserRepository::with_users([u.clone()]);

        assert_eq!(repo.find_by_sub(&ctx(), "auth0|abc").unwrap(), u);
        assert_eq!(repo.find_by_name(&ctx(), "NAME").unwrap(), u);
        assert_eq!(repo.find_by_name_or_email(&ctx(), "aaa@bbb.com").unwrap(), u);
        assert_eq!(repo.find_by_name_or_email(&ctx(), "NAME").unwrap(), u);
        assert_eq!(repo.find_by_verification(&ctx(), "CODE").unwrap(), u);
        assert_eq!(repo.find_by_password_reset_request(&ctx(), "TOKEN").unwrap(), u);
        assert!(repo.find_by_sub(&ctx(), "auth0|abd").is_err());
    }

    #[test]
    fn search_is_case_insensitive_and_needs_three_chars() {
        let a = user("Alice", "alice@example.com");
        let b = user("bob", "BOB@example.com");
        let repo = InMemoryUserRepository::with_users([a.clone(), b.clone()]);

        assert!(repo.search_by_keyword(&ctx(), "al").unwrap().is_empty());
        assert_eq!(repo.search_by_keyword(&ctx(), "ALI").unwrap(), vec![a.clone()]);
        assert_eq!(repo.search_by_keyword(&ctx(), "bob@").unwrap(), vec![b.clone()]);
        assert_eq!(repo.search_by_keyword(&ctx(), "example").unwrap(), vec![a, b]);
    }

    #[test]
    fn create_is_strict_and_save_upserts() {
        let mut u = user("a", "a@x.com");
        let repo = InMemoryUserRepository::new();
        repo.create(&ctx(), &u).unwrap();
        assert_eq!(repo.create(&ctx(), &u), Err(DomainError::DuplicatedUser));
        u.update_name("b").unwrap();
        repo.save(&ctx(), &u).unwrap();
        assert_eq!(repo.find_by_id(&ctx(), u.id()).unwrap().name(), "b");
        repo.remove(&ctx(), u.id()).unwrap();
        assert!(repo.find_all(&ctx()).unwrap().is_empty());
    }

    #[test]
    fn find_by_sub_or_create_is_idempotent() {
        let repo = InMemoryUserRepository::new();
        let mut first = user("a", "a@x.com");
        first.add_auth(Auth::from_sub("oidc|1"));
        let stored = repo.find_by_sub_or_create(&ctx(), first.clone(), "oidc|1").unwrap();
        assert_eq!(stored, first);

        let mut second = user("b", "b@x.com");
        second.add_auth(Auth::from_sub("oidc|1"));
        let again = repo.find_by_sub_or_create(&ctx(), second, "oidc|1").unwrap();
        assert_eq!(again.id(), first.id());
        assert_eq!(repo.find_all(&ctx()).unwrap().len(), 1);
    }

    #[test]
    fn find_by_sub_or_create_rejects_duplicate_ids() {
        let u = user("a", "a@x.com");
        let repo = InMemoryUserRepository::with_users([u.clone()]);
        assert_eq!(
            repo.find_by_sub_or_create(&ctx(), u, "oidc|2"),
            Err(DomainError::DuplicatedUser)
        );
    }

    #[test]
    fn concurrent_find_by_sub_or_create_inserts_once() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    let mut u = user("a", "a@x.com");
                    u.add_auth(Auth::from_sub("oidc|race"));
                    repo.find_by_sub_or_create(&Context::background(), u, "oidc|race")
                        .unwrap()
                        .id()
                })
            })
            .collect();
        let ids: Vec<UserId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(repo.find_all(&ctx()).unwrap().len(), 1);
    }

    #[test]
    fn cancelled_context_does_not_mutate() {
        let repo = InMemoryUserRepository::new();
        let ctx = Context::background();
        ctx.cancel();
        let u = user("a", "a@x.com");
        assert_eq!(repo.save(&ctx, &u), Err(DomainError::Cancelled));
        assert_eq!(repo.search_by_keyword(&ctx, "abcd"), Err(DomainError::Cancelled));
        assert!(repo.find_all(&Context::background()).unwrap().is_empty());
    }

    #[test]
    fn cancelled_context_wins_over_empty_lookup() {
        let repo = InMemoryUserRepository::new();
        let ctx = Context::background();
        ctx.cancel();
        assert_eq!(repo.find_by_sub(&ctx, ""), Err(DomainError::Cancelled));
        assert_eq!(repo.find_by_email(&ctx, ""), Err(DomainError::Cancelled));
        assert_eq!(repo.find_by_name(&ctx, ""), Err(DomainError::Cancelled));
        assert_eq!(repo.find_by_name_or_email(&ctx, ""), Err(DomainError::Cancelled));
        assert_eq!(repo.find_by_verification(&ctx, ""), Err(DomainError::Cancelled));
        assert_eq!(repo.find_by_password_reset_request(&ctx, ""), Err(DomainError::Cancelled));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn find_by_ids_aligns_with_request(picks in proptest::collection::vec(0usize..6, 0..12)) {
                let users: Vec<User> = (0..3)
                    .map(|i| user(&format!("user{i}"), &format!("user{i}@x.com")))
                    .collect();
                let missing: Vec<UserId> = (0..3).map(|_| UserId::new()).collect();
                let repo = InMemoryUserRepository::with_users(users.clone());

                let ids: Vec<UserId> = picks
                    .iter()
                    .map(|&p| if p < 3 { users[p].id() } else { missing[p - 3] })
                    .collect();
                let out = repo.find_by_ids(&ctx(), &ids).unwrap();

                prop_assert_eq!(out.len(), ids.len());
                for (id, slot) in ids.iter().zip(&out) {
                    match slot {
                        Some(u) => prop_assert_eq!(u.id(), *id),
                        None => prop_assert!(missing.contains(id)),
                    }
                }
            }

            #[test]
            fn short_keywords_find_nothing(keyword in "[a-z@.]{0,2}") {
                let repo = InMemoryUserRepository::with_users([user("abc", "abc@x.com")]);
                prop_assert!(repo.search_by_keyword(&ctx(), &keyword).unwrap().is_empty());
            }
        }
    }
}
