use std::sync::Arc;

use tenantry_account::User;
use tenantry_core::{Context, DomainResult, UserId};

/// Storage of [`User`] aggregates.
pub trait UserRepository: Send + Sync {
    fn find_all(&self, ctx: &Context) -> DomainResult<Vec<User>>;

    fn find_by_id(&self, ctx: &Context, id: UserId) -> DomainResult<User>;

    fn find_by_ids(&self, ctx: &Context, ids: &[UserId]) -> DomainResult<Vec<Option<User>>>;

    /// User holding an auth whose full sub equals `sub`.
    fn find_by_sub(&self, ctx: &Context, sub: &str) -> DomainResult<User>;

    fn find_by_email(&self, ctx: &Context, email: &str) -> DomainResult<User>;

    fn find_by_name(&self, ctx: &Context, name: &str) -> DomainResult<User>;

    fn find_by_name_or_email(&self, ctx: &Context, name_or_email: &str) -> DomainResult<User>;

    /// Case-insensitive substring match over email and name. Keywords
    /// shorter than three characters match nothing.
    fn search_by_keyword(&self, ctx: &Context, keyword: &str) -> DomainResult<Vec<User>>;

    fn find_by_verification(&self, ctx: &Context, code: &str) -> DomainResult<User>;

    fn find_by_password_reset_request(&self, ctx: &Context, token: &str) -> DomainResult<User>;

    /// Atomic find-or-insert keyed by `sub`: returns the stored user holding
    /// `sub` if there is one, otherwise inserts `user` and returns it.
    /// Inserting an id that already exists fails with `DuplicatedUser`.
    fn find_by_sub_or_create(&self, ctx: &Context, user: User, sub: &str) -> DomainResult<User>;

    fn create(&self, ctx: &Context, user: &User) -> DomainResult<()>;

    fn save(&self, ctx: &Context, user: &User) -> DomainResult<()>;

    fn remove(&self, ctx: &Context, id: UserId) -> DomainResult<()>;
}

impl<S> UserRepository for Arc<S>
where
    S: UserRepository + ?Sized,
{
    fn find_all(&self, ctx: &Context) -> DomainResult<Vec<User>> {
        (**self).find_all(ctx)
    }

    fn find_by_id(&self, ctx: &Context, id: UserId) -> DomainResult<User> {
        (**self).find_by_id(ctx, id)
    }

    fn find_by_ids(&self, ctx: &Context, ids: &[UserId]) -> DomainResult<Vec<Option<User>>> {
        (**self).find_by_ids(ctx, ids)
    }

    fn find_by_sub(&self, ctx: &Context, sub: &str) -> DomainResult<User> {
        (**self).find_by_sub(ctx, sub)
    }

    fn find_by_email(&self, ctx: &Context, email: &str) -> DomainResult<User> {
        (**self).find_by_email(ctx, email)
    }

    fn find_by_name(&self, ctx: &Context, name: &str) -> DomainResult<User> {
        (**self).find_by_name(ctx, name)
    }

    fn find_by_name_or_email(&self, ctx: &Context, name_or_email: &str) -> DomainResult<User> {
        (**self).find_by_name_or_email(ctx, name_or_email)
    }

    fn search_by_keyword(&self, ctx: &Context, keyword: &str) -> DomainResult<Vec<User>> {
        (**self).search_by_keyword(ctx, keyword)
    }

    fn find_by_verification(&self, ctx: &Context, code: &str) -> DomainResult<User> {
        (**self).find_by_verification(ctx, code)
    }

    fn find_by_password_reset_request(&self, ctx: &Context, token: &str) -> DomainResult<User> {
        (**self).find_by_password_reset_request(ctx, token)
    }

    fn find_by_sub_or_create(&self, ctx: &Context, user: User, sub: &str) -> DomainResult<User> {
        (**self).find_by_sub_or_create(ctx, user, sub)
    }

    fn create(&self, ctx: &Context, user: &User) -> DomainResult<()> {
        (**self).create(ctx, user)
    }

    fn save(&self, ctx: &Context, user: &User) -> DomainResult<()> {
        (**self).save(ctx, user)
    }

    fn remove(&self, ctx: &Context, id: UserId) -> DomainResult<()> {
        (**self).remove(ctx, id)
    }
}
