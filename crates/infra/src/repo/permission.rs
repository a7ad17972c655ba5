use std::sync::Arc;

use tenantry_auth::{Permittable, RoleDefinition};
use tenantry_core::{Context, DomainResult, RoleId, UserId};

/// Plain storage of transitional role definitions.
pub trait RoleRepository: Send + Sync {
    fn find_all(&self, ctx: &Context) -> DomainResult<Vec<RoleDefinition>>;

    fn find_by_id(&self, ctx: &Context, id: RoleId) -> DomainResult<RoleDefinition>;

    fn find_by_ids(&self, ctx: &Context, ids: &[RoleId]) -> DomainResult<Vec<Option<RoleDefinition>>>;

    fn save(&self, ctx: &Context, role: &RoleDefinition) -> DomainResult<()>;

    fn remove(&self, ctx: &Context, id: RoleId) -> DomainResult<()>;
}

/// Plain storage of transitional user-to-roles links.
pub trait PermittableRepository: Send + Sync {
    fn find_by_user_id(&self, ctx: &Context, user: UserId) -> DomainResult<Permittable>;

    fn find_by_user_ids(&self, ctx: &Context, users: &[UserId]) -> DomainResult<Vec<Option<Permittable>>>;

    fn find_by_role_id(&self, ctx: &Context, role: RoleId) -> DomainResult<Vec<Permittable>>;

    fn save(&self, ctx: &Context, permittable: &Permittable) -> DomainResult<()>;
}

impl<S> RoleRepository for Arc<S>
where
    S: RoleRepository + ?Sized,
{
    fn find_all(&self, ctx: &Context) -> DomainResult<Vec<RoleDefinition>> {
        (**self).find_all(ctx)
    }

    fn find_by_id(&self, ctx: &Context, id: RoleId) -> DomainResult<RoleDefinition> {
        (**self).find_by_id(ctx, id)
    }

    fn find_by_ids(&self, ctx: &Context, ids: &[RoleId]) -> DomainResult<Vec<Option<RoleDefinition>>> {
        (**self).find_by_ids(ctx, ids)
    }

    fn save(&self, ctx: &Context, role: &RoleDefinition) -> DomainResult<()> {
        (**self).save(ctx, role)
    }

    fn remove(&self, ctx: &Context, id: RoleId) -> DomainResult<()> {
        (**self).remove(ctx, id)
    }
}

impl<S> PermittableRepository for Arc<S>
where
    S: PermittableRepository + ?Sized,
{
    fn find_by_user_id(&self, ctx: &Context, user: UserId) -> DomainResult<Permittable> {
        (**self).find_by_user_id(ctx, user)
    }

    fn find_by_user_ids(&self, ctx: &Context, users: &[UserId]) -> DomainResult<Vec<Option<Permittable>>> {
        (**self).find_by_user_ids(ctx, users)
    }

    fn find_by_role_id(&self, ctx: &Context, role: RoleId) -> DomainResult<Vec<Permittable>> {
        (**self).find_by_role_id(ctx, role)
    }

    fn save(&self, ctx: &Context, permittable: &Permittable) -> DomainResult<()> {
        (**self).save(ctx, permittable)
    }
}
