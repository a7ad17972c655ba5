use tenantry_auth::{Permittable, RoleDefinition};
use tenantry_core::{Context, DomainResult, RoleId, UserId};

use crate::repo::{PermittableRepository, RoleRepository};

use super::table::Table;

#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    table: Table<RoleDefinition>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoleRepository for InMemoryRoleRepository {
    fn find_all(&self, ctx: &Context) -> DomainResult<Vec<RoleDefinition>> {
        self.table.all(ctx)
    }

    fn find_by_id(&self, ctx: &Context, id: RoleId) -> DomainResult<RoleDefinition> {
        self.table.get(ctx, id)
    }

    fn find_by_ids(&self, ctx: &Context, ids: &[RoleId]) -> DomainResult<Vec<Option<RoleDefinition>>> {
        self.table.get_many(ctx, ids)
    }

    fn save(&self, ctx: &Context, role: &RoleDefinition) -> DomainResult<()> {
        self.table.upsert(ctx, role)
    }

    fn remove(&self, ctx: &Context, id: RoleId) -> DomainResult<()> {
        self.table.delete_all(ctx, &[id])
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPermittableRepository {
    table: Table<Permittable>,
}

impl InMemoryPermittableRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PermittableRepository for InMemoryPermittableRepository {
    fn find_by_user_id(&self, ctx: &Context, user: UserId) -> DomainResult<Permittable> {
        self.table.find(ctx, |p| p.user_id() == user)
    }

    fn find_by_user_ids(&self, ctx: &Context, users: &[UserId]) -> DomainResult<Vec<Option<Permittable>>> {
        self.table.read(ctx, |rows| {
            users
                .iter()
                .map(|u| rows.values().find(|p| p.user_id() == *u).cloned())
                .collect()
        })
    }

    fn find_by_role_id(&self, ctx: &Context, role: RoleId) -> DomainResult<Vec<Permittable>> {
        self.table.filter(ctx, |p| p.has_role(&role))
    }

    fn save(&self, ctx: &Context, permittable: &Permittable) -> DomainResult<()> {
        self.table.upsert(ctx, permittable)
    }
}
