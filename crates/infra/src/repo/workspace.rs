use std::sync::Arc;

use tenantry_account::{Workspace, WorkspaceList};
use tenantry_core::{Context, DomainResult, IntegrationId, UserId, WorkspaceId};

/// Storage of [`Workspace`] aggregates.
pub trait WorkspaceRepository: Send + Sync {
    fn find_by_id(&self, ctx: &Context, id: WorkspaceId) -> DomainResult<Workspace>;

    fn find_by_ids(&self, ctx: &Context, ids: &[WorkspaceId]) -> DomainResult<Vec<Option<Workspace>>>;

    /// Workspaces the user is a member of.
    fn find_by_user(&self, ctx: &Context, user: UserId) -> DomainResult<WorkspaceList>;

    fn find_by_integration(&self, ctx: &Context, integration: IntegrationId) -> DomainResult<WorkspaceList>;

    /// Workspaces any of the integrations is a member of.
    fn find_by_integrations(
        &self,
        ctx: &Context,
        integrations: &[IntegrationId],
    ) -> DomainResult<WorkspaceList>;

    fn create(&self, ctx: &Context, workspace: &Workspace) -> DomainResult<()>;

    fn save(&self, ctx: &Context, workspace: &Workspace) -> DomainResult<()>;

    fn save_all(&self, ctx: &Context, workspaces: &[Workspace]) -> DomainResult<()>;

    fn remove(&self, ctx: &Context, id: WorkspaceId) -> DomainResult<()>;

    fn remove_all(&self, ctx: &Context, ids: &[WorkspaceId]) -> DomainResult<()>;
}

impl<S> WorkspaceRepository for Arc<S>
where
    S: WorkspaceRepository + ?Sized,
{
    fn find_by_id(&self, ctx: &Context, id: WorkspaceId) -> DomainResult<Workspace> {
        (**self).find_by_id(ctx, id)
    }

    fn find_by_ids(&self, ctx: &Context, ids: &[WorkspaceId]) -> DomainResult<Vec<Option<Workspace>>> {
        (**self).find_by_ids(ctx, ids)
    }

    fn find_by_user(&self, ctx: &Context, user: UserId) -> DomainResult<WorkspaceList> {
        (**self).find_by_user(ctx, user)
    }

    fn find_by_integration(&self, ctx: &Context, integration: IntegrationId) -> DomainResult<WorkspaceList> {
        (**self).find_by_integration(ctx, integration)
    }

    fn find_by_integrations(
        &self,
        ctx: &Context,
        integrations: &[IntegrationId],
    ) -> DomainResult<WorkspaceList> {
        (**self).find_by_integrations(ctx, integrations)
    }

    fn create(&self, ctx: &Context, workspace: &Workspace) -> DomainResult<()> {
        (**self).create(ctx, workspace)
    }

    fn save(&self, ctx: &Context, workspace: &Workspace) -> DomainResult<()> {
        (**self).save(ctx, workspace)
    }

    fn save_all(&self, ctx: &Context, workspaces: &[Workspace]) -> DomainResult<()> {
        (**self).save_all(ctx, workspaces)
    }

    fn remove(&self, ctx: &Context, id: WorkspaceId) -> DomainResult<()> {
        (**self).remove(ctx, id)
    }

    fn remove_all(&self, ctx: &Context, ids: &[WorkspaceId]) -> DomainResult<()> {
        (**self).remove_all(ctx, ids)
    }
}
