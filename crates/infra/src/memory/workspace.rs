use tenantry_account::{Workspace, WorkspaceList};
use tenantry_core::{AggregateRoot, Context, DomainError, DomainResult, IntegrationId, UserId, WorkspaceId};

use crate::repo::WorkspaceRepository;

use super::table::Table;

/// In-memory workspace repository for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryWorkspaceRepository {
    table: Table<Workspace>,
}

impl InMemoryWorkspaceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspaces(workspaces: impl IntoIterator<Item = Workspace>) -> Self {
        let repo = Self::new();
        for w in workspaces {
            repo.table.seed(w);
        }
        repo
    }
}

impl WorkspaceRepository for InMemoryWorkspaceRepository {
    fn find_by_id(&self, ctx: &Context, id: WorkspaceId) -> DomainResult<Workspace> {
        self.table.get(ctx, id)
    }

    fn find_by_ids(&self, ctx: &Context, ids: &[WorkspaceId]) -> DomainResult<Vec<Option<Workspace>>> {
        self.table.get_many(ctx, ids)
    }

    fn find_by_user(&self, ctx: &Context, user: UserId) -> DomainResult<WorkspaceList> {
        self.table
            .filter(ctx, |w| w.members().has_user(&user))
            .map(WorkspaceList::from)
    }

    fn find_by_integration(&self, ctx: &Context, integration: IntegrationId) -> DomainResult<WorkspaceList> {
        self.table
            .filter(ctx, |w| w.members().has_integration(&integration))
            .map(WorkspaceList::from)
    }

    fn find_by_integrations(
        &self,
        ctx: &Context,
        integrations: &[IntegrationId],
    ) -> DomainResult<WorkspaceList> {
        self.table
            .filter(ctx, |w| integrations.iter().any(|i| w.members().has_integration(i)))
            .map(WorkspaceList::from)
    }

    fn create(&self, ctx: &Context, workspace: &Workspace) -> DomainResult<()> {
        self.table.write(ctx, |rows| {
            if rows.contains_key(&workspace.id()) {
                return Err(DomainError::storage(format!(
                    "workspace {} already exists",
                    workspace.id()
                )));
            }
            rows.insert(workspace.id(), workspace.clone());
            Ok(())
        })
    }

    fn save(&self, ctx: &Context, workspace: &Workspace) -> DomainResult<()> {
        self.table.upsert(ctx, workspace)
    }

    fn save_all(&self, ctx: &Context, workspaces: &[Workspace]) -> DomainResult<()> {
        self.table.upsert_all(ctx, workspaces)
    }

    fn remove(&self, ctx: &Context, id: WorkspaceId) -> DomainResult<()> {
        self.table.delete_all(ctx, &[id])
    }

    fn remove_all(&self, ctx: &Context, ids: &[WorkspaceId]) -> DomainResult<()> {
        self.table.delete_all(ctx, ids)
    }
}
