//! Workspace management on behalf of an operator.

use tenantry_account::{Workspace, WorkspaceList};
use tenantry_auth::{Operator, Role};
use tenantry_core::{AggregateRoot, Context, DomainError, DomainResult, IntegrationId, UserId, WorkspaceId};
use tenantry_infra::Container;

use crate::runner::Usecase;

/// Stamp the operator's default policy on workspaces without one. The
/// stamp is never persisted.
fn apply_default_policy(workspace: &mut Workspace, op: &Operator) {
    if workspace.policy().is_none() && op.default_policy.is_some() {
        workspace.set_policy(op.default_policy);
    }
}

fn ensure_shared(workspace: &Workspace) -> DomainResult<()> {
    if workspace.is_personal() {
        Err(DomainError::CannotModifyPersonalWorkspace)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceInteractor {
    repos: Container,
}

impl WorkspaceInteractor {
    pub fn new(repos: Container) -> Self {
        Self { repos }
    }

    /// Load, mutate and save one workspace inside a transaction gated on
    /// ownership of it.
    fn modify_owned<F>(&self, ctx: &Context, op: &Operator, id: WorkspaceId, f: F) -> DomainResult<Workspace>
    where
        F: FnOnce(&Context, &mut Workspace, UserId) -> DomainResult<()>,
    {
        let uid = op.require_user()?;
        let mut workspace = Usecase::new()
            .with_ownable_workspaces([id])
            .transaction()
            .run(ctx, Some(op), &self.repos, |ctx| {
                let mut workspace = self.repos.workspace.find_by_id(ctx, id)?;
                f(ctx, &mut workspace, uid)?;
                self.repos.workspace.save(ctx, &workspace)?;
                Ok(workspace)
            })?;
        apply_default_policy(&mut workspace, op);
        Ok(workspace)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Readable workspaces among `ids`, in request order. Missing and
    /// unreadable ones are omitted.
    pub fn fetch(&self, ctx: &Context, ids: &[WorkspaceId], op: &Operator) -> DomainResult<Vec<Workspace>> {
        let readable = op.all_readable_workspaces();
        let found = self.repos.workspace.find_by_ids(ctx, ids)?;
        Ok(found
            .into_iter()
            .flatten()
            .filter(|w| readable.has(&w.id()))
            .map(|mut w| {
                apply_default_policy(&mut w, op);
                w
            })
            .collect())
    }

    pub fn find_by_user(&self, ctx: &Context, user: UserId, op: &Operator) -> DomainResult<WorkspaceList> {
        let readable = op.all_readable_workspaces();
        let found = self.repos.workspace.find_by_user(ctx, user)?;
        Ok(found
            .into_iter()
            .filter(|w| readable.has(&w.id()))
            .map(|mut w| {
                apply_default_policy(&mut w, op);
                w
            })
            .collect())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Create a shared workspace owned by `first_user`. On success the new id
    /// is added to the operator's owned set.
    pub fn create(&self, ctx: &Context, name: &str, first_user: UserId, op: &mut Operator) -> DomainResult<Workspace> {
        let uid = op.require_user()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidName);
        }

        let mut workspace = Usecase::new().transaction().run(ctx, Some(&*op), &self.repos, |ctx| {
            let user = self.repos.user.find_by_id(ctx, first_user)?;
            let mut workspace = Workspace::builder().new_id().name(name).build()?;
            workspace.members_mut().join(&user, Role::OWNER, uid)?;
            self.repos.workspace.save(ctx, &workspace)?;
            Ok(workspace)
        })?;

        op.add_new_workspace(workspace.id());
        apply_default_policy(&mut workspace, op);
        tracing::info!(workspace_id = %workspace.id(), created_by = %uid, "workspace created");
        Ok(workspace)
    }

    /// Rename. Only an owner of the workspace may do this.
    pub fn update(&self, ctx: &Context, id: WorkspaceId, name: &str, op: &Operator) -> DomainResult<Workspace> {
        let uid = op.require_user()?;
        let mut workspace = Usecase::new().transaction().run(ctx, Some(op), &self.repos, |ctx| {
            let mut workspace = self.repos.workspace.find_by_id(ctx, id)?;
            ensure_shared(&workspace)?;
            if !workspace.members().is_owner(&uid) {
                return Err(DomainError::OperationDenied);
            }
            workspace.rename(name);
            self.repos.workspace.save(ctx, &workspace)?;
            Ok(workspace)
        })?;
        apply_default_policy(&mut workspace, op);
        tracing::info!(workspace_id = %id, "workspace renamed");
        Ok(workspace)
    }

    pub fn remove(&self, ctx: &Context, id: WorkspaceId, op: &Operator) -> DomainResult<()> {
        op.require_user()?;
        Usecase::new()
            .with_ownable_workspaces([id])
            .transaction()
            .run(ctx, Some(op), &self.repos, |ctx| {
                let workspace = self.repos.workspace.find_by_id(ctx, id)?;
                ensure_shared(&workspace)?;
                self.repos.workspace.remove(ctx, id)
            })?;
        tracing::info!(workspace_id = %id, "workspace removed");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // User members
    // ─────────────────────────────────────────────────────────────────────

    /// Join every listed user that exists; unknown ids are skipped.
    pub fn add_user_member(
        &self,
        ctx: &Context,
        id: WorkspaceId,
        users: &[(UserId, Role)],
        op: &Operator,
    ) -> DomainResult<Workspace> {
        let ids: Vec<UserId> = users.iter().map(|(u, _)| *u).collect();
        let workspace = self.modify_owned(ctx, op, id, |ctx, workspace, uid| {
            ensure_shared(workspace)?;
            let found = self.repos.user.find_by_ids(ctx, &ids)?;
            for ((_, role), user) in users.iter().zip(found) {
                if let Some(user) = user {
                    workspace.members_mut().join(&user, role.clone(), uid)?;
                }
            }
            Ok(())
        })?;
        tracing::info!(workspace_id = %id, count = users.len(), "members added");
        Ok(workspace)
    }

    pub fn update_user_member(
        &self,
        ctx: &Context,
        id: WorkspaceId,
        user: UserId,
        role: Role,
        op: &Operator,
    ) -> DomainResult<Workspace> {
        self.modify_owned(ctx, op, id, |_, workspace, uid| {
            ensure_shared(workspace)?;
            if user == uid {
                return Err(DomainError::CannotChangeOwnerRole);
            }
            workspace.members_mut().update_user_role(&user, role)
        })
    }

    /// Owners may remove anyone; other members may only remove themselves.
    /// The sole owner cannot leave.
    pub fn remove_user_member(&self, ctx: &Context, id: WorkspaceId, user: UserId, op: &Operator) -> DomainResult<Workspace> {
        let uid = op.require_user()?;
        let mut workspace = Usecase::new().transaction().run(ctx, Some(op), &self.repos, |ctx| {
            let mut workspace = self.repos.workspace.find_by_id(ctx, id)?;
            ensure_shared(&workspace)?;
            let is_self = user == uid;
            if !is_self && !workspace.members().is_owner(&uid) {
                return Err(DomainError::OperationDenied);
            }
            if is_self && workspace.members().is_only_owner(&uid) {
                return Err(DomainError::OwnerCannotLeaveTheWorkspace);
            }
            workspace.members_mut().leave(&user)?;
            self.repos.workspace.save(ctx, &workspace)?;
            Ok(workspace)
        })?;
        apply_default_policy(&mut workspace, op);
        tracing::info!(workspace_id = %id, user_id = %user, "member removed");
        Ok(workspace)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Integration members
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_integration_member(
        &self,
        ctx: &Context,
        id: WorkspaceId,
        integration: IntegrationId,
        role: Role,
        op: &Operator,
    ) -> DomainResult<Workspace> {
        self.modify_owned(ctx, op, id, |_, workspace, uid| {
            workspace.members_mut().add_integration(integration, role, uid)
        })
    }

    pub fn update_integration_member(
        &self,
        ctx: &Context,
        id: WorkspaceId,
        integration: IntegrationId,
        role: Role,
        op: &Operator,
    ) -> DomainResult<Workspace> {
        self.modify_owned(ctx, op, id, |_, workspace, _| {
            workspace.members_mut().update_integration_role(&integration, role)
        })
    }

    pub fn remove_integration_member(
        &self,
        ctx: &Context,
        id: WorkspaceId,
        integration: IntegrationId,
        op: &Operator,
    ) -> DomainResult<Workspace> {
        self.modify_owned(ctx, op, id, |_, workspace, _| {
            workspace.members_mut().delete_integration(&integration)
        })
    }

    /// All-or-nothing: any id that is not a member fails the whole call.
    pub fn remove_multiple_integration_members(
        &self,
        ctx: &Context,
        id: WorkspaceId,
        integrations: &[IntegrationId],
        op: &Operator,
    ) -> DomainResult<Workspace> {
        self.modify_owned(ctx, op, id, |_, workspace, _| {
            workspace.members_mut().delete_integrations(integrations)
        })
    }
}
