use tenantry_core::{DomainError, DomainResult, IdList, IntegrationId, PolicyId, UserId, WorkspaceId};

use crate::Role;

/// Per-request capability bundle.
///
/// Built by the transport layer from the authenticated principal and its
/// memberships. The four sets hold only the workspaces granted at exactly
/// that level; the `all_*` accessors widen them along the role order so
/// callers never need to duplicate ids across sets.
///
/// Request-local: build one per request, never share it across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operator {
    pub user: Option<UserId>,
    pub integration: Option<IntegrationId>,
    pub readable_workspaces: IdList<WorkspaceId>,
    pub writable_workspaces: IdList<WorkspaceId>,
    pub maintainable_workspaces: IdList<WorkspaceId>,
    pub owning_workspaces: IdList<WorkspaceId>,
    pub default_policy: Option<PolicyId>,
}

impl Operator {
    /// Operator acting for `user` with no workspace grants yet.
    pub fn for_user(user: UserId) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn for_integration(integration: IntegrationId) -> Self {
        Self {
            integration: Some(integration),
            ..Self::default()
        }
    }

    pub fn with_default_policy(mut self, policy: Option<PolicyId>) -> Self {
        self.default_policy = policy;
        self
    }

    /// The authenticated user, or `InvalidOperator`.
    pub fn require_user(&self) -> DomainResult<UserId> {
        self.user.ok_or(DomainError::InvalidOperator)
    }

    pub fn all_owning_workspaces(&self) -> IdList<WorkspaceId> {
        self.owning_workspaces.clone()
    }

    pub fn all_maintaining_workspaces(&self) -> IdList<WorkspaceId> {
        let mut ids = self.maintainable_workspaces.clone();
        ids.add_uniq(self.all_owning_workspaces());
        ids
    }

    pub fn all_writable_workspaces(&self) -> IdList<WorkspaceId> {
        let mut ids = self.writable_workspaces.clone();
        ids.add_uniq(self.all_maintaining_workspaces());
        ids
    }

    pub fn all_readable_workspaces(&self) -> IdList<WorkspaceId> {
        let mut ids = self.readable_workspaces.clone();
        ids.add_uniq(self.all_writable_workspaces());
        ids
    }

    pub fn is_owning_workspace(&self, ids: &[WorkspaceId]) -> bool {
        !self.all_owning_workspaces().intersect(ids).is_empty()
    }

    pub fn is_maintaining_workspace(&self, ids: &[WorkspaceId]) -> bool {
        !self.all_maintaining_workspaces().intersect(ids).is_empty()
    }

    pub fn is_writable_workspace(&self, ids: &[WorkspaceId]) -> bool {
        !self.all_writable_workspaces().intersect(ids).is_empty()
    }

    pub fn is_readable_workspace(&self, ids: &[WorkspaceId]) -> bool {
        !self.all_readable_workspaces().intersect(ids).is_empty()
    }

    /// Record a workspace the operator just created (and therefore owns).
    pub fn add_new_workspace(&mut self, id: WorkspaceId) {
        self.owning_workspaces.add([id]);
    }

    /// The exact set granted at `role`. Maintainer grants are not
    /// enumerable this way and yield `None`, as do invalid roles.
    pub fn workspaces(&self, role: &Role) -> Option<&IdList<WorkspaceId>> {
        if *role == Role::READER {
            Some(&self.readable_workspaces)
        } else if *role == Role::WRITER {
            Some(&self.writable_workspaces)
        } else if *role == Role::OWNER {
            Some(&self.owning_workspaces)
        } else {
            None
        }
    }
}
