use tenantry_core::{DomainError, DomainResult, PolicyId, WorkspaceId};

use super::{Members, Workspace};

#[derive(Debug, Default)]
pub struct WorkspaceBuilder {
    id: Option<WorkspaceId>,
    name: String,
    members: Option<Members>,
    personal: bool,
    policy: Option<PolicyId>,
}

impl WorkspaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: WorkspaceId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn new_id(self) -> Self {
        self.id(WorkspaceId::new())
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn members(mut self, members: Members) -> Self {
        self.members = Some(members);
        self
    }

    /// Lock the member collection as a personal workspace.
    pub fn personal(mut self, personal: bool) -> Self {
        self.personal = personal;
        self
    }

    pub fn policy(mut self, policy: Option<PolicyId>) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> DomainResult<Workspace> {
        let id = match self.id {
            Some(id) if !id.is_nil() => id,
            _ => return Err(DomainError::InvalidId),
        };
        let mut members = self.members.unwrap_or_default();
        if self.personal {
            members.set_fixed(true);
        }
        Ok(Workspace {
            id,
            name: self.name,
            members,
            policy: self.policy,
        })
    }

    /// Panics on error. Tests only.
    pub fn must_build(self) -> Workspace {
        match self.build() {
            Ok(w) => w,
            Err(e) => panic!("workspace: {e}"),
        }
    }
}
