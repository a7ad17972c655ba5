//! Workspace aggregate.

mod builder;
mod list;
mod member;

pub use builder::WorkspaceBuilder;
pub use list::WorkspaceList;
pub use member::{Member, Members};

use tenantry_core::{AggregateRoot, PolicyId, WorkspaceId};

/// Aggregate root: a tenant.
///
/// Membership changes go through [`Workspace::members_mut`]; the collection
/// itself is never replaced after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    members: Members,
    policy: Option<PolicyId>,
}

impl Workspace {
    pub fn builder() -> WorkspaceBuilder {
        WorkspaceBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &Members {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut Members {
        &mut self.members
    }

    pub fn policy(&self) -> Option<PolicyId> {
        self.policy
    }

    pub fn is_personal(&self) -> bool {
        self.members.is_fixed()
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_policy(&mut self, policy: Option<PolicyId>) {
        self.policy = policy;
    }
}

impl AggregateRoot for Workspace {
    type Id = WorkspaceId;

    fn id(&self) -> WorkspaceId {
        self.id
    }
}
