use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tenantry_auth::Role;
use tenantry_core::{AggregateRoot, DomainError, DomainResult, IntegrationId, UserId};

use crate::User;

/// One membership entry, for a user or an integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub role: Role,
    pub disabled: bool,
    pub invited_by: UserId,
    /// Copied from the invited user at join time. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Member {
    pub fn new(role: Role, invited_by: UserId) -> Self {
        Self {
            role,
            disabled: false,
            invited_by,
            host: None,
        }
    }
}

fn role_or_reader(role: Role) -> Role {
    if role.is_empty() { Role::READER } else { role }
}

/// Members of a workspace.
///
/// A `fixed` collection belongs to a personal workspace: user members cannot
/// join, leave or change role. Integration members are unaffected by the lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Members {
    users: BTreeMap<UserId, Member>,
    integrations: BTreeMap<IntegrationId, Member>,
    fixed: bool,
}

impl Members {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        users: BTreeMap<UserId, Member>,
        integrations: BTreeMap<IntegrationId, Member>,
        fixed: bool,
    ) -> Self {
        Self {
            users,
            integrations,
            fixed,
        }
    }

    /// Locked collection whose only member is `owner`.
    pub fn personal(owner: UserId) -> Self {
        let mut users = BTreeMap::new();
        users.insert(owner, Member::new(Role::OWNER, owner));
        Self::from_parts(users, BTreeMap::new(), true)
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub(crate) fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn users(&self) -> &BTreeMap<UserId, Member> {
        &self.users
    }

    pub fn integrations(&self) -> &BTreeMap<IntegrationId, Member> {
        &self.integrations
    }

    pub fn user(&self, user: &UserId) -> Option<&Member> {
        self.users.get(user)
    }

    pub fn integration(&self, integration: &IntegrationId) -> Option<&Member> {
        self.integrations.get(integration)
    }

    pub fn has_user(&self, user: &UserId) -> bool {
        self.users.contains_key(user)
    }

    pub fn has_integration(&self, integration: &IntegrationId) -> bool {
        self.integrations.contains_key(integration)
    }

    /// Number of user members.
    pub fn count(&self) -> usize {
        self.users.len()
    }

    pub fn user_role(&self, user: &UserId) -> Option<&Role> {
        self.users.get(user).map(|m| &m.role)
    }

    pub fn integration_role(&self, integration: &IntegrationId) -> Option<&Role> {
        self.integrations.get(integration).map(|m| &m.role)
    }

    /// User ids, descending.
    pub fn user_ids(&self) -> Vec<UserId> {
        self.users.keys().rev().copied().collect()
    }

    /// Integration ids, descending.
    pub fn integration_ids(&self) -> Vec<IntegrationId> {
        self.integrations.keys().rev().copied().collect()
    }

    /// Users holding exactly `role`, descending.
    pub fn users_by_role(&self, role: &Role) -> Vec<UserId> {
        self.users
            .iter()
            .rev()
            .filter(|(_, m)| m.role == *role)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn integrations_by_role(&self, role: &Role) -> Vec<IntegrationId> {
        self.integrations
            .iter()
            .rev()
            .filter(|(_, m)| m.role == *role)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_owner(&self, user: &UserId) -> bool {
        self.user_role(user) == Some(&Role::OWNER)
    }

    /// The user is an owner and nobody else is.
    pub fn is_only_owner(&self, user: &UserId) -> bool {
        self.is_owner(user) && self.users_by_role(&Role::OWNER).len() == 1
    }

    pub fn is_owner_or_maintainer(&self, user: &UserId) -> bool {
        matches!(self.user_role(user), Some(r) if *r == Role::OWNER || *r == Role::MAINTAINER)
    }

    // ─────────────────────────────────────────────────────────────────────
    // User members
    // ─────────────────────────────────────────────────────────────────────

    /// An empty role joins as reader.
    pub fn join(&mut self, user: &User, role: Role, invited_by: UserId) -> DomainResult<()> {
        if self.fixed {
            return Err(DomainError::CannotModifyPersonalWorkspace);
        }
        let id = user.id();
        if self.users.contains_key(&id) {
            return Err(DomainError::UserAlreadyJoined);
        }
        self.users.insert(
            id,
            Member {
                role: role_or_reader(role),
                disabled: false,
                invited_by,
                host: user.host().map(str::to_string),
            },
        );
        Ok(())
    }

    pub fn leave(&mut self, user: &UserId) -> DomainResult<()> {
        if self.fixed {
            return Err(DomainError::CannotModifyPersonalWorkspace);
        }
        match self.users.remove(user) {
            Some(_) => Ok(()),
            None => Err(DomainError::TargetUserNotInTheWorkspace),
        }
    }

    /// An invalid role is ignored without error so newer role names can
    /// round-trip through older code.
    pub fn update_user_role(&mut self, user: &UserId, role: Role) -> DomainResult<()> {
        if self.fixed {
            return Err(DomainError::CannotModifyPersonalWorkspace);
        }
        if !role.is_valid() {
            return Ok(());
        }
        match self.users.get_mut(user) {
            Some(m) => {
                m.role = role;
                Ok(())
            }
            None => Err(DomainError::TargetUserNotInTheWorkspace),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Integration members
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_integration(
        &mut self,
        integration: IntegrationId,
        role: Role,
        invited_by: UserId,
    ) -> DomainResult<()> {
        if self.integrations.contains_key(&integration) {
            return Err(DomainError::UserAlreadyJoined);
        }
        self.integrations
            .insert(integration, Member::new(role_or_reader(role), invited_by));
        Ok(())
    }

    pub fn delete_integration(&mut self, integration: &IntegrationId) -> DomainResult<()> {
        match self.integrations.remove(integration) {
            Some(_) => Ok(()),
            None => Err(DomainError::TargetUserNotInTheWorkspace),
        }
    }

    /// All-or-nothing: fails without change if any id is not a member.
    pub fn delete_integrations(&mut self, integrations: &[IntegrationId]) -> DomainResult<()> {
        if integrations.iter().any(|i| !self.integrations.contains_key(i)) {
            return Err(DomainError::TargetUserNotInTheWorkspace);
        }
        for i in integrations {
            self.integrations.remove(i);
        }
        Ok(())
    }

    pub fn update_integration_role(
        &mut self,
        integration: &IntegrationId,
        role: Role,
    ) -> DomainResult<()> {
        if !role.is_valid() {
            return Ok(());
        }
        match self.integrations.get_mut(integration) {
            Some(m) => {
                m.role = role;
                Ok(())
            }
            None => Err(DomainError::TargetUserNotInTheWorkspace),
        }
    }
}
