//! Transitional permission records.
//!
//! These rows back an in-progress permission system. They are stored and
//! fetched as-is and take no part in the user or workspace invariants.

use serde::{Deserialize, Serialize};

use tenantry_core::{AggregateRoot, DomainError, DomainResult, IdList, PermittableId, RoleId, UserId};

/// A named role definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    id: RoleId,
    name: String,
}

impl RoleDefinition {
    pub fn new(id: RoleId, name: impl Into<String>) -> DomainResult<Self> {
        if id.is_nil() {
            return Err(DomainError::InvalidId);
        }
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidName);
        }
        Ok(Self { id, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidName);
        }
        self.name = name;
        Ok(())
    }
}

impl AggregateRoot for RoleDefinition {
    type Id = RoleId;

    fn id(&self) -> RoleId {
        self.id
    }
}

/// Links a user to the role definitions granted to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permittable {
    id: PermittableId,
    user_id: UserId,
    role_ids: IdList<RoleId>,
}

impl Permittable {
    pub fn new(id: PermittableId, user_id: UserId, role_ids: IdList<RoleId>) -> DomainResult<Self> {
        if id.is_nil() || user_id.is_nil() {
            return Err(DomainError::InvalidId);
        }
        Ok(Self {
            id,
            user_id,
            role_ids,
        })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role_ids(&self) -> &IdList<RoleId> {
        &self.role_ids
    }

    pub fn has_role(&self, role: &RoleId) -> bool {
        self.role_ids.has(role)
    }

    pub fn grant(&mut self, role: RoleId) {
        self.role_ids.add_uniq([role]);
    }

    pub fn revoke(&mut self, role: &RoleId) {
        self.role_ids.delete(&[*role]);
    }
}

impl AggregateRoot for Permittable {
    type Id = PermittableId;

    fn id(&self) -> PermittableId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_definition_requires_id_and_name() {
        assert_eq!(
            RoleDefinition::new(RoleId::nil(), "editor"),
            Err(DomainError::InvalidId)
        );
        assert_eq!(
            RoleDefinition::new(RoleId::new(), ""),
            Err(DomainError::InvalidName)
        );
        let mut role = RoleDefinition::new(RoleId::new(), "editor").unwrap();
        role.rename("viewer").unwrap();
        assert_eq!(role.name(), "viewer");
    }

    #[test]
    fn permittable_grants_are_unique() {
        let r = RoleId::new();
        let mut p = Permittable::new(PermittableId::new(), UserId::new(), IdList::new()).unwrap();
        p.grant(r);
        p.grant(r);
        assert_eq!(p.role_ids().len(), 1);
        p.revoke(&r);
        assert!(!p.has_role(&r));
    }

    #[test]
    fn permittable_rejects_nil_user() {
        assert_eq!(
            Permittable::new(PermittableId::new(), UserId::nil(), IdList::new()),
            Err(DomainError::InvalidId)
        );
    }
}
