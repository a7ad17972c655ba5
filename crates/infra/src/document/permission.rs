use serde::{Deserialize, Serialize};

use tenantry_auth::{Permittable, RoleDefinition};
use tenantry_core::{AggregateRoot, DomainResult, IdList, PermittableId, RoleId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDocument {
    pub id: String,
    pub name: String,
}

impl RoleDocument {
    pub fn from_role(role: &RoleDefinition) -> Self {
        Self {
            id: role.id().to_string(),
            name: role.name().to_string(),
        }
    }

    pub fn into_role(self) -> DomainResult<RoleDefinition> {
        RoleDefinition::new(RoleId::parse(&self.id)?, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermittableDocument {
    pub id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "roleIDs", default)]
    pub role_ids: Vec<String>,
}

impl PermittableDocument {
    pub fn from_permittable(p: &Permittable) -> Self {
        Self {
            id: p.id().to_string(),
            user_id: p.user_id().to_string(),
            role_ids: p.role_ids().strings(),
        }
    }

    pub fn into_permittable(self) -> DomainResult<Permittable> {
        let role_ids = self
            .role_ids
            .iter()
            .map(|r| RoleId::parse(r))
            .collect::<DomainResult<IdList<RoleId>>>()?;
        Permittable::new(
            PermittableId::parse(&self.id)?,
            UserId::parse(&self.user_id)?,
            role_ids,
        )
    }
}
