use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tenantry_account::{Member, Members, Workspace};
use tenantry_auth::Role;
use tenantry_core::{AggregateRoot, DomainResult, IntegrationId, PolicyId, UserId, WorkspaceId};

use super::member_key;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: BTreeMap<String, MemberDocument>,
    #[serde(default)]
    pub integrations: BTreeMap<String, MemberDocument>,
    #[serde(default)]
    pub personal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDocument {
    pub role: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub invited_by: String,
}

impl MemberDocument {
    fn from_member(m: &Member) -> Self {
        Self {
            role: m.role.to_string(),
            disabled: m.disabled,
            invited_by: m.invited_by.to_string(),
        }
    }

    /// Unknown role literals are kept as-is.
    fn into_member(self) -> DomainResult<Member> {
        Ok(Member {
            role: Role::new(self.role),
            disabled: self.disabled,
            invited_by: UserId::parse(&self.invited_by)?,
            host: None,
        })
    }
}

impl WorkspaceDocument {
    pub fn from_workspace(w: &Workspace) -> Self {
        let members = w.members();
        Self {
            id: w.id().to_string(),
            name: w.name().to_string(),
            members: members
                .users()
                .iter()
                .map(|(id, m)| (member_key(id), MemberDocument::from_member(m)))
                .collect(),
            integrations: members
                .integrations()
                .iter()
                .map(|(id, m)| (member_key(id), MemberDocument::from_member(m)))
                .collect(),
            personal: w.is_personal(),
            policy: w.policy().map(|p| p.to_string()),
        }
    }

    pub fn into_workspace(self) -> DomainResult<Workspace> {
        let users = self
            .members
            .into_iter()
            .map(|(k, m)| Ok((UserId::parse(&member_key(&k))?, m.into_member()?)))
            .collect::<DomainResult<BTreeMap<_, _>>>()?;
        let integrations = self
            .integrations
            .into_iter()
            .map(|(k, m)| Ok((IntegrationId::parse(&member_key(&k))?, m.into_member()?)))
            .collect::<DomainResult<BTreeMap<_, _>>>()?;
        let policy = match self.policy.filter(|p| !p.is_empty()) {
            Some(p) => Some(PolicyId::parse(&p)?),
            None => None,
        };

        Workspace::builder()
            .id(WorkspaceId::parse(&self.id)?)
            .name(self.name)
            .members(Members::from_parts(users, integrations, self.personal))
            .personal(self.personal)
            .policy(policy)
            .build()
    }
}
