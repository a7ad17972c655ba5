use tenantry_auth::Role;
use tenantry_core::{AggregateRoot, IntegrationId, UserId, WorkspaceId};

use super::Workspace;

/// An ordered batch of workspaces with membership filters.
///
/// Every filter keeps the order of its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceList(Vec<Workspace>);

impl WorkspaceList {
    pub fn new(workspaces: Vec<Workspace>) -> Self {
        Self(workspaces)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workspace> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Workspace] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Workspace> {
        self.0
    }

    pub fn ids(&self) -> Vec<WorkspaceId> {
        self.0.iter().map(|w| w.id()).collect()
    }

    /// One entry per requested id that is present, in request order.
    pub fn filter_by_id(&self, ids: &[WorkspaceId]) -> WorkspaceList {
        ids.iter()
            .filter_map(|id| self.0.iter().find(|w| w.id() == *id).cloned())
            .collect()
    }

    pub fn filter_by_user_role(&self, user: &UserId, role: &Role) -> WorkspaceList {
        self.filter(|w| w.members().user_role(user) == Some(role))
    }

    pub fn filter_by_user_role_including(&self, user: &UserId, role: &Role) -> WorkspaceList {
        self.filter(|w| w.members().user_role(user).is_some_and(|r| r.includes(role)))
    }

    pub fn filter_by_integration_role(&self, integration: &IntegrationId, role: &Role) -> WorkspaceList {
        self.filter(|w| w.members().integration_role(integration) == Some(role))
    }

    pub fn filter_by_integration_role_including(
        &self,
        integration: &IntegrationId,
        role: &Role,
    ) -> WorkspaceList {
        self.filter(|w| {
            w.members()
                .integration_role(integration)
                .is_some_and(|r| r.includes(role))
        })
    }

    pub fn personal(&self) -> WorkspaceList {
        self.filter(Workspace::is_personal)
    }

    pub fn non_personal(&self) -> WorkspaceList {
        self.filter(|w| !w.is_personal())
    }

    fn filter(&self, keep: impl Fn(&Workspace) -> bool) -> WorkspaceList {
        self.0.iter().filter(|w| keep(*w)).cloned().collect()
    }
}

impl From<Vec<Workspace>> for WorkspaceList {
    fn from(value: Vec<Workspace>) -> Self {
        Self(value)
    }
}

impl FromIterator<Workspace> for WorkspaceList {
    fn from_iter<I: IntoIterator<Item = Workspace>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for WorkspaceList {
    type Item = Workspace;
    type IntoIter = std::vec::IntoIter<Workspace>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Members, User};
    use tenantry_auth::NoopPasswordEncoder;

    fn user() -> User {
        User::builder()
            .new_id()
            .email("aaa@bbb.com")
            .encoder(std::sync::Arc::new(NoopPasswordEncoder))
            .must_build()
    }

    fn workspace_with(user: &User, role: Role) -> Workspace {
        let mut w = Workspace::builder().new_id().name("w").must_build();
        w.members_mut().join(user, role, user.id()).unwrap();
        w
    }

    #[test]
    fn filter_by_id_follows_request_order() {
        let a = Workspace::builder().new_id().must_build();
        let b = Workspace::builder().new_id().must_build();
        let list = WorkspaceList::new(vec![a.clone(), b.clone()]);
        let out = list.filter_by_id(&[b.id(), WorkspaceId::new(), a.id()]);
        assert_eq!(out.ids(), vec![b.id(), a.id()]);
        assert!(list.filter_by_id(&[]).is_empty());
    }

    #[test]
    fn role_filters() {
        let u = user();
        let owner = workspace_with(&u, Role::OWNER);
        let writer = workspace_with(&u, Role::WRITER);
        let reader = workspace_with(&u, Role::READER);
        let list = WorkspaceList::new(vec![owner.clone(), writer.clone(), reader.clone()]);

        assert_eq!(list.filter_by_user_role(&u.id(), &Role::WRITER).ids(), vec![writer.id()]);
        assert_eq!(
            list.filter_by_user_role_including(&u.id(), &Role::WRITER).ids(),
            vec![owner.id(), writer.id()]
        );
        assert!(list.filter_by_user_role(&UserId::new(), &Role::READER).is_empty());
    }

    #[test]
    fn integration_role_filters() {
        let i = IntegrationId::new();
        let mut a = Workspace::builder().new_id().must_build();
        a.members_mut().add_integration(i, Role::MAINTAINER, UserId::new()).unwrap();
        let b = Workspace::builder().new_id().must_build();
        let list = WorkspaceList::new(vec![a.clone(), b]);
        assert_eq!(list.filter_by_integration_role(&i, &Role::MAINTAINER).ids(), vec![a.id()]);
        assert_eq!(
            list.filter_by_integration_role_including(&i, &Role::READER).ids(),
            vec![a.id()]
        );
        assert!(list.filter_by_integration_role_including(&i, &Role::OWNER).is_empty());
    }

    #[test]
    fn personal_partition() {
        let u = user();
        let p = Workspace::builder()
            .new_id()
            .members(Members::personal(u.id()))
            .personal(true)
            .must_build();
        let t = workspace_with(&u, Role::OWNER);
        let list = WorkspaceList::new(vec![t.clone(), p.clone()]);
        assert_eq!(list.personal().ids(), vec![p.id()]);
        assert_eq!(list.non_personal().ids(), vec![t.id()]);
    }
}
