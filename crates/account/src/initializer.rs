//! Creation of a user together with their personal workspace.

use tenantry_auth::{Auth, Auths};
use tenantry_core::{DomainResult, UserId, WorkspaceId};

use crate::{Lang, Members, Metadata, Registry, Theme, User, Workspace};

/// Inputs of [`init`]. Only `email` and `name` are required.
#[derive(Debug, Clone, Default)]
pub struct InitParams {
    pub email: String,
    pub name: String,
    pub sub: Option<Auth>,
    pub password: Option<String>,
    pub lang: Option<Lang>,
    pub theme: Option<Theme>,
    pub user_id: Option<UserId>,
    pub workspace_id: Option<WorkspaceId>,
}

/// Build a user and their personal workspace, named after the user and
/// owned by them alone. Nothing is persisted.
pub fn init(params: InitParams, registry: &Registry) -> DomainResult<(User, Workspace)> {
    let user_id = params.user_id.unwrap_or_else(UserId::new);
    let workspace_id = params.workspace_id.unwrap_or_else(WorkspaceId::new);
    let auth = params.sub.unwrap_or_else(|| Auth::reearth(user_id));

    let metadata = Metadata::default()
        .with_lang(params.lang)
        .with_theme(params.theme.unwrap_or_default());

    let mut builder = User::builder()
        .id(user_id)
        .name(params.name.clone())
        .email(params.email)
        .metadata(metadata)
        .workspace(workspace_id)
        .auths([auth].into_iter().collect::<Auths>())
        .encoder(registry.encoder.clone());
    if let Some(password) = params.password {
        builder = builder.password(password);
    }
    let user = builder.build()?;

    let workspace = Workspace::builder()
        .id(workspace_id)
        .name(params.name)
        .members(Members::personal(user_id))
        .personal(true)
        .build()?;

    Ok((user, workspace))
}
