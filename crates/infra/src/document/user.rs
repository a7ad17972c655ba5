use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tenantry_account::{Lang, Metadata, PasswordReset, Theme, User, Verification};
use tenantry_auth::Auth;
use tenantry_core::{AggregateRoot, DomainResult, UserId, WorkspaceId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub alias: String,
    pub email: String,
    /// Full `provider|sub` strings.
    #[serde(default)]
    pub subs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Legacy name of `workspace`; read only.
    #[serde(default, skip_serializing)]
    pub team: Option<String>,
    #[serde(default)]
    pub metadata: UserMetadataDocument,
    #[serde(default)]
    pub password: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_reset: Option<PasswordResetDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadataDocument {
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetDocument {
    pub token: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationDocument {
    pub code: String,
    pub expiration: DateTime<Utc>,
    pub verified: bool,
}

impl UserDocument {
    /// The host decoration is not part of the document.
    pub fn from_user(user: &User) -> Self {
        let m = user.metadata();
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            alias: user.alias().to_string(),
            email: user.email().to_string(),
            subs: user.auths().iter().map(|a| a.sub().to_string()).collect(),
            workspace: (!user.workspace().is_nil()).then(|| user.workspace().to_string()),
            team: None,
            metadata: UserMetadataDocument {
                photo_url: m.photo_url.clone(),
                description: m.description.clone(),
                website: m.website.clone(),
                lang: m.lang.as_ref().map(|l| l.to_string()).unwrap_or_default(),
                theme: m.theme.to_string(),
            },
            password: user.encoded_password().to_vec(),
            password_reset: user.password_reset().map(|pr| PasswordResetDocument {
                token: pr.token().to_string(),
                created_at: pr.created_at(),
            }),
            verification: user.verification().map(|v| VerificationDocument {
                code: v.code().to_string(),
                expiration: v.expiration(),
                verified: v.is_verified(),
            }),
        }
    }

    /// Unparsable language tags and unknown themes fall back to unset and
    /// default rather than failing the read.
    pub fn into_user(self) -> DomainResult<User> {
        let id = UserId::parse(&self.id)?;
        let workspace = match self.workspace.or(self.team).filter(|s| !s.is_empty()) {
            Some(w) => WorkspaceId::parse(&w)?,
            None => WorkspaceId::nil(),
        };
        let metadata = Metadata {
            photo_url: self.metadata.photo_url,
            description: self.metadata.description,
            website: self.metadata.website,
            lang: Lang::parse(&self.metadata.lang).ok(),
            theme: Theme::parse_lossy(&self.metadata.theme),
        };

        User::builder()
            .id(id)
            .name(self.name)
            .alias(self.alias)
            .email(self.email)
            .metadata(metadata)
            .workspace(workspace)
            .auths(self.subs.iter().map(|s| Auth::from_sub(s)).collect())
            .encoded_password(self.password)
            .verification(
                self.verification
                    .map(|v| Verification::from_parts(v.code, v.expiration, v.verified)),
            )
            .password_reset(
                self.password_reset
                    .map(|pr| PasswordReset::issue(pr.token, pr.created_at)),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tenantry_auth::NoopPasswordEncoder;
    use tenantry_core::DomainError;

    fn sample() -> User {
        let mut u = User::builder()
            .new_id()
            .name("NAME")
            .email("aaa@bbb.com")
            .workspace(WorkspaceId::new())
            .password("PAss00!!")
            .encoder(Arc::new(NoopPasswordEncoder))
            .must_build();
        u.add_auth(Auth::reearth(u.id()));
        u.update_theme(Theme::Dark);
        u.update_lang(Some(Lang::parse("ja").unwrap()));
        u.set_verification(Some(Verification::from_parts("c", Utc::now(), true)));
        u
    }

    #[test]
    fn json_field_names() {
        let u = sample();
        let json = serde_json::to_value(UserDocument::from_user(&u)).unwrap();
        assert_eq!(json["subs"][0], format!("reearth|{}", u.id()));
        assert_eq!(json["workspace"], u.workspace().to_string());
        assert_eq!(json["metadata"]["theme"], "dark");
        assert!(json["metadata"].get("photoURL").is_some());
        assert!(json.get("team").is_none());
        assert!(json.get("passwordReset").is_none());
        assert_eq!(json["verification"]["verified"], true);
    }

    #[test]
    fn restores_the_aggregate() {
        let u = sample();
        let back = UserDocument::from_user(&u).into_user().unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn legacy_team_field() {
        let w = WorkspaceId::new();
        let t = WorkspaceId::new();
        let uid = UserId::new();
        let doc: UserDocument = serde_json::from_value(serde_json::json!({
            "id": uid.to_string(),
            "name": "n",
            "email": "a@b.com",
            "team": t.to_string(),
        }))
        .unwrap();
        assert_eq!(doc.clone().into_user().unwrap().workspace(), t);

        let both = UserDocument {
            workspace: Some(w.to_string()),
            ..doc
        };
        assert_eq!(both.into_user().unwrap().workspace(), w);
    }

    #[test]
    fn lenient_metadata_strict_ids() {
        let mut doc = UserDocument::from_user(&sample());
        doc.metadata.theme = "sepia".into();
        doc.metadata.lang = "??".into();
        let u = doc.clone().into_user().unwrap();
        assert_eq!(u.metadata().theme, Theme::Default);
        assert!(u.metadata().lang.is_none());

        doc.id = "not-an-id".into();
        assert_eq!(doc.into_user(), Err(DomainError::InvalidId));
    }
}
