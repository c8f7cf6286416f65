//! Session handling as two pure steps.
//!
//! 1. [`record_from_grant`] turns whatever the authorization server returned into
//!    the canonical [`TokenRecord`] (milliseconds, refresh token carried over).
//! 2. [`project`] turns a record plus the signed-in user into the [`Session`]
//!    the front-end sees.
//!
//! The current session of the terminal front-end is kept in `session.json`
//! next to the token store. It holds the user only, never tokens.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::StoreError,
    types::{TokenRecord, TokenResponse, UserProfile},
    utils,
};

/// Signed-in user as shown by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<&UserProfile> for SessionUser {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile
                .display_name
                .clone()
                .unwrap_or_else(|| profile.id.clone()),
            email: profile.email.clone(),
            image: profile.images.first().map(|i| i.url.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    pub access_token: String,
    pub refresh_token: String,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

/// Canonical record for a token grant received at `now_ms`.
///
/// `previous_refresh_token` is kept when the grant does not rotate it. Returns
/// `None` when neither is available, since such a record could never be renewed.
pub fn record_from_grant(
    grant: &TokenResponse,
    previous_refresh_token: Option<&str>,
    now_ms: i64,
) -> Option<TokenRecord> {
    let refresh_token = grant
        .refresh_token
        .as_deref()
        .or(previous_refresh_token)?
        .to_string();

    Some(TokenRecord {
        access_token: grant.access_token.clone(),
        refresh_token,
        expires_at: utils::expires_at_millis(now_ms, grant.expires_in),
        last_updated: now_ms,
    })
}

pub fn project(user: SessionUser, record: &TokenRecord) -> Session {
    Session {
        user,
        access_token: record.access_token.clone(),
        refresh_token: record.refresh_token.clone(),
        expires_at: record.expires_at,
    }
}

pub fn session_path(root: &Path) -> PathBuf {
    root.join("session.json")
}

pub async fn save_current(root: &Path, user: &SessionUser) -> Result<(), StoreError> {
    async_fs::create_dir_all(root).await?;
    let json = serde_json::to_string_pretty(user)?;
    async_fs::write(session_path(root), json).await?;
    Ok(())
}

pub async fn load_current(root: &Path) -> Result<Option<SessionUser>, StoreError> {
    match async_fs::read_to_string(session_path(root)).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io(e)),
    }
}

/// Forgets the current session. Returns whether one existed.
pub async fn clear_current(root: &Path) -> Result<bool, StoreError> {
    match async_fs::remove_file(session_path(root)).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StoreError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "access".to_string(),
            token_type: Some("Bearer".to_string()),
            scope: None,
            expires_in: 3600,
            refresh_token: refresh.map(str::to_string),
        }
    }

    fn user() -> SessionUser {
        SessionUser {
            id: "alice".to_string(),
            name: "Alice".to_string(),
            email: None,
            image: None,
        }
    }

    #[test]
    fn test_record_converts_seconds_to_millis() {
        let record = record_from_grant(&grant(Some("r1")), None, 1_000).unwrap();
        assert_eq!(record.expires_at, 1_000 + 3_600_000);
        assert_eq!(record.last_updated, 1_000);
        assert_eq!(record.refresh_token, "r1");
    }

    #[test]
    fn test_record_carries_previous_refresh_token() {
        let record = record_from_grant(&grant(None), Some("old"), 0).unwrap();
        assert_eq!(record.refresh_token, "old");

        let rotated = record_from_grant(&grant(Some("new")), Some("old"), 0).unwrap();
        assert_eq!(rotated.refresh_token, "new");
    }

    #[test]
    fn test_record_without_any_refresh_token() {
        assert!(record_from_grant(&grant(None), None, 0).is_none());
    }

    #[test]
    fn test_project_copies_record() {
        let record = record_from_grant(&grant(Some("r1")), None, 0).unwrap();
        let session = project(user(), &record);

        assert_eq!(session.user.id, "alice");
        assert_eq!(session.access_token, "access");
        assert_eq!(session.refresh_token, "r1");
        assert_eq!(session.expires_at, 3_600_000);
    }

    #[test]
    fn test_session_user_falls_back_to_id() {
        let profile: UserProfile = serde_json::from_str(r#"{"id": "bob"}"#).unwrap();
        let user = SessionUser::from(&profile);
        assert_eq!(user.name, "bob");
        assert_eq!(user.image, None);
    }

    #[tokio::test]
    async fn test_current_session_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(load_current(dir.path()).await.unwrap(), None);
        save_current(dir.path(), &user()).await.unwrap();
        assert_eq!(load_current(dir.path()).await.unwrap(), Some(user()));

        assert!(clear_current(dir.path()).await.unwrap());
        assert!(!clear_current(dir.path()).await.unwrap());
    }
}
