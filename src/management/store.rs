use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{error::StoreError, types::TokenRecord};

/// Persistence for token records, keyed by user id.
///
/// Writes are last-writer-wins per user id. Only [`super::TokenManager`] writes.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<TokenRecord>, StoreError>;

    async fn set(&self, user_id: &str, record: &TokenRecord) -> Result<(), StoreError>;
}

/// Keeps one JSON file per user under `<root>/users/<user_id>.json`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    root: PathBuf,
}

impl FileTokenStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, user_id: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.push("users");
        path.push(format!("{}.json", file_stem(user_id)));
        path
    }
}

/// Escapes a user id into a file stem.
///
/// ASCII alphanumerics, `-` and `_` pass through; every other byte becomes
/// `%XX`. Distinct ids map to distinct stems and none can leave `users/`.
fn file_stem(user_id: &str) -> String {
    let mut stem = String::with_capacity(user_id.len());
    for byte in user_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, user_id: &str) -> Result<Option<TokenRecord>, StoreError> {
        let path = self.record_path(user_id);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let record: TokenRecord = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    async fn set(&self, user_id: &str, record: &TokenRecord) -> Result<(), StoreError> {
        let path = self.record_path(user_id);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        // write-then-rename so a reader never sees a half-written record
        let json = serde_json::to_string_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// In-process store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    records: Arc<RwLock<HashMap<String, TokenRecord>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, user_id: &str) -> Result<Option<TokenRecord>, StoreError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn set(&self, user_id: &str, record: &TokenRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(access: &str) -> TokenRecord {
        TokenRecord {
            access_token: access.to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: 1_700_000_000_000,
            last_updated: 1_699_999_000_000,
        }
    }

    #[tokio::test]
    async fn test_file_store_missing_user_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert_eq!(store.get("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.set("alice", &record("first")).await.unwrap();
        store.set("alice", &record("second")).await.unwrap();

        let loaded = store.get("alice").await.unwrap().unwrap();
        assert_eq!(loaded.access_token, "second");

        let files: Vec<_> = std::fs::read_dir(dir.path().join("users"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_escapes_user_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.set("../evil", &record("x")).await.unwrap();

        assert!(dir.path().join("users").join("%2E%2E%2Fevil.json").is_file());
        assert!(store.get("../evil").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_store_keeps_similar_ids_apart() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.set("a.b", &record("dot")).await.unwrap();
        store.set("a b", &record("space")).await.unwrap();
        store.set("a_b", &record("underscore")).await.unwrap();
        store.set("a%2Eb", &record("literal")).await.unwrap();

        assert_eq!(store.get("a.b").await.unwrap().unwrap().access_token, "dot");
        assert_eq!(store.get("a b").await.unwrap().unwrap().access_token, "space");
        assert_eq!(store.get("a_b").await.unwrap().unwrap().access_token, "underscore");
        assert_eq!(store.get("a%2Eb").await.unwrap().unwrap().access_token, "literal");
    }

    #[test]
    fn test_file_stem_escapes_bytes() {
        assert_eq!(file_stem("spotify-user_42"), "spotify-user_42");
        assert_eq!(file_stem("a.b"), "a%2Eb");
        assert_eq!(file_stem("100%"), "100%25");
        assert_eq!(file_stem("é"), "%C3%A9");
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("users")).unwrap();
        std::fs::write(dir.path().join("users").join("bob.json"), "not json").unwrap();

        let err = store.get("bob").await.unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }

    #[tokio::test]
    async fn test_memory_store_shared_between_clones() {
        let store = MemoryTokenStore::new();
        let other = store.clone();

        store.set("carol", &record("abc")).await.unwrap();

        assert_eq!(other.get("carol").await.unwrap(), Some(record("abc")));
    }
}
