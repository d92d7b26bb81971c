//! Local filesystem document store.
//!
//! One JSON file per document under `{root}/{collection}/{id}.json`, for
//! development and testing. Production deployments use HttpStore or the
//! optional S3 backend.
//!
//! Replacing writes go through a temp file and rename; atomic creates rely
//! on `create_new`, which maps to `O_CREAT | O_EXCL`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{CreateOutcome, DocumentStore};

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Full path for a document.
    fn doc_path(&self, collection: &str, id: &str) -> PathBuf {
        self.root_dir.join(collection).join(format!("{id}.json"))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        match self.read_bytes(&self.doc_path(collection, id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        self.write_bytes(&self.doc_path(collection, id), &bytes).await
    }

    async fn create(&self, collection: &str, id: &str, doc: &Value) -> Result<CreateOutcome> {
        let path = self.doc_path(collection, id);
        self.ensure_dir(&path).await?;

        // create_new carries the O_EXCL guarantee the ledger relies on
        let open = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;

        match open {
            Ok(mut file) => {
                let bytes = serde_json::to_vec_pretty(doc)?;
                file.write_all(&bytes).await?;
                file.flush().await?;
                Ok(CreateOutcome::Created)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        let dir = self.root_dir.join(collection);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No collection directory at {}", dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut docs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            docs.push(serde_json::from_slice(&bytes)?);
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn put_and_get_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        let doc = json!({"title": "Career Week", "status": "Published"});
        store.put("announcements", "ann_001", &doc).await.unwrap();

        let loaded = store.get("announcements", "ann_001").await.unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        assert!(store.get("announcements", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_wins_only_once() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        let first = json!({"token": "AB12CD34"});
        let second = json!({"token": "ZZ99ZZ99"});

        let outcome = store
            .create("student_downloads", "student_123456789012", &first)
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::Created);

        let outcome = store
            .create("student_downloads", "student_123456789012", &second)
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists);

        // the losing write must not clobber the winner
        let stored = store
            .get("student_downloads", "student_123456789012")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["token"], "AB12CD34");
    }

    #[tokio::test]
    async fn merge_creates_and_preserves() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store
            .put(
                "student_records",
                "student_123456789012",
                &json!({"student_info": {"Surname": "Santos", "GradeLevel": "10"}}),
            )
            .await
            .unwrap();

        store
            .merge(
                "student_records",
                "student_123456789012",
                &json!({
                    "student_info": {"Token": "AB12CD34"},
                    "guardian_info": {"Name": "Maria Santos"}
                }),
            )
            .await
            .unwrap();

        let doc = store
            .get("student_records", "student_123456789012")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["student_info"]["Surname"], "Santos");
        assert_eq!(doc["student_info"]["GradeLevel"], "10");
        assert_eq!(doc["student_info"]["Token"], "AB12CD34");
        assert_eq!(doc["guardian_info"]["Name"], "Maria Santos");
    }

    #[tokio::test]
    async fn list_missing_collection_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        assert!(store.list("faculty").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_returns_every_document() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store
            .put("faculty", "fac_1", &json!({"name": "Reyes"}))
            .await
            .unwrap();
        store
            .put("faculty", "fac_2", &json!({"name": "Lim"}))
            .await
            .unwrap();

        assert_eq!(store.list("faculty").await.unwrap().len(), 2);
    }
}
