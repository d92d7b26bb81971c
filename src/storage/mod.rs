//! Document storage abstractions.
//!
//! The portal reads and writes JSON documents in named collections, keyed
//! by a document id (`student_<lrn>` for the student-scoped collections).
//!
//! ## Backends
//!
//! - [`LocalStore`]: one JSON file per document, for development and testing
//! - [`HttpStore`]: hosted document service, for production
//! - `S3Store` (feature `s3`): one JSON object per document
//!
//! The atomic [`DocumentStore::create`] is what makes token issuance safe
//! under concurrent first-time submission: exactly one writer wins, the
//! other observes [`CreateOutcome::AlreadyExists`] and replays.

pub mod http;
pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

// Re-export for convenience
pub use http::HttpStore;
pub use local::LocalStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

/// Outcome of an atomic create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The document was written; this caller won the race.
    Created,
    /// A document already existed under this id.
    AlreadyExists,
}

/// Trait for document store backends.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document, returning None when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Write a document, replacing any existing content.
    async fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<()>;

    /// Atomically create a document if and only if none exists under the id.
    async fn create(&self, collection: &str, id: &str, doc: &Value) -> Result<CreateOutcome>;

    /// Deep-merge a patch into a document, creating it when absent.
    ///
    /// Object fields merge recursively and missing sub-objects are built;
    /// fields not named in the patch are preserved.
    async fn merge(&self, collection: &str, id: &str, patch: &Value) -> Result<()> {
        let mut doc = self
            .get(collection, id)
            .await?
            .unwrap_or(Value::Object(Default::default()));
        merge_values(&mut doc, patch);
        self.put(collection, id, &doc).await
    }

    /// List every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Value>>;
}

/// Document id for a student-scoped collection entry.
pub fn student_doc_id(lrn: &str) -> String {
    format!("student_{lrn}")
}

/// Deserialize an optional raw document into a typed value.
pub fn decode<T: DeserializeOwned>(doc: Option<Value>) -> Result<Option<T>> {
    match doc {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Recursively merge `patch` into `target`.
///
/// Objects merge key-by-key; any other value in the patch replaces the
/// target wholesale.
pub fn merge_values(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                merge_values(
                    target_map.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}
