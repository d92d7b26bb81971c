//! Hosted document service backend.
//!
//! Speaks JSON against `{base}/{collection}/{id}`. Atomic creates rely on
//! `If-None-Match: *`; a 412 response means another writer got there first.
//! Merges go through `PATCH` so the service applies them server-side.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::storage::{CreateOutcome, DocumentStore};

/// Hosted document service backend.
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    base: Url,
}

impl HttpStore {
    /// Create a new HttpStore against the given service base URL.
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        // a missing trailing slash would silently drop the last path segment
        // on join(), so add one
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized)?;
        Ok(Self { client, base })
    }

    fn collection_url(&self, collection: &str) -> Result<Url> {
        Ok(self.base.join(collection)?)
    }

    fn doc_url(&self, collection: &str, id: &str) -> Result<Url> {
        Ok(self.base.join(&format!("{collection}/{id}"))?)
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let response = self.client.get(self.doc_url(collection, id)?).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let doc = response.error_for_status()?.json().await?;
        Ok(Some(doc))
    }

    async fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<()> {
        self.client
            .put(self.doc_url(collection, id)?)
            .json(doc)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn create(&self, collection: &str, id: &str, doc: &Value) -> Result<CreateOutcome> {
        let response = self
            .client
            .put(self.doc_url(collection, id)?)
            .header(header::IF_NONE_MATCH, "*")
            .json(doc)
            .send()
            .await?;

        if response.status() == StatusCode::PRECONDITION_FAILED {
            return Ok(CreateOutcome::AlreadyExists);
        }
        response.error_for_status()?;
        Ok(CreateOutcome::Created)
    }

    async fn merge(&self, collection: &str, id: &str, patch: &Value) -> Result<()> {
        self.client
            .patch(self.doc_url(collection, id)?)
            .json(patch)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        let docs: Value = self
            .client
            .get(self.collection_url(collection)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match docs {
            Value::Array(items) => Ok(items),
            other => Err(AppError::backend(format!(
                "expected a JSON array listing {collection}, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_client;

    fn store(base: &str) -> HttpStore {
        HttpStore::new(create_client(&HttpConfig::default()).unwrap(), base).unwrap()
    }

    #[test]
    fn doc_urls_keep_the_base_path() {
        let store = store("https://records.example.com/v1");
        assert_eq!(
            store
                .doc_url("student_records", "student_123456789012")
                .unwrap()
                .as_str(),
            "https://records.example.com/v1/student_records/student_123456789012"
        );
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let a = store("https://records.example.com/v1");
        let b = store("https://records.example.com/v1/");
        assert_eq!(
            a.collection_url("announcements").unwrap(),
            b.collection_url("announcements").unwrap()
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let client = create_client(&HttpConfig::default()).unwrap();
        assert!(HttpStore::new(client, "not a url").is_err());
    }
}
