//! AWS S3 document store.
//!
//! One JSON object per document at `{prefix}/{collection}/{id}.json`.
//! Atomic creates use S3 conditional writes (`If-None-Match: *`); a 412
//! means another writer got there first.

use aws_sdk_s3::Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::{AppError, Result};
use crate::storage::{CreateOutcome, DocumentStore};

/// S3-based document store.
pub struct S3Store {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Store {
    /// Create a new S3 store instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create an S3 store from ambient AWS configuration.
    pub async fn connect(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket, prefix)
    }

    fn key(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{collection}/{id}.json",
            self.prefix.trim_end_matches('/')
        )
    }

    async fn read_key(&self, key: &str) -> Result<Option<Value>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(AppError::backend)?
                    .into_bytes();
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    info!("No document at s3://{}/{}", self.bucket, key);
                    Ok(None)
                } else {
                    Err(AppError::backend(service_err))
                }
            }
        }
    }

    async fn write_key(&self, key: &str, doc: &Value) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(json.into_bytes()))
            .content_type("application/json")
            .send()
            .await
            .map_err(AppError::backend)?;

        info!("Wrote document to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for S3Store {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        self.read_key(&self.key(collection, id)).await
    }

    async fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<()> {
        self.write_key(&self.key(collection, id), doc).await
    }

    async fn create(&self, collection: &str, id: &str, doc: &Value) -> Result<CreateOutcome> {
        let key = self.key(collection, id);
        let json = serde_json::to_string_pretty(doc)?;

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(json.into_bytes()))
            .content_type("application/json")
            .if_none_match("*")
            .send()
            .await;

        match result {
            Ok(_) => {
                info!("Created document at s3://{}/{}", self.bucket, key);
                Ok(CreateOutcome::Created)
            }
            Err(SdkError::ServiceError(context))
                if context.raw().status().as_u16() == 412 =>
            {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(err) => Err(AppError::backend(err)),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        let prefix = format!("{}/{collection}/", self.prefix.trim_end_matches('/'));

        let listing = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&prefix)
            .send()
            .await
            .map_err(AppError::backend)?;

        let mut docs = Vec::new();
        for object in listing.contents() {
            let Some(key) = object.key() else { continue };
            if !key.ends_with(".json") {
                continue;
            }
            if let Some(doc) = self.read_key(key).await? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }
}
