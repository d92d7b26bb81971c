// src/assets.rs

//! Asset reference resolution.
//!
//! Attachment and photo references in the collections may be absolute URLs
//! or paths relative to the asset host. The trait is async because hosted
//! object stores answer reference lookups remotely.

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

/// Trait for turning a stored asset reference into a fetchable URL.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    async fn resolve(&self, reference: &str) -> Result<String>;
}

/// Resolver for statically hosted assets.
///
/// Absolute references pass through untouched; relative ones join the
/// configured base URL. Without a base, references are returned as-is.
pub struct StaticAssets {
    base: Option<Url>,
}

impl StaticAssets {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let base = base_url.map(Url::parse).transpose()?;
        Ok(Self { base })
    }
}

#[async_trait]
impl AssetResolver for StaticAssets {
    async fn resolve(&self, reference: &str) -> Result<String> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(reference.to_string());
        }

        match &self.base {
            Some(base) => Ok(base
                .join(reference)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| reference.to_string())),
            None => Ok(reference.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absolute_references_pass_through() {
        let assets = StaticAssets::new(Some("https://cdn.example.com/portal/")).unwrap();
        assert_eq!(
            assets.resolve("https://other.com/x.png").await.unwrap(),
            "https://other.com/x.png"
        );
    }

    #[tokio::test]
    async fn relative_references_join_the_base() {
        let assets = StaticAssets::new(Some("https://cdn.example.com/portal/")).unwrap();
        assert_eq!(
            assets.resolve("img/teacher.png").await.unwrap(),
            "https://cdn.example.com/portal/img/teacher.png"
        );
    }

    #[tokio::test]
    async fn no_base_returns_reference_as_is() {
        let assets = StaticAssets::new(None).unwrap();
        assert_eq!(
            assets.resolve("img/teacher.png").await.unwrap(),
            "img/teacher.png"
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(StaticAssets::new(Some("not a url")).is_err());
    }
}
