//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Document store backend settings
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Collection names in the document store
    #[serde(default)]
    pub collections: CollectionsConfig,

    /// Announcement feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Static asset locations
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.feed.page_size == 0 {
            return Err(AppError::validation("feed.page_size must be > 0"));
        }
        if self.feed.summary_graphemes == 0 {
            return Err(AppError::validation("feed.summary_graphemes must be > 0"));
        }

        let collections = [
            ("collections.student_records", &self.collections.student_records),
            (
                "collections.student_downloads",
                &self.collections.student_downloads,
            ),
            ("collections.announcements", &self.collections.announcements),
            ("collections.faculty", &self.collections.faculty),
        ];
        for (name, value) in collections {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{name} is empty")));
            }
        }

        match self.store.backend {
            StoreBackend::Local => {
                if self.store.root.trim().is_empty() {
                    return Err(AppError::validation("store.root is empty"));
                }
            }
            StoreBackend::Http => {
                if self.store.base_url.as_deref().unwrap_or("").trim().is_empty() {
                    return Err(AppError::validation(
                        "store.base_url is required for the http backend",
                    ));
                }
            }
            StoreBackend::S3 => {
                if self.store.bucket.as_deref().unwrap_or("").trim().is_empty() {
                    return Err(AppError::validation(
                        "store.bucket is required for the s3 backend",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Document store backend selection and settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Which backend serves the collections
    #[serde(default)]
    pub backend: StoreBackend,

    /// Root directory for the local backend
    #[serde(default = "defaults::store_root")]
    pub root: String,

    /// Base URL of the hosted document service (http backend)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bucket name (s3 backend)
    #[serde(default)]
    pub bucket: Option<String>,

    /// Key prefix (s3 backend)
    #[serde(default = "defaults::store_prefix")]
    pub prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            root: defaults::store_root(),
            base_url: None,
            bucket: None,
            prefix: defaults::store_prefix(),
        }
    }
}

/// Available document store backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Local,
    Http,
    S3,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Collection names in the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "defaults::student_records")]
    pub student_records: String,

    #[serde(default = "defaults::student_downloads")]
    pub student_downloads: String,

    #[serde(default = "defaults::announcements")]
    pub announcements: String,

    #[serde(default = "defaults::faculty")]
    pub faculty: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            student_records: defaults::student_records(),
            student_downloads: defaults::student_downloads(),
            announcements: defaults::announcements(),
            faculty: defaults::faculty(),
        }
    }
}

/// Announcement feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Number of cards on the dashboard feed
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Summary truncation length in grapheme clusters
    #[serde(default = "defaults::summary_graphemes")]
    pub summary_graphemes: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            summary_graphemes: defaults::summary_graphemes(),
        }
    }
}

/// Static asset locations and placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Base URL the relative references resolve against
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "defaults::announcement_placeholder")]
    pub announcement_placeholder: String,

    #[serde(default = "defaults::faculty_placeholder")]
    pub faculty_placeholder: String,

    #[serde(default = "defaults::principal_placeholder")]
    pub principal_placeholder: String,

    /// Static path of the downloadable report surfaced after issuance
    #[serde(default = "defaults::report_path")]
    pub report_path: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            announcement_placeholder: defaults::announcement_placeholder(),
            faculty_placeholder: defaults::faculty_placeholder(),
            principal_placeholder: defaults::principal_placeholder(),
            report_path: defaults::report_path(),
        }
    }
}

mod defaults {
    // Store defaults
    pub fn store_root() -> String {
        "store".into()
    }
    pub fn store_prefix() -> String {
        "portal".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; GuidancePortal/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Collection defaults
    pub fn student_records() -> String {
        "student_records".into()
    }
    pub fn student_downloads() -> String {
        "student_downloads".into()
    }
    pub fn announcements() -> String {
        "announcements".into()
    }
    pub fn faculty() -> String {
        "faculty".into()
    }

    // Feed defaults
    pub fn page_size() -> usize {
        3
    }
    pub fn summary_graphemes() -> usize {
        80
    }

    // Asset defaults
    pub fn announcement_placeholder() -> String {
        "img/default-announcement.png".into()
    }
    pub fn faculty_placeholder() -> String {
        "img/teacher.png".into()
    }
    pub fn principal_placeholder() -> String {
        "img/member.png".into()
    }
    pub fn report_path() -> String {
        "APK/Guidance_Report.apk".into()
    }
}
