//! Announcement structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status marker an announcement must carry to be eligible for display.
pub const PUBLISHED_STATUS: &str = "Published";

/// An externally authored announcement. Read-only from this workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub summary: String,

    /// Must equal [`PUBLISHED_STATUS`] exactly to be displayed
    #[serde(default)]
    pub status: String,

    /// Staff-entered event date, e.g. "2026-03-15"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(rename = "attachmentUrls", default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_urls: Vec<String>,
}

impl Announcement {
    /// Whether this announcement is eligible for display.
    pub fn is_published(&self) -> bool {
        self.status == PUBLISHED_STATUS
    }
}

/// A dashboard feed card.
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementCard {
    pub title: String,
    pub date_text: String,
    pub summary: String,
    /// Resolved thumbnail URL, placeholder when no attachment exists
    pub thumbnail: String,
}

/// A fully expanded feed entry.
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementDetail {
    pub title: String,
    pub date_text: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub audience: Option<String>,
    pub category: Option<String>,
    pub summary: String,
    /// Resolved attachment URLs
    pub attachments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_requires_exact_status() {
        let mut announcement = Announcement {
            status: "Published".to_string(),
            ..Announcement::default()
        };
        assert!(announcement.is_published());

        announcement.status = "published".to_string();
        assert!(!announcement.is_published());

        announcement.status = "Draft".to_string();
        assert!(!announcement.is_published());
    }

    #[test]
    fn tolerates_sparse_documents() {
        let announcement: Announcement =
            serde_json::from_str(r#"{"title": "Career Week"}"#).unwrap();
        assert_eq!(announcement.title, "Career Week");
        assert!(announcement.attachment_urls.is_empty());
        assert!(announcement.created_at.is_none());
    }
}
