//! Faculty directory structures.

use serde::{Deserialize, Serialize};

/// A faculty member record. Read-only from this workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacultyMember {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub department: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Photo references, first entry is the portrait
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// A rendered directory card.
#[derive(Debug, Clone, Serialize)]
pub struct FacultyCard {
    pub name: String,
    pub department: String,
    /// Resolved portrait URL, placeholder when no photo exists
    pub photo_url: String,
}

/// The principal's header card.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalCard {
    pub name: String,
    pub position: String,
    pub email: String,
    pub photo_url: String,
}
