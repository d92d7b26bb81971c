// src/services/faculty.rs

//! Faculty directory projections.
//!
//! Read-only. Portrait URLs come from the asset layer; the directory
//! resolves them concurrently through a bounded stream since the batch is
//! order-independent.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::assets::AssetResolver;
use crate::error::Result;
use crate::models::{Config, FacultyCard, FacultyMember, PrincipalCard};
use crate::storage::DocumentStore;

/// Department bucket used when a member has none recorded.
pub const NO_DEPARTMENT: &str = "No Department";

/// Position marking the principal's record.
const PRINCIPAL_POSITION: &str = "Principal";

/// Concurrency bound for portrait URL resolution.
const PHOTO_CONCURRENCY: usize = 5;

/// Read-only projection of the faculty collection.
pub struct FacultyDirectory {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    assets: Arc<dyn AssetResolver>,
}

impl FacultyDirectory {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetResolver>,
    ) -> Self {
        Self {
            config,
            store,
            assets,
        }
    }

    /// Faculty members, optionally restricted to one department, sorted by
    /// name.
    pub async fn members(&self, department: Option<&str>) -> Result<Vec<FacultyMember>> {
        let mut members: Vec<FacultyMember> = self
            .load()
            .await?
            .into_iter()
            .filter(|member| department.is_none_or(|d| member.department == d))
            .collect();

        sort_by_name(&mut members);
        Ok(members)
    }

    /// Members bucketed by department, both levels sorted.
    pub async fn grouped(&self) -> Result<BTreeMap<String, Vec<FacultyMember>>> {
        let mut grouped: BTreeMap<String, Vec<FacultyMember>> = BTreeMap::new();
        for member in self.load().await? {
            let department = if member.department.is_empty() {
                NO_DEPARTMENT.to_string()
            } else {
                member.department.clone()
            };
            grouped.entry(department).or_default().push(member);
        }

        for members in grouped.values_mut() {
            sort_by_name(members);
        }
        Ok(grouped)
    }

    /// The principal's record, when one is on file.
    pub async fn principal(&self) -> Result<Option<FacultyMember>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|member| member.position.as_deref() == Some(PRINCIPAL_POSITION)))
    }

    /// The principal's header card with a resolved portrait.
    pub async fn principal_card(&self) -> Result<Option<PrincipalCard>> {
        let Some(member) = self.principal().await? else {
            return Ok(None);
        };

        let photo_url = self
            .resolve_photo(&member, &self.config.assets.principal_placeholder)
            .await;

        Ok(Some(PrincipalCard {
            name: display_or(&member.name, "Unnamed Principal"),
            position: member
                .position
                .unwrap_or_else(|| PRINCIPAL_POSITION.to_string()),
            email: member.email.unwrap_or_default(),
            photo_url,
        }))
    }

    /// Render directory cards.
    ///
    /// Portraits resolve concurrently, bounded; output keeps member order.
    pub async fn cards(&self, department: Option<&str>) -> Result<Vec<FacultyCard>> {
        let members = self.members(department).await?;

        let cards = stream::iter(members)
            .map(|member| self.card(member))
            .buffered(PHOTO_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;
        Ok(cards)
    }

    async fn card(&self, member: FacultyMember) -> FacultyCard {
        let photo_url = self
            .resolve_photo(&member, &self.config.assets.faculty_placeholder)
            .await;

        FacultyCard {
            name: display_or(&member.name, "Unnamed Faculty"),
            department: display_or(&member.department, NO_DEPARTMENT),
            photo_url,
        }
    }

    async fn resolve_photo(&self, member: &FacultyMember, placeholder: &str) -> String {
        let reference = member
            .attachments
            .first()
            .map(String::as_str)
            .unwrap_or(placeholder);

        match self.assets.resolve(reference).await {
            Ok(url) => url,
            Err(error) => {
                log::warn!("Failed to resolve portrait {reference}: {error}");
                placeholder.to_string()
            }
        }
    }

    async fn load(&self) -> Result<Vec<FacultyMember>> {
        let raw = self.store.list(&self.config.collections.faculty).await?;

        let mut members = Vec::new();
        for doc in raw {
            match serde_json::from_value::<FacultyMember>(doc) {
                Ok(member) => members.push(member),
                Err(error) => log::warn!("Skipping malformed faculty record: {error}"),
            }
        }
        Ok(members)
    }
}

fn sort_by_name(members: &mut [FacultyMember]) {
    members.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

fn display_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticAssets;
    use crate::storage::LocalStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn directory(tmp: &TempDir) -> FacultyDirectory {
        FacultyDirectory::new(
            Arc::new(Config::default()),
            Arc::new(LocalStore::new(tmp.path())),
            Arc::new(StaticAssets::new(Some("https://cdn.example.com/")).unwrap()),
        )
    }

    async fn seed(tmp: &TempDir, id: &str, doc: serde_json::Value) {
        LocalStore::new(tmp.path())
            .put("faculty", id, &doc)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn members_are_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        seed(&tmp, "f1", json!({"name": "Reyes", "department": "Math Department"})).await;
        seed(&tmp, "f2", json!({"name": "abad", "department": "Math Department"})).await;
        seed(&tmp, "f3", json!({"name": "Lim", "department": "Science Department"})).await;

        let members = directory(&tmp).members(None).await.unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["abad", "Lim", "Reyes"]);
    }

    #[tokio::test]
    async fn department_filter_is_exact() {
        let tmp = TempDir::new().unwrap();
        seed(&tmp, "f1", json!({"name": "Reyes", "department": "Math Department"})).await;
        seed(&tmp, "f2", json!({"name": "Lim", "department": "Science Department"})).await;

        let members = directory(&tmp)
            .members(Some("Math Department"))
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Reyes");
    }

    #[tokio::test]
    async fn grouping_buckets_and_sorts() {
        let tmp = TempDir::new().unwrap();
        seed(&tmp, "f1", json!({"name": "Reyes", "department": "Math Department"})).await;
        seed(&tmp, "f2", json!({"name": "Abad", "department": "Math Department"})).await;
        seed(&tmp, "f3", json!({"name": "Lim"})).await;

        let grouped = directory(&tmp).grouped().await.unwrap();
        let departments: Vec<_> = grouped.keys().map(String::as_str).collect();
        assert_eq!(departments, ["Math Department", NO_DEPARTMENT]);

        let math: Vec<_> = grouped["Math Department"]
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(math, ["Abad", "Reyes"]);
    }

    #[tokio::test]
    async fn principal_is_matched_exactly() {
        let tmp = TempDir::new().unwrap();
        seed(
            &tmp,
            "f1",
            json!({"name": "Cruz", "position": "Assistant Principal"}),
        )
        .await;
        seed(
            &tmp,
            "f2",
            json!({"name": "Dizon", "position": "Principal", "email": "dizon@school.edu.ph"}),
        )
        .await;

        let principal = directory(&tmp).principal().await.unwrap().unwrap();
        assert_eq!(principal.name, "Dizon");

        let card = directory(&tmp).principal_card().await.unwrap().unwrap();
        assert_eq!(card.email, "dizon@school.edu.ph");
        assert_eq!(card.photo_url, "https://cdn.example.com/img/member.png");
    }

    #[tokio::test]
    async fn cards_resolve_portraits_with_fallback() {
        let tmp = TempDir::new().unwrap();
        seed(
            &tmp,
            "f1",
            json!({"name": "Reyes", "attachments": ["photos/reyes.jpg"]}),
        )
        .await;
        seed(&tmp, "f2", json!({"name": "Lim"})).await;

        let cards = directory(&tmp).cards(None).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "Lim");
        assert_eq!(cards[0].photo_url, "https://cdn.example.com/img/teacher.png");
        assert_eq!(cards[1].name, "Reyes");
        assert_eq!(cards[1].photo_url, "https://cdn.example.com/photos/reyes.jpg");
    }
}
