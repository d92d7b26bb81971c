// src/services/announcements.rs

//! Announcement feed projections.
//!
//! Read-only: both feeds re-read the collection on every call, keep only
//! items whose status equals the published marker exactly, and order by
//! creation time descending.

use std::sync::Arc;

use crate::assets::AssetResolver;
use crate::error::Result;
use crate::models::{Announcement, AnnouncementCard, AnnouncementDetail, Config};
use crate::storage::DocumentStore;
use crate::utils::{self, text};

/// Read-only projection of the announcements collection.
pub struct AnnouncementFeed {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    assets: Arc<dyn AssetResolver>,
}

impl AnnouncementFeed {
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

    /// Latest published announcements as dashboard cards, capped at the
    /// configured page size.
    pub async fn recent_cards(&self) -> Result<Vec<AnnouncementCard>> {
        let items = self.published().await?;

        let mut cards = Vec::new();
        for item in items.into_iter().take(self.config.feed.page_size) {
            cards.push(self.card(item).await?);
        }
        Ok(cards)
    }

    /// Every published announcement with full detail, recency-ordered,
    /// uncapped.
    pub async fn full_feed(&self) -> Result<Vec<AnnouncementDetail>> {
        let items = self.published().await?;

        let mut details = Vec::new();
        for item in items {
            details.push(self.detail(item).await?);
        }
        Ok(details)
    }

    /// Published items, newest first.
    async fn published(&self) -> Result<Vec<Announcement>> {
        let raw = self
            .store
            .list(&self.config.collections.announcements)
            .await?;

        let mut items: Vec<Announcement> = Vec::new();
        for doc in raw {
            match serde_json::from_value::<Announcement>(doc) {
                Ok(item) if item.is_published() => items.push(item),
                Ok(_) => {}
                Err(error) => log::warn!("Skipping malformed announcement: {error}"),
            }
        }

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn card(&self, item: Announcement) -> Result<AnnouncementCard> {
        let reference = item
            .attachment_urls
            .first()
            .cloned()
            .unwrap_or_else(|| self.config.assets.announcement_placeholder.clone());
        let thumbnail = self.assets.resolve(&reference).await?;

        Ok(AnnouncementCard {
            date_text: utils::format_display_date(item.date.as_deref(), item.created_at),
            summary: text::truncate_graphemes(&item.summary, self.config.feed.summary_graphemes),
            title: item.title,
            thumbnail,
        })
    }

    async fn detail(&self, item: Announcement) -> Result<AnnouncementDetail> {
        let mut attachments = Vec::new();
        for reference in &item.attachment_urls {
            attachments.push(self.assets.resolve(reference).await?);
        }

        Ok(AnnouncementDetail {
            date_text: utils::format_display_date(item.date.as_deref(), item.created_at),
            time: item.time,
            location: item.location,
            audience: item.audience,
            category: item.category,
            summary: item.summary,
            title: item.title,
            attachments,
        })
    }
}
