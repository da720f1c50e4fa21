use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::content::{CatalogItem, ContentRef, ContentType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchHistoryEntry {
    pub content_id: Uuid,
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<Uuid>,
    /// Seconds watched.
    pub progress: f64,
    /// Seconds in total.
    pub duration: f64,
    pub updated_at: DateTime<Utc>,
}

impl WatchHistoryEntry {
    pub fn content_ref(&self) -> ContentRef {
        ContentRef::new(self.content_type, self.content_id)
    }

    /// Natural key of an entry: the content plus the episode, an absent
    /// episode only matching another absent episode.
    pub fn has_key(&self, content_id: Uuid, episode_id: Option<Uuid>) -> bool {
        self.content_id == content_id && self.episode_id == episode_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_episode_reference"))]
pub struct ReportProgressRequest {
    #[serde(alias = "profileId")]
    pub profile_id: Uuid,
    #[serde(alias = "contentId")]
    pub content_id: Uuid,
    #[serde(alias = "contentType")]
    pub content_type: ContentType,
    #[serde(default, alias = "episodeId")]
    pub episode_id: Option<Uuid>,
    #[validate(range(min = 0.0, message = "progress must not be negative"))]
    pub progress: f64,
    #[validate(range(min = 0.0, message = "duration must not be negative"))]
    pub duration: f64,
}

fn validate_episode_reference(request: &ReportProgressRequest) -> Result<(), ValidationError> {
    if request.content_type == ContentType::Movie && request.episode_id.is_some() {
        let mut error = ValidationError::new("episode_on_movie");
        error.message = Some("episode_id is only allowed for series".into());
        return Err(error);
    }
    Ok(())
}

/// Upsert the report into `history`. A matching entry is overwritten where
/// it stands; anything else is appended. Returns the stored entry.
pub fn record_progress(
    history: &mut Vec<WatchHistoryEntry>,
    report: &ReportProgressRequest,
    now: DateTime<Utc>,
) -> WatchHistoryEntry {
    match history
        .iter_mut()
        .find(|entry| entry.has_key(report.content_id, report.episode_id))
    {
        Some(entry) => {
            entry.progress = report.progress;
            entry.duration = report.duration;
            entry.updated_at = now;
            entry.clone()
        }
        None => {
            let entry = WatchHistoryEntry {
                content_id: report.content_id,
                content_type: report.content_type,
                episode_id: report.episode_id,
                progress: report.progress,
                duration: report.duration,
                updated_at: now,
            };
            history.push(entry.clone());
            entry
        }
    }
}

/// The `limit` most recently updated entries, newest first. Equal timestamps
/// fall back to the (content, episode) key so the order is stable.
pub fn most_recent(history: &[WatchHistoryEntry], limit: usize) -> Vec<&WatchHistoryEntry> {
    let mut entries: Vec<&WatchHistoryEntry> = history.iter().collect();
    entries.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.content_id.cmp(&b.content_id))
            .then_with(|| a.episode_id.cmp(&b.episode_id))
    });
    entries.truncate(limit);
    entries
}

#[derive(Debug, Serialize)]
pub struct ContinueWatchingItem {
    pub content: CatalogItem,
    pub episode_id: Option<Uuid>,
    pub progress: f64,
    pub duration: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(alias = "profileId")]
    pub profile_id: Uuid,
    pub limit: Option<i64>,
}
