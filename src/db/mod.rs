//! Storage ports and their implementations.
//!
//! Services only talk to the traits declared here. The Postgres stores back
//! the running service; [`memory::InMemoryStore`] backs the test-suites.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::content::{CatalogItem, ContentRef};
use crate::models::my_list::MyListEntry;
use crate::models::playback::PlaybackSession;
use crate::models::profiles::Profile;
use crate::models::watch_history::WatchHistoryEntry;

pub mod catalog;
pub mod memory;
pub mod playback_sessions;
pub mod profiles;

pub use catalog::PgCatalogStore;
pub use memory::InMemoryStore;
pub use playback_sessions::PgSessionStore;
pub use profiles::PgProfileStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored document could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("stored row is malformed: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// True when the backing store could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Database(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            )
        )
    }
}

/// Read side of the catalog plus the two writes the core owns: the view
/// counter and content removal. Every listing is limited to published items.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Looks the item up regardless of its published state.
    async fn find_by_id(&self, content: ContentRef) -> Result<Option<CatalogItem>, StoreError>;

    /// Most viewed first, ties broken by id.
    async fn find_trending(
        &self,
        limit: usize,
        exclude: &HashSet<Uuid>,
    ) -> Result<Vec<CatalogItem>, StoreError>;

    async fn find_by_genre(
        &self,
        genre: &str,
        limit: usize,
        exclude: &HashSet<Uuid>,
    ) -> Result<Vec<CatalogItem>, StoreError>;

    async fn find_published_by_ids(
        &self,
        ids: &[Uuid],
        limit: usize,
    ) -> Result<Vec<CatalogItem>, StoreError>;

    /// Atomically bumps the view counter of a published item and returns it.
    async fn record_view(&self, content: ContentRef) -> Result<Option<CatalogItem>, StoreError>;

    async fn delete(&self, content: ContentRef) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, profile_id: Uuid) -> Result<Option<Profile>, StoreError>;

    async fn list_profiles(&self, account_id: Uuid) -> Result<Vec<Profile>, StoreError>;

    async fn count_profiles(&self, account_id: Uuid) -> Result<i64, StoreError>;

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn delete_profile(&self, profile_id: Uuid) -> Result<bool, StoreError>;

    async fn save_watch_history(
        &self,
        profile_id: Uuid,
        history: &[WatchHistoryEntry],
    ) -> Result<(), StoreError>;

    async fn save_my_list(&self, profile_id: Uuid, list: &[MyListEntry]) -> Result<(), StoreError>;

    /// Every content id watched by a profile other than `profile_id` that has
    /// itself watched at least one id in `watched`.
    async fn find_neighbor_content(
        &self,
        profile_id: Uuid,
        watched: &HashSet<Uuid>,
    ) -> Result<HashSet<Uuid>, StoreError>;

    /// Drops watch-history and my-list entries pointing at `content_id` from
    /// every profile. Returns the number of profiles touched.
    async fn purge_content(&self, content_id: Uuid) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: &PlaybackSession) -> Result<(), StoreError>;

    async fn find_session(&self, session_id: Uuid) -> Result<Option<PlaybackSession>, StoreError>;

    async fn save_session(&self, session: &PlaybackSession) -> Result<(), StoreError>;
}
