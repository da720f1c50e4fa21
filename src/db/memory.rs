//! Process-local stores with the same ordering rules as the Postgres ones.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{CatalogStore, ProfileStore, SessionStore, StoreError};
use crate::models::content::{CatalogItem, ContentRef};
use crate::models::my_list::MyListEntry;
use crate::models::playback::PlaybackSession;
use crate::models::profiles::Profile;
use crate::models::watch_history::WatchHistoryEntry;

#[derive(Default)]
pub struct InMemoryStore {
    catalog: Mutex<HashMap<ContentRef, CatalogItem>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
    sessions: Mutex<HashMap<Uuid, PlaybackSession>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Corrupt("in-memory store lock poisoned".to_string()))
}

fn by_popularity(items: &mut [CatalogItem]) {
    items.sort_by(|a, b| b.view_count.cmp(&a.view_count).then_with(|| a.id.cmp(&b.id)));
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_catalog_item(&self, item: CatalogItem) -> Result<(), StoreError> {
        lock(&self.catalog)?.insert(item.content_ref(), item);
        Ok(())
    }

    fn published_where(
        &self,
        limit: usize,
        keep: impl Fn(&CatalogItem) -> bool,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        let mut items: Vec<CatalogItem> = lock(&self.catalog)?
            .values()
            .filter(|item| item.is_published && keep(item))
            .cloned()
            .collect();
        by_popularity(&mut items);
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn find_by_id(&self, content: ContentRef) -> Result<Option<CatalogItem>, StoreError> {
        Ok(lock(&self.catalog)?.get(&content).cloned())
    }

    async fn find_trending(
        &self,
        limit: usize,
        exclude: &HashSet<Uuid>,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        self.published_where(limit, |item| !exclude.contains(&item.id))
    }

    async fn find_by_genre(
        &self,
        genre: &str,
        limit: usize,
        exclude: &HashSet<Uuid>,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        self.published_where(limit, |item| {
            !exclude.contains(&item.id) && item.genres.iter().any(|g| g == genre)
        })
    }

    async fn find_published_by_ids(
        &self,
        ids: &[Uuid],
        limit: usize,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        self.published_where(limit, |item| ids.contains(&item.id))
    }

    async fn record_view(&self, content: ContentRef) -> Result<Option<CatalogItem>, StoreError> {
        let mut catalog = lock(&self.catalog)?;
        Ok(catalog
            .get_mut(&content)
            .filter(|item| item.is_published)
            .map(|item| {
                item.view_count += 1;
                item.clone()
            }))
    }

    async fn delete(&self, content: ContentRef) -> Result<bool, StoreError> {
        Ok(lock(&self.catalog)?.remove(&content).is_some())
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn find_profile(&self, profile_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(lock(&self.profiles)?.get(&profile_id).cloned())
    }

    async fn list_profiles(&self, account_id: Uuid) -> Result<Vec<Profile>, StoreError> {
        let mut profiles: Vec<Profile> = lock(&self.profiles)?
            .values()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect();
        profiles.sort_by_key(|p| p.created_at);
        Ok(profiles)
    }

    async fn count_profiles(&self, account_id: Uuid) -> Result<i64, StoreError> {
        Ok(lock(&self.profiles)?
            .values()
            .filter(|p| p.account_id == account_id)
            .count() as i64)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        lock(&self.profiles)?.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn delete_profile(&self, profile_id: Uuid) -> Result<bool, StoreError> {
        Ok(lock(&self.profiles)?.remove(&profile_id).is_some())
    }

    async fn save_watch_history(
        &self,
        profile_id: Uuid,
        history: &[WatchHistoryEntry],
    ) -> Result<(), StoreError> {
        if let Some(profile) = lock(&self.profiles)?.get_mut(&profile_id) {
            profile.watch_history = history.to_vec();
        }
        Ok(())
    }

    async fn save_my_list(&self, profile_id: Uuid, list: &[MyListEntry]) -> Result<(), StoreError> {
        if let Some(profile) = lock(&self.profiles)?.get_mut(&profile_id) {
            profile.my_list = list.to_vec();
        }
        Ok(())
    }

    async fn find_neighbor_content(
        &self,
        profile_id: Uuid,
        watched: &HashSet<Uuid>,
    ) -> Result<HashSet<Uuid>, StoreError> {
        Ok(lock(&self.profiles)?
            .values()
            .filter(|p| p.id != profile_id)
            .filter(|p| p.watch_history.iter().any(|e| watched.contains(&e.content_id)))
            .flat_map(|p| p.watch_history.iter().map(|e| e.content_id))
            .collect())
    }

    async fn purge_content(&self, content_id: Uuid) -> Result<u64, StoreError> {
        let mut touched = 0;
        for profile in lock(&self.profiles)?.values_mut() {
            let before = profile.watch_history.len() + profile.my_list.len();
            profile.watch_history.retain(|e| e.content_id != content_id);
            profile.my_list.retain(|e| e.content_id != content_id);
            if profile.watch_history.len() + profile.my_list.len() != before {
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn insert_session(&self, session: &PlaybackSession) -> Result<(), StoreError> {
        lock(&self.sessions)?.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<PlaybackSession>, StoreError> {
        Ok(lock(&self.sessions)?.get(&session_id).cloned())
    }

    async fn save_session(&self, session: &PlaybackSession) -> Result<(), StoreError> {
        lock(&self.sessions)?.insert(session.session_id, session.clone());
        Ok(())
    }
}
