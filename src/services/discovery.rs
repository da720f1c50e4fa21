//! Related-content and "watched by similar viewers" listings.
//!
//! Both are built from fallback tiers filled strictly in order. A tier is
//! only consulted while the result is short, and nothing appears twice.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::AppError;
use crate::db::{CatalogStore, ProfileStore};
use crate::models::content::{CatalogItem, ContentRef, ContentType};
use crate::services::profiles::resolve_owned_profile;

struct RankedSelection {
    limit: usize,
    items: Vec<CatalogItem>,
    excluded: HashSet<Uuid>,
}

impl RankedSelection {
    fn new(limit: usize, excluded: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            limit,
            items: Vec::with_capacity(limit),
            excluded: excluded.into_iter().collect(),
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.items.len())
    }

    fn push(&mut self, item: CatalogItem) -> bool {
        if self.is_full() || !item.is_published || self.excluded.contains(&item.id) {
            return false;
        }
        self.excluded.insert(item.id);
        self.items.push(item);
        true
    }

    fn extend(&mut self, items: Vec<CatalogItem>) {
        for item in items {
            if self.is_full() {
                break;
            }
            self.push(item);
        }
    }

    fn into_items(self) -> Vec<CatalogItem> {
        self.items
    }
}

/// Titles related to `source`: the profile's own list first, then titles in
/// the source's primary genre, then whatever is trending. Each content kind
/// may contribute at most `limit` listed titles.
pub async fn related_content(
    catalog: &dyn CatalogStore,
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    source: ContentRef,
    profile_id: Uuid,
    limit: usize,
) -> Result<Vec<CatalogItem>, AppError> {
    let profile = resolve_owned_profile(profiles, account, profile_id).await?;
    let source_item = catalog
        .find_by_id(source)
        .await?
        .filter(|item| item.is_published)
        .ok_or_else(|| AppError::not_found("Content not found"))?;

    let mut selection = RankedSelection::new(limit, [source.id]);

    let mut per_kind: HashMap<ContentType, usize> = HashMap::new();
    for entry in &profile.my_list {
        if selection.is_full() {
            break;
        }
        let taken = per_kind.entry(entry.content_type).or_insert(0);
        if entry.content_id == source.id || *taken >= limit {
            continue;
        }
        match catalog.find_by_id(entry.content_ref()).await {
            Ok(Some(item)) => {
                if selection.push(item) {
                    *taken += 1;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(content_id = %entry.content_id, error = %e, "skipping unresolvable list entry");
            }
        }
    }

    if !selection.is_full() {
        if let Some(genre) = source_item.primary_genre() {
            let same_genre = catalog
                .find_by_genre(genre, selection.remaining(), &selection.excluded)
                .await?;
            selection.extend(same_genre);
        }
    }

    if !selection.is_full() {
        let trending = catalog
            .find_trending(selection.remaining(), &selection.excluded)
            .await?;
        selection.extend(trending);
    }

    Ok(selection.into_items())
}

/// Titles watched by profiles that share at least one watched title with
/// this one. Membership is binary: no overlap weighting takes place.
/// A profile with no history gets the trending list.
pub async fn collaborative_recommendations(
    catalog: &dyn CatalogStore,
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    profile_id: Uuid,
    limit: usize,
) -> Result<Vec<CatalogItem>, AppError> {
    let profile = resolve_owned_profile(profiles, account, profile_id).await?;
    let watched: HashSet<Uuid> = profile
        .watch_history
        .iter()
        .map(|entry| entry.content_id)
        .collect();

    if watched.is_empty() {
        return Ok(catalog.find_trending(limit, &HashSet::new()).await?);
    }

    let neighbor_content = profiles.find_neighbor_content(profile.id, &watched).await?;
    let mut candidates: Vec<Uuid> = neighbor_content.difference(&watched).copied().collect();
    candidates.sort();

    let mut selection = RankedSelection::new(limit, watched.iter().copied());

    if !candidates.is_empty() {
        match catalog.find_published_by_ids(&candidates, limit).await {
            Ok(items) => selection.extend(items),
            Err(e) => {
                tracing::warn!(error = %e, "neighbor titles unavailable, falling back to trending");
            }
        }
    }

    if !selection.is_full() {
        let trending = catalog
            .find_trending(selection.remaining(), &selection.excluded)
            .await?;
        selection.extend(trending);
    }

    tracing::debug!(
        %profile_id,
        candidates = candidates.len(),
        "collaborative recommendations built"
    );
    Ok(selection.into_items())
}

pub async fn trending(
    catalog: &dyn CatalogStore,
    limit: usize,
) -> Result<Vec<CatalogItem>, AppError> {
    Ok(catalog.find_trending(limit, &HashSet::new()).await?)
}
