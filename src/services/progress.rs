use chrono::Utc;
use futures_util::future::join_all;
use uuid::Uuid;
use validator::Validate;

use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::AppError;
use crate::db::{CatalogStore, ProfileStore};
use crate::models::watch_history::{
    most_recent, record_progress, ContinueWatchingItem, ReportProgressRequest, WatchHistoryEntry,
};
use crate::services::profiles::resolve_owned_profile;

/// Upsert a progress report into the profile's watch history.
///
/// The content reference is not checked against the catalog; a dangling
/// entry simply never resolves when rendered. Two concurrent reports for the
/// same profile race on the read-modify-write and the later save wins.
pub async fn report_progress(
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    request: &ReportProgressRequest,
) -> Result<WatchHistoryEntry, AppError> {
    request.validate()?;
    let mut profile = resolve_owned_profile(profiles, account, request.profile_id).await?;

    let entry = record_progress(&mut profile.watch_history, request, Utc::now());
    profiles
        .save_watch_history(profile.id, &profile.watch_history)
        .await?;

    Ok(entry)
}

pub async fn watch_history(
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    profile_id: Uuid,
) -> Result<Vec<WatchHistoryEntry>, AppError> {
    Ok(resolve_owned_profile(profiles, account, profile_id)
        .await?
        .watch_history)
}

/// Most recently touched titles with their resume point. Entries whose
/// title is gone or unpublished are left out.
pub async fn continue_watching(
    catalog: &dyn CatalogStore,
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    profile_id: Uuid,
    limit: usize,
) -> Result<Vec<ContinueWatchingItem>, AppError> {
    let profile = resolve_owned_profile(profiles, account, profile_id).await?;
    let recent = most_recent(&profile.watch_history, limit);

    let lookups = join_all(
        recent
            .iter()
            .map(|entry| catalog.find_by_id(entry.content_ref())),
    )
    .await;

    let items = recent
        .into_iter()
        .zip(lookups)
        .filter_map(|(entry, lookup)| match lookup {
            Ok(Some(content)) if content.is_published => Some(ContinueWatchingItem {
                content,
                episode_id: entry.episode_id,
                progress: entry.progress,
                duration: entry.duration,
                updated_at: entry.updated_at,
            }),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(content_id = %entry.content_id, error = %e, "dropping unresolvable history entry");
                None
            }
        })
        .collect();

    Ok(items)
}
