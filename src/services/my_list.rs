use chrono::Utc;
use futures_util::future::join_all;
use uuid::Uuid;

use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::AppError;
use crate::db::{CatalogStore, ProfileStore};
use crate::models::content::{CatalogItem, ContentRef};
use crate::models::my_list::{add_to_list, remove_from_list};
use crate::services::profiles::resolve_owned_profile;

/// The profile's list in insertion order, without entries that no longer
/// resolve to a published title.
pub async fn get_my_list(
    catalog: &dyn CatalogStore,
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    profile_id: Uuid,
) -> Result<Vec<CatalogItem>, AppError> {
    let profile = resolve_owned_profile(profiles, account, profile_id).await?;

    let lookups = join_all(
        profile
            .my_list
            .iter()
            .map(|entry| catalog.find_by_id(entry.content_ref())),
    )
    .await;

    Ok(lookups
        .into_iter()
        .filter_map(|lookup| match lookup {
            Ok(Some(item)) if item.is_published => Some(item),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "dropping unresolvable list entry");
                None
            }
        })
        .collect())
}

/// Returns whether the title was newly added.
pub async fn add_to_my_list(
    catalog: &dyn CatalogStore,
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    profile_id: Uuid,
    content: ContentRef,
) -> Result<bool, AppError> {
    let mut profile = resolve_owned_profile(profiles, account, profile_id).await?;

    catalog
        .find_by_id(content)
        .await?
        .filter(|item| item.is_published)
        .ok_or_else(|| AppError::not_found("Content not found"))?;

    if !add_to_list(&mut profile.my_list, content, Utc::now()) {
        return Ok(false);
    }
    profiles.save_my_list(profile.id, &profile.my_list).await?;
    Ok(true)
}

pub async fn remove_from_my_list(
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    profile_id: Uuid,
    content_id: Uuid,
) -> Result<(), AppError> {
    let mut profile = resolve_owned_profile(profiles, account, profile_id).await?;

    if !remove_from_list(&mut profile.my_list, content_id) {
        return Err(AppError::not_found("Content is not on this profile's list"));
    }
    profiles.save_my_list(profile.id, &profile.my_list).await?;
    Ok(())
}
