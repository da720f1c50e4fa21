use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::AppError;
use crate::db::{CatalogStore, ProfileStore};
use crate::models::content::{CatalogItem, ContentRef};

/// Fetch a published title and count the view.
pub async fn view_content(
    catalog: &dyn CatalogStore,
    content: ContentRef,
) -> Result<CatalogItem, AppError> {
    catalog
        .record_view(content)
        .await?
        .ok_or_else(|| AppError::not_found("Content not found"))
}

/// Remove a title, then purge references to it from every profile.
///
/// The purge runs after the delete without a transaction. If it fails the
/// title is still gone and the stale references are dropped at read time.
pub async fn delete_content(
    catalog: &dyn CatalogStore,
    profiles: &dyn ProfileStore,
    account: &AuthenticatedAccount,
    content: ContentRef,
) -> Result<(), AppError> {
    if !account.is_admin() {
        return Err(AppError::forbidden_error(
            "Only administrators can remove content",
        ));
    }

    if !catalog.delete(content).await? {
        return Err(AppError::not_found("Content not found"));
    }

    match profiles.purge_content(content.id).await {
        Ok(touched) => {
            tracing::info!(content_id = %content.id, profiles = touched, "content removed")
        }
        Err(e) => {
            tracing::error!(content_id = %content.id, error = %e, "content removed but reference purge failed")
        }
    }
    Ok(())
}
