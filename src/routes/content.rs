use actix_web::{delete, get, web, HttpResponse, Result};
use uuid::Uuid;

use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::{AppError, AppSuccessResponse, RedisHelper};
use crate::db::{CatalogStore, ProfileStore};
use crate::models::content::{ContentRef, ContentTypeQuery};
use crate::routes::discovery::TRENDING_CACHE_PATTERN;
use crate::services::content;

#[tracing::instrument(name = "View Content", skip(catalog))]
#[get("/{id}")]
pub async fn view_content(
    catalog: web::Data<dyn CatalogStore>,
    path: web::Path<Uuid>,
    query: web::Query<ContentTypeQuery>,
) -> Result<HttpResponse, AppError> {
    let item = content::view_content(
        catalog.get_ref(),
        ContentRef::new(query.content_type, path.into_inner()),
    )
    .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        item,
        "Content retrieved successfully",
    )))
}

#[tracing::instrument(name = "Delete Content", skip(catalog, profiles, redis_helper, account))]
#[delete("/{id}")]
pub async fn delete_content(
    catalog: web::Data<dyn CatalogStore>,
    profiles: web::Data<dyn ProfileStore>,
    redis_helper: web::Data<RedisHelper>,
    account: AuthenticatedAccount,
    path: web::Path<Uuid>,
    query: web::Query<ContentTypeQuery>,
) -> Result<HttpResponse, AppError> {
    content::delete_content(
        catalog.get_ref(),
        profiles.get_ref(),
        &account,
        ContentRef::new(query.content_type, path.into_inner()),
    )
    .await?;

    if let Err(e) = redis_helper.delete_matching(TRENDING_CACHE_PATTERN).await {
        tracing::warn!(error = %e, "failed to invalidate trending cache");
    }

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new((), "Content deleted successfully")))
}
