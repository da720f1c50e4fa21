use std::time::Duration;

use actix_web::{get, web, HttpResponse, Result};
use uuid::Uuid;

use crate::core::config::DiscoverySettings;
use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::{AppError, AppSuccessResponse, RedisHelper};
use crate::db::{CatalogStore, ProfileStore};
use crate::models::content::{CatalogItem, ContentRef, LimitQuery, RelatedContentQuery};
use crate::models::watch_history::ProfileQuery;
use crate::services::discovery;

pub const TRENDING_CACHE_PATTERN: &str = "trending:*";

#[tracing::instrument(name = "Get Recommendations", skip(catalog, profiles, settings, account))]
#[get("")]
pub async fn get_recommendations(
    catalog: web::Data<dyn CatalogStore>,
    profiles: web::Data<dyn ProfileStore>,
    settings: web::Data<DiscoverySettings>,
    account: AuthenticatedAccount,
    query: web::Query<ProfileQuery>,
) -> Result<HttpResponse, AppError> {
    let items = discovery::collaborative_recommendations(
        catalog.get_ref(),
        profiles.get_ref(),
        &account,
        query.profile_id,
        settings.clamp_limit(query.limit),
    )
    .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        items,
        "Recommendations retrieved successfully",
    )))
}

#[tracing::instrument(name = "Get Related Content", skip(catalog, profiles, settings, account))]
#[get("/{id}/related")]
pub async fn get_related_content(
    catalog: web::Data<dyn CatalogStore>,
    profiles: web::Data<dyn ProfileStore>,
    settings: web::Data<DiscoverySettings>,
    account: AuthenticatedAccount,
    path: web::Path<Uuid>,
    query: web::Query<RelatedContentQuery>,
) -> Result<HttpResponse, AppError> {
    let source = ContentRef::new(query.content_type, path.into_inner());
    let items = discovery::related_content(
        catalog.get_ref(),
        profiles.get_ref(),
        &account,
        source,
        query.profile_id,
        settings.clamp_limit(query.limit),
    )
    .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        items,
        "Related content retrieved successfully",
    )))
}

#[tracing::instrument(name = "Get Trending", skip(catalog, settings, redis_helper))]
#[get("/trending")]
pub async fn get_trending(
    catalog: web::Data<dyn CatalogStore>,
    settings: web::Data<DiscoverySettings>,
    redis_helper: web::Data<RedisHelper>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = settings.clamp_limit(query.limit);
    let cache_key = format!("trending:{}", limit);

    match redis_helper.get::<Vec<CatalogItem>>(&cache_key).await {
        Ok(Some(items)) => {
            return Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
                items,
                "Trending content retrieved successfully",
            )))
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "trending cache read failed"),
    }

    let items = discovery::trending(catalog.get_ref(), limit).await?;

    let ttl = Duration::from_secs(settings.trending_cache_ttl_secs);
    if let Err(e) = redis_helper.set(&cache_key, &items, Some(ttl)).await {
        tracing::warn!(error = %e, "trending cache write failed");
    }

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        items,
        "Trending content retrieved successfully",
    )))
}
