use actix_web::{get, post, web, HttpResponse, Result};

use crate::core::config::DiscoverySettings;
use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::{AppError, AppSuccessResponse};
use crate::db::{CatalogStore, ProfileStore};
use crate::models::watch_history::{ProfileQuery, ReportProgressRequest};
use crate::services::progress;

#[tracing::instrument(name = "Report Progress", skip(profiles, account, request))]
#[post("/update")]
pub async fn report_progress(
    profiles: web::Data<dyn ProfileStore>,
    account: AuthenticatedAccount,
    request: web::Json<ReportProgressRequest>,
) -> Result<HttpResponse, AppError> {
    progress::report_progress(profiles.get_ref(), &account, &request).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new((), "Progress recorded")))
}

#[tracing::instrument(name = "Get Watch History", skip(profiles, account))]
#[get("/history")]
pub async fn get_watch_history(
    profiles: web::Data<dyn ProfileStore>,
    account: AuthenticatedAccount,
    query: web::Query<ProfileQuery>,
) -> Result<HttpResponse, AppError> {
    let history = progress::watch_history(profiles.get_ref(), &account, query.profile_id).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        history,
        "Watch history retrieved successfully",
    )))
}

#[tracing::instrument(name = "Continue Watching", skip(catalog, profiles, settings, account))]
#[get("/continue-watching")]
pub async fn get_continue_watching(
    catalog: web::Data<dyn CatalogStore>,
    profiles: web::Data<dyn ProfileStore>,
    settings: web::Data<DiscoverySettings>,
    account: AuthenticatedAccount,
    query: web::Query<ProfileQuery>,
) -> Result<HttpResponse, AppError> {
    let items = progress::continue_watching(
        catalog.get_ref(),
        profiles.get_ref(),
        &account,
        query.profile_id,
        settings.clamp_limit(query.limit),
    )
    .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        items,
        "Continue watching retrieved successfully",
    )))
}
