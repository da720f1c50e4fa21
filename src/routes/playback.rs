use actix_web::{get, patch, post, web, HttpResponse, Result};
use uuid::Uuid;

use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::{AppError, AppSuccessResponse};
use crate::db::{ProfileStore, SessionStore};
use crate::models::playback::{StartPlaybackRequest, StartPlaybackResponse, UpdatePlaybackRequest};
use crate::services::playback;

#[tracing::instrument(name = "Start Playback", skip(profiles, sessions, account, request))]
#[post("/start")]
pub async fn start_playback(
    profiles: web::Data<dyn ProfileStore>,
    sessions: web::Data<dyn SessionStore>,
    account: AuthenticatedAccount,
    request: web::Json<StartPlaybackRequest>,
) -> Result<HttpResponse, AppError> {
    let session =
        playback::start_session(profiles.get_ref(), sessions.get_ref(), &account, &request)
            .await?;

    Ok(HttpResponse::Created().json(AppSuccessResponse::new(
        StartPlaybackResponse {
            session_id: session.session_id,
        },
        "Playback session started",
    )))
}

#[tracing::instrument(name = "Get Playback Session", skip(profiles, sessions, account))]
#[get("/{session_id}")]
pub async fn get_playback_session(
    profiles: web::Data<dyn ProfileStore>,
    sessions: web::Data<dyn SessionStore>,
    account: AuthenticatedAccount,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let session =
        playback::get_session(profiles.get_ref(), sessions.get_ref(), &account, path.into_inner())
            .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        session,
        "Playback session retrieved successfully",
    )))
}

#[tracing::instrument(name = "Update Playback Session", skip(profiles, sessions, account, request))]
#[patch("/{session_id}")]
pub async fn update_playback_session(
    profiles: web::Data<dyn ProfileStore>,
    sessions: web::Data<dyn SessionStore>,
    account: AuthenticatedAccount,
    path: web::Path<Uuid>,
    request: web::Json<UpdatePlaybackRequest>,
) -> Result<HttpResponse, AppError> {
    playback::update_session(
        profiles.get_ref(),
        sessions.get_ref(),
        &account,
        path.into_inner(),
        &request,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new((), "Playback session updated")))
}

#[tracing::instrument(name = "Complete Playback Session", skip(profiles, sessions, account))]
#[post("/{session_id}/complete")]
pub async fn complete_playback_session(
    profiles: web::Data<dyn ProfileStore>,
    sessions: web::Data<dyn SessionStore>,
    account: AuthenticatedAccount,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    playback::complete_session(profiles.get_ref(), sessions.get_ref(), &account, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new((), "Playback session completed")))
}
