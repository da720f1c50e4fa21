//! Playback session lifecycle: `Started -> (Updated)* -> Completed`.
//!
//! Sessions are independent of watch history. Completing one does not write
//! a resume point; clients report progress separately.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::AppError;
use crate::db::{ProfileStore, SessionStore};
use crate::models::playback::{PlaybackSession, StartPlaybackRequest, UpdatePlaybackRequest};
use crate::services::profiles::resolve_owned_profile;

pub async fn start_session(
    profiles: &dyn ProfileStore,
    sessions: &dyn SessionStore,
    account: &AuthenticatedAccount,
    request: &StartPlaybackRequest,
) -> Result<PlaybackSession, AppError> {
    request.validate()?;
    resolve_owned_profile(profiles, account, request.profile_id).await?;

    let session = PlaybackSession::start(request, Utc::now());
    sessions.insert_session(&session).await?;

    tracing::info!(
        session_id = %session.session_id,
        title_id = %session.title_id,
        "playback session started"
    );
    Ok(session)
}

/// Load a session the caller may act on.
pub async fn get_session(
    profiles: &dyn ProfileStore,
    sessions: &dyn SessionStore,
    account: &AuthenticatedAccount,
    session_id: Uuid,
) -> Result<PlaybackSession, AppError> {
    let session = sessions
        .find_session(session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Playback session not found"))?;

    match profiles.find_profile(session.profile_id).await? {
        Some(profile) if profile.account_id == account.account_id => Ok(session),
        _ => Err(AppError::forbidden_error(
            "Playback session belongs to another account",
        )),
    }
}

pub async fn update_session(
    profiles: &dyn ProfileStore,
    sessions: &dyn SessionStore,
    account: &AuthenticatedAccount,
    session_id: Uuid,
    update: &UpdatePlaybackRequest,
) -> Result<PlaybackSession, AppError> {
    update.validate()?;
    let mut session = get_session(profiles, sessions, account, session_id).await?;

    if session.is_completed {
        tracing::warn!(%session_id, "telemetry received for a completed session");
    }

    session.apply_update(update, Utc::now());
    sessions.save_session(&session).await?;
    Ok(session)
}

pub async fn complete_session(
    profiles: &dyn ProfileStore,
    sessions: &dyn SessionStore,
    account: &AuthenticatedAccount,
    session_id: Uuid,
) -> Result<PlaybackSession, AppError> {
    let mut session = get_session(profiles, sessions, account, session_id).await?;

    session.complete(Utc::now());
    sessions.save_session(&session).await?;

    tracing::info!(%session_id, last_position_ms = session.last_position_ms, "playback session completed");
    Ok(session)
}
