use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{SessionStore, StoreError};
use crate::models::playback::{PlaybackError, PlaybackSession};

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    profile_id: Uuid,
    title_id: Uuid,
    episode_id: Option<Uuid>,
    device_id: Option<Uuid>,
    started_at: DateTime<Utc>,
    last_position_ms: i64,
    duration_ms: i64,
    current_cdn: Option<String>,
    current_bitrate: Option<i64>,
    playback_errors: Json<Vec<PlaybackError>>,
    resume_at: i64,
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl From<SessionRow> for PlaybackSession {
    fn from(row: SessionRow) -> Self {
        PlaybackSession {
            session_id: row.session_id,
            profile_id: row.profile_id,
            title_id: row.title_id,
            episode_id: row.episode_id,
            device_id: row.device_id,
            started_at: row.started_at,
            last_position_ms: row.last_position_ms,
            duration_ms: row.duration_ms,
            current_cdn: row.current_cdn,
            current_bitrate: row.current_bitrate,
            playback_errors: row.playback_errors.0,
            resume_at: row.resume_at,
            is_completed: row.is_completed,
            completed_at: row.completed_at,
        }
    }
}

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert_session(&self, session: &PlaybackSession) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tbl_playback_sessions (
                session_id,
                profile_id,
                title_id,
                episode_id,
                device_id,
                started_at,
                last_position_ms,
                duration_ms,
                current_cdn,
                current_bitrate,
                playback_errors,
                resume_at,
                is_completed,
                completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(session.session_id)
        .bind(session.profile_id)
        .bind(session.title_id)
        .bind(session.episode_id)
        .bind(session.device_id)
        .bind(session.started_at)
        .bind(session.last_position_ms)
        .bind(session.duration_ms)
        .bind(&session.current_cdn)
        .bind(session.current_bitrate)
        .bind(serde_json::to_value(&session.playback_errors)?)
        .bind(session.resume_at)
        .bind(session.is_completed)
        .bind(session.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<PlaybackSession>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                profile_id,
                title_id,
                episode_id,
                device_id,
                started_at,
                last_position_ms,
                duration_ms,
                current_cdn,
                current_bitrate,
                playback_errors,
                resume_at,
                is_completed,
                completed_at
            FROM tbl_playback_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PlaybackSession::from))
    }

    async fn save_session(&self, session: &PlaybackSession) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE tbl_playback_sessions SET
                last_position_ms = $2,
                duration_ms = $3,
                current_cdn = $4,
                current_bitrate = $5,
                playback_errors = $6,
                resume_at = $7,
                is_completed = $8,
                completed_at = $9
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.last_position_ms)
        .bind(session.duration_ms)
        .bind(&session.current_cdn)
        .bind(session.current_bitrate)
        .bind(serde_json::to_value(&session.playback_errors)?)
        .bind(session.resume_at)
        .bind(session.is_completed)
        .bind(session.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
