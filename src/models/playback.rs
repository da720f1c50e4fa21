use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Only the most recent errors are kept on a session.
pub const MAX_PLAYBACK_ERRORS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackError {
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    pub session_id: Uuid,
    pub profile_id: Uuid,
    pub title_id: Uuid,
    pub episode_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub last_position_ms: i64,
    pub duration_ms: i64,
    pub current_cdn: Option<String>,
    pub current_bitrate: Option<i64>,
    pub playback_errors: Vec<PlaybackError>,
    pub resume_at: i64,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StartPlaybackRequest {
    #[serde(alias = "profileId")]
    pub profile_id: Uuid,
    #[serde(alias = "titleId")]
    pub title_id: Uuid,
    #[serde(default, alias = "episodeId")]
    pub episode_id: Option<Uuid>,
    #[serde(default, alias = "deviceId")]
    pub device_id: Option<Uuid>,
    #[serde(alias = "durationMs")]
    #[validate(range(min = 0, message = "duration_ms must not be negative"))]
    pub duration_ms: i64,
    #[serde(default, alias = "resumeAt")]
    #[validate(range(min = 0, message = "resume_at must not be negative"))]
    pub resume_at: Option<i64>,
    #[serde(default, alias = "currentCdn")]
    #[validate(length(min = 1, max = 255, message = "current_cdn must be 1-255 characters"))]
    pub current_cdn: Option<String>,
    #[serde(default, alias = "currentBitrate")]
    #[validate(range(min = 0, message = "current_bitrate must not be negative"))]
    pub current_bitrate: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackErrorReport {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlaybackRequest {
    #[serde(default, alias = "lastPositionMs")]
    #[validate(range(min = 0, message = "last_position_ms must not be negative"))]
    pub last_position_ms: Option<i64>,
    #[serde(default, alias = "durationMs")]
    #[validate(range(min = 0, message = "duration_ms must not be negative"))]
    pub duration_ms: Option<i64>,
    #[serde(default, alias = "resumeAt")]
    #[validate(range(min = 0, message = "resume_at must not be negative"))]
    pub resume_at: Option<i64>,
    #[serde(default, alias = "currentCdn")]
    #[validate(length(min = 1, max = 255, message = "current_cdn must be 1-255 characters"))]
    pub current_cdn: Option<String>,
    #[serde(default, alias = "currentBitrate")]
    #[validate(range(min = 0, message = "current_bitrate must not be negative"))]
    pub current_bitrate: Option<i64>,
    #[serde(default, alias = "playbackError")]
    pub playback_error: Option<PlaybackErrorReport>,
}

#[derive(Debug, Serialize)]
pub struct StartPlaybackResponse {
    pub session_id: Uuid,
}

impl PlaybackSession {
    pub fn start(request: &StartPlaybackRequest, now: DateTime<Utc>) -> Self {
        let resume_at = request.resume_at.unwrap_or(0);
        Self {
            session_id: Uuid::new_v4(),
            profile_id: request.profile_id,
            title_id: request.title_id,
            episode_id: request.episode_id,
            device_id: request.device_id,
            started_at: now,
            last_position_ms: resume_at,
            duration_ms: request.duration_ms,
            current_cdn: request.current_cdn.clone(),
            current_bitrate: request.current_bitrate,
            playback_errors: Vec::new(),
            resume_at,
            is_completed: false,
            completed_at: None,
        }
    }

    /// Apply the fields present in `update`; absent fields are untouched.
    /// An error report is recorded only when it has both a code and a message.
    pub fn apply_update(&mut self, update: &UpdatePlaybackRequest, now: DateTime<Utc>) {
        if let Some(position) = update.last_position_ms {
            self.last_position_ms = position;
        }
        if let Some(duration) = update.duration_ms {
            self.duration_ms = duration;
        }
        if let Some(resume_at) = update.resume_at {
            self.resume_at = resume_at;
        }
        if let Some(cdn) = &update.current_cdn {
            self.current_cdn = Some(cdn.clone());
        }
        if let Some(bitrate) = update.current_bitrate {
            self.current_bitrate = Some(bitrate);
        }
        if let Some(PlaybackErrorReport {
            code: Some(code),
            message: Some(message),
        }) = &update.playback_error
        {
            self.playback_errors.push(PlaybackError {
                code: code.clone(),
                message: message.clone(),
                timestamp: now,
            });
            if self.playback_errors.len() > MAX_PLAYBACK_ERRORS {
                let overflow = self.playback_errors.len() - MAX_PLAYBACK_ERRORS;
                self.playback_errors.drain(..overflow);
            }
        }
    }

    // Terminal. Calling it again just stamps the completion time anew.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(now);
    }
}
