use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

use crate::models::my_list::MyListEntry;
use crate::models::watch_history::WatchHistoryEntry;

pub const MAX_PROFILES_PER_ACCOUNT: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub watch_history: Vec<WatchHistoryEntry>,
    pub my_list: Vec<MyListEntry>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(account_id: Uuid, name: ProfileName) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            name: name.into_inner(),
            watch_history: Vec::new(),
            my_list: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ProfileName(String);

impl ProfileName {
    pub fn parse(s: String) -> Result<ProfileName, String> {
        let trimmed = s.trim();
        let is_empty = trimmed.is_empty();
        let is_too_long = trimmed.graphemes(true).count() > 50;
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden = trimmed.chars().any(|c| forbidden_characters.contains(&c));

        if is_empty || is_too_long || contains_forbidden {
            Err(format!("{} is not a valid profile name.", s))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ProfileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
