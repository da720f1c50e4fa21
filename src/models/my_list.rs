use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::content::{ContentRef, ContentType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyListEntry {
    pub content_id: Uuid,
    pub content_type: ContentType,
    pub added_at: DateTime<Utc>,
}

impl MyListEntry {
    pub fn content_ref(&self) -> ContentRef {
        ContentRef::new(self.content_type, self.content_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddToMyListRequest {
    #[serde(alias = "contentId")]
    pub content_id: Uuid,
    #[serde(alias = "contentType")]
    pub content_type: ContentType,
}

// Returns false when the content is already listed.
pub fn add_to_list(list: &mut Vec<MyListEntry>, content: ContentRef, now: DateTime<Utc>) -> bool {
    if list.iter().any(|entry| entry.content_id == content.id) {
        return false;
    }
    list.push(MyListEntry {
        content_id: content.id,
        content_type: content.kind,
        added_at: now,
    });
    true
}

pub fn remove_from_list(list: &mut Vec<MyListEntry>, content_id: Uuid) -> bool {
    let before = list.len();
    list.retain(|entry| entry.content_id != content_id);
    list.len() != before
}
