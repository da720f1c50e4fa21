use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(alias = "movie")]
    Movie,
    #[serde(alias = "series")]
    Series,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::Series => "Series",
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Movie" | "movie" => Ok(ContentType::Movie),
            "Series" | "series" => Ok(ContentType::Series),
            _ => Err(format!("Invalid content type: {}", s)),
        }
    }
}

/// A reference to either a movie or a series. Every catalog lookup goes
/// through this so the movie/series split is resolved in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef {
    pub kind: ContentType,
    pub id: Uuid,
}

impl ContentRef {
    pub fn new(kind: ContentType, id: Uuid) -> Self {
        Self { kind, id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Uuid,
    pub content_type: ContentType,
    pub title: String,
    pub description: Option<String>,
    pub genres: Vec<String>,
    /// Opaque identifier of the poster held by the media host.
    pub poster_asset_id: Option<String>,
    pub is_published: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    pub fn content_ref(&self) -> ContentRef {
        ContentRef::new(self.content_type, self.id)
    }

    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentTypeQuery {
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

#[derive(Debug, Deserialize)]
pub struct RelatedContentQuery {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(alias = "profileId")]
    pub profile_id: Uuid,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}
