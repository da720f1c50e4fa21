use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{CatalogStore, StoreError};
use crate::models::content::{CatalogItem, ContentRef, ContentType};

#[derive(sqlx::FromRow)]
struct CatalogRow {
    id: Uuid,
    content_type: String,
    title: String,
    description: Option<String>,
    genres: Vec<String>,
    poster_asset_id: Option<String>,
    is_published: bool,
    view_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<CatalogRow> for CatalogItem {
    type Error = StoreError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        Ok(CatalogItem {
            id: row.id,
            content_type: row.content_type.parse().map_err(StoreError::Corrupt)?,
            title: row.title,
            description: row.description,
            genres: row.genres,
            poster_asset_id: row.poster_asset_id,
            is_published: row.is_published,
            view_count: row.view_count,
            created_at: row.created_at,
        })
    }
}

fn table(kind: ContentType) -> &'static str {
    match kind {
        ContentType::Movie => "tbl_movies",
        ContentType::Series => "tbl_series",
    }
}

fn columns(kind: ContentType) -> String {
    format!(
        "id, '{}'::text AS content_type, title, description, genres, poster_asset_id, \
         is_published, view_count, created_at",
        kind.as_str()
    )
}

/// `SELECT` over movies and series together, filtered by `condition`.
fn published_union(condition: &str) -> String {
    format!(
        r#"
        SELECT {movie_columns} FROM tbl_movies WHERE is_published AND {condition}
        UNION ALL
        SELECT {series_columns} FROM tbl_series WHERE is_published AND {condition}
        "#,
        movie_columns = columns(ContentType::Movie),
        series_columns = columns(ContentType::Series),
        condition = condition
    )
}

fn into_items(rows: Vec<CatalogRow>) -> Result<Vec<CatalogItem>, StoreError> {
    rows.into_iter().map(CatalogItem::try_from).collect()
}

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_by_id(&self, content: ContentRef) -> Result<Option<CatalogItem>, StoreError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            columns(content.kind),
            table(content.kind)
        );
        let row = sqlx::query_as::<_, CatalogRow>(&query)
            .bind(content.id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CatalogItem::try_from).transpose()
    }

    async fn find_trending(
        &self,
        limit: usize,
        exclude: &HashSet<Uuid>,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        let query = format!(
            "{} ORDER BY view_count DESC, id ASC LIMIT $2",
            published_union("NOT (id = ANY($1))")
        );
        let exclude: Vec<Uuid> = exclude.iter().copied().collect();
        let rows = sqlx::query_as::<_, CatalogRow>(&query)
            .bind(&exclude)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        into_items(rows)
    }

    async fn find_by_genre(
        &self,
        genre: &str,
        limit: usize,
        exclude: &HashSet<Uuid>,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        let query = format!(
            "{} ORDER BY view_count DESC, id ASC LIMIT $3",
            published_union("$1 = ANY(genres) AND NOT (id = ANY($2))")
        );
        let exclude: Vec<Uuid> = exclude.iter().copied().collect();
        let rows = sqlx::query_as::<_, CatalogRow>(&query)
            .bind(genre)
            .bind(&exclude)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        into_items(rows)
    }

    async fn find_published_by_ids(
        &self,
        ids: &[Uuid],
        limit: usize,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        let query = format!(
            "{} ORDER BY view_count DESC, id ASC LIMIT $2",
            published_union("id = ANY($1)")
        );
        let rows = sqlx::query_as::<_, CatalogRow>(&query)
            .bind(ids)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        into_items(rows)
    }

    async fn record_view(&self, content: ContentRef) -> Result<Option<CatalogItem>, StoreError> {
        let query = format!(
            "UPDATE {} SET view_count = view_count + 1 WHERE id = $1 AND is_published RETURNING {}",
            table(content.kind),
            columns(content.kind)
        );
        let row = sqlx::query_as::<_, CatalogRow>(&query)
            .bind(content.id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CatalogItem::try_from).transpose()
    }

    async fn delete(&self, content: ContentRef) -> Result<bool, StoreError> {
        let query = format!("DELETE FROM {} WHERE id = $1", table(content.kind));
        let result = sqlx::query(&query)
            .bind(content.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
