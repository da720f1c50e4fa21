use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{ProfileStore, StoreError};
use crate::models::my_list::MyListEntry;
use crate::models::profiles::Profile;
use crate::models::watch_history::WatchHistoryEntry;

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    account_id: Uuid,
    name: String,
    watch_history: Json<Vec<WatchHistoryEntry>>,
    my_list: Json<Vec<MyListEntry>>,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            account_id: row.account_id,
            name: row.name,
            watch_history: row.watch_history.0,
            my_list: row.my_list.0,
            created_at: row.created_at,
        }
    }
}

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_profile(&self, profile_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, account_id, name, watch_history, my_list, created_at
            FROM tbl_profiles
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn list_profiles(&self, account_id: Uuid) -> Result<Vec<Profile>, StoreError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, account_id, name, watch_history, my_list, created_at
            FROM tbl_profiles
            WHERE account_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn count_profiles(&self, account_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tbl_profiles WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tbl_profiles (id, account_id, name, watch_history, my_list, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(profile.id)
        .bind(profile.account_id)
        .bind(&profile.name)
        .bind(serde_json::to_value(&profile.watch_history)?)
        .bind(serde_json::to_value(&profile.my_list)?)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_profile(&self, profile_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tbl_profiles WHERE id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn save_watch_history(
        &self,
        profile_id: Uuid,
        history: &[WatchHistoryEntry],
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE tbl_profiles SET watch_history = $2 WHERE id = $1")
            .bind(profile_id)
            .bind(serde_json::to_value(history)?)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn save_my_list(&self, profile_id: Uuid, list: &[MyListEntry]) -> Result<(), StoreError> {
        sqlx::query("UPDATE tbl_profiles SET my_list = $2 WHERE id = $1")
            .bind(profile_id)
            .bind(serde_json::to_value(list)?)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_neighbor_content(
        &self,
        profile_id: Uuid,
        watched: &HashSet<Uuid>,
    ) -> Result<HashSet<Uuid>, StoreError> {
        let watched: Vec<Uuid> = watched.iter().copied().collect();
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT (entry->>'content_id')::uuid
            FROM tbl_profiles p
            CROSS JOIN LATERAL jsonb_array_elements(p.watch_history) AS entry
            WHERE p.id <> $1
            AND EXISTS (
                SELECT 1
                FROM jsonb_array_elements(p.watch_history) AS seen
                WHERE (seen->>'content_id')::uuid = ANY($2)
            )
            "#,
        )
        .bind(profile_id)
        .bind(&watched)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    async fn purge_content(&self, content_id: Uuid) -> Result<u64, StoreError> {
        let probe = serde_json::json!([{ "content_id": content_id }]);
        let result = sqlx::query(
            r#"
            UPDATE tbl_profiles SET
                watch_history = COALESCE((
                    SELECT jsonb_agg(entry ORDER BY ord)
                    FROM jsonb_array_elements(watch_history) WITH ORDINALITY AS t(entry, ord)
                    WHERE (entry->>'content_id')::uuid <> $1
                ), '[]'::jsonb),
                my_list = COALESCE((
                    SELECT jsonb_agg(entry ORDER BY ord)
                    FROM jsonb_array_elements(my_list) WITH ORDINALITY AS t(entry, ord)
                    WHERE (entry->>'content_id')::uuid <> $1
                ), '[]'::jsonb)
            WHERE watch_history @> $2 OR my_list @> $2
            "#,
        )
        .bind(content_id)
        .bind(probe)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
