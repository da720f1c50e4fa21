use actix_web::web;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub struct RedisHelper {
    client: web::Data<redis::Client>,
}

#[derive(Debug, thiserror::Error)]
pub enum RedisError {
    #[error("Redis connection error: {0}")]
    ConnectionError(#[from] redis::RedisError),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl RedisHelper {
    pub fn new(client: web::Data<redis::Client>) -> Self {
        Self { client }
    }

    async fn get_conn(&self) -> Result<redis::aio::Connection, RedisError> {
        self.client
            .get_async_connection()
            .await
            .map_err(RedisError::ConnectionError)
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RedisError> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await?;
        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expiry: Option<Duration>,
    ) -> Result<(), RedisError> {
        let mut conn = self.get_conn().await?;
        let serialized = serde_json::to_string(value)?;
        match expiry {
            Some(exp) => conn.set_ex(key, serialized, exp.as_secs() as usize).await?,
            None => conn.set(key, serialized).await?,
        }
        Ok(())
    }

    pub async fn delete_matching(&self, pattern: &str) -> Result<usize, RedisError> {
        let mut conn = self.get_conn().await?;
        let keys: Vec<String> = conn.keys(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let deleted: usize = conn.del(keys).await?;
        Ok(deleted)
    }
}
