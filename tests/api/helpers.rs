use std::sync::Arc;

use actix_web::web::ServiceConfig;
use chrono::Utc;
use once_cell::sync::Lazy;
use secrecy::Secret;
use serde_json::Value;
use uuid::Uuid;
use vidstream::core::config::{DiscoverySettings, JwtAuthConfig};
use vidstream::core::jwt_auth::{claims_for, generate_jwt_token, Role};
use vidstream::core::{get_subscriber, init_subscriber};
use vidstream::db::InMemoryStore;
use vidstream::models::content::{CatalogItem, ContentType};
use vidstream::vidstream_web_server::AppData;

// Ensure that the `tracing` stack is only initialised once
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub account_id: Uuid,
    jwt_config: JwtAuthConfig,
    app_data: AppData,
}

impl TestApp {
    pub fn configure(&self, conf: &mut ServiceConfig) {
        self.app_data.configure(conf)
    }

    pub fn bearer(&self) -> (&'static str, String) {
        self.bearer_for(self.account_id, Role::Member)
    }

    pub fn bearer_for(&self, account_id: Uuid, role: Role) -> (&'static str, String) {
        let claims = claims_for(account_id, role, &self.jwt_config);
        let token = generate_jwt_token(&claims, &self.jwt_config).expect("Failed to sign token");
        ("Authorization", format!("Bearer {}", token))
    }

    pub fn publish(&self, content_type: ContentType, title: &str, genres: &[&str], views: i64) -> CatalogItem {
        let item = CatalogItem {
            id: Uuid::new_v4(),
            content_type,
            title: title.to_string(),
            description: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            poster_asset_id: None,
            is_published: true,
            view_count: views,
            created_at: Utc::now(),
        };
        self.store
            .put_catalog_item(item.clone())
            .expect("Failed to seed catalog");
        item
    }
}

pub fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let store = Arc::new(InMemoryStore::new());
    let jwt_config = JwtAuthConfig {
        secret: Secret::new(Uuid::new_v4().to_string()),
        token_expiration_time: 60,
    };
    // Nothing listens here, so every cache call falls through to the store.
    let redis_client =
        redis::Client::open("redis://127.0.0.1:1").expect("Failed to build redis client");

    let app_data = AppData::in_memory(
        store.clone(),
        redis_client,
        jwt_config.clone(),
        DiscoverySettings::default(),
    );

    TestApp {
        store,
        account_id: Uuid::new_v4(),
        jwt_config,
        app_data,
    }
}

pub fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data is not a list")
        .iter()
        .map(|item| item["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
