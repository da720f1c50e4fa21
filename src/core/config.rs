use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::ConnectOptions;

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    pub vidstream_server_config: VidstreamWebServer,
    pub postgres: PostgresConfig,
    pub redis: RedisConfig,
    pub jwt_auth_config: JwtAuthConfig,
    pub discovery: DiscoverySettings,
}

impl AppConfig {
    pub fn new() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir().map_err(|e| {
            config::ConfigError::Message(format!("Failed to find the current dir: {}", e))
        })?;
        let config_dir = base_path.join("src/core/configurations");

        let app_environment: Environment = std::env::var("VIDSTREAM_APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(config::ConfigError::Message)?;

        let configurations = config::Config::builder()
            .add_source(config::File::from(config_dir.join("base")).required(true))
            .add_source(
                config::File::from(config_dir.join(app_environment.as_str())).required(true),
            )
            // e.g. `APP_POSTGRES__PASSWORD=...` overrides `postgres.password`
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        configurations.try_deserialize()
    }
}

#[derive(Deserialize, Clone)]
pub struct VidstreamWebServer {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: String,
    pub password: Option<Secret<String>>,
}

impl RedisConfig {
    pub fn connect(&self) -> Result<redis::Client, redis::RedisError> {
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_str())
            .unwrap_or("");
        let url = format!(
            "redis://:{password}@{host}:{port}",
            password = password,
            host = self.host,
            port = self.port
        );
        redis::Client::open(url)
    }
}

#[derive(Deserialize, Clone)]
pub struct PostgresConfig {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    #[serde(default)]
    pub require_ssl: bool,
    /// Apply `migrations/` on startup.
    #[serde(default)]
    pub run_migrations: bool,
}

impl PostgresConfig {
    pub fn connect(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        let options = PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
            .database(&self.database_name);

        options.log_statements(tracing::log::LevelFilter::Trace)
    }
}

#[derive(Deserialize, Clone)]
pub struct JwtAuthConfig {
    pub secret: Secret<String>,
    pub token_expiration_time: i64,
}

/// Bounds applied to every discovery listing.
#[derive(Deserialize, Clone, Debug)]
pub struct DiscoverySettings {
    pub default_limit: usize,
    pub max_limit: usize,
    pub trending_cache_ttl_secs: u64,
}

impl DiscoverySettings {
    pub fn clamp_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(limit) if limit > 0 => (limit as usize).min(self.max_limit),
            _ => self.default_limit,
        }
    }
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 50,
            trending_cache_ttl_secs: 60,
        }
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not supported environment. Use either `local`, `sandbox` or `production` ",
                other
            )),
        }
    }
}
