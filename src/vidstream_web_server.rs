use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web::{Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{dev::Server, App, HttpServer};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_actix_web::TracingLogger;

use crate::core::config::{DiscoverySettings, JwtAuthConfig};
use crate::core::{AppConfig, AppError, RedisHelper};
use crate::db::{
    CatalogStore, InMemoryStore, PgCatalogStore, PgProfileStore, PgSessionStore, ProfileStore,
    SessionStore,
};
use crate::routes::vidstream_routes;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct VidstreamServer {
    port: u16,
    server: Server,
}

impl VidstreamServer {
    pub async fn build(configuration: AppConfig) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.vidstream_server_config.host,
            configuration.vidstream_server_config.port
        );

        let pg_pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect_lazy_with(configuration.postgres.connect());

        if configuration.postgres.run_migrations {
            MIGRATOR.run(&pg_pool).await?;
            tracing::info!("database migrations applied");
        }

        let redis = configuration.redis.connect()?;

        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let app_data = AppData::postgres(pg_pool, redis, &configuration);
        let server = run(listener, app_data)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Everything a request handler may extract, built once per process and
/// cloned into every worker.
#[derive(Clone)]
pub struct AppData {
    catalog: Data<dyn CatalogStore>,
    profiles: Data<dyn ProfileStore>,
    sessions: Data<dyn SessionStore>,
    redis_helper: Data<RedisHelper>,
    jwt_config: Data<JwtAuthConfig>,
    discovery: Data<DiscoverySettings>,
}

impl AppData {
    pub fn postgres(pool: PgPool, redis_client: redis::Client, configuration: &AppConfig) -> Self {
        Self::new(
            Arc::new(PgCatalogStore::new(pool.clone())),
            Arc::new(PgProfileStore::new(pool.clone())),
            Arc::new(PgSessionStore::new(pool)),
            redis_client,
            configuration.jwt_auth_config.clone(),
            configuration.discovery.clone(),
        )
    }

    pub fn in_memory(
        store: Arc<InMemoryStore>,
        redis_client: redis::Client,
        jwt_config: JwtAuthConfig,
        discovery: DiscoverySettings,
    ) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store,
            redis_client,
            jwt_config,
            discovery,
        )
    }

    fn new(
        catalog: Arc<dyn CatalogStore>,
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<dyn SessionStore>,
        redis_client: redis::Client,
        jwt_config: JwtAuthConfig,
        discovery: DiscoverySettings,
    ) -> Self {
        let redis_client = Data::new(redis_client);
        Self {
            catalog: Data::from(catalog),
            profiles: Data::from(profiles),
            sessions: Data::from(sessions),
            redis_helper: Data::new(RedisHelper::new(redis_client)),
            jwt_config: Data::new(jwt_config),
            discovery: Data::new(discovery),
        }
    }

    /// Registers shared state, extractor error handlers and the routes.
    pub fn configure(&self, conf: &mut ServiceConfig) {
        conf.app_data(self.catalog.clone())
            .app_data(self.profiles.clone())
            .app_data(self.sessions.clone())
            .app_data(self.redis_helper.clone())
            .app_data(self.jwt_config.clone())
            .app_data(self.discovery.clone())
            .app_data(
                JsonConfig::default()
                    .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
            )
            .app_data(
                QueryConfig::default()
                    .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
            )
            .app_data(
                PathConfig::default()
                    .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
            )
            .configure(vidstream_routes);
    }
}

pub fn run(listener: TcpListener, app_data: AppData) -> Result<Server, anyhow::Error> {
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .supports_credentials();
        let app_data = app_data.clone();
        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .configure(move |conf| app_data.configure(conf))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
