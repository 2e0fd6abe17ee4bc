use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use qrtrail::analytics::GeoIpService;
use qrtrail::api;
use qrtrail::config::{Config, DatabaseBackend};
use qrtrail::redirect;
use qrtrail::storage::{PostgresStorage, SqliteStorage, Storage};

const DB_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteStorage::new(&config.database.url, DB_MAX_CONNECTIONS).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(PostgresStorage::new(&config.database.url, DB_MAX_CONNECTIONS).await?)
        }
    };

    storage.init().await?;
    info!("Database initialized");

    // GeoIP is optional; without a database every click carries "unknown" geo hints
    let geoip = Arc::new(GeoIpService::new(config.tracking.geoip_city_db.as_deref())?);
    if config.tracking.geoip_city_db.is_some() {
        info!("GeoIP City database loaded");
    } else {
        info!("No GeoIP database configured, geo hints will be 'unknown'");
    }

    // API + health behind CORS, tracking redirects without it
    let app = api::create_api_router(Arc::clone(&storage), config.tracking.clone()).merge(
        redirect::create_redirect_router(
            storage,
            geoip,
            config.tracking.visitor_salt.clone(),
        ),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("qrtrail listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
