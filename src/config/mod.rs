use serde::{Deserialize, Serialize};

/// Salt used when VISITOR_SALT is not set. Fine for local development,
/// but production deployments must provide their own secret.
pub const DEFAULT_VISITOR_SALT: &str = "qrtrail-dev-salt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings the request handlers need; passed explicitly into router
/// construction rather than read from process globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Public origin used to derive tracking URLs (`{base}/t/{code}`).
    pub public_base_url: String,
    /// Secret mixed into the visitor hash. Rotating it breaks
    /// unique-visitor continuity across the rotation boundary.
    pub visitor_salt: String,
    /// Origins allowed to call the JSON API cross-origin.
    pub allowed_origins: Vec<String>,
    /// Optional path to a MaxMind GeoLite2-City .mmdb file.
    pub geoip_city_db: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            _ => DatabaseBackend::Sqlite,
        };

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./qrtrail.db".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let visitor_salt = match std::env::var("VISITOR_SALT") {
            Ok(salt) if !salt.is_empty() => salt,
            _ => {
                tracing::warn!(
                    "VISITOR_SALT not set, using the development default; \
                     set a deployment secret in production"
                );
                DEFAULT_VISITOR_SALT.to_string()
            }
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let geoip_city_db = std::env::var("GEOIP_CITY_DB").ok().filter(|p| !p.is_empty());

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
            },
            server: ServerConfig { host, port },
            tracking: TrackingConfig {
                public_base_url,
                visitor_salt,
                allowed_origins,
                geoip_city_db,
            },
        })
    }
}
