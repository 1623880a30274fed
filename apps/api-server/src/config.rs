//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use bloghub_infra::{DatabaseConfig, LocalStoreConfig};

#[cfg(feature = "blob")]
use bloghub_infra::BlobStoreConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations at start-up.
    pub run_migrations: bool,
    /// Insert sample content when the store has no categories.
    pub seed_data: bool,
    /// Author recorded on posts created without an `X-Author-Id` header.
    pub default_author_id: String,
    pub local_store: LocalStoreConfig,
    #[cfg(feature = "blob")]
    pub blob_store: Option<BlobStoreConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 100),
            min_connections: parse_or("DB_MIN_CONNECTIONS", 10),
            connect_timeout: Duration::from_secs(parse_or("DB_CONNECT_TIMEOUT_SECS", 10)),
        });

        let local_store = LocalStoreConfig {
            dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/uploads")),
            public_path: env::var("UPLOAD_PUBLIC_PATH").unwrap_or_else(|_| "/uploads".to_string()),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            database,
            run_migrations: flag("RUN_MIGRATIONS"),
            seed_data: flag("SEED_DATA"),
            default_author_id: env::var("DEFAULT_AUTHOR_ID")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "default-author".to_string()),
            local_store,
            #[cfg(feature = "blob")]
            blob_store: env::var("BLOB_STORE_URL").ok().map(|base_url| BlobStoreConfig {
                base_url,
                token: env::var("BLOB_READ_WRITE_TOKEN").unwrap_or_default(),
            }),
        }
    }
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
