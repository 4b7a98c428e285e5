mod error;
mod models;
mod repositories;

pub use error::{DbError, Result};
pub use models::Installation;
pub use repositories::InstallationRepository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Enable `SQLite` write-ahead logging for better concurrency
    pub enable_wal: bool,
    /// How long a writer waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            enable_wal: true,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Installation store backed by a `SQLite` pool
#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial_schema",
    include_str!("../migrations/001_initial_schema.sql"),
)];

impl Database {
    /// Create a new database connection with default config
    pub async fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        Self::new_with_config(database_path, DatabaseConfig::default()).await
    }

    /// Create a new database connection with custom config
    pub async fn new_with_config(
        database_path: impl AsRef<Path>,
        config: DatabaseConfig,
    ) -> Result<Self> {
        let mut options = SqliteConnectOptions::new()
            .filename(&database_path)
            .create_if_missing(true)
            .busy_timeout(config.busy_timeout);

        if config.enable_wal {
            options = options.pragma("journal_mode", "WAL");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(
            "Connected to database at {} (max_connections: {}, wal: {})",
            database_path.as_ref().display(),
            config.max_connections,
            config.enable_wal
        );

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                applied_at INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        for (name, sql) in MIGRATIONS {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(*name)
                    .fetch_optional(&self.pool)
                    .await?;

            if applied.is_some() {
                info!("Migration {} already applied, skipping", name);
                continue;
            }

            sqlx::query(sql).execute(&self.pool).await?;

            sqlx::query("INSERT INTO _migrations (name, applied_at) VALUES (?, ?)")
                .bind(*name)
                .bind(chrono::Utc::now().timestamp_millis())
                .execute(&self.pool)
                .await?;

            info!("Applied migration: {}", name);
        }

        info!("Database migrations completed");
        Ok(())
    }

    /// Get repository for installation operations
    #[must_use]
    pub fn installations(&self) -> InstallationRepository<'_> {
        InstallationRepository::new(self)
    }
}
