pub mod entities;
pub mod migrator;
pub mod repositories;

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, ExecResult,
    QueryResult, Statement,
};
use tracing::info;

use crate::config::DatabaseSection;
use crate::shared::InfraError;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./users.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from(&DatabaseSection::default())
    }
}

impl From<&DatabaseSection> for DatabaseConfig {
    fn from(section: &DatabaseSection) -> Self {
        Self {
            url: section.url.clone(),
            max_connections: section.max_connections.max(1),
            connect_timeout: Duration::from_secs(section.connect_timeout_secs),
        }
    }
}

impl DatabaseConfig {
    /// Private in-memory SQLite database on a single connection
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(8),
        }
    }
}

/// Process-wide handle to the relational store.
///
/// Cheap to clone: every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct DataStore {
    db: DatabaseConnection,
}

impl DataStore {
    /// Connect and verify the connection with a round-trip ping.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, InfraError> {
        info!("Connecting to database: {}", redact_url(&config.url));

        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .connect_timeout(config.connect_timeout)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .map_err(InfraError::Connection)?;
        db.ping().await.map_err(InfraError::Connection)?;

        info!("Database connected successfully");
        Ok(Self { db })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.db.get_database_backend()
    }

    pub async fn ping(&self) -> Result<(), sea_orm::DbErr> {
        self.db.ping().await
    }

    /// Run a statement with bound values and return its rows.
    pub async fn query(&self, stmt: Statement) -> Result<Vec<QueryResult>, sea_orm::DbErr> {
        self.db.query_all(stmt).await
    }

    /// Run a statement with bound values and return the affected row count.
    pub async fn execute(&self, stmt: Statement) -> Result<u64, sea_orm::DbErr> {
        self.db.execute(stmt).await.map(|r: ExecResult| r.rows_affected())
    }

    /// Close the pool. Other clones of this handle become unusable.
    pub async fn close(self) -> Result<(), sea_orm::DbErr> {
        self.db.close().await
    }
}

/// Hide the password component of a connection URL for logging.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_string(),
    }
}
