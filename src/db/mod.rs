//! Database abstraction layer for sqlcell.
//!
//! Provides a trait-based interface for the two query primitives the cell
//! dispatcher needs, allowing different backends to be used interchangeably.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingClient, MockClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    // Future: MySQL, SQLite, etc.
}

impl DatabaseBackend {
    /// Returns the backend as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }

    /// Returns the default port for this backend.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Postgres => 5432,
        }
    }
}

/// Creates a database client for the given configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    match config.backend {
        DatabaseBackend::Postgres => {
            let client = PostgresClient::connect(config).await?;
            Ok(Box::new(client))
        }
    }
}

/// Trait defining the interface for database clients.
///
/// The cell dispatcher only needs two execution primitives (fetch rows,
/// run a statement) plus a table listing for the registry refresh. All
/// operations are async and return Results with CellError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a read query and returns the fetched rows.
    async fn fetch(&self, sql: &str) -> Result<QueryResult>;

    /// Executes a write/DDL statement, returning the number of rows affected.
    async fn execute(&self, sql: &str) -> Result<u64>;

    /// Lists the names of tables visible on this connection.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
