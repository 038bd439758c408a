//! Cached registry of known table names.
//!
//! The registry is re-synchronized against the connection after every
//! `readsql`/`execsql` cell, so a cell that creates or drops a table is
//! reflected immediately.

use crate::db::DatabaseClient;
use crate::error::Result;
use tracing::debug;

/// A cached list of the table names visible on the connection.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: Vec<String>,
    generation: u64,
}

impl TableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table names, in the order the backend listed them.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Returns true if the given table name is in the cache.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t == name)
    }

    /// Number of refreshes performed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Re-lists tables from the connection, replacing the cache.
    ///
    /// Returns the number of tables found.
    pub async fn refresh(&mut self, client: &dyn DatabaseClient) -> Result<usize> {
        self.tables = client.list_tables().await?;
        self.generation += 1;
        debug!(
            "Table registry refreshed: {} tables (generation {})",
            self.tables.len(),
            self.generation
        );
        Ok(self.tables.len())
    }
}
