//! The session: everything a cell invocation needs, owned in one place.
//!
//! Rather than reaching for ambient globals, each dispatch receives a
//! `&mut Session` carrying the database client, the workspace bindings,
//! the table registry and the display sink. The caller creates it once,
//! runs cells against it, and closes it when done.

use crate::db::DatabaseClient;
use crate::display::DisplaySink;
use crate::error::Result;
use crate::registry::TableRegistry;
use crate::workspace::Workspace;

/// Shared state for a sequence of cell invocations.
pub struct Session {
    /// The database connection, constructed by the caller.
    pub client: Box<dyn DatabaseClient>,
    /// Scalar parameters and bound query results.
    pub workspace: Workspace,
    /// Cached list of known table names.
    pub registry: TableRegistry,
    /// Where tables and echoed text are rendered.
    pub sink: Box<dyn DisplaySink>,
}

impl Session {
    /// Creates a session around an existing client and sink.
    pub fn new(client: Box<dyn DatabaseClient>, sink: Box<dyn DisplaySink>) -> Self {
        Self {
            client,
            workspace: Workspace::new(),
            registry: TableRegistry::new(),
            sink,
        }
    }

    /// Closes the underlying database connection.
    pub async fn close(&self) -> Result<()> {
        self.client.close().await
    }
}
