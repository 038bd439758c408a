//! Mock database clients for testing.
//!
//! `MockClient` records every statement it is handed and replays scripted
//! results, so dispatcher tests can run without a live database. Cloning a
//! `MockClient` shares its state, letting a test keep a handle for
//! assertions after the session takes ownership of the client.

use super::{ColumnInfo, DatabaseClient, QueryResult, Value};
use crate::error::{CellError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct MockState {
    /// Results returned by successive `fetch` calls, oldest first.
    scripted: VecDeque<QueryResult>,
    /// Every SQL string passed to `fetch`, in order.
    fetched: Vec<String>,
    /// Every SQL string passed to `execute`, in order.
    executed: Vec<String>,
    /// Number of `list_tables` calls made so far.
    listings: usize,
}

/// A mock database client that records calls and returns scripted results.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
    /// Table names returned by `list_tables`.
    tables: Vec<String>,
}

impl MockClient {
    /// Creates a mock client with no scripted results and no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table names returned by `list_tables`.
    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.tables = tables;
        self
    }

    /// Queues a result to be returned by the next unscripted `fetch` call.
    pub fn push_result(&self, result: QueryResult) {
        self.state.lock().unwrap().scripted.push_back(result);
    }

    /// Returns the SQL strings passed to `fetch`, in call order.
    pub fn fetched_sql(&self) -> Vec<String> {
        self.state.lock().unwrap().fetched.clone()
    }

    /// Returns the SQL strings passed to `execute`, in call order.
    pub fn executed_sql(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Returns how many times `list_tables` has been called.
    pub fn table_listing_count(&self) -> usize {
        self.state.lock().unwrap().listings
    }

    /// Fallback result when nothing is scripted: one text column echoing
    /// the SQL, so tests can see what reached the client.
    fn echo_result(sql: &str) -> QueryResult {
        QueryResult {
            columns: vec![ColumnInfo::new("result", "text")],
            rows: vec![vec![Value::String(format!("Mock result for: {sql}"))]],
            execution_time: Duration::from_millis(1),
        }
    }
}

#[async_trait]
impl DatabaseClient for MockClient {
    async fn fetch(&self, sql: &str) -> Result<QueryResult> {
        let mut state = self.state.lock().unwrap();
        state.fetched.push(sql.to_string());
        let scripted = state.scripted.pop_front();
        Ok(scripted.unwrap_or_else(|| Self::echo_result(sql)))
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        self.state.lock().unwrap().executed.push(sql.to_string());
        Ok(0)
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        self.state.lock().unwrap().listings += 1;
        Ok(self.tables.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A client whose every operation fails, for error-path tests.
pub struct FailingClient;

#[async_trait]
impl DatabaseClient for FailingClient {
    async fn fetch(&self, _sql: &str) -> Result<QueryResult> {
        Err(CellError::query("mock fetch failure"))
    }

    async fn execute(&self, _sql: &str) -> Result<u64> {
        Err(CellError::query("mock execute failure"))
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        Err(CellError::query("mock listing failure"))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
