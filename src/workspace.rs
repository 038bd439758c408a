//! The workspace: named bindings shared across cell invocations.
//!
//! Replaces the ambient variable namespace of a notebook with an explicit
//! structure owned by the session. Two kinds of bindings live here:
//! scalar parameters used by template substitution, and query results
//! stored by `readsql` cells.

use crate::db::{QueryResult, Value};
use crate::error::{CellError, Result};
use std::collections::HashMap;

/// Name a read result is bound to when the cell gives no target.
pub const DEFAULT_RESULT_NAME: &str = "_result";

/// Named bindings available to cells.
#[derive(Debug, Default)]
pub struct Workspace {
    parameters: HashMap<String, Value>,
    results: HashMap<String, QueryResult>,
}

impl Workspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a scalar parameter, replacing any previous value.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Looks up a scalar parameter.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Stores a query result under the given name, replacing any previous
    /// result with that name.
    pub fn bind_result(&mut self, name: impl Into<String>, result: QueryResult) {
        self.results.insert(name.into(), result);
    }

    /// Looks up a stored query result.
    pub fn result(&self, name: &str) -> Option<&QueryResult> {
        self.results.get(name)
    }

    /// Returns the names of all stored results, sorted.
    pub fn result_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.results.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parses a `name=value` pair (the CLI `-b` form) and sets it as a
    /// parameter. Values that read as integers, floats or booleans are
    /// stored typed; everything else is a string.
    pub fn set_parameter_from_pair(&mut self, pair: &str) -> Result<()> {
        let (name, raw) = pair
            .split_once('=')
            .ok_or_else(|| CellError::usage(format!("expected name=value, got '{pair}'")))?;

        if name.is_empty() {
            return Err(CellError::usage(format!("empty binding name in '{pair}'")));
        }

        let value = if let Ok(i) = raw.parse::<i64>() {
            Value::Int(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            Value::Float(f)
        } else if let Ok(b) = raw.parse::<bool>() {
            Value::Bool(b)
        } else {
            Value::String(raw.to_string())
        };

        self.set_parameter(name, value);
        Ok(())
    }
}
