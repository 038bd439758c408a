//! Display sinks for cell output.
//!
//! A `DisplaySink` is where the dispatcher routes everything the user sees:
//! rendered result tables and echoed text. The console sink writes aligned
//! plain-text tables to stdout; the JSON sink emits one JSON document per
//! result for scripted consumers; the capturing sink records calls so tests
//! can assert on what would have been displayed.

use crate::db::{QueryResult, Value};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Where cell output goes.
pub trait DisplaySink {
    /// Renders a query result, showing at most `limit` rows when given.
    fn table(&mut self, result: &QueryResult, limit: Option<usize>);

    /// Emits a line of plain text.
    fn text(&mut self, text: &str);
}

/// Formats a query result as an aligned plain-text table.
///
/// Shows at most `limit` rows when given, with a footer stating how many
/// rows were shown out of the total.
pub fn format_table(result: &QueryResult, limit: Option<usize>) -> String {
    let total = result.row_count();
    let rows = match limit {
        Some(n) => result.head(n),
        None => result.rows.as_slice(),
    };

    if result.columns.is_empty() {
        return format!("({total} rows)\n");
    }

    let widths = column_widths(result, rows);

    let mut out = String::new();
    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(col, &w)| pad(&truncate(&col.name, w), w))
        .collect();
    out.push_str(&header.join(" | "));
    out.push('\n');

    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&separator.join("-+-"));
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, &w)| pad(&truncate(&value.to_display_string(), w), w))
            .collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }

    if rows.len() < total {
        out.push_str(&format!("({} of {total} rows shown)\n", rows.len()));
    } else {
        out.push_str(&format!("({total} rows)\n"));
    }

    out
}

/// Converts a query result to a JSON document, applying the row limit.
pub fn result_to_json(result: &QueryResult, limit: Option<usize>) -> serde_json::Value {
    let rows = match limit {
        Some(n) => result.head(n),
        None => result.rows.as_slice(),
    };

    let columns: Vec<serde_json::Value> = result
        .columns
        .iter()
        .map(|col| {
            serde_json::json!({
                "name": col.name,
                "type": col.data_type,
            })
        })
        .collect();

    let json_rows: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| serde_json::Value::Array(row.iter().map(value_to_json).collect()))
        .collect();

    serde_json::json!({
        "columns": columns,
        "rows": json_rows,
        "row_count": result.row_count(),
    })
}

/// Maps a database value to its JSON representation.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::json!(i),
        Value::Float(f) => serde_json::json!(f),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => serde_json::Value::String(format!("<{} bytes>", b.len())),
    }
}

/// Calculates the display width for each column.
fn column_widths(result: &QueryResult, rows: &[Vec<Value>]) -> Vec<usize> {
    let mut widths: Vec<usize> = result
        .columns
        .iter()
        .map(|col| col.name.len().max(MIN_COLUMN_WIDTH))
        .collect();

    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(value.to_display_string().len());
            }
        }
    }

    widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
}

/// Truncates a string to fit within the given width, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.len() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        format!("{}...", &s[..max_width - 3])
    }
}

/// Right-pads a string to the given width.
fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

/// Sink that writes to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Creates a console sink.
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for ConsoleSink {
    fn table(&mut self, result: &QueryResult, limit: Option<usize>) {
        print!("{}", format_table(result, limit));
    }

    fn text(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Sink that emits results as JSON documents, one per line.
#[derive(Debug, Default)]
pub struct JsonSink;

impl JsonSink {
    /// Creates a JSON sink.
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for JsonSink {
    fn table(&mut self, result: &QueryResult, limit: Option<usize>) {
        println!("{}", result_to_json(result, limit));
    }

    fn text(&mut self, text: &str) {
        println!("{}", serde_json::json!({ "text": text }));
    }
}

/// What a capturing sink saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// A table render: rows shown, total rows in the result.
    Table { shown: usize, total: usize },
    /// A text line.
    Text(String),
}

/// Sink that records calls instead of printing, for tests.
///
/// Clones share their recording, letting a test keep a handle for
/// assertions after the session takes ownership of the sink.
#[derive(Debug, Clone, Default)]
pub struct CapturingSink {
    rendered: std::sync::Arc<std::sync::Mutex<Vec<Rendered>>>,
}

impl CapturingSink {
    /// Creates an empty capturing sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything rendered so far, in order.
    pub fn rendered(&self) -> Vec<Rendered> {
        self.rendered.lock().unwrap().clone()
    }
}

impl DisplaySink for CapturingSink {
    fn table(&mut self, result: &QueryResult, limit: Option<usize>) {
        let total = result.row_count();
        let shown = match limit {
            Some(n) => n.min(total),
            None => total,
        };
        self.rendered
            .lock()
            .unwrap()
            .push(Rendered::Table { shown, total });
    }

    fn text(&mut self, text: &str) {
        self.rendered
            .lock()
            .unwrap()
            .push(Rendered::Text(text.to_string()));
    }
}
