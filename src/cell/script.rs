//! Parser for cell scripts.
//!
//! A script is a sequence of cells in the notebook surface syntax: a line
//! starting with `%%` names the magic and carries its options line, and the
//! following lines up to the next `%%` header (or end of input) form the
//! body. Blank lines and `--` comment lines between cells are ignored.

use super::Magic;
use crate::error::{CellError, Result};

/// One parsed cell, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The operation named in the header.
    pub magic: Magic,
    /// Everything after the magic name on the header line.
    pub options_line: String,
    /// The cell body, trailing whitespace trimmed.
    pub body: String,
    /// 1-based line number of the header, for error messages.
    pub line: usize,
}

/// Parses a script into cells.
///
/// Fails with a usage error on an unknown magic name or on non-blank text
/// outside any cell.
pub fn parse_script(input: &str) -> Result<Vec<Cell>> {
    let mut cells: Vec<Cell> = Vec::new();
    let mut current: Option<Cell> = None;
    let mut body_lines: Vec<&str> = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;

        if let Some(header) = line.strip_prefix("%%") {
            if let Some(mut cell) = current.take() {
                cell.body = finish_body(&body_lines);
                body_lines.clear();
                cells.push(cell);
            }

            let header = header.trim();
            let (name, options_line) = match header.split_once(char::is_whitespace) {
                Some((name, rest)) => (name, rest.trim().to_string()),
                None => (header, String::new()),
            };

            let magic = Magic::from_name(name).ok_or_else(|| {
                CellError::usage(format!("unknown magic '%%{name}' on line {line_no}"))
            })?;

            current = Some(Cell {
                magic,
                options_line,
                body: String::new(),
                line: line_no,
            });
            continue;
        }

        if current.is_some() {
            body_lines.push(line);
        } else if !line.trim().is_empty() && !line.trim_start().starts_with("--") {
            return Err(CellError::usage(format!(
                "expected a %%magic header on line {line_no}, got '{}'",
                line.trim()
            )));
        }
    }

    if let Some(mut cell) = current.take() {
        cell.body = finish_body(&body_lines);
        cells.push(cell);
    }

    Ok(cells)
}

fn finish_body(lines: &[&str]) -> String {
    lines.join("\n").trim_end().to_string()
}
