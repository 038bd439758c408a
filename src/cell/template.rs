//! Placeholder substitution for cell bodies.
//!
//! A cell body may reference workspace parameters as `{name}`. Doubled
//! braces (`{{`, `}}`) produce literal braces. Bodies are split on `$`
//! before substitution: with a single segment the whole body is expanded,
//! with multiple segments only the first and last are. Interior segments
//! (typically embedded function bodies, which use `$$` quoting) pass
//! through untouched and the segments are rejoined with `$`.

use crate::error::{CellError, Result};
use crate::workspace::Workspace;

/// The segment delimiter that protects embedded function bodies.
const DELIMITER: char = '$';

/// Expands placeholders in a cell body against the workspace parameters.
///
/// Splitting and rejoining always preserve the original `$` characters.
pub fn expand(body: &str, workspace: &Workspace) -> Result<String> {
    let mut segments: Vec<String> = body.split(DELIMITER).map(String::from).collect();

    if segments.len() == 1 {
        return substitute(&segments[0], workspace);
    }

    let last = segments.len() - 1;
    segments[0] = substitute(&segments[0], workspace)?;
    segments[last] = substitute(&segments[last], workspace)?;

    Ok(segments.join(&DELIMITER.to_string()))
}

/// Replaces `{name}` placeholders in a single segment.
fn substitute(segment: &str, workspace: &Workspace) -> Result<String> {
    let mut output = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    output.push('{');
                    continue;
                }

                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(CellError::template(format!(
                                "unclosed placeholder '{{{name}'"
                            )));
                        }
                    }
                }

                let value = workspace.parameter(&name).ok_or_else(|| {
                    CellError::template(format!("no binding named '{name}'"))
                })?;
                output.push_str(&value.to_display_string());
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    output.push('}');
                } else {
                    return Err(CellError::template("single '}' outside a placeholder"));
                }
            }
            c => output.push(c),
        }
    }

    Ok(output)
}
