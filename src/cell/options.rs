//! Options-line parser for cell magics.
//!
//! Each magic takes a getopt-style options line with two short flags and
//! positional arguments:
//! - `-i`: skip template substitution on the cell body
//! - `-h N`: limit the displayed result to the first N rows (`-h 0` hides it)
//!
//! Flags may be clustered (`-ih 5`) and a flag value may be attached
//! (`-h5`). Parsing stops at the first token that is not a flag; everything
//! from there on is positional, including tokens that look like flags.

use crate::error::{CellError, Result};

/// Parsed options for a single cell invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellOptions {
    /// `-i`: pass the body through verbatim, no substitution.
    pub skip_template: bool,

    /// `-h N`: number of rows to display. `Some(0)` means display nothing;
    /// `None` means display the full result.
    pub head: Option<usize>,

    /// Positional arguments, in order.
    pub args: Vec<String>,
}

impl CellOptions {
    /// Returns the single target binding name, if exactly one positional
    /// argument was given.
    pub fn target(&self) -> Option<&str> {
        match self.args.as_slice() {
            [name] => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Parses an options line into flags and positional arguments.
///
/// Fails with an option error on an unknown flag, on `-h` without a value,
/// or on a `-h` value that is not a non-negative integer.
pub fn parse_options(line: &str) -> Result<CellOptions> {
    let mut options = CellOptions::default();
    let mut tokens = line.split_whitespace();
    let mut in_flags = true;

    while let Some(token) = tokens.next() {
        // A lone "-" and anything after the first positional are arguments.
        if !in_flags || !token.starts_with('-') || token == "-" {
            in_flags = false;
            options.args.push(token.to_string());
            continue;
        }

        // Process a flag cluster like "-i", "-h5" or "-ih".
        let mut chars = token[1..].chars();
        while let Some(flag) = chars.next() {
            match flag {
                'i' => options.skip_template = true,
                'h' => {
                    // Value is the rest of this token, or the next token.
                    let rest: String = chars.by_ref().collect();
                    let value = if rest.is_empty() {
                        tokens
                            .next()
                            .ok_or_else(|| CellError::options("flag -h requires a value"))?
                            .to_string()
                    } else {
                        rest
                    };
                    let head = value.parse::<usize>().map_err(|_| {
                        CellError::options(format!("invalid value for -h: '{value}'"))
                    })?;
                    options.head = Some(head);
                }
                other => {
                    return Err(CellError::options(format!("unknown flag -{other}")));
                }
            }
        }
    }

    Ok(options)
}
