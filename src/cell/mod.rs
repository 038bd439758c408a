//! Cell magic parsing and dispatch.
//!
//! A cell is an options line plus a body of raw SQL. The three magics are
//! registered in a fixed command table rather than by name at runtime:
//! `readsql` fetches rows and binds them in the workspace, `execsql` runs a
//! statement for its side effects, and `printsql` echoes the final text as
//! a dry run.

pub mod options;
pub mod script;
pub mod template;

pub use options::{parse_options, CellOptions};
pub use script::{parse_script, Cell};

use crate::error::{CellError, Result};
use crate::session::Session;
use crate::workspace::DEFAULT_RESULT_NAME;
use tracing::{debug, info};

/// The cell operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    /// Fetch rows, bind and display them.
    Read,
    /// Run a statement for its side effects.
    Exec,
    /// Echo the final text without touching the database.
    Print,
}

/// Metadata for one entry in the command table.
#[derive(Debug, Clone)]
pub struct MagicDef {
    /// The magic's name as written in a cell header.
    pub name: &'static str,
    /// Short description shown in help output.
    pub description: &'static str,
    /// Usage line shown in help output.
    pub usage: &'static str,
    /// The operation this name maps to.
    pub magic: Magic,
}

/// The command table: all registered magics.
pub static MAGICS: &[MagicDef] = &[
    MagicDef {
        name: "readsql",
        description: "Run a read query; bind and display the result",
        usage: "%%readsql [-i] [-h N] [name]",
        magic: Magic::Read,
    },
    MagicDef {
        name: "execsql",
        description: "Run a write/DDL statement; no result",
        usage: "%%execsql [-i] [-h N]",
        magic: Magic::Exec,
    },
    MagicDef {
        name: "printsql",
        description: "Show the SQL that would be run",
        usage: "%%printsql [-i] [-h N]",
        magic: Magic::Print,
    },
];

impl Magic {
    /// Looks a magic up in the command table by name.
    pub fn from_name(name: &str) -> Option<Self> {
        MAGICS.iter().find(|def| def.name == name).map(|def| def.magic)
    }

    /// Returns the magic's name in the command table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Read => "readsql",
            Self::Exec => "execsql",
            Self::Print => "printsql",
        }
    }

    /// Whether this operation rejects more than one positional argument.
    ///
    /// Only the read path validates; exec and print accept and ignore
    /// extra positionals, matching the long-standing behavior of the
    /// notebook magics this tool grew out of.
    pub fn validates_target(&self) -> bool {
        matches!(self, Self::Read)
    }
}

/// Parses the options line, validates it for the magic, and runs the cell.
pub async fn dispatch(
    session: &mut Session,
    magic: Magic,
    options_line: &str,
    body: &str,
) -> Result<()> {
    let options = parse_options(options_line)?;

    if magic.validates_target() && options.args.len() > 1 {
        return Err(CellError::usage(format!(
            "more than one target name specified: {}",
            options.args.join(", ")
        )));
    }

    let sql = if options.skip_template {
        body.to_string()
    } else {
        template::expand(body, &session.workspace)?
    };

    debug!("Dispatching {} cell", magic.name());

    match magic {
        Magic::Read => read(session, &options, &sql).await,
        Magic::Exec => exec(session, &sql).await,
        Magic::Print => {
            session.sink.text(&sql);
            Ok(())
        }
    }
}

/// Fetches rows, binds them in the workspace, displays them, and refreshes
/// the table registry.
async fn read(session: &mut Session, options: &CellOptions, sql: &str) -> Result<()> {
    let result = session.client.fetch(sql).await?;
    info!(
        "Read query returned {} rows in {:?}",
        result.row_count(),
        result.execution_time
    );

    // Binding consumes the result, so render first. `-h 0` binds
    // without displaying anything.
    if options.head != Some(0) {
        session.sink.table(&result, options.head);
    }

    let name = options.target().unwrap_or(DEFAULT_RESULT_NAME);
    session.workspace.bind_result(name, result);

    session.registry.refresh(session.client.as_ref()).await?;
    Ok(())
}

/// Runs a statement and refreshes the table registry.
async fn exec(session: &mut Session, sql: &str) -> Result<()> {
    let affected = session.client.execute(sql).await?;
    info!("Statement affected {} rows", affected);

    session.registry.refresh(session.client.as_ref()).await?;
    Ok(())
}
