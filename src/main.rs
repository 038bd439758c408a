//! sqlcell - A notebook-style SQL cell runner for PostgreSQL.

use sqlcell::cell;
use sqlcell::cli::Cli;
use sqlcell::config::{Config, ConnectionConfig};
use sqlcell::db::{self, DatabaseClient, MockClient};
use sqlcell::display::{ConsoleSink, DisplaySink, JsonSink};
use sqlcell::error::{CellError, Result};
use sqlcell::session::Session;
use std::io::Read;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Pick up PG* variables from a local .env file, if any
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load configuration file
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    // Construct the database client
    let client: Box<dyn DatabaseClient> = if cli.mock_db {
        info!("Using mock database");
        Box::new(MockClient::new())
    } else {
        let connection = resolve_connection(&cli, &config)?.ok_or_else(|| {
            CellError::config(
                "No database connection configured. \
                 Pass a connection string, -H/-d/-U flags, or -c <name>.",
            )
        })?;
        info!("Connection: {}", connection.display_string());
        db::connect(&connection).await?
    };

    // Build the session around the chosen display sink
    let sink: Box<dyn DisplaySink> = if cli.json {
        Box::new(JsonSink::new())
    } else {
        Box::new(ConsoleSink::new())
    };
    let mut session = Session::new(client, sink);

    // Seed workspace parameters from -b name=value flags
    for pair in &cli.bindings {
        session.workspace.set_parameter_from_pair(pair)?;
    }

    // Run the script, aborting on the first failing cell
    let script = read_script(cli.file.as_deref())?;
    let cells = cell::parse_script(&script)?;
    info!("Running {} cells", cells.len());

    for parsed in &cells {
        cell::dispatch(&mut session, parsed.magic, &parsed.options_line, &parsed.body)
            .await
            .map_err(|e| annotate_cell_error(e, parsed.line))?;
    }

    session.close().await
}

/// Reads the cell script from a file, or stdin when the path is absent
/// or "-".
fn read_script(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => std::fs::read_to_string(path)
            .map_err(|e| CellError::usage(format!("Failed to read script '{path}': {e}"))),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| CellError::usage(format!("Failed to read stdin: {e}")))?;
            Ok(input)
        }
    }
}

/// Prefixes a cell failure with the header line it came from.
fn annotate_cell_error(error: CellError, line: usize) -> CellError {
    match error {
        CellError::Usage(msg) => CellError::Usage(format!("cell at line {line}: {msg}")),
        CellError::Options(msg) => CellError::Options(format!("cell at line {line}: {msg}")),
        CellError::Template(msg) => CellError::Template(format!("cell at line {line}: {msg}")),
        CellError::Query(msg) => CellError::Query(format!("cell at line {line}: {msg}")),
        other => other,
    }
}

/// Resolves the final connection configuration from CLI args, config file,
/// and environment.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    // Start with CLI connection config if provided
    let mut connection = cli.to_connection_config()?;

    // If no CLI connection, try named connection from config
    if connection.is_none() {
        if let Some(name) = cli.connection_name() {
            connection = config.get_connection(Some(name)).cloned();
            if connection.is_none() {
                return Err(CellError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    // If still no connection, try default from config
    if connection.is_none() {
        connection = config.get_connection(None).cloned();
    }

    // Apply environment variable defaults
    if let Some(ref mut conn) = connection {
        conn.apply_env_defaults();
    }

    Ok(connection)
}
