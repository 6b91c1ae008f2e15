//! # Partnerline CLI Library
//!
//! Command-line front end for partner records, sales history and material
//! planning. `main.rs` only calls [`run`].
//!
//! ## Module Organization
//! ```text
//! partnerline_cli/
//! ├── lib.rs          ◄─── You are here (startup, run, shutdown)
//! ├── cli.rs          ◄─── clap definitions and dispatch
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database session, closed exactly once
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports, shared helpers
//! │   ├── partner.rs  ◄─── Partner list, card, create/edit, delete
//! │   ├── sales.rs    ◄─── Sales history
//! │   ├── material.rs ◄─── Material calculation
//! │   ├── catalog.rs  ◄─── Reference data
//! │   └── report.rs   ◄─── Report files
//! ├── report.rs       ◄─── Report documents and renderers
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod report;
pub mod state;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::ApiError;
use partnerline_db::DbConfig;
use state::{ConfigState, DbState};

/// Runs one CLI invocation.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Invocation Lifecycle                              │
/// │                                                                         │
/// │  1. Parse Command Line ───────────────────────────────────────────────► │
/// │  2. Initialize Logging (stderr, RUST_LOG) ────────────────────────────► │
/// │  3. Load Configuration (--db, PARTNERLINE_*) ─────────────────────────► │
/// │  4. Connect to Database & Run Migrations ─────────────────────────────► │
/// │     • on failure: log, continue disconnected                            │
/// │  5. Execute Command ──────────────────────────────────────────────────► │
/// │  6. Close Database Session (always) ──────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.json;
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            return report_error(
                &ApiError::internal(format!("Could not start runtime: {}", e)),
                json,
            )
        }
    };

    match runtime.block_on(run_cli(cli)) {
        Ok(out) => {
            print!("{}", out);
            ExitCode::SUCCESS
        }
        Err(err) => report_error(&err, json),
    }
}

/// Opens the session, runs the command and closes the session.
pub async fn run_cli(cli: Cli) -> Result<String, ApiError> {
    let config = ConfigState::from_env().with_database_path(cli.db);
    let db_path = config.resolve_database_path()?;
    info!(?db_path, "Database path determined");

    let db_state = match DbState::open(DbConfig::new(db_path)).await {
        Ok(state) => {
            info!("Database connected and migrations applied");
            state
        }
        Err(e) => {
            error!(error = %e, "Could not open database");
            DbState::failed(e.to_string())
        }
    };

    let result = cli::execute(cli.command, &db_state, &config, cli.json).await;
    db_state.close().await;
    result
}

/// Prints an error to stderr and picks the exit code.
fn report_error(err: &ApiError, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string(err) {
            Ok(body) => eprintln!("{}", body),
            Err(_) => eprintln!("error[{}]: {}", err.code.as_str(), err.message),
        }
    } else {
        eprintln!("error[{}]: {}", err.code.as_str(), err.message);
    }
    ExitCode::FAILURE
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=partnerline=trace` - Show trace for partnerline crates only
/// - Default: INFO, debug for partnerline crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,partnerline=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("partnerline").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn test_run_against_database_file() {
        let dir = std::env::temp_dir().join(format!("partnerline-run-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let db = dir.join("run.db");
        let db_arg = db.display().to_string();

        let out = run_cli(cli(&["--db", &db_arg, "partners", "list"]))
            .await
            .unwrap();
        assert_eq!(out, "No partners\n");

        let err = run_cli(cli(&["--db", &db_arg, "sales", "nobody"]))
            .await
            .unwrap_err();
        assert_eq!(err.code, error::ErrorCode::NotFound);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_unopenable_database_still_calculates() {
        let missing = std::env::temp_dir()
            .join("partnerline-no-such-dir")
            .join("nested")
            .join("x.db");
        let db_arg = missing.display().to_string();

        let out = run_cli(cli(&[
            "--db", &db_arg, "--json", "calc", "--product-type", "a", "--material-type", "b",
            "--quantity", "10", "--param1", "2", "--param2", "1.5",
        ]))
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["outcome"]["failure"]["reason"], "lookup_failed");

        let err = run_cli(cli(&["--db", &db_arg, "partners", "list"]))
            .await
            .unwrap_err();
        assert_eq!(err.code, error::ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Database is not connected: Connection failed"));
    }
}
