//! # Partnerline Entry Point
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (logging, to stderr)
//! 3. Determine database path
//! 4. Connect to database & run migrations
//! 5. Run the requested command
//! 6. Close the database session

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    partnerline_cli::run()
}
