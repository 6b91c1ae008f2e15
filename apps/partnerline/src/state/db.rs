//! # Database State
//!
//! Owns the database session for the lifetime of one CLI invocation.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbState::open(config) ──► Connected ──► close() ──► Closed            │
//! │                                              │                          │
//! │                                    close() again: no-op                │
//! │                                                                         │
//! │  DbState::disconnected() ──► close() is still safe                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use partnerline_db::{Database, DbConfig, DbResult};
use tracing::{debug, info};

/// Wrapper around `Database` that releases the session exactly once.
#[derive(Debug)]
pub struct DbState {
    db: Option<Database>,
    /// Why the connection could not be established, if it was attempted.
    open_error: Option<String>,
    closed: AtomicBool,
}

impl DbState {
    /// Creates a new DbState wrapping an open database.
    pub fn new(db: Database) -> Self {
        DbState {
            db: Some(db),
            open_error: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Opens the database described by `config`.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let db = Database::new(config).await?;
        Ok(DbState::new(db))
    }

    /// A state whose connection was never established.
    ///
    /// Lets shutdown run the same way after a failed startup.
    pub fn disconnected() -> Self {
        DbState {
            db: None,
            open_error: None,
            closed: AtomicBool::new(false),
        }
    }

    /// A state whose connection attempt failed with `cause`.
    pub fn failed(cause: impl Into<String>) -> Self {
        DbState {
            open_error: Some(cause.into()),
            ..DbState::disconnected()
        }
    }

    /// The startup connection failure, if any.
    pub fn open_error(&self) -> Option<&str> {
        self.open_error.as_deref()
    }

    /// Returns the inner Database, if connected.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let partners = db_state.inner()?.partners().list_overview().await?;
    /// ```
    pub fn inner(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    /// True once `close` has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Releases the session. Safe to call any number of times.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Database already closed");
            return;
        }

        match &self.db {
            Some(db) => db.close().await,
            None => info!("No database session to close"),
        }
    }
}
