//! # State Module
//!
//! State shared by command handlers.
//!
//! ## State Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │    DbState                   │  │    ConfigState               │    │
//! │  │                              │  │                              │    │
//! │  │  • Database session          │  │  • Database path             │    │
//! │  │  • Repositories              │  │  • Degraded history reads    │    │
//! │  │  • Closed exactly once       │  │  • Units, date format        │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  Each command handler takes only the state it needs.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::ConfigState;
pub use db::DbState;
