//! # partnerline-db: Database Layer for Partnerline
//!
//! SQLite storage for partners, reference data and sales, using sqlx for
//! async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Partnerline Data Flow                            │
//! │                                                                         │
//! │  CLI command (partners edit / sales / calc)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  partnerline-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ PartnerRepo   │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ CatalogRepo   │    │              │  │   │
//! │  │   │ (1 session)   │    │ SalesRepo     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/partnerline/partnerline.db                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (partner, catalog, sale)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use partnerline_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("partnerline.db")).await?;
//!
//! let partners = db.partners().list_overview().await?;
//! let history = db.sales().partner_sales(&partners[0].id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::partner::PartnerRepository;
pub use repository::sale::SalesRepository;
