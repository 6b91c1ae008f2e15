//! # partnerline-core: Pure Business Logic for Partnerline
//!
//! This crate holds the rules that turn partner records and sales history
//! into numbers: validation, discount tiers, and material requirements.
//! Everything here is a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Partnerline Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/partnerline (CLI + reports)                │   │
//! │  │    partners ──► sales ──► calc ──► report                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ partnerline-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ discount  │  │ material  │  │ validation│  │   │
//! │  │   │  Partner  │  │  tiers    │  │ calculator│  │   rules   │  │   │
//! │  │   │ SalesRow  │  │  0..10 %  │  │ CalcResult│  │   phone   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                partnerline-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Partner, ProductType, SalesRow, etc.)
//! - [`validation`] - Partner field rules, collecting every violation
//! - [`discount`] - Cumulative-quantity discount tiers
//! - [`material`] - Material requirement calculator with tagged failures
//! - [`phone`] - Phone normalization for storage and display
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use partnerline_core::discount::discount_percent;
//! use partnerline_core::material::{calculate_required_material, MaterialRequest};
//!
//! assert_eq!(discount_percent(50_000), 5);
//!
//! let request = MaterialRequest::new(10, 2.0, 1.5);
//! let amount = calculate_required_material(Some(1.2), Some(5.0), &request);
//! assert_eq!(amount, Ok(38));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod material;
pub mod phone;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use material::{CalcFailure, CalcResult, MaterialRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest partner rating accepted by validation.
pub const MIN_RATING: i64 = 0;

/// Highest partner rating accepted by validation.
pub const MAX_RATING: i64 = 10;

/// Digit counts a tax ID may have (legal entity / individual).
pub const TAX_ID_DIGIT_COUNTS: [usize; 2] = [10, 12];
