//! # Repository Module
//!
//! Database repository implementations for Partnerline.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command handler                                                       │
//! │       │                                                                 │
//! │       │  db.partners().upsert(existing, &input)                        │
//! │       ▼                                                                 │
//! │  PartnerRepository                                                     │
//! │  ├── list_overview(&self)                                              │
//! │  ├── get_details(&self, id)                                            │
//! │  ├── upsert(&self, existing, input)   ← validates, one transaction    │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`partner::PartnerRepository`] - Partners, contacts and partner types
//! - [`catalog::CatalogRepository`] - Product/material types, products, material calculation
//! - [`sale::SalesRepository`] - Sales history, totals, recording sales

pub mod catalog;
pub mod partner;
pub mod sale;

/// Generates a new entity ID.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
