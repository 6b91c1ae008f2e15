//! # Commands Module
//!
//! Command handlers behind the CLI.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports, shared helpers)
//! ├── partner.rs  ◄─── Partner list, card, create/edit, delete
//! ├── sales.rs    ◄─── Sales history with total and discount
//! ├── material.rs ◄─── Material requirement calculation
//! ├── catalog.rs  ◄─── Product and material types
//! └── report.rs   ◄─── Report files
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  partnerline sales 5f0c...                                             │
//! │         │                                                               │
//! │         │ (clap)                                                        │
//! │         ▼                                                               │
//! │  async fn partner_sales(                                               │
//! │      db: &DbState,          ◄── only the state it needs                │
//! │      config: &ConfigState,                                             │
//! │      partner_id: &str,      ◄── from the command line                  │
//! │  ) -> Result<SalesHistoryDto, ApiError>                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  --json: serde_json        otherwise: dto.render_text()                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod material;
pub mod partner;
pub mod report;
pub mod sales;

use partnerline_db::Database;

use crate::error::{ApiError, ErrorCode};
use crate::state::DbState;

/// The open database, or a `DATABASE_ERROR` when the session is gone.
///
/// The message carries the startup connection failure when there was one.
pub(crate) fn database(db: &DbState) -> Result<&Database, ApiError> {
    match db.inner() {
        Some(database) if !db.is_closed() => Ok(database),
        _ => {
            let message = match db.open_error() {
                Some(cause) => format!("Database is not connected: {}", cause),
                None => "Database is not connected".to_string(),
            };
            Err(ApiError::new(ErrorCode::DatabaseError, message))
        }
    }
}

/// Picks the entry whose id equals `key`, else the one whose name matches it
/// case-insensitively. Returns `key` itself when nothing matches.
pub(crate) fn resolve_key<'a, T>(
    entries: &'a [T],
    key: &'a str,
    id: impl Fn(&'a T) -> &'a str,
    name: impl Fn(&'a T) -> &'a str,
) -> &'a str {
    let key = key.trim();
    entries
        .iter()
        .find(|e| id(e) == key)
        .or_else(|| entries.iter().find(|e| name(e).eq_ignore_ascii_case(key)))
        .map(|e| id(e))
        .unwrap_or(key)
}

#[cfg(test)]
pub(crate) mod test_support {
    use partnerline_core::{NewSaleItem, PartnerInput};
    use partnerline_db::DbConfig;

    use crate::state::DbState;

    /// Ids of the seeded test records.
    pub struct Seeded {
        pub partner_type_id: String,
        pub partner_id: String,
        pub product_type_id: String,
        pub material_type_id: String,
    }

    pub fn partner_input(partner_type_id: &str) -> PartnerInput {
        PartnerInput {
            partner_type_id: partner_type_id.to_string(),
            name: "Base Stroy".to_string(),
            director_full_name: "Ivanova Alexandra".to_string(),
            legal_address: "Yurga, Lesnaya 15".to_string(),
            tax_id: "2222455179".to_string(),
            email: "ivanova@ml.ru".to_string(),
            phone: "+7 493 123 45 67".to_string(),
            rating: Some(7),
        }
    }

    /// In-memory database with one partner, two sales and reference data.
    pub async fn seeded_state() -> (DbState, Seeded) {
        let state = DbState::open(DbConfig::in_memory()).await.unwrap();
        let db = state.inner().unwrap().clone();

        let partner_type = db.partners().insert_type("Wholesale").await.unwrap();
        let partner = db
            .partners()
            .upsert(None, &partner_input(&partner_type.id))
            .await
            .unwrap();

        let product_type = db
            .catalog()
            .insert_product_type("Laminate", Some(1.2))
            .await
            .unwrap();
        let material_type = db
            .catalog()
            .insert_material_type("Paper", Some(5.0))
            .await
            .unwrap();
        let product_a = db
            .catalog()
            .insert_product(&product_type.id, "A", "ART-A", 10.0)
            .await
            .unwrap();
        let product_b = db
            .catalog()
            .insert_product(&product_type.id, "B", "ART-B", 10.0)
            .await
            .unwrap();

        for (date, product_id, quantity) in [
            ("2024-01-10", &product_a.id, 5),
            ("2024-02-20", &product_b.id, 3),
        ] {
            db.sales()
                .record_sale(
                    &partner.partner.id,
                    date.parse().unwrap(),
                    &[NewSaleItem {
                        product_id: product_id.clone(),
                        quantity,
                    }],
                )
                .await
                .unwrap();
        }

        let seeded = Seeded {
            partner_type_id: partner_type.id,
            partner_id: partner.partner.id,
            product_type_id: product_type.id,
            material_type_id: material_type.id,
        };
        (state, seeded)
    }
}
