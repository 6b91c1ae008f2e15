//! # Domain Types
//!
//! Core domain types used throughout Partnerline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  PartnerType    │   │    Partner      │   │ PartnerContact  │       │
//! │  │  ─────────────  │◄──│  ─────────────  │──►│  ─────────────  │       │
//! │  │  id, name       │   │  tax_id (uniq)  │   │  email, phone   │       │
//! │  └─────────────────┘   │  rating 0..10   │   │  (at most one)  │       │
//! │                        └────────┬────────┘   └─────────────────┘       │
//! │                                 │ has many                              │
//! │  ┌─────────────────┐   ┌────────▼────────┐   ┌─────────────────┐       │
//! │  │  ProductType    │   │      Sale       │   │   SaleItem      │       │
//! │  │  coefficient    │   │  sale_date      │──►│  quantity > 0   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  MaterialType   │   │   SalesRow      │   │  SalesSummary   │       │
//! │  │  defect_percent │   │  (derived)      │   │  (derived)      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every stored entity is identified by a UUID v4 string.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::discount_percent;

// =============================================================================
// Reference Data
// =============================================================================

/// A category of partner (wholesale, retail, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PartnerType {
    pub id: String,
    pub name: String,
}

/// A product category carrying the per-unit coefficient used in material
/// planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductType {
    pub id: String,
    pub name: String,
    /// Multiplier applied per unit of product. `None` makes any calculation
    /// for this type fail.
    pub type_coefficient: Option<f64>,
}

/// A material category carrying its expected wastage rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MaterialType {
    pub id: String,
    pub name: String,
    /// Wastage in percent, applied multiplicatively.
    pub defect_percent: Option<f64>,
}

/// An individual product sold to partners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub product_type_id: String,
    pub name: String,
    /// Catalog article number, unique.
    pub article: String,
    pub min_price_for_partner: f64,
}

// =============================================================================
// Partner
// =============================================================================

/// A business customer or distributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Partner {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub partner_type_id: String,
    pub name: String,
    pub director_full_name: String,
    pub legal_address: String,
    /// Tax identification number, unique across partners.
    pub tax_id: String,
    /// Rating in 0..=10.
    pub rating: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Contact details of a partner. A partner owns at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PartnerContact {
    pub id: String,
    pub partner_id: String,
    /// Empty when no email was given.
    pub email: String,
    /// Normalized form: the 10 digits after the country code, or empty.
    pub phone: String,
}

/// A partner together with its contact record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PartnerDetails {
    pub partner: Partner,
    pub contact: Option<PartnerContact>,
}

/// Raw partner form values proposed by the user.
///
/// Nothing here is trusted; [`crate::validation::validate_partner`] decides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PartnerInput {
    pub partner_type_id: String,
    pub name: String,
    pub director_full_name: String,
    pub legal_address: String,
    pub tax_id: String,
    /// Optional; blank means "no email".
    pub email: String,
    /// As typed, e.g. `+7 926 123-45-67`.
    pub phone: String,
    /// `None` when the rating field was left empty or was not a number.
    pub rating: Option<i64>,
}

/// Partner card data: the partner plus what the list view shows about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PartnerOverview {
    pub id: String,
    pub partner_type_name: String,
    pub name: String,
    pub director_full_name: String,
    pub rating: i64,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_quantity: i64,
}

impl PartnerOverview {
    /// Discount the partner currently earns.
    pub fn discount_percent(&self) -> u8 {
        discount_percent(self.total_quantity)
    }
}

// =============================================================================
// Sales
// =============================================================================

/// A sale to a partner on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub partner_id: String,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
}

/// A line of a sale: which product and how many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Always > 0.
    pub quantity: i64,
}

/// A line to be recorded with a new sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub product_id: String,
    pub quantity: i64,
}

/// One row of a partner's sales history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesRow {
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    pub product_name: String,
    pub quantity: i64,
}

/// Cumulative quantity sold to a partner.
///
/// `total_quantity` is always the sum of the quantities of every sale item
/// belonging to the partner's sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub total_quantity: i64,
}

impl SalesSummary {
    /// Sums a sales history.
    pub fn from_rows(rows: &[SalesRow]) -> Self {
        SalesSummary {
            total_quantity: rows.iter().map(|r| r.quantity).sum(),
        }
    }

    /// Discount earned by this volume.
    pub fn discount_percent(&self) -> u8 {
        discount_percent(self.total_quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, product: &str, quantity: i64) -> SalesRow {
        SalesRow {
            sale_date: date.parse().unwrap(),
            product_name: product.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_summary_sums_rows() {
        let rows = vec![
            row("2024-02-20", "B", 3),
            row("2024-01-10", "A", 5),
            row("2023-12-01", "A", 12_000),
        ];
        let summary = SalesSummary::from_rows(&rows);
        assert_eq!(summary.total_quantity, 12_008);
        assert_eq!(summary.discount_percent(), 3);
    }

    #[test]
    fn test_empty_history_has_no_discount() {
        let summary = SalesSummary::from_rows(&[]);
        assert_eq!(summary.total_quantity, 0);
        assert_eq!(summary.discount_percent(), 0);
    }

    #[test]
    fn test_overview_discount() {
        let overview = PartnerOverview {
            id: "p-1".to_string(),
            partner_type_name: "Retail".to_string(),
            name: "Stroy".to_string(),
            director_full_name: "Ivanov I.I.".to_string(),
            rating: 7,
            email: None,
            phone: None,
            total_quantity: 100_000,
        };
        assert_eq!(overview.discount_percent(), 7);
    }

    #[test]
    fn test_partner_input_serializes() {
        let input = PartnerInput {
            name: "Stroy".to_string(),
            rating: Some(5),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["name"], "Stroy");
        assert_eq!(json["rating"], 5);
    }
}
