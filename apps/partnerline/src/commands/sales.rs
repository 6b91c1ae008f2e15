//! # Sales Commands
//!
//! Sales history of a partner with its total and discount.
//!
//! ## Read Failure Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  partner_sales(id)                                                     │
//! │       │                                                                 │
//! │       ├── Ok(rows) ─────────────────────────► history                  │
//! │       │                                                                 │
//! │       └── Err(DbError)                                                 │
//! │              ├── degrade_sales_reads = true  → warn!, empty history    │
//! │              └── degrade_sales_reads = false → ApiError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::commands::database;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use partnerline_core::{SalesRow, SalesSummary};
use partnerline_db::Database;

/// One line of the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRowDto {
    /// Formatted with the configured date format.
    pub sale_date: String,
    pub product_name: String,
    pub quantity: i64,
}

/// A partner's sales history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesHistoryDto {
    pub partner_id: String,
    pub partner_name: String,
    pub rows: Vec<SalesRowDto>,
    pub total_quantity: i64,
    pub discount_percent: u8,
    /// True when the history could not be read and is shown empty.
    pub degraded: bool,
    pub unit: String,
}

impl SalesHistoryDto {
    pub fn render_text(&self) -> String {
        let mut out = format!("Sales history: {}\n", self.partner_name);
        if self.degraded {
            out.push_str("(sales history is unavailable)\n");
        }
        out.push_str(&format!(
            "{:<12} {:<40} {:>12}\n",
            "Date",
            "Product",
            format!("Qty ({})", self.unit)
        ));
        if self.rows.is_empty() {
            out.push_str(&format!("{:<12} {:<40} {:>12}\n", "-", "No sales data", "-"));
        }
        for row in &self.rows {
            out.push_str(&format!(
                "{:<12} {:<40} {:>12}\n",
                row.sale_date, row.product_name, row.quantity
            ));
        }
        out.push_str(&format!(
            "Total: {} {}  Discount: {}%\n",
            self.total_quantity, self.unit, self.discount_percent
        ));
        out
    }
}

/// Loads a partner's history under the configured failure policy.
///
/// Returns the rows and whether they were degraded to empty.
pub(crate) async fn load_history(
    db: &Database,
    config: &ConfigState,
    partner_id: &str,
) -> Result<(Vec<SalesRow>, bool), ApiError> {
    match db.sales().partner_sales(partner_id).await {
        Ok(rows) => Ok((rows, false)),
        Err(e) if config.degrade_sales_reads => {
            warn!(error = %e, partner_id, "Sales history unavailable, showing empty history");
            Ok((Vec::new(), true))
        }
        Err(e) => Err(e.into()),
    }
}

/// Sales history of one partner, newest first.
pub async fn partner_sales(
    db: &DbState,
    config: &ConfigState,
    partner_id: &str,
) -> Result<SalesHistoryDto, ApiError> {
    debug!(partner_id = %partner_id, "partner_sales command");
    let db = database(db)?;

    let partner = db
        .partners()
        .get_by_id(partner_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner", partner_id))?;

    let (rows, degraded) = load_history(db, config, partner_id).await?;
    let summary = SalesSummary::from_rows(&rows);

    Ok(SalesHistoryDto {
        partner_id: partner.id,
        partner_name: partner.name,
        rows: rows
            .into_iter()
            .map(|r| SalesRowDto {
                sale_date: config.format_date(r.sale_date),
                product_name: r.product_name,
                quantity: r.quantity,
            })
            .collect(),
        total_quantity: summary.total_quantity,
        discount_percent: summary.discount_percent(),
        degraded,
        unit: config.quantity_unit.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_state;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_history_newest_first_with_total() {
        let (state, seeded) = seeded_state().await;
        let config = ConfigState::default();

        let history = partner_sales(&state, &config, &seeded.partner_id)
            .await
            .unwrap();

        let rows: Vec<(&str, &str, i64)> = history
            .rows
            .iter()
            .map(|r| (r.sale_date.as_str(), r.product_name.as_str(), r.quantity))
            .collect();
        assert_eq!(rows, vec![("20.02.2024", "B", 3), ("10.01.2024", "A", 5)]);
        assert_eq!(history.total_quantity, 8);
        assert_eq!(history.discount_percent, 0);
        assert!(!history.degraded);
    }

    #[tokio::test]
    async fn test_unknown_partner_is_not_found() {
        let (state, _) = seeded_state().await;
        let err = partner_sales(&state, &ConfigState::default(), "nobody")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_failed_read_degrades_only_when_configured() {
        let (state, seeded) = seeded_state().await;
        let db = state.inner().unwrap().clone();
        // Break the history query without touching the partner
        sqlx_exec(&db, "DROP TABLE sale_items").await;

        let strict = ConfigState::default();
        let err = load_history(&db, &strict, &seeded.partner_id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let lenient = ConfigState {
            degrade_sales_reads: true,
            ..ConfigState::default()
        };
        let history = partner_sales(&state, &lenient, &seeded.partner_id)
            .await
            .unwrap();
        assert!(history.degraded);
        assert!(history.rows.is_empty());
        assert_eq!(history.total_quantity, 0);
        assert!(history.render_text().contains("No sales data"));
    }

    async fn sqlx_exec(db: &Database, sql: &str) {
        sqlx::query(sql).execute(db.pool()).await.unwrap();
    }
}
