//! # Sales Repository
//!
//! Database operations for sales, sale items and per-partner sales history.
//!
//! ## History Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales ──< sale_items >── products                                     │
//! │    │                                                                    │
//! │    └── WHERE partner_id = ?                                            │
//! │                                                                         │
//! │  partner_sales → (sale_date, product_name, quantity)                   │
//! │                  ORDER BY sale_date DESC, product_name ASC             │
//! │                                                                         │
//! │  summary       → SUM(quantity), 0 without sales                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures are returned, never swallowed; the caller decides
//! whether an empty history is an acceptable fallback.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use partnerline_core::{
    CoreError, NewSaleItem, Sale, SaleItem, SalesRow, SalesSummary, ValidationError,
    ValidationErrors,
};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SalesRepository {
    pool: SqlitePool,
}

impl SalesRepository {
    /// Creates a new SalesRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesRepository { pool }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Sales history of a partner, newest first.
    ///
    /// One row per sale item. An unknown partner simply has no rows.
    pub async fn partner_sales(&self, partner_id: &str) -> DbResult<Vec<SalesRow>> {
        let rows = sqlx::query_as::<_, SalesRow>(
            r#"
            SELECT
                s.sale_date,
                p.name AS product_name,
                si.quantity
            FROM sales s
            JOIN sale_items si ON si.sale_id = s.id
            JOIN products p ON p.id = si.product_id
            WHERE s.partner_id = ?1
            ORDER BY s.sale_date DESC, p.name ASC
            "#,
        )
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(partner_id, rows = rows.len(), "Loaded sales history");
        Ok(rows)
    }

    /// Total quantity sold to a partner.
    pub async fn summary(&self, partner_id: &str) -> DbResult<SalesSummary> {
        let total_quantity: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(si.quantity), 0)
            FROM sales s
            JOIN sale_items si ON si.sale_id = s.id
            WHERE s.partner_id = ?1
            "#,
        )
        .bind(partner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesSummary { total_quantity })
    }

    /// Sales of a partner without their items, newest first.
    pub async fn list_sales(&self, partner_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, partner_id, sale_date
            FROM sales
            WHERE partner_id = ?1
            ORDER BY sale_date DESC
            "#,
        )
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets all items of a sale.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, quantity
            FROM sale_items
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Records a sale with its items in one transaction.
    ///
    /// ## Errors
    /// * `DbError::Domain(CoreError::Validation)` - no items, or a quantity ≤ 0
    /// * `DbError::Domain(CoreError::PartnerNotFound)` - unknown partner
    /// * `DbError::NotFound` - an item references an unknown product
    pub async fn record_sale(
        &self,
        partner_id: &str,
        sale_date: NaiveDate,
        items: &[NewSaleItem],
    ) -> DbResult<Sale> {
        validate_items(items).map_err(CoreError::Validation)?;

        let sale = Sale {
            id: new_id(),
            partner_id: partner_id.to_string(),
            sale_date,
        };

        debug!(id = %sale.id, partner_id, items = items.len(), "Recording sale");

        let mut tx = self.pool.begin().await?;

        let partner_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM partners WHERE id = ?1")
            .bind(partner_id)
            .fetch_optional(&mut *tx)
            .await?;
        if partner_exists.is_none() {
            return Err(CoreError::PartnerNotFound(partner_id.to_string()).into());
        }

        sqlx::query("INSERT INTO sales (id, partner_id, sale_date) VALUES (?1, ?2, ?3)")
            .bind(&sale.id)
            .bind(&sale.partner_id)
            .bind(sale.sale_date)
            .execute(&mut *tx)
            .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, quantity)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(new_id())
            .bind(&sale.id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => {
                    DbError::not_found("Product", &item.product_id)
                }
                other => other,
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %sale.id, partner_id, "Sale recorded");
        Ok(sale)
    }

    /// Deletes a sale; its items go with it.
    pub async fn delete_sale(&self, sale_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        info!(id = %sale_id, "Sale deleted");
        Ok(())
    }
}

fn validate_items(items: &[NewSaleItem]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if items.is_empty() {
        errors.push(ValidationError::required("items"));
    }
    if items.iter().any(|item| item.quantity <= 0) {
        errors.push(ValidationError::invalid_format(
            "quantity",
            "must be greater than zero",
        ));
    }
    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
