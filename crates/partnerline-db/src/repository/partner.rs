//! # Partner Repository
//!
//! Database operations for partners, their contact record and partner types.
//!
//! ## Upsert Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  upsert(existing, input)                                               │
//! │       │                                                                 │
//! │       ├── validate_partner(input) fails? → CoreError::Validation       │
//! │       │                                     (nothing written)          │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │       ├── existing = None  → INSERT partners                           │
//! │       ├── existing = Some  → UPDATE partners (0 rows → NotFound)       │
//! │       │                                                                 │
//! │       ├── contact exists   → UPDATE partner_contacts                   │
//! │       └── no contact       → INSERT only if email or phone non-empty   │
//! │  COMMIT                    (any error: transaction dropped → ROLLBACK) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  get_details(id)  ← re-fetched, not echoed                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Constraint Mapping
//! - `UNIQUE constraint failed: partners.tax_id` → [`CoreError::DuplicateTaxId`]
//! - FK failure on insert/update → [`CoreError::PartnerTypeNotFound`]
//! - FK failure on delete (sales reference the partner) → [`CoreError::PartnerHasDependents`]

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use partnerline_core::phone::{digits_only, normalize_phone};
use partnerline_core::validation::validate_partner;
use partnerline_core::{
    CoreError, Partner, PartnerContact, PartnerDetails, PartnerInput, PartnerOverview,
    PartnerType,
};

/// Column list shared by every partner SELECT.
const PARTNER_COLUMNS: &str = r#"
    id, partner_type_id, name, director_full_name, legal_address,
    tax_id, rating, created_at, updated_at
"#;

/// Repository for partner database operations.
#[derive(Debug, Clone)]
pub struct PartnerRepository {
    pool: SqlitePool,
}

impl PartnerRepository {
    /// Creates a new PartnerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PartnerRepository { pool }
    }

    // =========================================================================
    // Partner Types
    // =========================================================================

    /// Lists partner types ordered by name.
    pub async fn list_types(&self) -> DbResult<Vec<PartnerType>> {
        let types = sqlx::query_as::<_, PartnerType>(
            "SELECT id, name FROM partner_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    /// Gets a partner type by ID.
    pub async fn get_type(&self, id: &str) -> DbResult<Option<PartnerType>> {
        let partner_type = sqlx::query_as::<_, PartnerType>(
            "SELECT id, name FROM partner_types WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(partner_type)
    }

    /// Inserts a partner type.
    pub async fn insert_type(&self, name: &str) -> DbResult<PartnerType> {
        let partner_type = PartnerType {
            id: new_id(),
            name: name.trim().to_string(),
        };

        debug!(id = %partner_type.id, name = %partner_type.name, "Inserting partner type");

        sqlx::query("INSERT INTO partner_types (id, name) VALUES (?1, ?2)")
            .bind(&partner_type.id)
            .bind(&partner_type.name)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => {
                    DbError::duplicate(field, partner_type.name.clone())
                }
                other => other,
            })?;

        Ok(partner_type)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a partner by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Partner>> {
        let sql = format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE id = ?1");
        let partner = sqlx::query_as::<_, Partner>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(partner)
    }

    /// Gets the contact record of a partner, if any.
    pub async fn get_contact(&self, partner_id: &str) -> DbResult<Option<PartnerContact>> {
        let contact = sqlx::query_as::<_, PartnerContact>(
            r#"
            SELECT id, partner_id, email, phone
            FROM partner_contacts
            WHERE partner_id = ?1
            "#,
        )
        .bind(partner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Gets a partner together with its contact.
    pub async fn get_details(&self, id: &str) -> DbResult<Option<PartnerDetails>> {
        let Some(partner) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let contact = self.get_contact(id).await?;

        Ok(Some(PartnerDetails { partner, contact }))
    }

    /// Lists every partner as an overview card.
    ///
    /// Ordered by rating descending, then name. `total_quantity` is the sum
    /// of all sale item quantities of the partner (0 without sales).
    pub async fn list_overview(&self) -> DbResult<Vec<PartnerOverview>> {
        let partners = sqlx::query_as::<_, PartnerOverview>(
            r#"
            SELECT
                p.id,
                pt.name AS partner_type_name,
                p.name,
                p.director_full_name,
                p.rating,
                c.email AS email,
                c.phone AS phone,
                COALESCE((
                    SELECT SUM(si.quantity)
                    FROM sales s
                    JOIN sale_items si ON si.sale_id = s.id
                    WHERE s.partner_id = p.id
                ), 0) AS total_quantity
            FROM partners p
            JOIN partner_types pt ON pt.id = p.partner_type_id
            LEFT JOIN partner_contacts c ON c.partner_id = p.id
            ORDER BY p.rating DESC, p.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(partners)
    }

    /// Counts partners.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM partners")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates or updates a partner and its contact.
    ///
    /// ## Arguments
    /// * `existing` - The partner being edited, or `None` to create one
    /// * `input` - Raw form values; validated before anything is written
    ///
    /// ## Returns
    /// The partner and contact as stored after commit.
    ///
    /// ## Errors
    /// * `DbError::Domain(CoreError::Validation)` - form rejected, nothing written
    /// * `DbError::Domain(CoreError::DuplicateTaxId)` - tax ID used by another partner
    /// * `DbError::Domain(CoreError::PartnerTypeNotFound)` - unknown partner type
    /// * `DbError::NotFound` - the edited partner no longer exists
    pub async fn upsert(
        &self,
        existing: Option<&Partner>,
        input: &PartnerInput,
    ) -> DbResult<PartnerDetails> {
        validate_partner(input).map_err(CoreError::Validation)?;

        let now = Utc::now();
        let email = input.email.trim().to_string();
        let phone = normalize_phone(&input.phone);
        // Bare digits; UNIQUE(tax_id) compares this form
        let tax_id = digits_only(&input.tax_id);
        // Present after validation
        let rating = input.rating.unwrap_or_default();

        let mut tx = self.pool.begin().await?;

        let partner_id = match existing {
            Some(partner) => {
                debug!(id = %partner.id, "Updating partner");

                let result = sqlx::query(
                    r#"
                    UPDATE partners SET
                        partner_type_id = ?2,
                        name = ?3,
                        director_full_name = ?4,
                        legal_address = ?5,
                        tax_id = ?6,
                        rating = ?7,
                        updated_at = ?8
                    WHERE id = ?1
                    "#,
                )
                .bind(&partner.id)
                .bind(input.partner_type_id.trim())
                .bind(input.name.trim())
                .bind(input.director_full_name.trim())
                .bind(input.legal_address.trim())
                .bind(&tax_id)
                .bind(rating)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, input))?;

                if result.rows_affected() == 0 {
                    return Err(DbError::not_found("Partner", &partner.id));
                }

                partner.id.clone()
            }
            None => {
                let id = new_id();
                debug!(id = %id, "Inserting partner");

                sqlx::query(
                    r#"
                    INSERT INTO partners (
                        id, partner_type_id, name, director_full_name,
                        legal_address, tax_id, rating, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                    "#,
                )
                .bind(&id)
                .bind(input.partner_type_id.trim())
                .bind(input.name.trim())
                .bind(input.director_full_name.trim())
                .bind(input.legal_address.trim())
                .bind(&tax_id)
                .bind(rating)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, input))?;

                id
            }
        };

        let contact_id: Option<String> =
            sqlx::query_scalar("SELECT id FROM partner_contacts WHERE partner_id = ?1")
                .bind(&partner_id)
                .fetch_optional(&mut *tx)
                .await?;

        match contact_id {
            Some(contact_id) => {
                sqlx::query("UPDATE partner_contacts SET email = ?2, phone = ?3 WHERE id = ?1")
                    .bind(&contact_id)
                    .bind(&email)
                    .bind(&phone)
                    .execute(&mut *tx)
                    .await?;
            }
            None if !email.is_empty() || !phone.is_empty() => {
                sqlx::query(
                    r#"
                    INSERT INTO partner_contacts (id, partner_id, email, phone)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                )
                .bind(new_id())
                .bind(&partner_id)
                .bind(&email)
                .bind(&phone)
                .execute(&mut *tx)
                .await?;
            }
            None => {}
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %partner_id, created = existing.is_none(), "Partner saved");

        self.get_details(&partner_id)
            .await?
            .ok_or_else(|| DbError::not_found("Partner", partner_id))
    }

    /// Deletes a partner; its contact goes with it.
    ///
    /// ## Errors
    /// * `DbError::Domain(CoreError::PartnerHasDependents)` - sales still reference it
    /// * `DbError::NotFound` - no such partner
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting partner");

        let result = sqlx::query("DELETE FROM partners WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => CoreError::PartnerHasDependents {
                    partner_id: id.to_string(),
                }
                .into(),
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Partner", id));
        }

        info!(id = %id, "Partner deleted");
        Ok(())
    }
}

/// Maps constraint failures of a partner INSERT/UPDATE onto domain errors.
fn map_write_error(err: sqlx::Error, input: &PartnerInput) -> DbError {
    match DbError::from(err) {
        err if err.is_unique_violation_on("partners.tax_id") => CoreError::DuplicateTaxId {
            tax_id: digits_only(&input.tax_id),
        }
        .into(),
        DbError::ForeignKeyViolation { .. } => {
            CoreError::PartnerTypeNotFound(input.partner_type_id.trim().to_string()).into()
        }
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
