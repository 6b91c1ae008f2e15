//! # Catalog Repository
//!
//! Reference data: product types, material types and products, plus the
//! storage-backed material requirement calculation.
//!
//! ## Material Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  required_material(product_type_id, material_type_id, request)         │
//! │       │                                                                 │
//! │       ├── request not positive?    → NonPositiveInput                  │
//! │       ├── lookup errored?          → LookupFailed (logged)             │
//! │       ├── product type missing?    → ProductTypeNotFound               │
//! │       ├── material type missing?   → MaterialTypeNotFound              │
//! │       ▼                                                                 │
//! │  calculate_required_material(coefficient, defect_percent, request)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculation never returns a storage error: every failure is a
//! [`CalcFailure`].

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use partnerline_core::material::calculate_required_material;
use partnerline_core::{
    CalcFailure, CalcResult, CoreError, MaterialRequest, MaterialType, Product, ProductType,
};

/// Repository for reference data.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Product Types
    // =========================================================================

    /// Lists product types ordered by name.
    pub async fn list_product_types(&self) -> DbResult<Vec<ProductType>> {
        let types = sqlx::query_as::<_, ProductType>(
            "SELECT id, name, type_coefficient FROM product_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    /// Gets a product type by ID.
    pub async fn get_product_type(&self, id: &str) -> DbResult<Option<ProductType>> {
        let product_type = sqlx::query_as::<_, ProductType>(
            "SELECT id, name, type_coefficient FROM product_types WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product_type)
    }

    /// Inserts a product type.
    pub async fn insert_product_type(
        &self,
        name: &str,
        type_coefficient: Option<f64>,
    ) -> DbResult<ProductType> {
        let product_type = ProductType {
            id: new_id(),
            name: name.trim().to_string(),
            type_coefficient,
        };

        debug!(id = %product_type.id, name = %product_type.name, "Inserting product type");

        sqlx::query("INSERT INTO product_types (id, name, type_coefficient) VALUES (?1, ?2, ?3)")
            .bind(&product_type.id)
            .bind(&product_type.name)
            .bind(product_type.type_coefficient)
            .execute(&self.pool)
            .await
            .map_err(|e| with_value(e, &product_type.name))?;

        Ok(product_type)
    }

    // =========================================================================
    // Material Types
    // =========================================================================

    /// Lists material types ordered by name.
    pub async fn list_material_types(&self) -> DbResult<Vec<MaterialType>> {
        let types = sqlx::query_as::<_, MaterialType>(
            "SELECT id, name, defect_percent FROM material_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    /// Gets a material type by ID.
    pub async fn get_material_type(&self, id: &str) -> DbResult<Option<MaterialType>> {
        let material_type = sqlx::query_as::<_, MaterialType>(
            "SELECT id, name, defect_percent FROM material_types WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(material_type)
    }

    /// Inserts a material type.
    pub async fn insert_material_type(
        &self,
        name: &str,
        defect_percent: Option<f64>,
    ) -> DbResult<MaterialType> {
        let material_type = MaterialType {
            id: new_id(),
            name: name.trim().to_string(),
            defect_percent,
        };

        debug!(id = %material_type.id, name = %material_type.name, "Inserting material type");

        sqlx::query("INSERT INTO material_types (id, name, defect_percent) VALUES (?1, ?2, ?3)")
            .bind(&material_type.id)
            .bind(&material_type.name)
            .bind(material_type.defect_percent)
            .execute(&self.pool)
            .await
            .map_err(|e| with_value(e, &material_type.name))?;

        Ok(material_type)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Gets a product by ID.
    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_type_id, name, article, min_price_for_partner
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products ordered by name.
    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_type_id, name, article, min_price_for_partner
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a product.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - article already in the catalog
    /// * `DbError::Domain(CoreError::ProductTypeNotFound)` - unknown product type
    pub async fn insert_product(
        &self,
        product_type_id: &str,
        name: &str,
        article: &str,
        min_price_for_partner: f64,
    ) -> DbResult<Product> {
        let product = Product {
            id: new_id(),
            product_type_id: product_type_id.to_string(),
            name: name.trim().to_string(),
            article: article.trim().to_string(),
            min_price_for_partner,
        };

        debug!(id = %product.id, article = %product.article, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, product_type_id, name, article, min_price_for_partner)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.id)
        .bind(&product.product_type_id)
        .bind(&product.name)
        .bind(&product.article)
        .bind(product.min_price_for_partner)
        .execute(&self.pool)
        .await
        .map_err(|e| match with_value(e, &product.article) {
            DbError::ForeignKeyViolation { .. } => {
                CoreError::ProductTypeNotFound(product.product_type_id.clone()).into()
            }
            other => other,
        })?;

        Ok(product)
    }

    // =========================================================================
    // Material Calculation
    // =========================================================================

    /// Whole units of material needed for a production run.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let request = MaterialRequest::new(10, 2.0, 1.5);
    /// // coefficient 1.2, defect 5% → 37.8 → 38
    /// assert_eq!(db.catalog().required_material(&pt, &mt, &request).await, Ok(38));
    /// ```
    pub async fn required_material(
        &self,
        product_type_id: &str,
        material_type_id: &str,
        request: &MaterialRequest,
    ) -> CalcResult {
        request.check_positive()?;

        let product_type = match self.get_product_type(product_type_id).await {
            Ok(Some(product_type)) => product_type,
            Ok(None) => {
                return Err(CalcFailure::ProductTypeNotFound {
                    id: product_type_id.to_string(),
                })
            }
            Err(e) => {
                warn!(error = %e, product_type_id, "Product type lookup failed");
                return Err(CalcFailure::LookupFailed);
            }
        };

        let material_type = match self.get_material_type(material_type_id).await {
            Ok(Some(material_type)) => material_type,
            Ok(None) => {
                return Err(CalcFailure::MaterialTypeNotFound {
                    id: material_type_id.to_string(),
                })
            }
            Err(e) => {
                warn!(error = %e, material_type_id, "Material type lookup failed");
                return Err(CalcFailure::LookupFailed);
            }
        };

        let result = calculate_required_material(
            product_type.type_coefficient,
            material_type.defect_percent,
            request,
        );

        debug!(
            product_type = %product_type.name,
            material_type = %material_type.name,
            ?result,
            "Material calculated"
        );

        result
    }
}

/// Fills the offending value into a unique violation.
fn with_value(err: sqlx::Error, value: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, value),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use partnerline_core::material::{to_sentinel, CALC_FAILURE_SENTINEL};

    async fn setup() -> (Database, ProductType, MaterialType) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_type = db
            .catalog()
            .insert_product_type("Laminate", Some(1.2))
            .await
            .unwrap();
        let material_type = db
            .catalog()
            .insert_material_type("Oak veneer", Some(5.0))
            .await
            .unwrap();
        (db, product_type, material_type)
    }

    #[tokio::test]
    async fn test_required_material_reference_example() {
        let (db, pt, mt) = setup().await;

        let result = db
            .catalog()
            .required_material(&pt.id, &mt.id, &MaterialRequest::new(10, 2.0, 1.5))
            .await;

        assert_eq!(result, Ok(38));
    }

    #[tokio::test]
    async fn test_required_material_failures_map_to_sentinel() {
        let (db, pt, mt) = setup().await;
        let catalog = db.catalog();

        let cases = [
            (pt.id.as_str(), mt.id.as_str(), MaterialRequest::new(0, 2.0, 1.5)),
            (pt.id.as_str(), mt.id.as_str(), MaterialRequest::new(-5, 2.0, 1.5)),
            (pt.id.as_str(), mt.id.as_str(), MaterialRequest::new(10, 0.0, 1.5)),
            (pt.id.as_str(), mt.id.as_str(), MaterialRequest::new(10, 2.0, -1.0)),
            ("missing", mt.id.as_str(), MaterialRequest::new(10, 2.0, 1.5)),
            (pt.id.as_str(), "missing", MaterialRequest::new(10, 2.0, 1.5)),
        ];

        for (product_type_id, material_type_id, request) in cases {
            let result = catalog
                .required_material(product_type_id, material_type_id, &request)
                .await;
            assert!(result.is_err(), "expected failure for {request:?}");
            assert_eq!(to_sentinel(&result), CALC_FAILURE_SENTINEL);
        }
    }

    #[tokio::test]
    async fn test_unknown_types_are_named() {
        let (db, pt, mt) = setup().await;
        let request = MaterialRequest::new(10, 2.0, 1.5);

        assert_eq!(
            db.catalog().required_material("nope", &mt.id, &request).await,
            Err(CalcFailure::ProductTypeNotFound {
                id: "nope".to_string()
            })
        );
        assert_eq!(
            db.catalog().required_material(&pt.id, "nope", &request).await,
            Err(CalcFailure::MaterialTypeNotFound {
                id: "nope".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_missing_coefficient_fails() {
        let (db, _, mt) = setup().await;
        let bare = db
            .catalog()
            .insert_product_type("Unrated", None)
            .await
            .unwrap();

        let result = db
            .catalog()
            .required_material(&bare.id, &mt.id, &MaterialRequest::new(10, 2.0, 1.5))
            .await;
        assert_eq!(result, Err(CalcFailure::MissingCoefficient));
    }

    #[tokio::test]
    async fn test_closed_store_reports_lookup_failure() {
        let (db, pt, mt) = setup().await;
        db.close().await;

        let catalog = db.catalog();
        assert_eq!(
            catalog
                .required_material(&pt.id, &mt.id, &MaterialRequest::new(10, 2.0, 1.5))
                .await,
            Err(CalcFailure::LookupFailed)
        );
        // Input is checked before touching storage
        assert_eq!(
            catalog
                .required_material(&pt.id, &mt.id, &MaterialRequest::new(0, 2.0, 1.5))
                .await,
            Err(CalcFailure::NonPositiveInput)
        );
    }

    #[tokio::test]
    async fn test_lists_are_sorted_by_name() {
        let (db, _, _) = setup().await;
        db.catalog()
            .insert_product_type("Flooring", Some(2.0))
            .await
            .unwrap();
        db.catalog()
            .insert_material_type("Ash veneer", Some(1.5))
            .await
            .unwrap();

        let product_types: Vec<String> = db
            .catalog()
            .list_product_types()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(product_types, vec!["Flooring", "Laminate"]);

        let material_types: Vec<String> = db
            .catalog()
            .list_material_types()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(material_types, vec!["Ash veneer", "Oak veneer"]);
    }

    #[tokio::test]
    async fn test_product_insert_and_constraints() {
        let (db, pt, _) = setup().await;
        let catalog = db.catalog();

        let product = catalog
            .insert_product(&pt.id, "Oak board", "ART-1", 120.5)
            .await
            .unwrap();
        assert_eq!(catalog.get_product(&product.id).await.unwrap(), Some(product));

        let dup = catalog
            .insert_product(&pt.id, "Other board", "ART-1", 80.0)
            .await
            .unwrap_err();
        assert!(dup.is_unique_violation_on("products.article"));

        let orphan = catalog
            .insert_product("missing", "Ghost", "ART-2", 10.0)
            .await
            .unwrap_err();
        assert!(matches!(
            orphan,
            DbError::Domain(CoreError::ProductTypeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_products_by_name() {
        let (db, pt, _) = setup().await;
        let catalog = db.catalog();

        assert!(catalog.list_products().await.unwrap().is_empty());

        catalog
            .insert_product(&pt.id, "Walnut board", "ART-2", 90.0)
            .await
            .unwrap();
        catalog
            .insert_product(&pt.id, "Ash board", "ART-1", 70.0)
            .await
            .unwrap();

        let names: Vec<String> = catalog
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Ash board", "Walnut board"]);
    }
}
