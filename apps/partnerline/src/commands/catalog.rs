//! # Catalog Commands
//!
//! Products, and the product and material types used by the calculator.

use tracing::debug;

use crate::commands::database;
use crate::error::ApiError;
use crate::state::DbState;
use partnerline_core::{MaterialType, PartnerType, Product, ProductType};

/// Lists product types by name.
pub async fn list_product_types(db: &DbState) -> Result<Vec<ProductType>, ApiError> {
    debug!("list_product_types command");
    Ok(database(db)?.catalog().list_product_types().await?)
}

/// Lists material types by name.
pub async fn list_material_types(db: &DbState) -> Result<Vec<MaterialType>, ApiError> {
    debug!("list_material_types command");
    Ok(database(db)?.catalog().list_material_types().await?)
}

/// Lists products by name.
pub async fn list_products(db: &DbState) -> Result<Vec<Product>, ApiError> {
    debug!("list_products command");
    Ok(database(db)?.catalog().list_products().await?)
}

fn value_or_dash(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn render_product_types(types: &[ProductType]) -> String {
    let mut out = format!("{:<38} {:<30} {:>12}\n", "Id", "Name", "Coefficient");
    for t in types {
        out.push_str(&format!(
            "{:<38} {:<30} {:>12}\n",
            t.id,
            t.name,
            value_or_dash(t.type_coefficient)
        ));
    }
    out
}

pub fn render_material_types(types: &[MaterialType]) -> String {
    let mut out = format!("{:<38} {:<30} {:>12}\n", "Id", "Name", "Defect %");
    for t in types {
        out.push_str(&format!(
            "{:<38} {:<30} {:>12}\n",
            t.id,
            t.name,
            value_or_dash(t.defect_percent)
        ));
    }
    out
}

pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products\n".to_string();
    }
    let mut out = format!("{:<12} {:<40} {:>12}\n", "Article", "Name", "Min price");
    for p in products {
        out.push_str(&format!(
            "{:<12} {:<40} {:>12.2}\n",
            p.article, p.name, p.min_price_for_partner
        ));
    }
    out
}

pub fn render_partner_types(types: &[PartnerType]) -> String {
    let mut out = format!("{:<38} {}\n", "Id", "Name");
    for t in types {
        out.push_str(&format!("{:<38} {}\n", t.id, t.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_state;

    #[tokio::test]
    async fn test_lists_seeded_types() {
        let (state, seeded) = seeded_state().await;

        let products = list_product_types(&state).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, seeded.product_type_id);

        let materials = list_material_types(&state).await.unwrap();
        assert_eq!(materials[0].defect_percent, Some(5.0));

        let text = render_product_types(&products);
        assert!(text.contains("Laminate"));
        assert!(text.contains("1.2"));
    }

    #[tokio::test]
    async fn test_lists_seeded_products() {
        let (state, seeded) = seeded_state().await;

        let products = list_products(&state).await.unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(products
            .iter()
            .all(|p| p.product_type_id == seeded.product_type_id));

        let text = render_products(&products);
        assert!(text.contains("ART-A"));
        assert!(text.contains("10.00"));
        assert_eq!(render_products(&[]), "No products\n");
    }

    #[test]
    fn test_missing_coefficient_renders_dash() {
        let types = [MaterialType {
            id: "m1".to_string(),
            name: "Glue".to_string(),
            defect_percent: None,
        }];
        let text = render_material_types(&types);
        let row = text.lines().nth(1).unwrap();
        assert!(row.trim_end().ends_with('-'));
    }

    #[tokio::test]
    async fn test_disconnected_is_database_error() {
        let state = DbState::disconnected();
        assert!(list_product_types(&state).await.is_err());
        assert!(list_material_types(&state).await.is_err());
        assert!(list_products(&state).await.is_err());
    }
}
