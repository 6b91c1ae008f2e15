//! # Reports
//!
//! Report documents built from storage and written to a file.
//!
//! ## Report Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  build_partner_report / build_material_report                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  PartnerSalesReport | MaterialCalcReport   (Serialize)                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Report::render(format)                                                │
//! │     ├── Text → render_text()                                           │
//! │     └── Json → serde_json::to_string_pretty                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  write_report(path, contents) ── io::Error → REPORT_ERROR              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A material report is produced whether or not the calculation succeeds;
//! a failed calculation is rendered with its reason.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::commands::material::{run_calculation, CalcInput, CalcOutcome};
use crate::commands::sales::{load_history, SalesRowDto};
use crate::error::ApiError;
use crate::state::ConfigState;
use partnerline_core::phone::display_phone;
use partnerline_core::SalesSummary;
use partnerline_db::Database;

/// Shown in place of a type name that does not resolve.
pub const NOT_FOUND_NAME: &str = "not found";

/// Output format of a report file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
        }
    }
}

/// A document that can be rendered in every [`ReportFormat`].
pub trait Report: Serialize {
    fn render_text(&self) -> String;

    fn render(&self, format: ReportFormat) -> Result<String, ApiError> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ApiError::internal(format!("Could not serialize report: {}", e))),
        }
    }
}

// =============================================================================
// Partner Sales Report
// =============================================================================

/// A partner's card with its full sales history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerSalesReport {
    pub partner_type_name: String,
    pub partner_name: String,
    pub rating: i64,
    /// `+7XXXXXXXXXX`, or empty.
    pub phone: String,
    pub email: String,
    pub total_quantity: i64,
    pub discount_percent: u8,
    pub unit: String,
    /// Newest first.
    pub rows: Vec<SalesRowDto>,
}

/// Collects the partner sales report.
pub async fn build_partner_report(
    db: &Database,
    config: &ConfigState,
    partner_id: &str,
) -> Result<PartnerSalesReport, ApiError> {
    let details = db
        .partners()
        .get_details(partner_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner", partner_id))?;

    let partner_type_name = db
        .partners()
        .get_type(&details.partner.partner_type_id)
        .await?
        .map(|t| t.name)
        .unwrap_or_else(|| NOT_FOUND_NAME.to_string());

    let (rows, _) = load_history(db, config, partner_id).await?;
    let summary = SalesSummary::from_rows(&rows);

    let (email, phone) = match details.contact {
        Some(c) => (c.email, display_phone(&c.phone)),
        None => (String::new(), String::new()),
    };

    Ok(PartnerSalesReport {
        partner_type_name,
        partner_name: details.partner.name,
        rating: details.partner.rating,
        phone,
        email,
        total_quantity: summary.total_quantity,
        discount_percent: summary.discount_percent(),
        unit: config.quantity_unit.clone(),
        rows: rows
            .into_iter()
            .map(|r| SalesRowDto {
                sale_date: config.format_date(r.sale_date),
                product_name: r.product_name,
                quantity: r.quantity,
            })
            .collect(),
    })
}

impl Report for PartnerSalesReport {
    fn render_text(&self) -> String {
        let mut out = String::from("PARTNER SALES REPORT\n\n");
        out.push_str(&format!("Type: {}\n", self.partner_type_name));
        out.push_str(&format!("Name: {}\n", self.partner_name));
        out.push_str(&format!("Rating: {}\n", self.rating));
        out.push_str(&format!("Phone: {}\n", self.phone));
        out.push_str(&format!("Email: {}\n", self.email));
        out.push_str(&format!(
            "Total sold: {} {}\n",
            self.total_quantity, self.unit
        ));
        out.push_str(&format!("Discount: {}%\n\n", self.discount_percent));

        out.push_str(&format!(
            "{:<12} {:<40} {:>10}\n",
            "Date", "Product", "Quantity"
        ));
        if self.rows.is_empty() {
            out.push_str(&format!("{:<12} {:<40} {:>10}\n", "-", "No sales data", "-"));
        }
        for row in &self.rows {
            out.push_str(&format!(
                "{:<12} {:<40} {:>10}\n",
                row.sale_date, row.product_name, row.quantity
            ));
        }
        out
    }
}

// =============================================================================
// Material Calculation Report
// =============================================================================

/// A material calculation with the values it was run on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialCalcReport {
    /// Type name, or [`NOT_FOUND_NAME`].
    pub product_type_name: String,
    /// Type name, or [`NOT_FOUND_NAME`].
    pub material_type_name: String,
    /// As entered.
    pub quantity: String,
    pub param1: String,
    pub param2: String,
    pub outcome: CalcOutcome,
    pub unit: String,
}

/// Runs the calculation and collects the material report.
///
/// Never fails: unresolvable types show as [`NOT_FOUND_NAME`] and the
/// calculation failure is part of the report.
pub async fn build_material_report(
    db: Option<&Database>,
    config: &ConfigState,
    input: &CalcInput,
) -> MaterialCalcReport {
    let (product_type_id, material_type_id, result) = run_calculation(db, input).await;

    let mut product_type_name = NOT_FOUND_NAME.to_string();
    let mut material_type_name = NOT_FOUND_NAME.to_string();
    if let Some(db) = db {
        let catalog = db.catalog();
        match catalog.get_product_type(&product_type_id).await {
            Ok(Some(t)) => product_type_name = t.name,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Product type name unavailable for report"),
        }
        match catalog.get_material_type(&material_type_id).await {
            Ok(Some(t)) => material_type_name = t.name,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Material type name unavailable for report"),
        }
    }

    MaterialCalcReport {
        product_type_name,
        material_type_name,
        quantity: input.quantity.clone(),
        param1: input.param1.clone(),
        param2: input.param2.clone(),
        outcome: CalcOutcome::from(&result),
        unit: config.quantity_unit.clone(),
    }
}

impl Report for MaterialCalcReport {
    fn render_text(&self) -> String {
        let mut out = String::from("MATERIAL REQUIREMENT REPORT\n\n");
        out.push_str(&format!("Product type: {}\n", self.product_type_name));
        out.push_str(&format!("Material type: {}\n", self.material_type_name));
        out.push_str(&format!("Product quantity: {}\n", self.quantity));
        out.push_str(&format!("Parameter 1: {}\n", self.param1));
        out.push_str(&format!("Parameter 2: {}\n\n", self.param2));
        out.push_str(&format!("Result: {}\n", self.outcome.describe(&self.unit)));
        out
    }
}

// =============================================================================
// Output
// =============================================================================

/// Writes a rendered report, replacing any existing file.
pub fn write_report(path: &Path, contents: &str) -> Result<(), ApiError> {
    std::fs::write(path, contents).map_err(|e| {
        ApiError::report(format!(
            "Could not write report to {}: {}",
            path.display(),
            e
        ))
    })?;
    info!(path = %path.display(), bytes = contents.len(), "Report written");
    Ok(())
}
