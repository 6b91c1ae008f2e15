//! # Material Calculation Command
//!
//! Runs the material requirement calculation on raw command-line values.
//!
//! A failed calculation is a normal outcome, not an error: the DTO carries
//! the reason and the legacy `-1` value.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::commands::resolve_key;
use crate::state::{ConfigState, DbState};
use partnerline_core::material::to_sentinel;
use partnerline_core::{CalcFailure, CalcResult, MaterialRequest};
use partnerline_db::Database;

/// Serializable form of a [`CalcResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcOutcome {
    /// Whole units of material, when the calculation succeeded.
    pub amount: Option<u64>,
    /// The amount, or `-1` on any failure.
    pub result: i64,
    pub failure: Option<CalcFailure>,
}

impl From<&CalcResult> for CalcOutcome {
    fn from(result: &CalcResult) -> Self {
        CalcOutcome {
            amount: result.as_ref().ok().copied(),
            result: to_sentinel(result),
            failure: result.as_ref().err().cloned(),
        }
    }
}

impl CalcOutcome {
    /// One-line human summary.
    pub fn describe(&self, unit: &str) -> String {
        match (&self.amount, &self.failure) {
            (Some(amount), _) => format!("{} {} of material required", amount, unit),
            (None, Some(failure)) => format!(
                "calculation is not possible with these parameters ({})",
                failure
            ),
            (None, None) => "calculation is not possible with these parameters".to_string(),
        }
    }
}

/// Raw calculation input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcInput {
    /// Product type id or name.
    pub product_type: String,
    /// Material type id or name.
    pub material_type: String,
    pub quantity: String,
    pub param1: String,
    pub param2: String,
}

/// Result of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDto {
    pub product_type_id: String,
    pub material_type_id: String,
    pub quantity: String,
    pub param1: String,
    pub param2: String,
    pub outcome: CalcOutcome,
    pub unit: String,
}

impl CalculationDto {
    pub fn render_text(&self) -> String {
        format!("Result: {}\n", self.outcome.describe(&self.unit))
    }
}

/// Resolves type names to ids and runs the calculation.
///
/// Returns the resolved ids with the outcome. Without a database every
/// well-formed request fails with [`CalcFailure::LookupFailed`].
pub(crate) async fn run_calculation(
    db: Option<&Database>,
    input: &CalcInput,
) -> (String, String, CalcResult) {
    let mut product_type_id = input.product_type.trim().to_string();
    let mut material_type_id = input.material_type.trim().to_string();

    let request = match MaterialRequest::parse(&input.quantity, &input.param1, &input.param2) {
        Ok(request) => request,
        Err(failure) => return (product_type_id, material_type_id, Err(failure)),
    };

    let Some(db) = db else {
        let result = request
            .check_positive()
            .and(Err(CalcFailure::LookupFailed));
        return (product_type_id, material_type_id, result);
    };

    let catalog = db.catalog();
    match catalog.list_product_types().await {
        Ok(types) => {
            product_type_id =
                resolve_key(&types, &product_type_id, |t| t.id.as_str(), |t| t.name.as_str())
                    .to_string();
        }
        Err(e) => warn!(error = %e, "Product types unavailable, using key as id"),
    }
    match catalog.list_material_types().await {
        Ok(types) => {
            material_type_id =
                resolve_key(&types, &material_type_id, |t| t.id.as_str(), |t| t.name.as_str())
                    .to_string();
        }
        Err(e) => warn!(error = %e, "Material types unavailable, using key as id"),
    }

    let result = catalog
        .required_material(&product_type_id, &material_type_id, &request)
        .await;
    (product_type_id, material_type_id, result)
}

/// Calculates the material needed for a production run.
pub async fn calculate(db: &DbState, config: &ConfigState, input: CalcInput) -> CalculationDto {
    debug!(?input, "calculate command");

    let live = db.inner().filter(|_| !db.is_closed());
    let (product_type_id, material_type_id, result) = run_calculation(live, &input).await;

    CalculationDto {
        product_type_id,
        material_type_id,
        quantity: input.quantity,
        param1: input.param1,
        param2: input.param2,
        outcome: CalcOutcome::from(&result),
        unit: config.quantity_unit.clone(),
    }
}
