//! # Material Requirement Calculator
//!
//! Estimates how much material a production run needs.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base  = quantity × param1 × param2 × type_coefficient                  │
//! │  total = base × (1 + defect_percent / 100)                              │
//! │  result = ⌈total⌉                                                       │
//! │                                                                         │
//! │  quantity, param1, param2 > 0                                          │
//! │  type_coefficient  ← ProductType                                       │
//! │  defect_percent    ← MaterialType                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Check Order
//! 1. Coerce raw input ([`MaterialRequest::parse`])
//! 2. Reject non-positive quantity or parameters
//! 3. Look up product and material types (storage layer)
//! 4. Reject absent coefficients
//! 5. Reject non-positive base
//! 6. Reject non-positive total
//! 7. Round up
//!
//! Every failure is a [`CalcFailure`]; nothing panics and nothing is raised
//! past the caller. [`to_sentinel`] gives the legacy `-1` encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Legacy encoding of any calculation failure.
pub const CALC_FAILURE_SENTINEL: i64 = -1;

/// Outcome of a material calculation: whole units of material, or why not.
pub type CalcResult = Result<u64, CalcFailure>;

// =============================================================================
// Failure Reasons
// =============================================================================

/// Why a material calculation could not be performed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[ts(export)]
pub enum CalcFailure {
    /// A raw value could not be read as a number.
    #[error("{field} is not a valid number")]
    InvalidInput { field: String },

    /// Quantity or one of the parameters is zero or negative.
    #[error("quantity and parameters must be greater than zero")]
    NonPositiveInput,

    /// The storage lookup itself failed.
    #[error("reference data could not be loaded")]
    LookupFailed,

    #[error("product type not found: {id}")]
    ProductTypeNotFound { id: String },

    #[error("material type not found: {id}")]
    MaterialTypeNotFound { id: String },

    /// Coefficient or defect percent is absent or not a finite number.
    #[error("product coefficient or material defect percent is missing")]
    MissingCoefficient,

    #[error("base material amount is not positive")]
    NonPositiveBase,

    #[error("total material amount is not positive")]
    NonPositiveTotal,

    /// The rounded amount does not fit the result type.
    #[error("material amount is too large")]
    ResultOutOfRange,
}

/// Maps a calculation outcome onto the legacy integer encoding.
pub fn to_sentinel(result: &CalcResult) -> i64 {
    match result {
        Ok(amount) => i64::try_from(*amount).unwrap_or(CALC_FAILURE_SENTINEL),
        Err(_) => CALC_FAILURE_SENTINEL,
    }
}

// =============================================================================
// Request
// =============================================================================

/// Production run parameters supplied by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialRequest {
    /// Units of product to make.
    pub quantity: i64,
    /// First product dimension.
    pub param1: f64,
    /// Second product dimension.
    pub param2: f64,
}

impl MaterialRequest {
    pub fn new(quantity: i64, param1: f64, param2: f64) -> Self {
        MaterialRequest {
            quantity,
            param1,
            param2,
        }
    }

    /// Coerces raw form input.
    ///
    /// Quantity must read as an integer and both parameters as finite
    /// floats; a comma decimal separator is accepted.
    ///
    /// ## Example
    /// ```rust
    /// use partnerline_core::material::{CalcFailure, MaterialRequest};
    ///
    /// let request = MaterialRequest::parse("10", "2,0", "1.5").unwrap();
    /// assert_eq!(request, MaterialRequest::new(10, 2.0, 1.5));
    ///
    /// assert!(matches!(
    ///     MaterialRequest::parse("ten", "2", "1"),
    ///     Err(CalcFailure::InvalidInput { .. })
    /// ));
    /// ```
    pub fn parse(quantity: &str, param1: &str, param2: &str) -> Result<Self, CalcFailure> {
        let quantity = quantity
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid("quantity"))?;
        let param1 = parse_param("param1", param1)?;
        let param2 = parse_param("param2", param2)?;
        Ok(MaterialRequest::new(quantity, param1, param2))
    }

    /// Step 2: quantity and parameters must all be positive.
    pub fn check_positive(&self) -> Result<(), CalcFailure> {
        if !self.param1.is_finite() || !self.param2.is_finite() {
            return Err(invalid(if self.param1.is_finite() {
                "param2"
            } else {
                "param1"
            }));
        }
        if self.quantity <= 0 || self.param1 <= 0.0 || self.param2 <= 0.0 {
            return Err(CalcFailure::NonPositiveInput);
        }
        Ok(())
    }
}

fn invalid(field: &str) -> CalcFailure {
    CalcFailure::InvalidInput {
        field: field.to_string(),
    }
}

fn parse_param(field: &str, raw: &str) -> Result<f64, CalcFailure> {
    let value = raw
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| invalid(field))?;
    if !value.is_finite() {
        return Err(invalid(field));
    }
    Ok(value)
}

// =============================================================================
// Calculation
// =============================================================================

/// Computes the material amount once the reference data is known.
///
/// `type_coefficient` and `defect_percent` come from the product and
/// material types; `None` or a non-finite value fails with
/// [`CalcFailure::MissingCoefficient`]. Input positivity is checked first,
/// so a bad request fails the same way whatever the reference data.
pub fn calculate_required_material(
    type_coefficient: Option<f64>,
    defect_percent: Option<f64>,
    request: &MaterialRequest,
) -> CalcResult {
    request.check_positive()?;

    let (coefficient, defect) = match (type_coefficient, defect_percent) {
        (Some(c), Some(d)) if c.is_finite() && d.is_finite() => (c, d),
        _ => return Err(CalcFailure::MissingCoefficient),
    };

    let base = request.quantity as f64 * request.param1 * request.param2 * coefficient;
    if base <= 0.0 {
        return Err(CalcFailure::NonPositiveBase);
    }

    let total = base * (1.0 + defect / 100.0);
    if total <= 0.0 {
        return Err(CalcFailure::NonPositiveTotal);
    }

    let rounded = total.ceil();
    // u64::MAX as f64 rounds up to 2^64, which itself does not fit
    if !rounded.is_finite() || rounded >= u64::MAX as f64 {
        return Err(CalcFailure::ResultOutOfRange);
    }

    Ok(rounded as u64)
}

// =============================================================================
// Unit Tests
// =============================================================================
