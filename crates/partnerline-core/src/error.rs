//! # Error Types
//!
//! Domain-specific error types for partnerline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  partnerline-core errors (this file)                                   │
//! │  ├── CoreError         - Domain errors (duplicate tax ID, ...)         │
//! │  ├── ValidationErrors  - Every violation found in one partner form     │
//! │  └── ValidationError   - A single field violation                      │
//! │                                                                         │
//! │  Calculation failures live next to the calculator                      │
//! │  └── CalcFailure       - material.rs                                   │
//! │                                                                         │
//! │  partnerline-db errors (separate crate)                                │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  App errors                                                             │
//! │  └── ApiError          - What the user sees                            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → User         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent rule violations a user can act on. The app layer turns
/// each variant into a message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The partner form failed validation; nothing was written.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Another partner already uses this tax ID.
    ///
    /// ## When This Occurs
    /// - Creating a partner with a tax ID already on file
    /// - Editing a partner's tax ID to one used by someone else
    #[error("Partner with this tax ID already exists: {tax_id}")]
    DuplicateTaxId { tax_id: String },

    /// The partner is still referenced by sales and cannot be removed.
    #[error("Cannot delete: partner {partner_id} has dependent records")]
    PartnerHasDependents { partner_id: String },

    /// Partner cannot be found.
    #[error("Partner not found: {0}")]
    PartnerNotFound(String),

    /// The partner type referenced by a partner form does not exist.
    #[error("Partner type not found: {0}")]
    PartnerTypeNotFound(String),

    /// Product type cannot be found.
    #[error("Product type not found: {0}")]
    ProductTypeNotFound(String),

    /// Material type cannot be found.
    #[error("Material type not found: {0}")]
    MaterialTypeNotFound(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single input validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (tax ID digit count, email shape, phone prefix).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// All violations found while validating one form, in check order.
///
/// Never empty when returned as an error. Displays one message per line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    /// Records a violation.
    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    /// Returns true when no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The violations in check order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Returns true if any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// One human-readable message per violation.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        ValidationErrors(vec![err])
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateTaxId {
            tax_id: "7701234567".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Partner with this tax ID already exists: 7701234567"
        );

        let err = CoreError::PartnerHasDependents {
            partner_id: "p-1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot delete: partner p-1 has dependent records"
        );
    }

    #[test]
    fn test_validation_errors_join_lines() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::required("name"));
        errors.push(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 0,
            max: 10,
        });

        assert_eq!(
            errors.to_string(),
            "name is required\nrating must be between 0 and 10"
        );
        assert!(errors.has_field("rating"));
        assert!(!errors.has_field("phone"));
    }

    #[test]
    fn test_empty_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let single: ValidationErrors = ValidationError::required("phone").into();
        assert_eq!(single.len(), 1);
        assert!(single.into_result().is_err());
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let errors: ValidationErrors = ValidationError::required("tax_id").into();
        let core_err: CoreError = errors.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "tax_id is required");
    }
}
