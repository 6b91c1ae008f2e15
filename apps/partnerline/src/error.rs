//! # API Error Type
//!
//! Unified error type for command handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Partnerline                            │
//! │                                                                         │
//! │  partnerline partners add ...                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command handler → Result<Dto, ApiError>                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule violated? ─── CoreError::DuplicateTaxId ─── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: error[CONFLICT]: Partner with this tax ID already exists: ... │
//! │  --json: {"code":"CONFLICT","message":"..."}                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Infrastructure failures reach the user as a generic message with the
//! underlying cause appended and the `DATABASE_ERROR` code; they are also
//! logged.

use partnerline_core::CoreError;
use partnerline_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from command handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Partner not found: 5f0c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{}] {}", .code.as_str(), .message)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Duplicate value or record still in use
    Conflict,

    /// Database operation failed
    DatabaseError,

    /// Report could not be written
    ReportError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ReportError => "REPORT_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    /// Creates a report error.
    pub fn report(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ReportError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::conflict(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::conflict("Invalid reference")
            }
            DbError::Domain(core) => ApiError::from(core),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Database connection failed: {}", e),
                )
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Database migration failed: {}", e),
                )
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Database operation failed: {}", e),
                )
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Database transaction failed: {}", e),
                )
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection is busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Database operation failed: {}", e),
                )
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            err @ CoreError::DuplicateTaxId { .. } => ApiError::conflict(err.to_string()),
            err @ CoreError::PartnerHasDependents { .. } => ApiError::conflict(err.to_string()),
            CoreError::PartnerNotFound(id) => ApiError::not_found("Partner", &id),
            CoreError::PartnerTypeNotFound(id) => ApiError::not_found("Partner type", &id),
            CoreError::ProductTypeNotFound(id) => ApiError::not_found("Product type", &id),
            CoreError::MaterialTypeNotFound(id) => ApiError::not_found("Material type", &id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partnerline_core::{ValidationError, ValidationErrors};

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err = ApiError::from(DbError::Domain(CoreError::DuplicateTaxId {
            tax_id: "7701234567".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(
            err.message,
            "Partner with this tax ID already exists: 7701234567"
        );

        let err = ApiError::from(CoreError::PartnerHasDependents {
            partner_id: "p-1".to_string(),
        });
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(err.message.starts_with("Cannot delete"));
    }

    #[test]
    fn test_validation_lists_every_violation() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::required("name"));
        errors.push(ValidationError::required("phone"));

        let err = ApiError::from(CoreError::Validation(errors));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "name is required\nphone is required");
    }

    #[test]
    fn test_infrastructure_errors_carry_their_cause() {
        let err = ApiError::from(DbError::QueryFailed("disk I/O error".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed: disk I/O error");

        let err = ApiError::from(DbError::ConnectionFailed("unable to open".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("unable to open"));

        let err = ApiError::from(DbError::MigrationFailed("bad checksum".to_string()));
        assert!(err.message.contains("bad checksum"));
    }

    #[test]
    fn test_serializes_code_in_screaming_case() {
        let json = serde_json::to_value(ApiError::not_found("Partner", "x")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Partner not found: x");
        assert_eq!(
            ApiError::report("cannot write").to_string(),
            "[REPORT_ERROR] cannot write"
        );
    }
}
