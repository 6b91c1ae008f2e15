//! # Validation Module
//!
//! Partner form validation for Partnerline.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  └── Parses numbers, collects raw strings                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Every rule runs, every violation is collected                     │
//! │  └── Nothing is written unless the whole form passes                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (tax_id), CHECK (rating)                                   │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use partnerline_core::types::PartnerInput;
//! use partnerline_core::validation::validate_partner;
//!
//! let input = PartnerInput {
//!     partner_type_id: "t-1".into(),
//!     name: "Stroy".into(),
//!     director_full_name: "Ivanov Ivan".into(),
//!     legal_address: "Moscow, Lenina 1".into(),
//!     tax_id: "7701234567".into(),
//!     email: "info@stroy.ru".into(),
//!     phone: "+7 926 123 45 67".into(),
//!     rating: Some(8),
//! };
//! assert!(validate_partner(&input).is_ok());
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ValidationError, ValidationErrors};
use crate::phone::digits_only;
use crate::types::PartnerInput;
use crate::{MAX_RATING, MIN_RATING, TAX_ID_DIGIT_COUNTS};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"))
}

// =============================================================================
// Form Validator
// =============================================================================

/// Validates a whole partner form.
///
/// Every rule is checked; the error lists all violations in check order.
///
/// ## Rules
/// - name, director_full_name, legal_address: not blank
/// - tax_id: 10 or 12 digits once non-digits are stripped
/// - email: optional, `local@domain.tld` when given
/// - phone: starts with `+7` and carries exactly 10 digits after it
/// - rating: present and within 0..=10
pub fn validate_partner(input: &PartnerInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let checks = [
        validate_required("name", &input.name),
        validate_required("director_full_name", &input.director_full_name),
        validate_required("legal_address", &input.legal_address),
        validate_tax_id(&input.tax_id),
        validate_email(&input.email),
        validate_rating(input.rating),
    ];
    for check in checks {
        if let Err(e) = check {
            errors.push(e);
        }
    }

    // Phone may produce two violations at once (prefix and digit count).
    for e in phone_violations(&input.phone) {
        errors.push(e);
    }

    errors.into_result()
}

// =============================================================================
// Field Validators
// =============================================================================

/// Fails when `value` is empty or whitespace-only.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates a tax ID.
///
/// ## Example
/// ```rust
/// use partnerline_core::validation::validate_tax_id;
///
/// assert!(validate_tax_id("1234567890").is_ok());
/// assert!(validate_tax_id("123456789012").is_ok());
/// assert!(validate_tax_id("12345").is_err());
/// ```
pub fn validate_tax_id(tax_id: &str) -> ValidationResult<()> {
    let tax_id = tax_id.trim();
    if tax_id.is_empty() {
        return Err(ValidationError::required("tax_id"));
    }

    let digits = digits_only(tax_id);
    if !TAX_ID_DIGIT_COUNTS.contains(&digits.len()) {
        return Err(ValidationError::invalid_format(
            "tax_id",
            "must contain 10 or 12 digits",
        ));
    }

    Ok(())
}

/// Validates an optional email. Blank is accepted.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }

    if !email_pattern().is_match(email) {
        return Err(ValidationError::invalid_format(
            "email",
            "expected name@domain.tld",
        ));
    }

    Ok(())
}

/// Validates a phone number, reporting the first violation.
///
/// ## Example
/// ```rust
/// use partnerline_core::validation::validate_phone;
///
/// assert!(validate_phone("+7 9261234567").is_ok());
/// assert!(validate_phone("+79991234").is_err());
/// assert!(validate_phone("89991234567").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    match phone_violations(phone).into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn phone_violations(phone: &str) -> Vec<ValidationError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return vec![ValidationError::required("phone")];
    }

    let mut violations = Vec::new();
    if !phone.starts_with("+7") {
        violations.push(ValidationError::invalid_format(
            "phone",
            "must start with +7",
        ));
    }

    let digits = digits_only(phone);
    if digits.len() != 11 || !digits.starts_with('7') {
        violations.push(ValidationError::invalid_format(
            "phone",
            "must contain exactly 10 digits after +7",
        ));
    }

    violations
}

/// Validates a rating. `None` (empty or non-numeric input) is out of range.
pub fn validate_rating(rating: Option<i64>) -> ValidationResult<()> {
    match rating {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Ok(()),
        _ => Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING,
            max: MAX_RATING,
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> PartnerInput {
        PartnerInput {
            partner_type_id: "t-1".to_string(),
            name: "Stroy Market".to_string(),
            director_full_name: "Ivanov Ivan Ivanovich".to_string(),
            legal_address: "Moscow, Lenina 1".to_string(),
            tax_id: "7701234567".to_string(),
            email: "info@stroy.ru".to_string(),
            phone: "+7 926 123 45 67".to_string(),
            rating: Some(8),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_partner(&valid_input()).is_ok());
    }

    #[test]
    fn test_tax_id_digit_counts() {
        assert!(validate_tax_id("1234567890").is_ok());
        assert!(validate_tax_id("123456789012").is_ok());
        assert!(validate_tax_id("12 3456 7890").is_ok());

        assert!(validate_tax_id("12345").is_err());
        assert!(validate_tax_id("1234567890123").is_err());
        assert!(validate_tax_id("12345678901").is_err());
        assert_eq!(
            validate_tax_id("   "),
            Err(ValidationError::required("tax_id"))
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("info@stroy.ru").is_ok());

        assert!(validate_email("info@stroy").is_err());
        assert!(validate_email("@stroy.ru").is_err());
        assert!(validate_email("in fo@stroy.ru").is_err());
        assert!(validate_email("a@@b.c").is_err());
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("+7 9261234567").is_ok());
        assert!(validate_phone("+7 (926) 123-45-67").is_ok());

        assert!(validate_phone("+79991234").is_err());
        assert!(validate_phone("89991234567").is_err());
        assert_eq!(validate_phone(""), Err(ValidationError::required("phone")));
    }

    #[test]
    fn test_phone_reports_prefix_and_length_together() {
        let violations = phone_violations("8999123");
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(Some(0)).is_ok());
        assert!(validate_rating(Some(10)).is_ok());
        assert!(validate_rating(Some(11)).is_err());
        assert!(validate_rating(Some(-1)).is_err());
        assert!(validate_rating(None).is_err());
    }

    #[test]
    fn test_collects_every_violation() {
        let input = PartnerInput {
            partner_type_id: "t-1".to_string(),
            name: "  ".to_string(),
            director_full_name: String::new(),
            legal_address: String::new(),
            tax_id: "12345".to_string(),
            email: "broken".to_string(),
            phone: "89991234567".to_string(),
            rating: Some(11),
        };

        let errors = validate_partner(&input).unwrap_err();
        for field in [
            "name",
            "director_full_name",
            "legal_address",
            "tax_id",
            "email",
            "phone",
            "rating",
        ] {
            assert!(errors.has_field(field), "missing violation for {field}");
        }
        assert_eq!(errors.to_string().lines().count(), errors.len());
    }

    #[test]
    fn test_single_violation_is_reported_alone() {
        let mut input = valid_input();
        input.rating = Some(-1);
        let errors = validate_partner(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.to_string(), "rating must be between 0 and 10");
    }
}
