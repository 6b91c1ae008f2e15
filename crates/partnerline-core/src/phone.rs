//! Phone number normalization.
//!
//! Phones are typed as `+7 XXX XXX-XX-XX` and stored as the ten digits that
//! follow the country code. Display puts the `+7` back.

/// Strips everything that is not an ASCII digit.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Storage form of a phone number.
///
/// Keeps the last 10 digits when the digit string has at least 11 digits and
/// starts with `7`; anything else normalizes to the empty string.
///
/// ## Example
/// ```rust
/// use partnerline_core::phone::normalize_phone;
///
/// assert_eq!(normalize_phone("+7 926 123-45-67"), "9261234567");
/// assert_eq!(normalize_phone("8 926 123-45-67"), "");
/// ```
pub fn normalize_phone(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() >= 11 && digits.starts_with('7') {
        digits[digits.len() - 10..].to_string()
    } else {
        String::new()
    }
}

/// Display form (`+7XXXXXXXXXX`) of a stored phone.
///
/// Accepts the stored 10-digit form as well as a full `7XXXXXXXXXX` string.
/// Returns an empty string when nothing usable is stored.
pub fn display_phone(stored: &str) -> String {
    let digits = digits_only(stored);
    if digits.len() == 10 {
        return format!("+7{digits}");
    }
    let normalized = normalize_phone(&digits);
    if normalized.is_empty() {
        String::new()
    } else {
        format!("+7{normalized}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_last_ten_digits() {
        assert_eq!(normalize_phone("+7 9261234567"), "9261234567");
        assert_eq!(normalize_phone("+7 (926) 123-45-67"), "9261234567");
        assert_eq!(normalize_phone("7 800 555 35 35 1"), "0055535351");
    }

    #[test]
    fn test_normalize_rejects_short_or_foreign() {
        assert_eq!(normalize_phone("+79991234"), "");
        assert_eq!(normalize_phone("89991234567"), "");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_display_phone() {
        assert_eq!(display_phone("9261234567"), "+79261234567");
        assert_eq!(display_phone("79261234567"), "+79261234567");
        assert_eq!(display_phone(""), "");
        assert_eq!(display_phone("12345"), "");
    }
}
