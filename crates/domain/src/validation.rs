//! Small reusable rule checks shared by the entity validators.

use crate::error::{Result, ValidationError};

pub(crate) fn non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

pub(crate) fn max_chars(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

pub(crate) fn positive_id(field: &'static str, id: i64) -> Result<()> {
    if id <= 0 {
        return Err(ValidationError::new(
            field,
            format!("must be a positive id, got {id}"),
        ));
    }
    Ok(())
}

/// Strips the punctuation commonly used when formatting Brazilian documents,
/// postal codes and phone numbers. Returns `None` if anything other than
/// digits and separators is present.
pub(crate) fn digits(value: &str) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '0'..='9' => out.push(c),
            '.' | '-' | '/' | ' ' | '(' | ')' | '+' => {}
            _ => return None,
        }
    }
    Some(out)
}

pub(crate) fn digit_count(field: &'static str, value: &str, allowed: &[usize]) -> Result<()> {
    let Some(d) = digits(value) else {
        return Err(ValidationError::new(field, "must contain only digits"));
    };
    if !allowed.contains(&d.len()) {
        let expected = allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(ValidationError::new(
            field,
            format!("must have {expected} digits, got {}", d.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_strips_separators() {
        assert_eq!(digits("123.456.789-09").as_deref(), Some("12345678909"));
        assert_eq!(digits("(11) 98765-4321").as_deref(), Some("11987654321"));
        assert_eq!(digits("12a"), None);
    }

    #[test]
    fn digit_count_reports_expected_lengths() {
        let err = digit_count("phone", "123", &[10, 11]).unwrap_err();
        assert_eq!(err.field, "phone");
        assert_eq!(err.message, "must have 10 or 11 digits, got 3");
    }

    #[test]
    fn positive_id_rejects_zero_and_negative() {
        assert!(positive_id("id", 1).is_ok());
        assert!(positive_id("id", 0).is_err());
        assert!(positive_id("id", -7).is_err());
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        assert!(max_chars("name", "ção", 3).is_ok());
        assert!(max_chars("name", "ções", 3).is_err());
    }
}
