//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that an attendee id carries at least one non-whitespace character.
///
/// # Examples
///
/// ```ignore
/// validate_attendee_id("ana")   // Ok
/// validate_attendee_id("  ")    // Err - blank
/// ```
pub fn validate_attendee_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        let mut err = ValidationError::new("attendee_id_blank");
        err.message = Some("Attendee ID must not be blank".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_attendee_id_valid() {
        assert!(validate_attendee_id("ana").is_ok());
        assert!(validate_attendee_id(" 42 ").is_ok());
    }

    #[test]
    fn test_validate_attendee_id_blank() {
        assert!(validate_attendee_id("").is_err());
        assert!(validate_attendee_id(" \t").is_err());
    }
}
