//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted person or team name, in characters.
pub const MAX_NAME_LEN: usize = 60;

/// Validates a display name: not blank once trimmed and at most [`MAX_NAME_LEN`] characters.
///
/// # Examples
///
/// ```ignore
/// validate_display_name("Ada Lovelace") // Ok
/// validate_display_name("   ")          // Err - blank
/// ```
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }

    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        let mut err = ValidationError::new("name_length");
        err.message =
            Some(format!("Name must be at most {MAX_NAME_LEN} characters (got {len})").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_names() {
        assert!(validate_display_name("Ada").is_ok());
        assert!(validate_display_name("  The Bogey Boys  ").is_ok());
    }

    #[test]
    fn rejects_blank_names() {
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
    }

    #[test]
    fn rejects_long_names() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_display_name(&name).is_err());
        assert!(validate_display_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }
}
