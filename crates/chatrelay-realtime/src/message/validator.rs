//! Frame and name validation rules.

use crate::error::AckError;

/// Validates a raw inbound frame before decoding.
pub fn validate_frame(raw: &str, max_bytes: usize) -> Result<(), AckError> {
    if raw.len() > max_bytes {
        return Err(AckError::FrameTooLarge { max: max_bytes });
    }

    if raw.trim().is_empty() {
        return Err(AckError::MalformedFrame("Empty frame".to_string()));
    }

    Ok(())
}

/// Trims a username or room name and checks it against the length limit.
///
/// Returns the trimmed value on success.
pub fn validate_name<'a>(field: &str, raw: &'a str, max_chars: usize) -> Result<&'a str, AckError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(AckError::required());
    }

    if trimmed.chars().count() > max_chars {
        return Err(AckError::Validation(format!(
            "{field} must be at most {max_chars} characters!"
        )));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(AckError::Validation(format!(
            "{field} contains invalid characters!"
        )));
    }

    Ok(trimmed)
}
