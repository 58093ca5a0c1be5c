pub const MAX_BODY_PART_CHARS: usize = 64;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("body part must not be empty")]
    EmptyBodyPart,
    #[error("body part must be at most {MAX_BODY_PART_CHARS} characters")]
    BodyPartTooLong,
    #[error("body part must not contain control characters")]
    ControlCharacter,
    #[error("body part is not valid UTF-8 text")]
    UndecodableBodyPart,
}

/// Pure validation of a user-supplied body part.
///
/// Rules:
/// - surrounding whitespace is trimmed; the trimmed value is what gets stored.
/// - the result must be non-empty and at most `MAX_BODY_PART_CHARS` characters.
/// - control characters are rejected.
pub fn validate_body_part(raw: &str) -> Result<String, ValidationError> {
    let body_part = raw.trim();

    if body_part.is_empty() {
        return Err(ValidationError::EmptyBodyPart);
    }
    if body_part.chars().count() > MAX_BODY_PART_CHARS {
        return Err(ValidationError::BodyPartTooLong);
    }
    if body_part.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacter);
    }

    Ok(body_part.to_string())
}
