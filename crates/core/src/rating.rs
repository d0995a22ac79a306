//! Rating and comment constants and validation functions.

use crate::error::CoreError;

/// Lowest score a user may give.
pub const MIN_SCORE: i32 = 1;

/// Highest score a user may give.
pub const MAX_SCORE: i32 = 5;

/// Maximum length for a comment's text content.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

/// Validate that a rating score is within the accepted range.
pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Validate comment text: non-blank and within the length cap.
pub fn validate_comment_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment content must not be empty".to_string(),
        ));
    }
    if content.len() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}
