//! Question request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Message returned for a blank question
pub const EMPTY_QUESTION: &str = "Question cannot be empty";

/// Body of `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,
}

/// Reject questions that are empty after trimming whitespace
///
/// Only the check trims; accepted questions are used as sent.
pub fn validate_question(question: &str) -> Result<()> {
    if question.trim().is_empty() {
        return Err(Error::invalid_input(EMPTY_QUESTION));
    }
    Ok(())
}
