// src/proxy/types.rs
use super::error::TranslateError;
use serde::Serialize;

/// Body sent to the remote `/translate` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRequest {
    text: String,
}

impl TranslationRequest {
    /// Trims the raw form value; blank input is rejected.
    pub fn parse(raw: &str) -> Result<Self, TranslateError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(TranslateError::EmptyInput);
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Success(String),
    Failure(TranslateError),
}

impl TranslationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TranslationOutcome::Failure(_))
    }

    /// Text shown in the result block.
    pub fn text(&self) -> String {
        match self {
            TranslationOutcome::Success(text) => text.clone(),
            TranslationOutcome::Failure(err) => err.to_string(),
        }
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            TranslationOutcome::Success(_) => "success",
            TranslationOutcome::Failure(err) => err.kind().as_str(),
        }
    }
}

impl From<Result<String, TranslateError>> for TranslationOutcome {
    fn from(result: Result<String, TranslateError>) -> Self {
        match result {
            Ok(text) => TranslationOutcome::Success(text),
            Err(err) => TranslationOutcome::Failure(err),
        }
    }
}
