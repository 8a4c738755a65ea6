// src/error.rs
use thiserror::Error;

/// Shown for every failure except a missing document id.
pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load data. Make sure the sheet is published for public access.";

pub const MISSING_DOCUMENT_MESSAGE: &str = "Please enter a Google Sheet ID.";

pub const BAD_ENDPOINT_MESSAGE: &str = "The query endpoint is misconfigured.";

/// Everything that can go wrong between the input fields and a rendered sheet.
///
/// Carries strings rather than source errors so it can travel inside UI
/// messages, which must be `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no document id given")]
    Validation,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("response is not a wrapped JSON payload: {0}")]
    Parse(String),
    #[error("payload has an unexpected shape: {0}")]
    Shape(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Validation => MISSING_DOCUMENT_MESSAGE,
            FetchError::Config(_) => BAD_ENDPOINT_MESSAGE,
            FetchError::Network(_) | FetchError::Parse(_) | FetchError::Shape(_) => {
                LOAD_FAILED_MESSAGE
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
