//! Error type shared by every extractor.
//!
//! An extraction either fully succeeds or fails with one of these variants.
//! Nothing here is retried or recovered from; the caller decides what to do.

use thiserror::Error;

/// Extraction errors
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A required pattern, tag or element was absent from the fetched page.
    #[error("Unable to extract {what}")]
    NotFound { what: String },

    /// Captured text failed structured parsing.
    #[error("Failed to parse {what}: {reason}")]
    Parse { what: String, reason: String },

    /// The target of a delegated extraction could not be determined.
    #[error("Delegation failed: {0}")]
    Delegation(String),

    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("HTTP {status} while fetching {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractorError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn parse(what: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
