use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal classification of one completed pipeline run.
///
/// Every run produces exactly one of these; the dispatcher consumes it
/// exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Success {
        /// Resolved name of the committed content.
        filename: String,
    },
    Warning {
        warnings: Vec<ImportWarning>,
        /// Opaque handle to the stashed bytes, usable for a later resume.
        stash_key: String,
    },
    Failure {
        errors: Vec<ImportError>,
    },
}

impl ImportOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            ImportOutcome::Success { .. } => "Success",
            ImportOutcome::Warning { .. } => "Warning",
            ImportOutcome::Failure { .. } => "Failure",
        }
    }
}

/// A pause condition found before commit. Not an error: the fetched bytes
/// are stashed and the actor must acknowledge before the import proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportWarning {
    /// The destination is already occupied.
    DestinationExists { existing: String },
    /// Another committed entry has identical content.
    DuplicateContent { existing: String },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::DestinationExists { existing } => {
                write!(f, "destination {existing} already exists")
            }
            ImportWarning::DuplicateContent { existing } => {
                write!(f, "content duplicates existing entry {existing}")
            }
        }
    }
}

/// One classified error from a failed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    pub code: ErrorCode,
    pub detail: String,
}

impl ImportError {
    pub fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.detail)
    }
}

/// Stable error classification across the fetch, verify and commit stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidUrl,
    Timeout,
    HttpStatus(u16),
    RedirectLimit,
    TooLarge,
    Network,
    EmptyContent,
    UnsupportedContentType,
    BadDestinationName,
    StoreRejected,
    BadParameters,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidUrl => write!(f, "invalid url"),
            ErrorCode::Timeout => write!(f, "timeout"),
            ErrorCode::HttpStatus(code) => write!(f, "http status {code}"),
            ErrorCode::RedirectLimit => write!(f, "redirect limit exceeded"),
            ErrorCode::TooLarge => write!(f, "content too large"),
            ErrorCode::Network => write!(f, "network error"),
            ErrorCode::EmptyContent => write!(f, "empty content"),
            ErrorCode::UnsupportedContentType => write!(f, "unsupported content type"),
            ErrorCode::BadDestinationName => write!(f, "bad destination name"),
            ErrorCode::StoreRejected => write!(f, "store rejected commit"),
            ErrorCode::BadParameters => write!(f, "bad job parameters"),
        }
    }
}
