use std::fmt;

use inflow_core::{ErrorCode, ImportError};

/// Bytes retrieved from the source locator plus transport metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Maps a transport failure into the stable error taxonomy carried by
    /// the terminal outcome.
    pub fn into_import_error(self) -> ImportError {
        let code = match self.kind {
            FailureKind::InvalidUrl => ErrorCode::InvalidUrl,
            FailureKind::HttpStatus(code) => ErrorCode::HttpStatus(code),
            FailureKind::Timeout => ErrorCode::Timeout,
            FailureKind::RedirectLimitExceeded => ErrorCode::RedirectLimit,
            FailureKind::TooLarge { .. } => ErrorCode::TooLarge,
            FailureKind::Network => ErrorCode::Network,
        };
        ImportError::new(code, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
