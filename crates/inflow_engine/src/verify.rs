use inflow_core::ErrorCode;

use crate::types::FetchOutput;

/// A structural or policy rejection from the verify stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyRejection {
    pub code: ErrorCode,
    pub detail: String,
}

impl VerifyRejection {
    fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

/// Verification collaborator: classifies fetched content as acceptable or
/// rejected for the given destination. Terminal on rejection.
pub trait Verifier: Send + Sync {
    fn verify(&self, content: &FetchOutput, destination: &str) -> Result<(), VerifyRejection>;
}

/// Default verifier: non-empty body, well-formed destination name, and an
/// optional content-type allow-list.
#[derive(Debug, Clone, Default)]
pub struct BasicVerifier {
    /// Empty list allows any content type.
    allowed_content_types: Vec<String>,
}

impl BasicVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allowed_types(types: Vec<String>) -> Self {
        Self {
            allowed_content_types: types,
        }
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        if self.allowed_content_types.is_empty() {
            return true;
        }
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

impl Verifier for BasicVerifier {
    fn verify(&self, content: &FetchOutput, destination: &str) -> Result<(), VerifyRejection> {
        if content.bytes.is_empty() {
            return Err(VerifyRejection::new(
                ErrorCode::EmptyContent,
                "fetched content is empty",
            ));
        }
        if let Some(reason) = destination_problem(destination) {
            return Err(VerifyRejection::new(ErrorCode::BadDestinationName, reason));
        }
        if let Some(ct) = content.metadata.content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(VerifyRejection::new(
                    ErrorCode::UnsupportedContentType,
                    format!("content type {ct} is not allowed"),
                ));
            }
        }
        Ok(())
    }
}

/// Returns a reason string when the destination name cannot name a store
/// entry on any platform we commit to.
fn destination_problem(destination: &str) -> Option<String> {
    let trimmed = destination.trim_matches(&['_', ' ', '.'][..]);
    if trimmed.is_empty() {
        return Some("destination name is empty".into());
    }
    if destination.chars().any(is_forbidden) {
        return Some("destination name contains forbidden characters".into());
    }
    if destination.len() > 255 {
        return Some("destination name is too long".into());
    }
    if is_reserved_windows_name(trimmed) {
        return Some("destination name is reserved".into());
    }
    None
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FetchMetadata;

    fn output(bytes: &[u8], content_type: Option<&str>) -> FetchOutput {
        FetchOutput {
            bytes: bytes.to_vec(),
            metadata: FetchMetadata {
                original_url: "https://example.com/x".into(),
                final_url: "https://example.com/x".into(),
                redirect_count: 0,
                content_type: content_type.map(|s| s.to_string()),
                byte_len: bytes.len() as u64,
            },
        }
    }

    #[test]
    fn accepts_plain_content() {
        let verifier = BasicVerifier::new();
        assert!(verifier.verify(&output(b"data", None), "Example.png").is_ok());
    }

    #[test]
    fn rejects_empty_content() {
        let verifier = BasicVerifier::new();
        let err = verifier.verify(&output(b"", None), "Example.png").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyContent);
    }

    #[test]
    fn rejects_path_like_destination() {
        let verifier = BasicVerifier::new();
        let err = verifier
            .verify(&output(b"data", None), "../escape")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BadDestinationName);
    }

    #[test]
    fn rejects_reserved_destination() {
        let verifier = BasicVerifier::new();
        let err = verifier.verify(&output(b"data", None), "CON").unwrap_err();
        assert_eq!(err.code, ErrorCode::BadDestinationName);
    }

    #[test]
    fn content_type_allow_list_is_case_insensitive() {
        let verifier = BasicVerifier::with_allowed_types(vec!["image/png".into()]);
        assert!(verifier
            .verify(&output(b"data", Some("Image/PNG")), "Example.png")
            .is_ok());
        let err = verifier
            .verify(&output(b"data", Some("text/html; charset=utf-8")), "Example.png")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedContentType);
    }
}
