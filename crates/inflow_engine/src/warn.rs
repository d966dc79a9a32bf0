use std::sync::Arc;

use inflow_core::ImportWarning;

use crate::store::{content_digest, ContentStore};
use crate::types::FetchOutput;

/// Warning-check collaborator. An empty list means the commit stage may run.
pub trait WarningScanner: Send + Sync {
    fn scan(&self, content: &FetchOutput, destination: &str) -> Vec<ImportWarning>;
}

/// Scans the content store for the conditions an actor must acknowledge:
/// an occupied destination and digest-identical content elsewhere.
pub struct StoreWarningScanner {
    store: Arc<dyn ContentStore>,
}

impl StoreWarningScanner {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

impl WarningScanner for StoreWarningScanner {
    fn scan(&self, content: &FetchOutput, destination: &str) -> Vec<ImportWarning> {
        let mut warnings = Vec::new();
        if self.store.exists(destination) {
            warnings.push(ImportWarning::DestinationExists {
                existing: destination.to_string(),
            });
        }
        if let Some(existing) = self.store.find_duplicate(&content_digest(&content.bytes)) {
            // The occupied-destination case already covers an exact self-match.
            if existing != destination {
                warnings.push(ImportWarning::DuplicateContent { existing });
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileContentStore;
    use crate::store::CommitRequest;
    use crate::types::FetchMetadata;
    use tempfile::TempDir;

    fn output(bytes: &[u8]) -> FetchOutput {
        FetchOutput {
            bytes: bytes.to_vec(),
            metadata: FetchMetadata {
                original_url: "https://example.com/x".into(),
                final_url: "https://example.com/x".into(),
                redirect_count: 0,
                content_type: None,
                byte_len: bytes.len() as u64,
            },
        }
    }

    fn seeded_store(temp: &TempDir) -> Arc<FileContentStore> {
        let store = Arc::new(FileContentStore::new(temp.path().to_path_buf()));
        store
            .commit(CommitRequest {
                destination: "Existing.png",
                bytes: b"occupied",
                comment: "",
                page_text: "",
                watch: false,
                actor: "Seed",
                source_url: "https://example.com/seed",
            })
            .unwrap();
        store
    }

    #[test]
    fn clean_destination_yields_no_warnings() {
        let temp = TempDir::new().unwrap();
        let store = seeded_store(&temp);
        let scanner = StoreWarningScanner::new(store);

        assert!(scanner.scan(&output(b"fresh"), "New.png").is_empty());
    }

    #[test]
    fn occupied_destination_warns_once() {
        let temp = TempDir::new().unwrap();
        let store = seeded_store(&temp);
        let scanner = StoreWarningScanner::new(store);

        let warnings = scanner.scan(&output(b"occupied"), "Existing.png");
        assert_eq!(
            warnings,
            vec![ImportWarning::DestinationExists {
                existing: "Existing.png".to_string()
            }]
        );
    }

    #[test]
    fn duplicate_content_elsewhere_warns() {
        let temp = TempDir::new().unwrap();
        let store = seeded_store(&temp);
        let scanner = StoreWarningScanner::new(store);

        let warnings = scanner.scan(&output(b"occupied"), "Other.png");
        assert_eq!(
            warnings,
            vec![ImportWarning::DuplicateContent {
                existing: "Existing.png".to_string()
            }]
        );
    }
}
