use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use inflow_core::{ErrorCode, ImportError};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::persist::AtomicWriter;

/// Hex sha256 of the content bytes, used for duplicate detection and stash
/// key derivation.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

/// Everything the commit stage hands to the storage collaborator.
#[derive(Debug, Clone, Copy)]
pub struct CommitRequest<'a> {
    pub destination: &'a str,
    pub bytes: &'a [u8],
    pub comment: &'a str,
    pub page_text: &'a str,
    pub watch: bool,
    pub actor: &'a str,
    pub source_url: &'a str,
}

/// Commit/storage collaborator: the durable home of imported content.
pub trait ContentStore: Send + Sync {
    fn exists(&self, destination: &str) -> bool;
    /// Name of a committed entry whose content digest matches, if any.
    fn find_duplicate(&self, digest: &str) -> Option<String>;
    /// Durable import. Returns the resolved content name.
    fn commit(&self, request: CommitRequest<'_>) -> Result<String, Vec<ImportError>>;
}

/// File-backed store: one file per entry plus a `{name}.meta.json` sidecar
/// carrying the commit metadata. The watch flag appends the destination to
/// a store-level `watchlist.json` keyed by actor.
pub struct FileContentStore {
    root: PathBuf,
    // Serializes watchlist read-modify-write; content writes are atomic on
    // their own via temp-file-then-rename.
    watchlist_guard: Mutex<()>,
}

const META_SUFFIX: &str = ".meta.json";
const WATCHLIST_FILE: &str = "watchlist.json";

impl FileContentStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            watchlist_guard: Mutex::new(()),
        }
    }

    /// Destinations the actor is watching, for callers that render it.
    pub fn watched(&self, actor: &str) -> Vec<String> {
        let Ok(raw) = fs::read_to_string(self.root.join(WATCHLIST_FILE)) else {
            return Vec::new();
        };
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            return Vec::new();
        };
        value
            .get(actor)
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn add_watch(&self, actor: &str, destination: &str) -> Result<(), ImportError> {
        let _guard = self
            .watchlist_guard
            .lock()
            .map_err(|_| ImportError::new(ErrorCode::StoreRejected, "watchlist lock poisoned"))?;

        let path = self.root.join(WATCHLIST_FILE);
        let mut watchlist = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| json!({})),
            Err(_) => json!({}),
        };
        let entries = watchlist
            .as_object_mut()
            .map(|map| map.entry(actor).or_insert_with(|| json!([])))
            .and_then(Value::as_array_mut);
        match entries {
            Some(list) => {
                if !list.iter().any(|v| v.as_str() == Some(destination)) {
                    list.push(json!(destination));
                }
            }
            None => {
                watchlist = json!({ actor: [destination] });
            }
        }

        let writer = AtomicWriter::new(self.root.clone());
        writer
            .write(WATCHLIST_FILE, watchlist.to_string().as_bytes())
            .map_err(|err| ImportError::new(ErrorCode::StoreRejected, err.to_string()))?;
        Ok(())
    }
}

impl ContentStore for FileContentStore {
    fn exists(&self, destination: &str) -> bool {
        self.root.join(destination).is_file()
    }

    fn find_duplicate(&self, digest: &str) -> Option<String> {
        let entries = fs::read_dir(&self.root).ok()?;
        for entry in entries.filter_map(|e| e.ok()) {
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(stem) = name.strip_suffix(META_SUFFIX) else {
                continue;
            };
            let Ok(raw) = fs::read_to_string(entry.path()) else {
                continue;
            };
            let Ok(meta) = serde_json::from_str::<Value>(&raw) else {
                continue;
            };
            if meta.get("digest").and_then(Value::as_str) == Some(digest) {
                return Some(stem.to_string());
            }
        }
        None
    }

    fn commit(&self, request: CommitRequest<'_>) -> Result<String, Vec<ImportError>> {
        let writer = AtomicWriter::new(self.root.clone());
        writer
            .write(request.destination, request.bytes)
            .map_err(|err| vec![ImportError::new(ErrorCode::StoreRejected, err.to_string())])?;

        let meta = json!({
            "comment": request.comment,
            "page_text": request.page_text,
            "actor": request.actor,
            "source_url": request.source_url,
            "digest": content_digest(request.bytes),
            "watch": request.watch,
        });
        writer
            .write(
                &format!("{}{}", request.destination, META_SUFFIX),
                meta.to_string().as_bytes(),
            )
            .map_err(|err| vec![ImportError::new(ErrorCode::StoreRejected, err.to_string())])?;

        if request.watch {
            self.add_watch(request.actor, request.destination)
                .map_err(|err| vec![err])?;
        }

        Ok(request.destination.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn request<'a>(destination: &'a str, bytes: &'a [u8], watch: bool) -> CommitRequest<'a> {
        CommitRequest {
            destination,
            bytes,
            comment: "imported",
            page_text: "body",
            watch,
            actor: "Alice",
            source_url: "https://example.com/src",
        }
    }

    #[test]
    fn commit_writes_content_and_sidecar() {
        let temp = TempDir::new().unwrap();
        let store = FileContentStore::new(temp.path().to_path_buf());

        let name = store.commit(request("Example.png", b"bytes", false)).unwrap();
        assert_eq!(name, "Example.png");
        assert!(store.exists("Example.png"));

        let raw = fs::read_to_string(temp.path().join("Example.png.meta.json")).unwrap();
        let meta: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(meta["actor"], "Alice");
        assert_eq!(meta["digest"], content_digest(b"bytes"));
    }

    #[test]
    fn duplicate_lookup_matches_digest() {
        let temp = TempDir::new().unwrap();
        let store = FileContentStore::new(temp.path().to_path_buf());

        store.commit(request("First.png", b"same", false)).unwrap();
        assert_eq!(
            store.find_duplicate(&content_digest(b"same")),
            Some("First.png".to_string())
        );
        assert_eq!(store.find_duplicate(&content_digest(b"other")), None);
    }

    #[test]
    fn watch_flag_updates_watchlist() {
        let temp = TempDir::new().unwrap();
        let store = FileContentStore::new(temp.path().to_path_buf());

        store.commit(request("Watched.png", b"a", true)).unwrap();
        store.commit(request("Watched.png", b"b", true)).unwrap();
        assert_eq!(store.watched("Alice"), vec!["Watched.png".to_string()]);
        assert!(store.watched("Bob").is_empty());
    }
}
