use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::persist::AtomicWriter;
use crate::store::content_digest;
use crate::types::FetchOutput;

/// Opaque token referencing fetched-but-uncommitted content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StashKey(String);

impl StashKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Re-wraps a key previously handed out, e.g. from a resume request.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Display for StashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum StashError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed stash key {0}")]
    MalformedKey(String),
    #[error("no stashed content for key {0}")]
    UnknownKey(String),
    #[error("stash directory unavailable: {0}")]
    Directory(String),
}

/// Stash collaborator: preserves fetched bytes across a Warning pause so a
/// later resume does not need to re-fetch.
pub trait Stash: Send + Sync {
    fn stash(&self, content: &FetchOutput, actor: &str) -> Result<StashKey, StashError>;
    fn open(&self, key: &StashKey) -> Result<Vec<u8>, StashError>;
}

/// Directory-backed stash. The key is derived from the content digest and
/// the actor, so re-stashing identical content yields the same key.
pub struct FileStash {
    dir: PathBuf,
}

impl FileStash {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &StashKey) -> Result<PathBuf, StashError> {
        // Keys are hex-and-dash tokens; anything else never came from us.
        let valid = !key.as_str().is_empty()
            && key
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() || c == '-');
        if !valid {
            return Err(StashError::MalformedKey(key.as_str().to_string()));
        }
        Ok(self.dir.join(format!("{key}.stash")))
    }
}

impl Stash for FileStash {
    fn stash(&self, content: &FetchOutput, actor: &str) -> Result<StashKey, StashError> {
        let key = derive_key(&content.bytes, actor);
        let writer = AtomicWriter::new(self.dir.clone());
        writer
            .write(&format!("{key}.stash"), &content.bytes)
            .map_err(|err| StashError::Directory(err.to_string()))?;
        Ok(key)
    }

    fn open(&self, key: &StashKey) -> Result<Vec<u8>, StashError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StashError::UnknownKey(key.as_str().to_string()))
            }
            Err(err) => Err(StashError::Io(err)),
        }
    }
}

fn derive_key(bytes: &[u8], actor: &str) -> StashKey {
    let content = content_digest(bytes);
    let mut hasher = Sha256::new();
    hasher.update(actor.as_bytes());
    let actor_digest = hasher.finalize();
    let mut actor_hex = String::with_capacity(8);
    for byte in actor_digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut actor_hex, "{byte:02x}");
    }
    StashKey(format!("{}-{}", &content[..16], actor_hex))
}
