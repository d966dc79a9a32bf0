//! Inflow engine: import pipeline, collaborator seams and result dispatch.
mod fetch;
mod job;
pub mod mailbox;
mod notify;
mod persist;
mod pipeline;
mod session;
mod stash;
mod store;
mod types;
mod verify;
mod warn;

pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use job::{ImportJob, JobDeps};
pub use mailbox::{MailboxError, RESULTS_KEY};
pub use notify::{DeliverError, Dispatcher, FileMessageSink, MessageSink};
pub use persist::{ensure_dir, AtomicWriter, PersistError};
pub use pipeline::{ImportPipeline, PipelineOptions};
pub use session::{MemorySession, MemorySessionStore, Session, SessionStore};
pub use stash::{FileStash, Stash, StashError, StashKey};
pub use store::{content_digest, CommitRequest, ContentStore, FileContentStore};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
pub use verify::{BasicVerifier, Verifier, VerifyRejection};
pub use warn::{StoreWarningScanner, WarningScanner};
