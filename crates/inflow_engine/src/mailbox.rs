//! Session-scoped result mailbox.
//!
//! All records for one session live under a single session value
//! ([`RESULTS_KEY`]): a JSON object mapping each job's session key to its
//! record. Every write replaces one whole record, so a concurrent poller
//! observes either the previous record or the next one, never a torn mix,
//! as long as the session store keeps per-key `get`/`set` atomic.

use inflow_core::MailboxRecord;
use job_logging::job_error;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::session::{Session, SessionStore};

/// The session key under which all mailbox records are nested.
pub const RESULTS_KEY: &str = "inflow_import_results";

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("no session found for id {0}")]
    UnknownSession(String),
}

/// Reads the record for `key`. A missing or malformed record is reset to an
/// empty object and that empty object is returned, so repeated reads are
/// stable and a poller never has to distinguish "absent" from "broken".
pub fn get(session: &dyn Session, key: &str) -> Map<String, Value> {
    let data = session.get(RESULTS_KEY);
    let record = data
        .as_ref()
        .and_then(Value::as_object)
        .and_then(|records| records.get(key))
        .and_then(Value::as_object);
    match record {
        Some(map) => map.clone(),
        None => {
            set(session, key, Map::new());
            Map::new()
        }
    }
}

/// Replaces the record for `key` in one write, preserving the records of
/// every other key in the session.
pub fn set(session: &dyn Session, key: &str, record: Map<String, Value>) {
    let mut records = match session.get(RESULTS_KEY) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    records.insert(key.to_string(), Value::Object(record));
    session.set(RESULTS_KEY, Value::Object(records));
}

/// Typed read over [`get`]. Returns `None` for records that do not parse as
/// a [`MailboxRecord`], including the empty object a self-healing read
/// leaves behind.
pub fn read_record(session: &dyn Session, key: &str) -> Option<MailboxRecord> {
    let map = get(session, key);
    serde_json::from_value(Value::Object(map)).ok()
}

/// Typed write over [`set`].
pub fn write_record(session: &dyn Session, key: &str, record: &MailboxRecord) {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => set(session, key, map),
        Ok(other) => {
            job_error!("mailbox record serialized to non-object value: {other}");
        }
        Err(err) => {
            job_error!("failed to serialize mailbox record: {err}");
        }
    }
}

/// Writes the eager `Queued` record. Called synchronously at submission
/// time, before the job is handed to the queue, so an immediate poll never
/// observes a missing record.
pub fn initialize(
    store: &dyn SessionStore,
    session_id: &str,
    key: &str,
) -> Result<(), MailboxError> {
    let session = store
        .open(session_id)
        .ok_or_else(|| MailboxError::UnknownSession(session_id.to_string()))?;
    write_record(session.as_ref(), key, &MailboxRecord::Queued);
    Ok(())
}
