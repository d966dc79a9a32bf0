use serde::{Deserialize, Serialize};

use crate::outcome::{ImportError, ImportOutcome, ImportWarning};

/// One result record in the session mailbox, keyed by session key.
///
/// Serializes with a `result` tag and a payload field named after the kind,
/// so a poller reads `{"result": "Success", "filename": "..."}` and so on.
/// `Queued` is written eagerly at enqueue time; the worker overwrites it
/// exactly once with the terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result")]
pub enum MailboxRecord {
    Queued,
    Success {
        filename: String,
    },
    Warning {
        warnings: Vec<ImportWarning>,
        stash_key: String,
    },
    Failure {
        errors: Vec<ImportError>,
    },
}

impl MailboxRecord {
    pub fn result(&self) -> &'static str {
        match self {
            MailboxRecord::Queued => "Queued",
            MailboxRecord::Success { .. } => "Success",
            MailboxRecord::Warning { .. } => "Warning",
            MailboxRecord::Failure { .. } => "Failure",
        }
    }
}

impl From<ImportOutcome> for MailboxRecord {
    fn from(outcome: ImportOutcome) -> Self {
        match outcome {
            ImportOutcome::Success { filename } => MailboxRecord::Success { filename },
            ImportOutcome::Warning {
                warnings,
                stash_key,
            } => MailboxRecord::Warning {
                warnings,
                stash_key,
            },
            ImportOutcome::Failure { errors } => MailboxRecord::Failure { errors },
        }
    }
}
