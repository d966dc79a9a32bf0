use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use inflow_core::{ImportOutcome, JobParameters, MailboxRecord, NotifyTarget};
use job_logging::{job_debug, job_warn};
use thiserror::Error;

use crate::mailbox;
use crate::persist::ensure_dir;
use crate::session::SessionStore;

#[derive(Debug, Error)]
pub enum DeliverError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("message directory unavailable: {0}")]
    Directory(String),
}

/// Direct-messaging collaborator: the actor's personal talk surface.
pub trait MessageSink: Send + Sync {
    fn deliver(&self, actor: &str, subject: &str, body: &str) -> Result<(), DeliverError>;
}

/// Appends rendered messages to one inbox file per actor.
pub struct FileMessageSink {
    dir: PathBuf,
}

impl FileMessageSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl MessageSink for FileMessageSink {
    fn deliver(&self, actor: &str, subject: &str, body: &str) -> Result<(), DeliverError> {
        ensure_dir(&self.dir).map_err(|err| DeliverError::Directory(err.to_string()))?;
        let filename = format!("{}.inbox", sanitize_actor(actor));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(filename))?;
        write!(file, "== {subject} ==\n{body}\n\n")?;
        file.flush()?;
        Ok(())
    }
}

fn sanitize_actor(actor: &str) -> String {
    actor
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Delivers one terminal outcome through exactly one channel.
///
/// Channel failures are logged and swallowed: by the time the dispatcher
/// runs, the import's own outcome is already decided, and the job must
/// still report "processed" to the queue.
pub struct Dispatcher {
    sessions: Arc<dyn SessionStore>,
    messages: Arc<dyn MessageSink>,
}

impl Dispatcher {
    pub fn new(sessions: Arc<dyn SessionStore>, messages: Arc<dyn MessageSink>) -> Self {
        Self { sessions, messages }
    }

    pub fn dispatch(&self, params: &JobParameters, outcome: ImportOutcome) {
        match &params.notify {
            NotifyTarget::SessionMailbox {
                session_id,
                session_key,
            } => match self.sessions.open(session_id) {
                Some(session) => {
                    let record = MailboxRecord::from(outcome);
                    job_debug!(
                        "storing {} result for {} under session key {session_key}",
                        record.result(),
                        params.destination
                    );
                    mailbox::write_record(session.as_ref(), session_key, &record);
                }
                None => {
                    job_warn!(
                        "cannot store result for {}: session {session_id} not found",
                        params.destination
                    );
                }
            },
            NotifyTarget::DirectMessage => {
                let (subject, body) = render_message(params, &outcome);
                if let Err(err) = self.messages.deliver(&params.actor, &subject, &body) {
                    job_warn!(
                        "cannot deliver {} message to {}: {err}",
                        outcome.kind(),
                        params.actor
                    );
                }
            }
        }
    }
}

/// Renders the subject/body pair for the direct-message channel.
///
/// Warnings are rendered like any other outcome, carrying the stash key the
/// actor needs to resume or discard the pending import.
fn render_message(params: &JobParameters, outcome: &ImportOutcome) -> (String, String) {
    match outcome {
        ImportOutcome::Success { filename } => (
            format!("Import succeeded: {filename}"),
            format!(
                "{filename} was imported from {}.\nComment: {}",
                params.source_url, params.comment
            ),
        ),
        ImportOutcome::Warning {
            warnings,
            stash_key,
        } => {
            let mut body = format!(
                "The import of {} from {} needs your attention:\n",
                params.destination, params.source_url
            );
            for warning in warnings {
                let _ = writeln!(body, "* {warning}");
            }
            let _ = write!(
                body,
                "The fetched content was kept under key {stash_key}; \
                 resume or discard it from your pending imports."
            );
            (
                format!("Import needs attention: {}", params.destination),
                body,
            )
        }
        ImportOutcome::Failure { errors } => {
            let mut body = format!(
                "The import of {} from {} failed:\n",
                params.destination, params.source_url
            );
            for error in errors {
                let _ = writeln!(body, "* {error}");
            }
            (format!("Import failed: {}", params.destination), body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inflow_core::{ErrorCode, ImportError, ImportWarning};

    fn params() -> JobParameters {
        JobParameters {
            destination: "Example.png".into(),
            source_url: "https://example.com/source.png".into(),
            actor: "Alice".into(),
            comment: "initial import".into(),
            page_text: String::new(),
            watch: false,
            ignore_warnings: false,
            notify: NotifyTarget::DirectMessage,
        }
    }

    #[test]
    fn success_message_names_content_and_source() {
        let (subject, body) = render_message(
            &params(),
            &ImportOutcome::Success {
                filename: "Example.png".into(),
            },
        );
        assert_eq!(subject, "Import succeeded: Example.png");
        assert!(body.contains("https://example.com/source.png"));
        assert!(body.contains("initial import"));
    }

    #[test]
    fn warning_message_carries_stash_key() {
        let (subject, body) = render_message(
            &params(),
            &ImportOutcome::Warning {
                warnings: vec![ImportWarning::DestinationExists {
                    existing: "Example.png".into(),
                }],
                stash_key: "abcd1234-ef567890".into(),
            },
        );
        assert!(subject.contains("needs attention"));
        assert!(body.contains("abcd1234-ef567890"));
        assert!(body.contains("already exists"));
    }

    #[test]
    fn failure_message_lists_errors() {
        let (_, body) = render_message(
            &params(),
            &ImportOutcome::Failure {
                errors: vec![ImportError::new(ErrorCode::Timeout, "deadline exceeded")],
            },
        );
        assert!(body.contains("timeout: deadline exceeded"));
    }
}
