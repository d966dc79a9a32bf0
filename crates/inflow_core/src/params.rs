use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Where the terminal outcome of a job is reported.
///
/// Exactly one channel exists per job. The variant is fixed when the
/// parameters are built and never changes afterwards, so a job can never
/// exercise both the direct-message and the mailbox path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyTarget {
    /// Deliver a rendered message straight to the requesting actor.
    DirectMessage,
    /// Write the outcome into the session-scoped result mailbox.
    SessionMailbox {
        session_id: String,
        session_key: String,
    },
}

impl NotifyTarget {
    pub fn is_mailbox(&self) -> bool {
        matches!(self, NotifyTarget::SessionMailbox { .. })
    }
}

/// Immutable description of one import job, built once at enqueue time.
///
/// The queue infrastructure serializes this as the job payload and hands it
/// back, deserialized, to the job entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParameters {
    /// Logical location the imported content will occupy.
    pub destination: String,
    /// Remote address of the content to import.
    pub source_url: String,
    /// Identity on whose behalf the import runs.
    pub actor: String,
    /// Free-text commit comment.
    pub comment: String,
    /// Body text for the destination page.
    pub page_text: String,
    /// Whether the actor wants to watch the destination after commit.
    pub watch: bool,
    /// Skip the warning-check stage and commit regardless.
    pub ignore_warnings: bool,
    /// Notification channel, fixed at construction.
    pub notify: NotifyTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    EmptyDestination,
    EmptyActor,
    InvalidSourceUrl { detail: String },
    UnsupportedScheme { scheme: String },
    EmptySessionAddress,
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::EmptyDestination => write!(f, "destination is empty"),
            ParamError::EmptyActor => write!(f, "actor is empty"),
            ParamError::InvalidSourceUrl { detail } => {
                write!(f, "source url is invalid: {detail}")
            }
            ParamError::UnsupportedScheme { scheme } => {
                write!(f, "unsupported source scheme {scheme}")
            }
            ParamError::EmptySessionAddress => {
                write!(f, "session id and session key must be non-empty")
            }
        }
    }
}

impl std::error::Error for ParamError {}

impl JobParameters {
    /// Checks the parameters the entry point received from the queue.
    ///
    /// Structural correctness of the payload itself is the queue's concern;
    /// this guards the values the pipeline will actually act on.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.destination.trim().is_empty() {
            return Err(ParamError::EmptyDestination);
        }
        if self.actor.trim().is_empty() {
            return Err(ParamError::EmptyActor);
        }
        let parsed = Url::parse(&self.source_url).map_err(|err| ParamError::InvalidSourceUrl {
            detail: err.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ParamError::UnsupportedScheme {
                    scheme: other.to_string(),
                });
            }
        }
        if let NotifyTarget::SessionMailbox {
            session_id,
            session_key,
        } = &self.notify
        {
            if session_id.trim().is_empty() || session_key.trim().is_empty() {
                return Err(ParamError::EmptySessionAddress);
            }
        }
        Ok(())
    }
}
