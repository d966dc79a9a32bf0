//! Inflow core: pure data model for asynchronous remote-content imports.
mod outcome;
mod params;
mod record;

pub use outcome::{ErrorCode, ImportError, ImportOutcome, ImportWarning};
pub use params::{JobParameters, NotifyTarget, ParamError};
pub use record::MailboxRecord;
