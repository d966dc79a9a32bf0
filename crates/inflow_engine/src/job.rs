use std::sync::Arc;

use inflow_core::{ErrorCode, ImportError, ImportOutcome, JobParameters, NotifyTarget};
use job_logging::{job_info, job_warn};

use crate::fetch::Fetcher;
use crate::mailbox::{self, MailboxError};
use crate::notify::{Dispatcher, MessageSink};
use crate::pipeline::{ImportPipeline, PipelineOptions};
use crate::session::SessionStore;
use crate::stash::Stash;
use crate::store::ContentStore;
use crate::verify::Verifier;
use crate::warn::WarningScanner;

/// The collaborators an import job runs against, bundled so the queue-side
/// worker can hand one set to every job it constructs.
#[derive(Clone)]
pub struct JobDeps {
    pub fetcher: Arc<dyn Fetcher>,
    pub verifier: Arc<dyn Verifier>,
    pub scanner: Arc<dyn WarningScanner>,
    pub stash: Arc<dyn Stash>,
    pub store: Arc<dyn ContentStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub messages: Arc<dyn MessageSink>,
}

/// One asynchronous import job, as invoked by the queue infrastructure.
pub struct ImportJob {
    params: JobParameters,
    deps: JobDeps,
    options: PipelineOptions,
}

impl ImportJob {
    pub fn new(params: JobParameters, deps: JobDeps, options: PipelineOptions) -> Self {
        Self {
            params,
            deps,
            options,
        }
    }

    pub fn params(&self) -> &JobParameters {
        &self.params
    }

    /// Writes the eager `Queued` mailbox record. The submitter calls this
    /// synchronously before enqueueing, so a poll issued right after
    /// submission already finds a record. No-op for direct-message jobs.
    pub fn initialize_mailbox(&self) -> Result<(), MailboxError> {
        match &self.params.notify {
            NotifyTarget::SessionMailbox {
                session_id,
                session_key,
            } => mailbox::initialize(self.deps.sessions.as_ref(), session_id, session_key),
            NotifyTarget::DirectMessage => Ok(()),
        }
    }

    /// Runs the job to completion. The outcome is dispatched exactly once,
    /// and the return value is always `true`: a Failure outcome is a
    /// successfully processed job, not a queue-level failure.
    pub async fn run(&self) -> bool {
        let dispatcher = Dispatcher::new(self.deps.sessions.clone(), self.deps.messages.clone());

        let outcome = match self.params.validate() {
            Ok(()) => {
                let pipeline = ImportPipeline::new(
                    self.deps.fetcher.clone(),
                    self.deps.verifier.clone(),
                    self.deps.scanner.clone(),
                    self.deps.stash.clone(),
                    self.deps.store.clone(),
                    self.options.clone(),
                );
                pipeline.run(&self.params).await
            }
            Err(err) => {
                // The pipeline never started, but the actor still deserves
                // an answer: dispatch a synthetic failure.
                job_warn!(
                    "rejecting import job for {}: {err}",
                    self.params.destination
                );
                ImportOutcome::Failure {
                    errors: vec![ImportError::new(ErrorCode::BadParameters, err.to_string())],
                }
            }
        };

        job_info!(
            "import job for {} finished: {}",
            self.params.destination,
            outcome.kind()
        );
        dispatcher.dispatch(&self.params, outcome);
        true
    }
}
