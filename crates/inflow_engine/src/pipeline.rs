use std::sync::Arc;
use std::time::Duration;

use inflow_core::{ErrorCode, ImportError, ImportOutcome, JobParameters};
use job_logging::{job_debug, job_info};

use crate::fetch::Fetcher;
use crate::stash::Stash;
use crate::store::{CommitRequest, ContentStore};
use crate::verify::Verifier;
use crate::warn::WarningScanner;

/// Explicit pipeline configuration; nothing is read from ambient state
/// mid-run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Overrides the fetcher's request deadline. `None` or zero means no
    /// override.
    pub fetch_timeout: Option<Duration>,
}

/// Drives one import attempt through fetch → verify → warning-check →
/// commit. Strictly sequential, no retries; the first stage that cannot
/// proceed ends the run. Every exit is a well-formed [`ImportOutcome`].
pub struct ImportPipeline {
    fetcher: Arc<dyn Fetcher>,
    verifier: Arc<dyn Verifier>,
    scanner: Arc<dyn WarningScanner>,
    stash: Arc<dyn Stash>,
    store: Arc<dyn ContentStore>,
    options: PipelineOptions,
}

impl ImportPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        verifier: Arc<dyn Verifier>,
        scanner: Arc<dyn WarningScanner>,
        stash: Arc<dyn Stash>,
        store: Arc<dyn ContentStore>,
        mut options: PipelineOptions,
    ) -> Self {
        // A zero timeout means "no override", matching the job submitter's
        // unset-or-zero convention.
        options.fetch_timeout = options.fetch_timeout.filter(|d| !d.is_zero());
        Self {
            fetcher,
            verifier,
            scanner,
            stash,
            store,
            options,
        }
    }

    pub async fn run(&self, params: &JobParameters) -> ImportOutcome {
        // Fetch
        let fetched = match self
            .fetcher
            .fetch(&params.source_url, self.options.fetch_timeout)
            .await
        {
            Ok(output) => output,
            Err(err) => {
                job_info!(
                    "fetch of {} failed: {} ({})",
                    params.source_url,
                    err.kind,
                    err.message
                );
                return ImportOutcome::Failure {
                    errors: vec![err.into_import_error()],
                };
            }
        };
        job_debug!(
            "fetched {} bytes from {} for {}",
            fetched.metadata.byte_len,
            fetched.metadata.final_url,
            params.destination
        );

        // Verify
        if let Err(rejection) = self.verifier.verify(&fetched, &params.destination) {
            job_info!(
                "verification of {} rejected: {}",
                params.destination,
                rejection.detail
            );
            return ImportOutcome::Failure {
                errors: vec![ImportError::new(rejection.code, rejection.detail)],
            };
        }

        // Warning check. Warnings need actor acknowledgment before commit,
        // so the fetched bytes are stashed for a later resume instead of
        // being discarded and re-fetched.
        if !params.ignore_warnings {
            let warnings = self.scanner.scan(&fetched, &params.destination);
            if !warnings.is_empty() {
                return match self.stash.stash(&fetched, &params.actor) {
                    Ok(key) => {
                        job_info!(
                            "import of {} paused with {} warning(s), stashed as {key}",
                            params.destination,
                            warnings.len()
                        );
                        ImportOutcome::Warning {
                            warnings,
                            stash_key: key.into_inner(),
                        }
                    }
                    Err(err) => ImportOutcome::Failure {
                        errors: vec![ImportError::new(ErrorCode::StoreRejected, err.to_string())],
                    },
                };
            }
        }

        // Commit
        match self.store.commit(CommitRequest {
            destination: &params.destination,
            bytes: &fetched.bytes,
            comment: &params.comment,
            page_text: &params.page_text,
            watch: params.watch,
            actor: &params.actor,
            source_url: &params.source_url,
        }) {
            Ok(filename) => ImportOutcome::Success { filename },
            Err(errors) => ImportOutcome::Failure { errors },
        }
    }
}
