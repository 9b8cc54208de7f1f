//! Job poller — follows a minion job until it finishes or fails.
//!
//! One session is a plain loop: fetch a fresh snapshot, act on its state,
//! sleep, repeat. Polls never overlap and there is no overall deadline;
//! a session ends only on a terminal state or a failed poll.

use minion_core::config::PollIntervals;
use minion_core::{is_truthy, JobState, JobStatus, MinionError, PollMode};
use serde_json::Value;

use crate::invoker::{ApiRequest, RequestInvoker};

/// Context line of every job failure notification.
pub const JOB_STATUS_ERROR: &str = "Error while checking minion job status";

#[derive(Clone)]
pub struct JobPoller {
    invoker: RequestInvoker,
    intervals: PollIntervals,
    failure_context: String,
}

impl JobPoller {
    pub fn new(invoker: RequestInvoker, intervals: PollIntervals) -> Self {
        Self {
            invoker,
            intervals,
            failure_context: JOB_STATUS_ERROR.to_string(),
        }
    }

    /// Report failures under `context` instead of [`JOB_STATUS_ERROR`].
    pub fn with_failure_context(mut self, context: impl Into<String>) -> Self {
        self.failure_context = context.into();
        self
    }

    /// Poll `job_id` until it reaches a terminal state.
    ///
    /// `on_progress` sees the job's notes on every `active` poll that has
    /// them. `Ok` carries the full `finished` snapshot. `Err` has already
    /// been reported to the notification sink.
    pub async fn poll<F>(
        &self,
        job_id: &str,
        mode: PollMode,
        mut on_progress: F,
    ) -> Result<JobStatus, MinionError>
    where
        F: FnMut(&Value),
    {
        let request = ApiRequest::get(mode.status_path(job_id));
        let mut polls: u64 = 0;

        loop {
            polls += 1;
            let status = match self.fetch(&request).await {
                Ok(status) => status,
                Err(e) => return Err(self.fail(job_id, e)),
            };
            tracing::debug!(job_id, poll = polls, state = ?status.state, "job status");

            match status.state {
                JobState::Inactive => tokio::time::sleep(self.intervals.inactive()).await,
                JobState::Active => {
                    if let Some(notes) = &status.notes {
                        on_progress(notes);
                    }
                    tokio::time::sleep(self.intervals.active()).await;
                }
                JobState::Failed => {
                    let e = MinionError::Job(status.failure_message());
                    return Err(self.fail(job_id, e));
                }
                JobState::Finished => {
                    tracing::info!(job_id, polls, "job finished");
                    return Ok(status);
                }
            }
        }
    }

    async fn fetch(&self, request: &ApiRequest) -> Result<JobStatus, MinionError> {
        let envelope = self.invoker.exchange(request).await?;
        let has_error = envelope.payload.get("error").is_some_and(is_truthy);
        if !envelope.success || has_error {
            let detail = match envelope.error_text() {
                "" => "job status request failed",
                text => text,
            };
            return Err(MinionError::Application(detail.to_string()));
        }
        Ok(serde_json::from_value(envelope.payload)?)
    }

    fn fail(&self, job_id: &str, e: MinionError) -> MinionError {
        tracing::warn!(job_id, error = %e, "job polling stopped");
        self.invoker
            .notifier()
            .notify_error(&self.failure_context, &e.to_string());
        e
    }
}
