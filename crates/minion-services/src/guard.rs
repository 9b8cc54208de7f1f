//! Script execution — single-flight plugin script sessions.
//!
//! A session is: save the plugin form, queue the script, follow its job to
//! the end. Only one session may be open at a time. A second trigger while
//! one is running is rejected outright, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use minion_core::{display_value, is_truthy, job_id_of, JobStatus, MinionError, PollMode};
use serde::Serialize;
use serde_json::Value;

use crate::forms::FormSubmitter;
use crate::invoker::{ApiRequest, RequestInvoker};
use crate::notify::{HideAfter, Toast};
use crate::page::PageControls;
use crate::poller::JobPoller;

pub const ALREADY_RUNNING: &str = "A script is already running.";
pub const SCRIPT_ERROR: &str = "Error while executing script:";

/// Process-wide "a script is running" flag.
///
/// Clones share the flag. Build one per process and hand clones around.
#[derive(Debug, Clone, Default)]
pub struct ScriptGuard {
    running: Arc<AtomicBool>,
}

impl ScriptGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session, or `None` if one is already open.
    pub fn try_acquire(&self) -> Option<ScriptSession> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ScriptSession {
                running: self.running.clone(),
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the running script session. The flag is
/// cleared when the session is released or dropped, exactly once.
#[must_use = "dropping the session ends it immediately"]
#[derive(Debug)]
pub struct ScriptSession {
    running: Arc<AtomicBool>,
}

impl ScriptSession {
    pub fn release(self) {}
}

impl Drop for ScriptSession {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// How a trigger ended.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// Another session was open; nothing was sent.
    Rejected,
    SaveFailed,
    /// The queue call failed or returned no job id.
    EnqueueFailed,
    JobFailed(MinionError),
    /// The job finished. Its own result may still report a script error.
    Finished(JobStatus),
}

#[derive(Clone)]
pub struct ScriptExecutor {
    invoker: RequestInvoker,
    poller: JobPoller,
    forms: FormSubmitter,
    page: Arc<dyn PageControls>,
    guard: ScriptGuard,
    form_selector: String,
}

impl ScriptExecutor {
    pub fn new(
        invoker: RequestInvoker,
        poller: JobPoller,
        forms: FormSubmitter,
        page: Arc<dyn PageControls>,
        guard: ScriptGuard,
        form_selector: impl Into<String>,
    ) -> Self {
        Self {
            invoker,
            poller,
            forms,
            page,
            guard,
            form_selector: form_selector.into(),
        }
    }

    pub fn guard(&self) -> &ScriptGuard {
        &self.guard
    }

    /// Run the script of plugin `namespace`, with the value of the
    /// `<namespace>_ARG` input as its argument.
    pub async fn trigger(&self, namespace: &str) -> TriggerOutcome {
        let Some(session) = self.guard.try_acquire() else {
            tracing::debug!(namespace, "script trigger rejected");
            self.invoker
                .notifier()
                .notify_error(ALREADY_RUNNING, "Please wait for it to finish.");
            return TriggerOutcome::Rejected;
        };
        self.page.set_running(true);
        tracing::info!(namespace, "script session started");

        let outcome = self.run(namespace).await;

        session.release();
        self.page.set_running(false);

        if let TriggerOutcome::Finished(status) = &outcome {
            self.report_result(status);
        }
        outcome
    }

    async fn run(&self, namespace: &str) -> TriggerOutcome {
        // The script reads the plugin settings, so they must be stored first.
        if !self.forms.save(&self.form_selector).await {
            return TriggerOutcome::SaveFailed;
        }

        let arg = self
            .page
            .input_value(&format!("{namespace}_ARG"))
            .unwrap_or_default();
        let request = ApiRequest::post("/api/plugins/queue")
            .query("plugin", namespace)
            .query("arg", arg)
            .error_context(SCRIPT_ERROR);

        let Some(payload) = self.invoker.invoke(request).await else {
            return TriggerOutcome::EnqueueFailed;
        };
        let Some(job_id) = job_id_of(&payload) else {
            self.invoker
                .notifier()
                .notify_error(SCRIPT_ERROR, "the server did not return a job id");
            return TriggerOutcome::EnqueueFailed;
        };
        tracing::debug!(namespace, job_id, "script queued");

        match self
            .poller
            .poll(&job_id, PollMode::Detail, |notes| self.page.progress(notes))
            .await
        {
            Ok(status) => TriggerOutcome::Finished(status),
            Err(e) => TriggerOutcome::JobFailed(e),
        }
    }

    fn report_result(&self, status: &JobStatus) {
        let notifier = self.invoker.notifier();
        if status.result_field("success").is_some_and(is_truthy) {
            let data = status.result_field("data").unwrap_or(&Value::Null);
            notifier.notify_success(
                Toast::info("Script result")
                    .with_text(pretty_json(data))
                    .hide_after(HideAfter::Never),
            );
        } else {
            let error = status
                .result_field("error")
                .and_then(display_value)
                .unwrap_or_default();
            notifier.notify_error(&format!("Script error: {error}"), "");
        }
    }
}

/// JSON with four-space indentation.
pub fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}
