//! Minion job status — the snapshot returned by the job status endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::display_value;

/// Lifecycle state of a minion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Accepted, not started yet.
    Inactive,
    Active,
    Failed,
    Finished,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Finished)
    }
}

/// One snapshot of a job. Never cached between polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    /// Progress notes the job writes while active. `null` reads as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Value>,
    /// Job return value; the error message when `state` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Everything else the endpoint sent (id, task, args, timestamps...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobStatus {
    /// Error text of a failed job.
    pub fn failure_message(&self) -> String {
        self.result
            .as_ref()
            .and_then(display_value)
            .unwrap_or_else(|| "job failed without a result".to_string())
    }

    /// Field of the job's own result object, e.g. `result.success`.
    pub fn result_field(&self, key: &str) -> Option<&Value> {
        self.result.as_ref().and_then(|r| r.get(key))
    }
}

/// Job id from an enqueue response (`{"job": 42}` or `{"job": "42"}`).
pub fn job_id_of(payload: &Value) -> Option<String> {
    match payload.get("job")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Which status endpoint a polling session reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    Summary,
    /// Full job record; the server only serves it to logged-in callers.
    #[default]
    Detail,
}

impl PollMode {
    pub fn status_path(self, job_id: &str) -> String {
        match self {
            PollMode::Summary => format!("/api/minion/{job_id}"),
            PollMode::Detail => format!("/api/minion/{job_id}/detail"),
        }
    }
}
