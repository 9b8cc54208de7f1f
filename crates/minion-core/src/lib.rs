//! minion-core — response envelopes, job status types, endpoint resolution
//! and configuration. Every other minion crate depends on this one.

pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod job;

pub use endpoint::ApiUrl;
pub use envelope::{display_value, is_truthy, RawResponse, ResponseEnvelope};
pub use error::{MinionError, TransportError};
pub use job::{job_id_of, JobState, JobStatus, PollMode};
