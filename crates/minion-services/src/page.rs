//! Page controls — the slice of the UI the script runner touches.

use serde_json::Value;

use crate::transport::FormData;

pub trait PageControls: Send + Sync {
    /// Current contents of the form matched by `selector`.
    fn form_data(&self, selector: &str) -> FormData;

    /// Value of the input element with the given id.
    fn input_value(&self, id: &str) -> Option<String>;

    /// Show or hide the running indicator; triggers are disabled while
    /// `running` is true.
    fn set_running(&self, running: bool);

    /// Progress notes reported by a running script job.
    fn progress(&self, _notes: &Value) {}
}
