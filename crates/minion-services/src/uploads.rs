//! File uploads: plugin modules and database backups.

use minion_core::{display_value, is_truthy, ResponseEnvelope};
use serde_json::Value;

use crate::invoker::{ApiRequest, RequestInvoker};
use crate::notify::{HideAfter, Toast};
use crate::transport::{FilePart, FormData, RequestBody};

pub const PLUGIN_UPLOAD_ERROR: &str = "Error while uploading plugin";
pub const BACKUP_RESTORE_ERROR: &str = "Error while restoring backup";
pub const BACKUP_SERVER_ERROR: &str = "Oops! A server-side error occurred.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    /// The server read the backup and refused it.
    Rejected(String),
    /// No readable reply at all.
    ServerError,
}

#[derive(Clone)]
pub struct Uploads {
    invoker: RequestInvoker,
}

impl Uploads {
    pub fn new(invoker: RequestInvoker) -> Self {
        Self { invoker }
    }

    /// Upload a plugin module. Returns the plugin's name on success.
    pub async fn upload_plugin(&self, file: FilePart) -> Option<String> {
        let request = ApiRequest::post("/config/plugins/upload")
            .body(RequestBody::Form(FormData::new().file(file)));
        let notifier = self.invoker.notifier();

        let payload = match self.invoker.exchange(&request).await {
            Ok(envelope) => envelope.payload,
            Err(e) => {
                notifier.notify_error(PLUGIN_UPLOAD_ERROR, &e.to_string());
                return None;
            }
        };

        if !payload.get("success").is_some_and(is_truthy) {
            let detail = field_text(&payload, "error");
            notifier.notify_error(PLUGIN_UPLOAD_ERROR, &detail);
            return None;
        }

        let name = field_text(&payload, "name");
        tracing::info!(plugin = %name, "plugin uploaded");
        notifier.notify_success(
            Toast::info("Plugin successfully uploaded!")
                .with_text(format!(
                    "The plugin \"{name}\" has been successfully added. Refresh the page to see it."
                ))
                .hide_after(HideAfter::Millis(10000)),
        );
        Some(name)
    }

    /// Restore the database from a JSON backup file.
    ///
    /// Only an exact `success: 1` counts. A failed request or an unreadable
    /// reply usually means the server choked on the file.
    pub async fn restore_backup(&self, file: FilePart) -> RestoreOutcome {
        let request = ApiRequest::post("/backup").body(RequestBody::Form(FormData::new().file(file)));
        let notifier = self.invoker.notifier();

        let payload = match self.invoker.send(&request).await {
            Ok(raw) if raw.is_ok() => ResponseEnvelope::normalize(&Ok(raw)).ok().map(|e| e.payload),
            Ok(raw) => {
                tracing::warn!(status = raw.status, "backup upload rejected");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "backup upload failed");
                None
            }
        };
        let Some(payload) = payload else {
            notifier.notify_error(BACKUP_SERVER_ERROR, "Maybe your JSON is malformed?");
            return RestoreOutcome::ServerError;
        };

        if payload.get("success").and_then(Value::as_i64) == Some(1) {
            notifier.notify_success(self.invoker.success_toast("Backup restored!"));
            return RestoreOutcome::Restored;
        }

        let detail = field_text(&payload, "error");
        notifier.notify_error(BACKUP_RESTORE_ERROR, &detail);
        RestoreOutcome::Rejected(detail)
    }
}

fn field_text(payload: &Value, key: &str) -> String {
    payload.get(key).and_then(display_value).unwrap_or_default()
}
