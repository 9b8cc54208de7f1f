//! Server maintenance operations — the buttons of the settings pages.
//!
//! Each operation is one API call through the [`RequestInvoker`], so it
//! reports its own outcome. Return values only carry what a caller might
//! want to display next to the button.

use std::sync::Arc;

use minion_core::{display_value, is_truthy, job_id_of, JobStatus, PollMode};
use serde_json::Value;

use crate::invoker::{ApiRequest, RequestInvoker};
use crate::notify::{ConfirmPrompt, ConfirmationSink, HideAfter, Toast};
use crate::poller::JobPoller;

pub const THUMBNAIL_JOB_FAILED: &str = "Thumbnail regeneration failed!";
pub const CATEGORY_ERROR: &str = "Error adding/removing archive to category";
pub const DELETE_ARCHIVE_ERROR: &str = "Error while deleting archive";

/// Counts reported by a database cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanReport {
    pub deleted: u64,
    pub unlinked: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveDeletion {
    Deleted { filename: Option<String> },
    /// The database entry is gone but the file could not be removed.
    MetadataOnly,
    Failed,
}

#[derive(Clone)]
pub struct ServerOps {
    invoker: RequestInvoker,
    poller: JobPoller,
    confirm: Arc<dyn ConfirmationSink>,
}

impl ServerOps {
    pub fn new(invoker: RequestInvoker, poller: JobPoller, confirm: Arc<dyn ConfirmationSink>) -> Self {
        Self {
            invoker,
            poller,
            confirm,
        }
    }

    /// Empty the server's temp folder. Returns the new folder size.
    pub async fn clean_temp_folder(&self) -> Option<Value> {
        self.invoker
            .invoke_then(
                ApiRequest::delete("/api/tempfolder")
                    .success_message("Temporary folder cleaned!")
                    .error_context("Error while cleaning temporary folder:"),
                |payload| payload.get("newsize").cloned().unwrap_or(Value::Null),
            )
            .await
    }

    pub async fn invalidate_search_cache(&self) -> bool {
        self.invoker
            .invoke(
                ApiRequest::delete("/api/search/cache")
                    .success_message("Search cache cleared!")
                    .error_context("Error while clearing search cache! Check the logs."),
            )
            .await
            .is_some()
    }

    pub async fn clear_new_flags(&self) -> bool {
        self.invoker
            .invoke(
                ApiRequest::delete("/api/database/isnew")
                    .success_message("All archives are no longer new!")
                    .error_context("Error while clearing flags! Check the logs."),
            )
            .await
            .is_some()
    }

    /// Drop the whole database, after asking. Nothing is sent when the user
    /// backs out.
    pub async fn drop_database(&self) -> bool {
        let answer = self
            .confirm
            .confirm(ConfirmPrompt {
                title: "This is a (very) destructive operation!".into(),
                text: "Do you really want to drop the database?".into(),
                confirm_label: "Yes, I'm sure!".into(),
                cancel_label: "Cancel".into(),
            })
            .await;
        if !answer.confirmed {
            tracing::info!("database drop cancelled");
            return false;
        }

        self.invoker
            .invoke(
                ApiRequest::post("/api/database/drop")
                    .success_message("Goodbye! Redirecting...")
                    .error_context("Error while resetting the database? Check the logs."),
            )
            .await
            .is_some()
    }

    pub async fn clean_database(&self) -> Option<CleanReport> {
        let payload = self
            .invoker
            .invoke(
                ApiRequest::post("/api/database/clean")
                    .error_context("Error while cleaning the database! Check the logs."),
            )
            .await?;

        let report = CleanReport {
            deleted: count(&payload, "deleted"),
            unlinked: count(&payload, "unlinked"),
        };
        let notifier = self.invoker.notifier();
        notifier.notify_success(self.invoker.success_toast(format!(
            "Successfully cleaned the database and removed {} entries!",
            report.deleted
        )));
        if report.unlinked > 0 {
            notifier.notify_success(
                Toast::warning(format!(
                    "{} other entries have been unlinked from the database and will be deleted on the next cleanup!",
                    report.unlinked
                ))
                .with_text("Do a backup now if some files disappeared from your archive index.")
                .hide_after(HideAfter::Millis(16000)),
            );
        }
        Some(report)
    }

    /// Queue a thumbnail regeneration job and follow it to the end.
    pub async fn regenerate_thumbnails(&self, force: bool) -> Option<JobStatus> {
        let payload = self
            .invoker
            .invoke(
                ApiRequest::post("/api/regen_thumbs")
                    .query("force", if force { "1" } else { "0" })
                    .success_message(
                        "Thumbnail regeneration task queued! Stay tuned for updates or check the Minion console.",
                    )
                    .error_context("Error while sending job to Minion:"),
            )
            .await?;
        let Some(job_id) = job_id_of(&payload) else {
            self.invoker
                .notifier()
                .notify_error(THUMBNAIL_JOB_FAILED, "the server did not return a job id");
            return None;
        };

        let status = self
            .poller
            .clone()
            .with_failure_context(THUMBNAIL_JOB_FAILED)
            .poll(&job_id, PollMode::Detail, |_| {})
            .await
            .ok()?;

        let mut toast = Toast::success("All thumbnails generated! Encountered the following errors:")
            .hide_after(HideAfter::Millis(15000));
        if let Some(errors) = status.result_field("errors").and_then(error_lines) {
            toast = toast.with_text(errors);
        }
        self.invoker.notifier().notify_success(toast);
        Some(status)
    }

    pub async fn add_archive_to_category(&self, category: &str, archive: &str) -> bool {
        self.invoker
            .invoke(
                ApiRequest::put(format!("/api/categories/{category}/{archive}"))
                    .success_message(format!("Added {archive} to category {category}!"))
                    .error_context(CATEGORY_ERROR),
            )
            .await
            .is_some()
    }

    pub async fn remove_archive_from_category(&self, category: &str, archive: &str) -> bool {
        self.invoker
            .invoke(
                ApiRequest::delete(format!("/api/categories/{category}/{archive}"))
                    .success_message(format!("Removed {archive} from category {category}!"))
                    .error_context(CATEGORY_ERROR),
            )
            .await
            .is_some()
    }

    /// Delete an archive's database entry and, if possible, its file.
    ///
    /// This endpoint only reports success explicitly, so a reply without a
    /// truthy `success` is a partial deletion rather than a success.
    pub async fn delete_archive(&self, id: &str) -> ArchiveDeletion {
        let request = ApiRequest::delete(format!("/api/archives/{id}"));
        let envelope = match self.invoker.exchange(&request).await {
            Ok(envelope) => envelope,
            Err(e) => {
                self.invoker
                    .notifier()
                    .notify_error(DELETE_ARCHIVE_ERROR, &e.to_string());
                return ArchiveDeletion::Failed;
            }
        };

        let notifier = self.invoker.notifier();
        if !envelope.payload.get("success").is_some_and(is_truthy) {
            tracing::warn!(id, error = envelope.error_text(), "archive file not deleted");
            notifier.notify_success(
                Toast::warning("Couldn't delete the archive file. (Maybe it was already deleted?)")
                    .with_text(
                        "The archive metadata was deleted properly. \
                         Please delete the file manually before returning to the library.",
                    )
                    .hide_after(HideAfter::Millis(20000)),
            );
            return ArchiveDeletion::MetadataOnly;
        }

        let filename = envelope.payload.get("filename").and_then(display_value);
        notifier.notify_success(
            self.invoker
                .success_toast("Archive successfully deleted. Redirecting...")
                .with_text(format!("File name: {}", filename.as_deref().unwrap_or(""))),
        );
        ArchiveDeletion::Deleted { filename }
    }
}

fn count(payload: &Value, key: &str) -> u64 {
    match payload.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

fn error_lines(errors: &Value) -> Option<String> {
    match errors {
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(display_value)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => display_value(other).filter(|s| !s.is_empty()),
    }
}
