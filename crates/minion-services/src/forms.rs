//! Form submission — saves a page form back to the page it came from.

use std::sync::Arc;

use minion_core::{display_value, is_truthy};

use crate::invoker::{ApiRequest, RequestInvoker};
use crate::page::PageControls;
use crate::transport::RequestBody;

pub const SAVE_ERROR: &str = "Error while saving";

#[derive(Clone)]
pub struct FormSubmitter {
    invoker: RequestInvoker,
    page: Arc<dyn PageControls>,
    page_path: String,
}

impl FormSubmitter {
    pub fn new(invoker: RequestInvoker, page: Arc<dyn PageControls>, page_path: impl Into<String>) -> Self {
        Self {
            invoker,
            page,
            page_path: page_path.into(),
        }
    }

    /// POST the form matched by `selector` to the page endpoint.
    ///
    /// Unlike ordinary API calls, a save only counts when the reply carries
    /// an explicit truthy `success`. Returns whether the save went through.
    pub async fn save(&self, selector: &str) -> bool {
        let form = self.page.form_data(selector);
        let request = ApiRequest::post(self.page_path.clone()).body(RequestBody::Form(form));

        let envelope = match self.invoker.exchange(&request).await {
            Ok(envelope) => envelope,
            Err(e) => {
                self.invoker.notifier().notify_error(SAVE_ERROR, &e.to_string());
                return false;
            }
        };

        if envelope.payload.get("success").is_some_and(is_truthy) {
            tracing::debug!(selector, "form saved");
            self.invoker
                .notifier()
                .notify_success(self.invoker.success_toast("Saved successfully!"));
            return true;
        }

        let detail = envelope
            .payload
            .get("message")
            .and_then(display_value)
            .or(envelope.error)
            .unwrap_or_default();
        self.invoker.notifier().notify_error(SAVE_ERROR, &detail);
        false
    }
}
