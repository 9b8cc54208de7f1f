//! Request invoker — one API call, one envelope, one user-visible outcome.
//!
//! Failures are absorbed here: the caller gets `None` and the user gets an
//! error notification, so call sites never need their own error handling.

use std::sync::Arc;

use minion_core::{ApiUrl, MinionError, RawResponse, ResponseEnvelope, TransportError};
use serde_json::Value;

use crate::notify::{HideAfter, NotificationSink, Toast, DEFAULT_HIDE_AFTER};
use crate::transport::{HttpTransport, Method, RequestBody};

/// Description of one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, or an absolute URL.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Toast heading on success. A `successMessage` in the reply wins.
    pub success_message: Option<String>,
    /// First line of the error notification on failure.
    pub error_context: String,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            success_message: None,
            error_context: String::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn error_context(mut self, context: impl Into<String>) -> Self {
        self.error_context = context.into();
        self
    }
}

#[derive(Clone)]
pub struct RequestInvoker {
    transport: Arc<dyn HttpTransport>,
    notifier: Arc<dyn NotificationSink>,
    urls: ApiUrl,
    success_hide_after: HideAfter,
}

impl RequestInvoker {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        notifier: Arc<dyn NotificationSink>,
        urls: ApiUrl,
    ) -> Self {
        Self {
            transport,
            notifier,
            urls,
            success_hide_after: DEFAULT_HIDE_AFTER,
        }
    }

    pub fn with_success_hide_after(mut self, millis: u64) -> Self {
        self.success_hide_after = HideAfter::Millis(millis);
        self
    }

    pub fn urls(&self) -> &ApiUrl {
        &self.urls
    }

    pub fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    /// A success toast with the configured auto-hide delay.
    pub fn success_toast(&self, heading: impl Into<String>) -> Toast {
        Toast::success(heading).hide_after(self.success_hide_after)
    }

    /// Send the request and return the raw transport outcome.
    pub async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let url = self.target(request)?;
        tracing::debug!(method = %request.method, %url, "api request");
        self.transport
            .send(&url, request.method, request.body.clone())
            .await
    }

    /// Send and normalize, without notifying anyone.
    pub async fn exchange(&self, request: &ApiRequest) -> Result<ResponseEnvelope, MinionError> {
        let outcome = self.send(request).await;
        ResponseEnvelope::normalize(&outcome)
    }

    /// Run the request. Returns the reply payload on success, `None` after
    /// reporting a failure.
    pub async fn invoke(&self, request: ApiRequest) -> Option<Value> {
        let envelope = match self.exchange(&request).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(path = %request.path, error = %e, "unreadable api response");
                self.notifier
                    .notify_error(&request.error_context, &e.to_string());
                return None;
            }
        };

        if !envelope.success {
            tracing::debug!(path = %request.path, error = envelope.error_text(), "api call failed");
            self.notifier
                .notify_error(&request.error_context, envelope.error_text());
            return None;
        }

        let message = envelope
            .success_message
            .or(request.success_message);
        if let Some(heading) = message {
            self.notifier.notify_success(self.success_toast(heading));
        }

        Some(envelope.payload)
    }

    /// [`invoke`](Self::invoke), then hand the payload to `on_success`.
    pub async fn invoke_then<T>(
        &self,
        request: ApiRequest,
        on_success: impl FnOnce(Value) -> T,
    ) -> Option<T> {
        self.invoke(request).await.map(on_success)
    }

    fn target(&self, request: &ApiRequest) -> Result<String, TransportError> {
        let url = self.urls.resolve(&request.path);
        if request.query.is_empty() {
            return Ok(url);
        }
        let mut parsed = reqwest::Url::parse(&url)
            .map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))?;
        parsed.query_pairs_mut().extend_pairs(&request.query);
        Ok(parsed.into())
    }
}
