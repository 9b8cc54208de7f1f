//! Notification and confirmation sinks — how results reach the user.

use async_trait::async_trait;

/// How long a toast stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideAfter {
    Millis(u64),
    /// Stays until the user dismisses it.
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
}

/// A non-error notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub heading: String,
    pub text: Option<String>,
    pub kind: ToastKind,
    pub hide_after: HideAfter,
}

pub const DEFAULT_HIDE_AFTER: HideAfter = HideAfter::Millis(7000);

impl Toast {
    pub fn new(kind: ToastKind, heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            text: None,
            kind,
            hide_after: DEFAULT_HIDE_AFTER,
        }
    }

    pub fn success(heading: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, heading)
    }

    pub fn info(heading: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, heading)
    }

    pub fn warning(heading: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, heading)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn hide_after(mut self, hide_after: HideAfter) -> Self {
        self.hide_after = hide_after;
        self
    }
}

/// Fire-and-forget notification output.
pub trait NotificationSink: Send + Sync {
    /// Success, info and warning toasts.
    fn notify_success(&self, toast: Toast);

    /// Error toast: a context line ("Error while cleaning database") and the
    /// detail the server or transport reported.
    fn notify_error(&self, context: &str, detail: &str);
}

/// Sink for headless use: every notification becomes a log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify_success(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Warning => tracing::warn!(text = ?toast.text, "{}", toast.heading),
            _ => tracing::info!(text = ?toast.text, "{}", toast.heading),
        }
    }

    fn notify_error(&self, context: &str, detail: &str) {
        tracing::error!(detail, "{}", context);
    }
}

/// A yes/no question put to the user before a destructive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub confirmed: bool,
}

#[async_trait]
pub trait ConfirmationSink: Send + Sync {
    async fn confirm(&self, prompt: ConfirmPrompt) -> Confirmation;
}
