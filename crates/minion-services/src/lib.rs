//! minion-services — request invocation, job polling, script sessions and
//! the server operations built on them.

pub mod context;
pub mod forms;
pub mod guard;
pub mod invoker;
pub mod notify;
pub mod page;
pub mod poller;
pub mod server_ops;
pub mod transport;
pub mod uploads;

#[cfg(test)]
mod testing;

pub use context::Minion;
pub use forms::FormSubmitter;
pub use guard::{ScriptExecutor, ScriptGuard, ScriptSession, TriggerOutcome};
pub use invoker::{ApiRequest, RequestInvoker};
pub use notify::{
    ConfirmPrompt, Confirmation, ConfirmationSink, HideAfter, NotificationSink, Toast, ToastKind,
    TracingNotifier,
};
pub use page::PageControls;
pub use poller::{JobPoller, JOB_STATUS_ERROR};
pub use server_ops::{ArchiveDeletion, CleanReport, ServerOps};
pub use transport::{FilePart, FormData, HttpTransport, Method, ReqwestTransport, RequestBody};
pub use uploads::{RestoreOutcome, Uploads};
