//! Services context — wires every service to one set of collaborators.

use std::sync::Arc;

use minion_core::config::MinionConfig;

use crate::forms::FormSubmitter;
use crate::guard::{ScriptExecutor, ScriptGuard};
use crate::invoker::RequestInvoker;
use crate::notify::{ConfirmationSink, NotificationSink};
use crate::page::PageControls;
use crate::poller::JobPoller;
use crate::server_ops::ServerOps;
use crate::transport::HttpTransport;
use crate::uploads::Uploads;

/// Everything a front end needs, built once per process.
///
/// The script guard lives here, so two contexts never share a session
/// flag; clone the context to share it.
#[derive(Clone)]
pub struct Minion {
    pub invoker: RequestInvoker,
    pub poller: JobPoller,
    pub forms: FormSubmitter,
    pub scripts: ScriptExecutor,
    pub ops: ServerOps,
    pub uploads: Uploads,
}

impl Minion {
    pub fn new(
        config: &MinionConfig,
        transport: Arc<dyn HttpTransport>,
        notifier: Arc<dyn NotificationSink>,
        confirm: Arc<dyn ConfirmationSink>,
        page: Arc<dyn PageControls>,
    ) -> Self {
        let invoker = RequestInvoker::new(transport, notifier, config.api_url())
            .with_success_hide_after(config.notifications.success_hide_after_ms);
        let poller = JobPoller::new(invoker.clone(), config.polling);
        let forms = FormSubmitter::new(invoker.clone(), page.clone(), config.script.page_path.clone());
        let scripts = ScriptExecutor::new(
            invoker.clone(),
            poller.clone(),
            forms.clone(),
            page,
            ScriptGuard::new(),
            config.script.form_selector.clone(),
        );
        let ops = ServerOps::new(invoker.clone(), poller.clone(), confirm);
        let uploads = Uploads::new(invoker.clone());

        tracing::debug!(base_url = %config.server.base_url, "minion services ready");
        Self {
            invoker,
            poller,
            forms,
            scripts,
            ops,
            uploads,
        }
    }
}
