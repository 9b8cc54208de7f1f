//! In-memory collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use minion_core::{ApiUrl, RawResponse, TransportError};
use serde_json::Value;

use crate::invoker::RequestInvoker;
use crate::notify::{ConfirmPrompt, Confirmation, ConfirmationSink, NotificationSink, Toast};
use crate::page::PageControls;
use crate::transport::{FormData, HttpTransport, Method, RequestBody};

pub const BASE: &str = "http://lrr.test";

#[derive(Debug, Clone)]
pub struct SentRequest {
    pub url: String,
    pub method: Method,
    pub body: Option<RequestBody>,
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_json(&self, value: Value) -> &Self {
        self.reply(Ok(RawResponse::json(200, &value)))
    }

    pub fn reply(&self, outcome: Result<RawResponse, TransportError>) -> &Self {
        self.replies.lock().unwrap().push_back(outcome);
        self
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.sent().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        url: &str,
        method: Method,
        body: Option<RequestBody>,
    ) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            url: url.to_string(),
            method,
            body,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Note {
    Toast(Toast),
    Error { context: String, detail: String },
}

#[derive(Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<Note>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Toast(t) => Some(t),
                Note::Error { .. } => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(String, String)> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Error { context, detail } => Some((context, detail)),
                Note::Toast(_) => None,
            })
            .collect()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify_success(&self, toast: Toast) {
        self.notes.lock().unwrap().push(Note::Toast(toast));
    }

    fn notify_error(&self, context: &str, detail: &str) {
        self.notes.lock().unwrap().push(Note::Error {
            context: context.to_string(),
            detail: detail.to_string(),
        });
    }
}

/// Answers every prompt the same way and keeps the prompts.
pub struct FixedConfirm {
    answer: bool,
    pub prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl FixedConfirm {
    pub fn new(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ConfirmationSink for FixedConfirm {
    async fn confirm(&self, prompt: ConfirmPrompt) -> Confirmation {
        self.prompts.lock().unwrap().push(prompt);
        Confirmation {
            confirmed: self.answer,
        }
    }
}

#[derive(Default)]
pub struct FakePage {
    pub inputs: HashMap<String, String>,
    pub form: FormData,
    pub running: Mutex<Vec<bool>>,
    pub progress: Mutex<Vec<Value>>,
}

impl FakePage {
    pub fn running_history(&self) -> Vec<bool> {
        self.running.lock().unwrap().clone()
    }
}

impl PageControls for FakePage {
    fn form_data(&self, _selector: &str) -> FormData {
        self.form.clone()
    }

    fn input_value(&self, id: &str) -> Option<String> {
        self.inputs.get(id).cloned()
    }

    fn set_running(&self, running: bool) {
        self.running.lock().unwrap().push(running);
    }

    fn progress(&self, notes: &Value) {
        self.progress.lock().unwrap().push(notes.clone());
    }
}

pub fn invoker(transport: &Arc<ScriptedTransport>, notifier: &Arc<RecordingNotifier>) -> RequestInvoker {
    RequestInvoker::new(transport.clone(), notifier.clone(), ApiUrl::new(BASE))
}
