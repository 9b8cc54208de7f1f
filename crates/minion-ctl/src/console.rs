//! Terminal stand-ins for the browser: toasts go to stdout/stderr, prompts
//! read stdin, and the "page" is whatever the command line supplied.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use async_trait::async_trait;
use minion_services::{
    ConfirmPrompt, Confirmation, ConfirmationSink, FormData, HideAfter, NotificationSink,
    PageControls, Toast, ToastKind,
};
use serde_json::Value;

pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify_success(&self, toast: Toast) {
        let mark = match toast.kind {
            ToastKind::Success => "✓",
            ToastKind::Info => "ℹ",
            ToastKind::Warning => "⚠",
        };
        println!("{mark} {}", toast.heading);
        if let Some(text) = &toast.text {
            for line in text.lines() {
                println!("  {line}");
            }
        }
        if toast.hide_after == HideAfter::Never {
            println!();
        }
    }

    fn notify_error(&self, context: &str, detail: &str) {
        eprintln!("✗ {context}");
        if !detail.is_empty() {
            eprintln!("  {detail}");
        }
    }
}

/// Asks on the terminal. Anything but an explicit yes is a no, and so is
/// a closed stdin.
pub struct StdinConfirm {
    /// Answer yes without asking (`--yes`).
    pub assume_yes: bool,
}

#[async_trait]
impl ConfirmationSink for StdinConfirm {
    async fn confirm(&self, prompt: ConfirmPrompt) -> Confirmation {
        if self.assume_yes {
            return Confirmation { confirmed: true };
        }

        let answer = tokio::task::spawn_blocking(move || {
            println!("═══════════════════════════════════════");
            println!("  {}", prompt.title);
            println!("═══════════════════════════════════════");
            println!("  {}", prompt.text);
            print!(
                "  [y] {} / [N] {} : ",
                prompt.confirm_label, prompt.cancel_label
            );
            std::io::stdout().flush().ok();

            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(_) => matches!(line.trim(), "y" | "Y" | "yes"),
                Err(_) => false,
            }
        })
        .await
        .unwrap_or(false);

        Confirmation { confirmed: answer }
    }
}

/// Page state assembled from `--arg` / `--field` flags.
#[derive(Default)]
pub struct CliPage {
    pub inputs: HashMap<String, String>,
    pub fields: Vec<(String, String)>,
}

impl PageControls for CliPage {
    fn form_data(&self, _selector: &str) -> FormData {
        self.fields
            .iter()
            .fold(FormData::new(), |form, (k, v)| form.field(k.clone(), v.clone()))
    }

    fn input_value(&self, id: &str) -> Option<String> {
        self.inputs.get(id).cloned()
    }

    fn set_running(&self, running: bool) {
        if running {
            println!("⋯ script running");
        }
    }

    fn progress(&self, notes: &Value) {
        match notes {
            Value::String(s) => println!("  ⋯ {s}"),
            other => println!("  ⋯ {other}"),
        }
    }
}
