//! Plugin script commands.

use anyhow::{Context, Result, bail};
use minion_services::{Minion, TriggerOutcome};

use crate::console::CliPage;

/// Build the page a script run sees from `--arg <value>` and
/// `--field <key>=<value>` flags.
pub fn page_from_flags(namespace: &str, flags: &[&str]) -> Result<CliPage> {
    let mut page = CliPage::default();
    let mut i = 0;
    while i < flags.len() {
        match flags[i] {
            "--arg" => {
                i += 1;
                let value = flags.get(i).context("--arg requires a value")?;
                page.inputs.insert(format!("{namespace}_ARG"), value.to_string());
            }
            "--field" => {
                i += 1;
                let pair = flags.get(i).context("--field requires key=value")?;
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("--field expects key=value, got {pair}"))?;
                page.fields.push((key.to_string(), value.to_string()));
            }
            other => bail!("unknown script option: {other}"),
        }
        i += 1;
    }
    Ok(page)
}

pub async fn cmd_script_run(minion: &Minion, namespace: &str) -> Result<()> {
    match minion.scripts.trigger(namespace).await {
        TriggerOutcome::Finished(_) => Ok(()),
        TriggerOutcome::Rejected => bail!("another script is already running"),
        TriggerOutcome::SaveFailed => bail!("plugin settings could not be saved"),
        TriggerOutcome::EnqueueFailed => bail!("script {namespace} was not queued"),
        TriggerOutcome::JobFailed(e) => Err(e).context("script job failed"),
    }
}
