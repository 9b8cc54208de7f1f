//! Job status command.

use anyhow::{Context, Result};
use minion_core::PollMode;
use minion_services::Minion;
use minion_services::guard::pretty_json;

/// Follow a job to the end and print its final record.
pub async fn cmd_job(minion: &Minion, job_id: &str, summary: bool) -> Result<()> {
    let mode = if summary { PollMode::Summary } else { PollMode::Detail };
    let status = minion
        .poller
        .poll(job_id, mode, |notes| println!("  ⋯ {notes}"))
        .await
        .with_context(|| format!("job {job_id} did not finish"))?;

    println!("═══════════════════════════════════════");
    println!("  Job {job_id}");
    println!("═══════════════════════════════════════");
    match &status.result {
        Some(result) => println!("{}", pretty_json(result)),
        None => println!("  (no result)"),
    }
    Ok(())
}
