//! Plugin upload and backup restore commands.

use std::path::Path;

use anyhow::{Context, Result, bail};
use minion_services::{FilePart, Minion, RestoreOutcome};

async fn read_part(path: &str) -> Result<FilePart> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read file: {path}"))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    Ok(FilePart::new("file", file_name, bytes))
}

pub async fn cmd_plugin_upload(minion: &Minion, path: &str) -> Result<()> {
    let part = read_part(path).await?;
    if minion.uploads.upload_plugin(part).await.is_none() {
        bail!("plugin upload failed");
    }
    Ok(())
}

pub async fn cmd_backup_restore(minion: &Minion, path: &str) -> Result<()> {
    let part = read_part(path).await?;
    match minion.uploads.restore_backup(part).await {
        RestoreOutcome::Restored => Ok(()),
        RestoreOutcome::Rejected(_) | RestoreOutcome::ServerError => bail!("backup not restored"),
    }
}
