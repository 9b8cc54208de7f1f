//! Config file commands.

use anyhow::{Context, Result};
use minion_core::config::MinionConfig;

pub fn cmd_config_init() -> Result<()> {
    let path = MinionConfig::write_default_if_missing().context("failed to write config")?;
    println!("Config file: {}", path.display());
    Ok(())
}

/// Print the effective configuration, overrides applied.
pub fn cmd_config_show(config: &MinionConfig) -> Result<()> {
    let text = toml::to_string_pretty(config).context("failed to render config")?;
    println!("# {}", MinionConfig::file_path().display());
    print!("{text}");
    Ok(())
}
