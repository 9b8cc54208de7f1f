//! minion-ctl — command-line front end for the archive server's minion
//! jobs and maintenance endpoints.

use std::sync::Arc;

use anyhow::{Context, Result};
use minion_core::config::MinionConfig;
use minion_services::{Minion, ReqwestTransport};

mod cmd;
mod console;

use console::{CliPage, ConsoleNotifier, StdinConfirm};

fn print_usage() {
    println!("Usage: minion-ctl [--url <base>] [--yes] <command>");
    println!();
    println!("Commands:");
    println!("  script run <ns> [--arg <v>] [--field <k=v>]...");
    println!("                                Save plugin settings, run its script, wait for the result");
    println!("  job <id> [--summary]          Follow a minion job until it ends");
    println!("  temp clean                    Empty the temporary folder");
    println!("  cache invalidate              Clear the search cache");
    println!("  isnew clear                   Mark every archive as read");
    println!("  db clean                      Remove stale database entries");
    println!("  db drop                       Drop the whole database (asks first)");
    println!("  thumbs regen [--force]        Regenerate thumbnails");
    println!("  category add <cat> <arc>      Add an archive to a category");
    println!("  category remove <cat> <arc>   Remove an archive from a category");
    println!("  archive delete <id>           Delete an archive and its file");
    println!("  plugin upload <file>          Upload a plugin module");
    println!("  backup restore <file>         Restore a JSON backup");
    println!("  config init                   Write the default config file");
    println!("  config show                   Print the effective configuration");
    println!();
    println!("Options:");
    println!("  --url <base>   Server base URL (default: from config)");
    println!("  --yes          Answer yes to confirmation prompts");
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut url: Option<String> = None;
    let mut assume_yes = false;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--url" => {
                i += 1;
                url = Some(args.get(i).context("--url requires a value")?.clone());
            }
            "--yes" | "-y" => assume_yes = true,
            other => remaining.push(other),
        }
        i += 1;
    }

    let mut config = MinionConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        MinionConfig::default()
    });
    if let Some(url) = url {
        config.server.base_url = url;
    }

    let page = match remaining.as_slice() {
        ["script", "run", ns, flags @ ..] => cmd::script::page_from_flags(ns, flags)?,
        _ => CliPage::default(),
    };
    let minion = Minion::new(
        &config,
        Arc::new(ReqwestTransport::new()),
        Arc::new(ConsoleNotifier),
        Arc::new(StdinConfirm { assume_yes }),
        Arc::new(page),
    );

    match remaining.as_slice() {
        ["script", "run", ns, ..]              => cmd::script::cmd_script_run(&minion, ns).await,
        ["job", id]                            => cmd::job::cmd_job(&minion, id, false).await,
        ["job", id, "--summary"]               => cmd::job::cmd_job(&minion, id, true).await,
        ["temp", "clean"]                      => cmd::maintenance::cmd_temp_clean(&minion).await,
        ["cache", "invalidate"]                => cmd::maintenance::cmd_cache_invalidate(&minion).await,
        ["isnew", "clear"]                     => cmd::maintenance::cmd_isnew_clear(&minion).await,
        ["db", "clean"]                        => cmd::maintenance::cmd_db_clean(&minion).await,
        ["db", "drop"]                         => cmd::maintenance::cmd_db_drop(&minion).await,
        ["thumbs", "regen"]                    => cmd::maintenance::cmd_thumbs_regen(&minion, false).await,
        ["thumbs", "regen", "--force"]         => cmd::maintenance::cmd_thumbs_regen(&minion, true).await,
        ["category", "add", cat, arc]          => cmd::maintenance::cmd_category(&minion, true, cat, arc).await,
        ["category", "remove", cat, arc]       => cmd::maintenance::cmd_category(&minion, false, cat, arc).await,
        ["archive", "delete", id]              => cmd::maintenance::cmd_archive_delete(&minion, id).await,
        ["plugin", "upload", path]             => cmd::uploads::cmd_plugin_upload(&minion, path).await,
        ["backup", "restore", path]            => cmd::uploads::cmd_backup_restore(&minion, path).await,
        ["config", "init"]                     => cmd::config::cmd_config_init(),
        ["config", "show"]                     => cmd::config::cmd_config_show(&config),
        ["help"] | ["--help"] | ["-h"] | []    => { print_usage(); Ok(()) }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
