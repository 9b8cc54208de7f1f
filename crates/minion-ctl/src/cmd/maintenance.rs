//! Server maintenance commands.

use anyhow::{Result, bail};
use minion_services::{ArchiveDeletion, Minion};

fn done(ok: bool, what: &str) -> Result<()> {
    if !ok {
        bail!("{what} failed");
    }
    Ok(())
}

pub async fn cmd_temp_clean(minion: &Minion) -> Result<()> {
    let Some(size) = minion.ops.clean_temp_folder().await else {
        bail!("temp folder cleanup failed");
    };
    println!("  Temp folder size : {size} MB");
    Ok(())
}

pub async fn cmd_cache_invalidate(minion: &Minion) -> Result<()> {
    done(minion.ops.invalidate_search_cache().await, "cache invalidation")
}

pub async fn cmd_isnew_clear(minion: &Minion) -> Result<()> {
    done(minion.ops.clear_new_flags().await, "clearing new flags")
}

pub async fn cmd_db_clean(minion: &Minion) -> Result<()> {
    done(minion.ops.clean_database().await.is_some(), "database cleanup")
}

pub async fn cmd_db_drop(minion: &Minion) -> Result<()> {
    if !minion.ops.drop_database().await {
        println!("Database left untouched.");
    }
    Ok(())
}

pub async fn cmd_thumbs_regen(minion: &Minion, force: bool) -> Result<()> {
    done(
        minion.ops.regenerate_thumbnails(force).await.is_some(),
        "thumbnail regeneration",
    )
}

pub async fn cmd_category(minion: &Minion, add: bool, category: &str, archive: &str) -> Result<()> {
    let ok = if add {
        minion.ops.add_archive_to_category(category, archive).await
    } else {
        minion.ops.remove_archive_from_category(category, archive).await
    };
    done(ok, "category update")
}

pub async fn cmd_archive_delete(minion: &Minion, id: &str) -> Result<()> {
    match minion.ops.delete_archive(id).await {
        ArchiveDeletion::Deleted { .. } => Ok(()),
        ArchiveDeletion::MetadataOnly => bail!("archive file for {id} must be removed by hand"),
        ArchiveDeletion::Failed => bail!("archive {id} was not deleted"),
    }
}
