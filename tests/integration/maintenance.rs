use minion_services::{ArchiveDeletion, CleanReport, HideAfter, ToastKind};

use crate::*;

#[tokio::test]
async fn test_temp_clean_returns_size() -> Result<()> {
    let (server, recorder, _page, minion) = setup(true).await?;
    server.on("DELETE", "/api/tempfolder", json!({ "success": 1, "newsize": 0 }));

    let size = minion.ops.clean_temp_folder().await;

    assert_eq!(size, Some(json!(0)));
    assert_eq!(server.lines(), vec!["DELETE /api/tempfolder"]);
    assert_eq!(recorder.headings(), vec!["Temporary folder cleaned!"]);
    Ok(())
}

#[tokio::test]
async fn test_drop_requires_confirmation() -> Result<()> {
    let (server, recorder, _page, minion) = setup(false).await?;
    server.on("POST", "/api/database/drop", json!({ "success": 1 }));

    assert!(!minion.ops.drop_database().await);
    assert!(server.lines().is_empty());
    assert!(recorder.headings().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_drop_when_confirmed() -> Result<()> {
    let (server, recorder, _page, minion) = setup(true).await?;
    server.on("POST", "/api/database/drop", json!({ "success": 1 }));

    assert!(minion.ops.drop_database().await);
    assert_eq!(server.lines(), vec!["POST /api/database/drop"]);
    assert_eq!(recorder.headings(), vec!["Goodbye! Redirecting..."]);
    Ok(())
}

#[tokio::test]
async fn test_clean_database_counts() -> Result<()> {
    let (server, recorder, _page, minion) = setup(true).await?;
    server.on("POST", "/api/database/clean", json!({ "success": 1, "deleted": 3, "unlinked": 1 }));

    let report = minion.ops.clean_database().await;

    assert_eq!(report, Some(CleanReport { deleted: 3, unlinked: 1 }));
    let toasts = recorder.toasts.lock().unwrap();
    assert_eq!(toasts.len(), 2);
    assert_eq!(toasts[1].kind, ToastKind::Warning);
    Ok(())
}

#[tokio::test]
async fn test_thumbnail_regeneration() -> Result<()> {
    let (server, recorder, _page, minion) = setup(true).await?;
    server
        .on("POST", "/api/regen_thumbs", json!({ "success": 1, "job": 88 }))
        .on("GET", "/api/minion/88/detail", json!({ "state": "inactive" }))
        .on("GET", "/api/minion/88/detail", json!({ "state": "finished", "result": { "errors": [] } }));

    let status = minion.ops.regenerate_thumbnails(false).await;

    assert!(status.is_some());
    assert_eq!(server.lines()[0], "POST /api/regen_thumbs?force=0");
    let toasts = recorder.toasts.lock().unwrap();
    let last = toasts.last().context("no toast")?;
    assert_eq!(last.hide_after, HideAfter::Millis(15000));
    assert_eq!(last.text, None);
    Ok(())
}

#[tokio::test]
async fn test_category_membership() -> Result<()> {
    let (server, recorder, _page, minion) = setup(true).await?;
    server
        .on("PUT", "/api/categories/SET_1/abc", json!({ "success": 1 }))
        .on("DELETE", "/api/categories/SET_1/abc", json!({ "success": 0, "error": "not in category" }));

    assert!(minion.ops.add_archive_to_category("SET_1", "abc").await);
    assert!(!minion.ops.remove_archive_from_category("SET_1", "abc").await);

    assert_eq!(recorder.headings(), vec!["Added abc to category SET_1!"]);
    assert_eq!(
        recorder.errors(),
        vec![(
            "Error adding/removing archive to category".to_string(),
            "not in category".to_string()
        )]
    );
    Ok(())
}

#[tokio::test]
async fn test_delete_archive_outcomes() -> Result<()> {
    let (server, _recorder, _page, minion) = setup(true).await?;
    server
        .on("DELETE", "/api/archives/good", json!({ "success": 1, "filename": "a.zip" }))
        .on_raw("DELETE", "/api/archives/gone", StatusCode::INTERNAL_SERVER_ERROR, "");

    assert_eq!(
        minion.ops.delete_archive("good").await,
        ArchiveDeletion::Deleted {
            filename: Some("a.zip".to_string())
        }
    );
    assert_eq!(minion.ops.delete_archive("gone").await, ArchiveDeletion::MetadataOnly);
    Ok(())
}
