use std::time::Duration;

use minion_services::{HideAfter, TriggerOutcome};

use crate::*;

fn plugin_page() -> Page {
    Page {
        inputs: HashMap::from([("urlfinder_ARG".to_string(), "https://e.org/g/1".to_string())]),
        fields: vec![("urlfinder_enabled".to_string(), "1".to_string())],
        ..Page::default()
    }
}

/// Save, queue, poll, report: the whole session over real HTTP.
#[tokio::test]
async fn test_script_run_end_to_end() -> Result<()> {
    let (server, base) = spawn_server().await?;
    let recorder = Arc::new(Recorder::default());
    let page = Arc::new(plugin_page());
    let minion = minion(&base, &recorder, &page, true);

    server
        .on("POST", "/config/plugins", json!({ "success": 1 }))
        .on("POST", "/api/plugins/queue", json!({ "success": true, "job": "42" }))
        .on("GET", "/api/minion/42/detail", json!({ "state": "active", "notes": "50%" }))
        .on(
            "GET",
            "/api/minion/42/detail",
            json!({ "state": "finished", "result": { "success": 1, "data": { "rows": 3 } } }),
        );

    let outcome = minion.scripts.trigger("urlfinder").await;
    assert!(matches!(outcome, TriggerOutcome::Finished(_)), "got {outcome:?}");

    let seen = server.seen();
    let lines: Vec<_> = seen.iter().map(|s| s.line.as_str()).collect();
    assert_eq!(
        lines,
        vec![
            "POST /config/plugins",
            "POST /api/plugins/queue?plugin=urlfinder&arg=https%3A%2F%2Fe.org%2Fg%2F1",
            "GET /api/minion/42/detail",
            "GET /api/minion/42/detail",
        ]
    );
    let form_type = seen[0].content_type.as_deref().unwrap_or("");
    assert!(form_type.starts_with("multipart/form-data"), "form sent as {form_type}");
    assert!(String::from_utf8_lossy(&seen[0].body).contains("urlfinder_enabled"));

    assert_eq!(*page.progress.lock().unwrap(), vec![json!("50%")]);
    assert_eq!(*page.running.lock().unwrap(), vec![true, false]);
    assert!(!minion.scripts.guard().is_running());

    let toasts = recorder.toasts.lock().unwrap();
    let result = toasts.last().context("no result toast")?;
    assert_eq!(result.heading, "Script result");
    assert_eq!(result.text.as_deref(), Some("{\n    \"rows\": 3\n}"));
    assert_eq!(result.hide_after, HideAfter::Never);
    assert!(recorder.errors().is_empty());
    Ok(())
}

/// A trigger during a running session is turned away without any request.
#[tokio::test]
async fn test_second_trigger_is_rejected() -> Result<()> {
    let (server, base) = spawn_server().await?;
    let recorder = Arc::new(Recorder::default());
    let page = Arc::new(plugin_page());
    let minion = minion(&base, &recorder, &page, true);

    server
        .on("POST", "/config/plugins", json!({ "success": 1 }))
        .on("POST", "/api/plugins/queue", json!({ "job": 7 }));
    for _ in 0..10 {
        server.on("GET", "/api/minion/7/detail", json!({ "state": "inactive" }));
    }
    server.on(
        "GET",
        "/api/minion/7/detail",
        json!({ "state": "finished", "result": { "success": 1, "data": null } }),
    );

    let first = minion.clone();
    let running = tokio::spawn(async move { first.scripts.trigger("urlfinder").await });

    for _ in 0..200 {
        if minion.scripts.guard().is_running() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    let before = server.seen().len();
    let second = minion.scripts.trigger("urlfinder").await;
    assert!(matches!(second, TriggerOutcome::Rejected));
    assert_eq!(server.seen().len(), before, "rejected trigger sent a request");

    let first = running.await?;
    assert!(matches!(first, TriggerOutcome::Finished(_)), "got {first:?}");
    assert!(!minion.scripts.guard().is_running());
    assert_eq!(
        recorder.errors(),
        vec![(
            "A script is already running.".to_string(),
            "Please wait for it to finish.".to_string()
        )]
    );
    Ok(())
}

/// The script's own failure still ends the session cleanly.
#[tokio::test]
async fn test_script_error_result() -> Result<()> {
    let (server, recorder, page, minion) = setup(true).await?;
    server
        .on("POST", "/config/plugins", json!({ "success": 1 }))
        .on("POST", "/api/plugins/queue", json!({ "job": 3 }))
        .on(
            "GET",
            "/api/minion/3/detail",
            json!({ "state": "finished", "result": { "success": 0, "error": "Nothing found" } }),
        );

    let outcome = minion.scripts.trigger("urlfinder").await;
    assert!(matches!(outcome, TriggerOutcome::Finished(_)));
    assert_eq!(
        recorder.errors(),
        vec![("Script error: Nothing found".to_string(), String::new())]
    );
    assert_eq!(*page.running.lock().unwrap(), vec![true, false]);
    assert!(minion.scripts.guard().try_acquire().is_some());
    Ok(())
}
