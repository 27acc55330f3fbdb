//! `hd ticket attach` specs

use crate::prelude::*;
use serde_json::json;

fn attachment() -> serde_json::Value {
    json!({
        "id": 31,
        "file_name": "screenshot.png",
        "content_type": "image/png",
        "size_bytes": 4,
        "uploaded_at": "2026-01-03T08:00:00Z"
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn attach_uploads_file() {
    let desk = Desk::as_role("supervisor").await;
    desk.ticket(ticket_json(7, "open")).await;
    desk.on("POST", "/tickets/7/attachments", 200, attachment())
        .await;
    let file = desk.file("screenshot.png", b"\x89PNG");

    desk.hd()
        .args(&[
            "ticket",
            "attach",
            "7",
            file.to_str().unwrap(),
            "--content-type",
            "image/png",
        ])
        .passes()
        .stdout_eq("31 screenshot.png (4 bytes)\n");

    let writes = desk.writes().await;
    assert_eq!(writes.len(), 1);
    let content_type = writes[0].headers.get("content-type").unwrap();
    assert!(content_type
        .to_str()
        .unwrap()
        .starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&writes[0].body);
    assert!(body.contains("filename=\"screenshot.png\""), "body: {body}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_file_fails_before_upload() {
    let desk = Desk::as_role("supervisor").await;
    desk.ticket(ticket_json(7, "open")).await;

    desk.hd()
        .args(&["ticket", "attach", "7", "/nonexistent/screenshot.png"])
        .fails()
        .code(1)
        .stderr_has("cannot read /nonexistent/screenshot.png");
    assert!(desk.writes().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn agent_may_not_attach_to_unrelated_ticket() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "open")).await;
    let file = desk.file("log.txt", b"boot");

    desk.hd()
        .args(&["ticket", "attach", "7", file.to_str().unwrap()])
        .fails()
        .code(3);
    assert!(desk.writes().await.is_empty());
}
