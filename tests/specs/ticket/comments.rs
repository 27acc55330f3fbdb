//! `hd comment` specs

use crate::prelude::*;
use serde_json::json;

fn comments() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "ticket_id": 7,
            "author": 7,
            "content": "Still broken",
            "is_internal": false,
            "created_at": "2026-01-02T09:30:00Z"
        },
        {
            "id": 2,
            "ticket_id": 7,
            "user": { "id": 3 },
            "content": "Likely the dock",
            "is_internal": true,
            "created_at": "2026-01-02T10:00:00Z"
        }
    ])
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn staff_see_internal_notes() {
    let desk = Desk::as_role("agent").await;
    desk.on("GET", "/tickets/7/comments", 200, comments()).await;

    desk.hd().args(&["comment", "list", "7"]).passes().stdout_eq(
        "2026-01-02 09:30 7: Still broken
2026-01-02 10:00 3 [internal]: Likely the dock
",
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn customers_do_not_see_internal_notes() {
    let desk = Desk::as_role("customer").await;
    desk.on("GET", "/tickets/7/comments", 200, comments()).await;

    desk.hd()
        .args(&["comment", "list", "7"])
        .passes()
        .stdout_has("Still broken")
        .stdout_lacks("Likely the dock");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_thread() {
    let desk = Desk::as_role("agent").await;
    desk.on("GET", "/tickets/7/comments", 200, json!([])).await;

    desk.hd()
        .args(&["comment", "list", "7"])
        .passes()
        .stdout_eq("No comments\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn add_posts_comment() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "open")).await;
    desk.on(
        "POST",
        "/tickets/7/comments",
        200,
        json!({
            "id": 9,
            "author": 3,
            "content": "Checking now",
            "is_internal": true,
            "created_at": "2026-01-03T08:00:00Z"
        }),
    )
    .await;

    desk.hd()
        .args(&["comment", "add", "7", "Checking now", "--internal"])
        .passes()
        .stdout_eq("2026-01-03 08:00 3 [internal]: Checking now\n");

    let writes = desk.writes().await;
    let body: serde_json::Value = serde_json::from_slice(&writes[0].body).unwrap();
    assert_eq!(body, json!({ "content": "Checking now", "is_internal": true }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn customer_may_not_post_internal_note() {
    let desk = Desk::as_role("customer").await;
    desk.ticket(ticket_json(7, "open")).await;

    desk.hd()
        .args(&["comment", "add", "7", "psst", "--internal"])
        .fails()
        .code(3);
    assert!(desk.writes().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blank_comment_is_rejected() {
    let desk = Desk::as_role("agent").await;

    desk.hd()
        .args(&["comment", "add", "7", "  "])
        .fails()
        .code(5)
        .stderr_has("comment content is required");
}
