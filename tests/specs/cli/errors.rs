//! Error reporting and exit code specs

use crate::prelude::*;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_ticket_exits_not_found() {
    let desk = Desk::as_role("agent").await;
    desk.on("GET", "/tickets/404", 404, json!({ "detail": "Ticket not found" }))
        .await;

    desk.hd()
        .args(&["ticket", "show", "404"])
        .fails()
        .code(6)
        .stderr_has("not found: Ticket not found");
}

#[test]
fn unreachable_api_exits_transport_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    // Port 9 (discard) is closed on test hosts
    cli()
        .env("HD_CONFIG", &config)
        .env("HD_API_URL", "http://127.0.0.1:9/api/v1")
        .args(&["ticket", "show", "1"])
        .fails()
        .code(7)
        .stderr_has("transport failure");
}

#[test]
fn malformed_config_exits_generic_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "api_url = [").unwrap();

    cli()
        .env("HD_CONFIG", &config)
        .args(&["ticket", "show", "1"])
        .fails()
        .code(1)
        .stderr_has("config.toml");
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();

    cli()
        .env("HD_CONFIG", dir.path().join("missing.toml"))
        .args(&["whoami"])
        .fails()
        .code(1)
        .stderr_has("missing.toml");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blank_resolution_exits_validation_failed() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "in_progress")).await;

    desk.hd()
        .args(&["ticket", "resolve", "7", "-m", "   "])
        .fails()
        .code(5)
        .stderr_has("invalid input");
    assert!(desk.writes().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn action_not_offered_in_state_exits_invalid_state() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "open")).await;

    desk.hd()
        .args(&["ticket", "resume", "7"])
        .fails()
        .code(4)
        .stderr_has("invalid state");
    assert!(desk.writes().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_rejection_exits_validation_failed() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "open")).await;
    desk.on(
        "PATCH",
        "/tickets/7/status",
        422,
        json!({ "detail": "status change not allowed" }),
    )
    .await;

    desk.hd()
        .args(&["ticket", "start", "7"])
        .fails()
        .code(5)
        .stderr_has("status change not allowed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejected_credentials_exit_unauthorized() {
    let desk = Desk::as_role("agent").await;
    desk.on("GET", "/tickets/7", 401, json!({ "detail": "Not authenticated" }))
        .await;

    desk.hd()
        .args(&["ticket", "show", "7"])
        .fails()
        .code(3)
        .stderr_has("not permitted: Not authenticated");
}
