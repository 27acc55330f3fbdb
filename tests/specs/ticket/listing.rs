//! `hd ticket new` and `hd ticket list` specs

use crate::prelude::*;
use serde_json::{json, Value};

fn body(request: &wiremock::Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn new_posts_backend_vocabulary() {
    let desk = Desk::as_role("customer").await;
    let mut created = backend_ticket_json(21, "açık");
    created["title"] = json!("Printer jammed");
    desk.on("POST", "/tickets/", 200, created).await;

    desk.hd()
        .args(&[
            "ticket",
            "new",
            "--title",
            "  Printer jammed ",
            "-d",
            "Third floor",
            "--priority",
            "urgent",
            "--category",
            "hardware",
        ])
        .passes()
        .stdout_has("Ticket 21: Printer jammed\n")
        .stdout_has("  Status:     open\n");

    let writes = desk.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(
        body(&writes[0]),
        json!({
            "title": "Printer jammed",
            "description": "Third floor",
            "priority": "acil",
            "category": "donanım"
        })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn new_with_blank_title_never_reaches_server() {
    let desk = Desk::as_role("customer").await;

    desk.hd()
        .args(&["ticket", "new", "--title", "  ", "-d", "Third floor"])
        .fails()
        .code(5)
        .stderr_has("title is required");

    assert!(desk.writes().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_prints_one_line_per_ticket() {
    let desk = Desk::as_role("agent").await;
    let mut printer = ticket_json(8, "on_hold");
    printer["title"] = json!("Printer jammed");
    desk.on(
        "GET",
        "/tickets/",
        200,
        json!([backend_ticket_json(9, "devam_ediyor"), printer]),
    )
    .await;

    desk.hd().args(&["ticket", "list"]).passes().stdout_eq(
        "9      in_progress  high     VPN drops
8      on_hold      high     Printer jammed
",
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_filters_are_sent_as_query() {
    let desk = Desk::as_role("agent").await;
    desk.on("GET", "/tickets/", 200, json!([])).await;

    desk.hd()
        .args(&["ticket", "list", "--status", "resolved", "--search", "vpn"])
        .passes()
        .stdout_eq("No tickets\n");

    let requests = desk.requests().await;
    let listing = requests
        .iter()
        .find(|r| r.url.path() == "/api/v1/tickets/")
        .unwrap();
    let query: Vec<(String, String)> = listing.url.query_pairs().into_owned().collect();
    assert_eq!(
        query,
        vec![
            ("status".to_string(), "çözüldü".to_string()),
            ("search".to_string(), "vpn".to_string()),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_mine_uses_my_tickets_route() {
    let desk = Desk::as_role("customer").await;
    desk.on(
        "GET",
        "/tickets/my-tickets",
        200,
        json!([backend_ticket_json(4, "açık")]),
    )
    .await;

    desk.hd()
        .args(&["ticket", "list", "--mine"])
        .passes()
        .stdout_has("4      open");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_assigned_uses_assigned_route() {
    let desk = Desk::as_role("agent").await;
    desk.on("GET", "/tickets/assigned-to-me", 200, json!([])).await;

    desk.hd()
        .args(&["ticket", "list", "--assigned", "-o", "json"])
        .passes()
        .stdout_eq("[]\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn customer_cannot_list_assigned() {
    let desk = Desk::as_role("customer").await;

    desk.hd()
        .args(&["ticket", "list", "--assigned"])
        .fails()
        .code(3);

    let requests = desk.requests().await;
    assert!(requests.iter().all(|r| r.url.path() == "/api/v1/users/me"));
}
