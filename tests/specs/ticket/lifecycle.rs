//! Ticket lifecycle specs: show, actions, transitions

use crate::prelude::*;
use serde_json::{json, Value};

fn body(request: &wiremock::Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn show_prints_ticket_summary() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "open")).await;

    desk.hd().args(&["ticket", "show", "7"]).passes().stdout_eq(
        "Ticket 7: VPN drops
  Status:     open
  Priority:   high
  Category:   network
  Created by: 7
  Assigned:   -
  Updated:    2026-01-01 00:00 by -
",
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn show_reads_backend_vocabulary() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(backend_ticket_json(7, "beklemede")).await;

    desk.hd().args(&["ticket", "show", "7"]).passes().stdout_eq(
        "Ticket 7: VPN drops
  Status:     on_hold
  Priority:   high
  Category:   network
  Created by: 7
  Assigned:   3
  Updated:    2026-01-01 00:00 by 3
",
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn show_includes_resolution_and_escalation() {
    let desk = Desk::as_role("agent").await;
    let mut ticket = ticket_json(7, "resolved");
    ticket["resolution"] = json!("Replaced the cable");
    ticket["escalated_to"] = json!(12);
    ticket["escalation_reason"] = json!("VIP user");
    ticket["assigned_to"] = json!(3);
    ticket["last_updated_by"] = json!(3);
    desk.ticket(ticket).await;

    desk.hd()
        .args(&["ticket", "show", "7"])
        .passes()
        .stdout_has("  Assigned:   3\n")
        .stdout_has("  Resolution: Replaced the cable\n")
        .stdout_has("  Escalated:  12 (VIP user)\n")
        .stdout_has("by 3\n")
        .stdout_lacks("Closing:");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn show_json_round_trips_ticket_fields() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "on_hold")).await;

    let json = desk.hd().args(&["ticket", "show", "7", "-o", "json"]).passes().json();
    assert_eq!(json["id"], "7");
    assert_eq!(json["status"], "on_hold");
    assert_eq!(json["priority"], "high");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn agent_actions_on_open_ticket() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "open")).await;

    desk.hd()
        .args(&["ticket", "actions", "7"])
        .passes()
        .stdout_eq("start_work\nresolve\nescalate\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn customer_has_no_actions() {
    let desk = Desk::as_role("customer").await;
    desk.ticket(ticket_json(7, "open")).await;

    desk.hd()
        .args(&["ticket", "actions", "7"])
        .passes()
        .stdout_eq("No actions available\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn supervisor_may_close_resolved_ticket() {
    let desk = Desk::as_role("supervisor").await;
    desk.ticket(ticket_json(7, "resolved")).await;

    desk.hd()
        .args(&["ticket", "actions", "7"])
        .passes()
        .stdout_has("close\n")
        .stdout_has("quick_close\n")
        .stdout_has("reopen\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn start_patches_status() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "open")).await;
    desk.on(
        "PATCH",
        "/tickets/7/status",
        200,
        backend_ticket_json(7, "devam_ediyor"),
    )
    .await;

    desk.hd()
        .args(&["ticket", "start", "7"])
        .passes()
        .stdout_has("  Status:     in_progress\n");

    let writes = desk.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(body(&writes[0]), json!({ "status": "devam_ediyor" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn resolve_posts_trimmed_resolution() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "in_progress")).await;
    let mut resolved = ticket_json(7, "resolved");
    resolved["resolution"] = json!("Reseated the RAM");
    desk.on("POST", "/tickets/7/resolve", 200, resolved).await;

    desk.hd()
        .args(&["ticket", "resolve", "7", "-m", "  Reseated the RAM "])
        .passes()
        .stdout_has("  Resolution: Reseated the RAM\n");

    let writes = desk.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(body(&writes[0]), json!({ "resolution": "Reseated the RAM" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn agent_close_is_refused_without_a_request() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "resolved")).await;

    desk.hd()
        .args(&["ticket", "close", "7", "-m", "done"])
        .fails()
        .code(3)
        .stderr_has("not permitted");
    assert!(desk.writes().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn close_with_note_sends_note() {
    let desk = Desk::as_role("supervisor").await;
    desk.ticket(ticket_json(7, "resolved")).await;
    let mut closed = ticket_json(7, "closed");
    closed["closing_note"] = json!("Confirmed with the user");
    desk.on("POST", "/tickets/7/close", 200, closed).await;

    desk.hd()
        .args(&["ticket", "close", "7", "-m", "Confirmed with the user"])
        .passes()
        .stdout_has("  Closing:    Confirmed with the user\n");

    let writes = desk.writes().await;
    assert_eq!(
        body(&writes[0]),
        json!({ "closing_note": "Confirmed with the user" })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn close_without_note_is_quick_close() {
    let desk = Desk::as_role("admin").await;
    desk.ticket(ticket_json(7, "resolved")).await;
    desk.on("POST", "/tickets/7/close", 200, ticket_json(7, "closed"))
        .await;

    desk.hd().args(&["ticket", "close", "7"]).passes();

    let writes = desk.writes().await;
    assert_eq!(body(&writes[0]), json!({}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn escalate_posts_target_and_reason() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "in_progress")).await;
    let mut escalated = ticket_json(7, "in_progress");
    escalated["escalated_to"] = json!(12);
    escalated["escalation_reason"] = json!("Needs network team");
    desk.on("POST", "/tickets/7/escalate", 200, escalated).await;

    desk.hd()
        .args(&[
            "ticket",
            "escalate",
            "7",
            "--to",
            "12",
            "--reason",
            "Needs network team",
        ])
        .passes()
        .stdout_has("  Status:     in_progress\n")
        .stdout_has("  Escalated:  12 (Needs network team)\n");

    let writes = desk.writes().await;
    assert_eq!(
        body(&writes[0]),
        json!({ "escalated_to_id": "12", "escalation_reason": "Needs network team" })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn supervisor_assigns_ticket() {
    let desk = Desk::as_role("supervisor").await;
    desk.ticket(ticket_json(7, "open")).await;
    let mut assigned = ticket_json(7, "in_progress");
    assigned["assigned_to"] = json!(5);
    desk.on("PUT", "/tickets/7/assign", 200, assigned).await;

    desk.hd()
        .args(&["ticket", "assign", "7", "--to", "5"])
        .passes()
        .stdout_has("  Assigned:   5\n");

    let writes = desk.writes().await;
    assert_eq!(body(&writes[0]), json!({ "assigned_to_id": "5" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn agent_may_not_assign() {
    let desk = Desk::as_role("agent").await;
    desk.ticket(ticket_json(7, "open")).await;

    desk.hd()
        .args(&["ticket", "assign", "7", "--to", "5"])
        .fails()
        .code(3);
    assert!(desk.writes().await.is_empty());
}
