//! `hd whoami` specs

use crate::prelude::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn whoami_prints_principal() {
    let desk = Desk::as_role("supervisor").await;

    desk.hd()
        .args(&["whoami"])
        .passes()
        .stdout_eq("Pat Doe (supervisor, id 3)\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn whoami_json() {
    let desk = Desk::as_role("Agent").await;

    let json = desk.hd().args(&["whoami", "-o", "json"]).passes().json();
    assert_eq!(json["id"], "3");
    assert_eq!(json["role"], "agent");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_role_is_transport_failure() {
    let desk = Desk::as_role("janitor").await;

    desk.hd()
        .args(&["whoami"])
        .fails()
        .code(7)
        .stderr_has("unknown role");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn token_is_sent_as_bearer() {
    let desk = Desk::as_role("agent").await;

    desk.hd().args(&["whoami"]).passes();
    let requests = desk.requests().await;
    assert!(requests.iter().all(|r| {
        r.headers
            .get("authorization")
            .is_some_and(|v| v == "Bearer spec-token")
    }));
}
