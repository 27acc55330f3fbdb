// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::{SessionContext, TicketDetailController};
use hd_adapters::FakeTicketRepository;
use hd_core::{Action, FakeClock, Principal, Ticket, TicketId, TransitionPayload};
use std::sync::Arc;

/// Convenience alias for the fully-typed test controller.
pub(crate) type TestController = TicketDetailController<FakeTicketRepository, FakeClock>;

/// Test context holding the controller and the fake it talks to.
pub(crate) struct TestContext {
    pub controller: Arc<TestController>,
    pub repo: FakeTicketRepository,
    pub clock: FakeClock,
}

/// Controller acting as `principal`, with `tickets` already on the server.
pub(crate) fn setup(principal: Principal, tickets: Vec<Ticket>) -> TestContext {
    let clock = FakeClock::new();
    let repo = FakeTicketRepository::new(principal.clone()).with_clock(clock.clone());
    for ticket in tickets {
        repo.insert(ticket);
    }
    let controller = TicketDetailController::new(
        repo.clone(),
        SessionContext::new(principal),
        clock.clone(),
    );
    TestContext {
        controller: Arc::new(controller),
        repo,
        clock,
    }
}

/// Payload that satisfies every field `action` requires.
pub(crate) fn valid_payload(action: Action) -> TransitionPayload {
    match action {
        Action::Resolve => TransitionPayload::new().resolution("Reinstalled the driver"),
        Action::Close => TransitionPayload::new().closing_note("Confirmed with the user"),
        Action::Escalate => TransitionPayload::new().escalation("sup-9", "Needs a second look"),
        _ => TransitionPayload::new(),
    }
}

pub(crate) fn tid(id: &str) -> TicketId {
    TicketId::new(id)
}
