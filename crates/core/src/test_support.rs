// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::clock::{Clock, FakeClock};
use crate::id::{PrincipalId, TicketId};
use crate::principal::{Principal, Role};
use crate::ticket::{Category, NewTicket, Priority, Ticket, TicketStatus};

// ── Principal factories ─────────────────────────────────────────────────────

pub fn customer() -> Principal {
    Principal::new("cust-1", Role::Customer)
}

pub fn agent() -> Principal {
    Principal::new("agent-1", Role::Agent)
}

pub fn supervisor() -> Principal {
    Principal::new("sup-1", Role::Supervisor)
}

pub fn admin() -> Principal {
    Principal::new("admin-1", Role::Admin)
}

pub fn principal(role: Role) -> Principal {
    match role {
        Role::Customer => customer(),
        Role::Agent => agent(),
        Role::Supervisor => supervisor(),
        Role::Admin => admin(),
    }
}

// ── Ticket builder ──────────────────────────────────────────────────────────

/// Fluent builder for tickets in arbitrary states.
pub struct TicketBuilder {
    ticket: Ticket,
}

impl TicketBuilder {
    pub fn new(id: &str) -> Self {
        let ticket = Ticket::new(
            TicketId::new(id),
            NewTicket {
                title: "Laptop will not boot".to_string(),
                description: "Black screen after the update".to_string(),
                priority: Priority::Medium,
                category: Category::Hardware,
            },
            customer().id,
            FakeClock::new().now(),
        );
        Self { ticket }
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.ticket.status = status;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.ticket.title = title.to_string();
        self
    }

    pub fn created_by(mut self, id: &str) -> Self {
        self.ticket.created_by = PrincipalId::new(id);
        self
    }

    pub fn assigned_to(mut self, id: &str) -> Self {
        self.ticket.assigned_to = Some(PrincipalId::new(id));
        self
    }

    pub fn resolution(mut self, text: &str) -> Self {
        self.ticket.resolution = Some(text.to_string());
        self
    }

    pub fn build(self) -> Ticket {
        self.ticket
    }
}

/// Ticket `id` in `status`, created by [`customer`].
pub fn ticket_in(id: &str, status: TicketStatus) -> Ticket {
    TicketBuilder::new(id).status(status).build()
}
