// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hd-core: ticket model and lifecycle rules for the helpdesk client

pub mod access;
pub mod clock;
pub mod comment;
pub mod id;
pub mod lifecycle;
pub mod principal;
pub mod ticket;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use comment::Comment;
pub use id::{AttachmentId, CommentId, IdGen, PrincipalId, SequentialIdGen, TicketId, UuidIdGen};
pub use lifecycle::{
    available_actions, plan_transition, request_transition, Action, Effect, Field, Transition,
    TransitionError, TransitionPayload,
};
pub use principal::{Principal, Role};
pub use ticket::{
    Attachment, Category, ListScope, NewTicket, Priority, Ticket, TicketFilter, TicketStatus,
    UnknownValue,
};
