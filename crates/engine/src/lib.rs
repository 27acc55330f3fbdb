// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Helpdesk ticket detail controller

mod controller;
mod error;
mod session;

#[cfg(test)]
mod test_helpers;

pub use controller::TicketDetailController;
pub use error::ControllerError;
pub use session::SessionContext;
