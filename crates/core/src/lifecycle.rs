// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket lifecycle engine.
//!
//! All role/state rules live in [`TRANSITIONS`]. Both [`available_actions`]
//! and [`request_transition`] read from that table, so what a caller offers
//! and what the engine accepts cannot drift apart.
//!
//! The engine is pure: no I/O, no shared state. It returns a new [`Ticket`]
//! and never modifies its input.

use crate::id::PrincipalId;
use crate::principal::{Principal, Role};
use crate::ticket::{Ticket, TicketStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A user-requestable lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    StartWork,
    /// Quick status flip to resolved, no explanation recorded.
    MarkResolved,
    Hold,
    Resume,
    /// Guided resolve; requires resolution text.
    Resolve,
    Close,
    /// Close without a note.
    QuickClose,
    Reopen,
    /// Annotation only; status is left alone.
    Escalate,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::StartWork,
        Action::MarkResolved,
        Action::Hold,
        Action::Resume,
        Action::Resolve,
        Action::Close,
        Action::QuickClose,
        Action::Reopen,
        Action::Escalate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::StartWork => "start_work",
            Action::MarkResolved => "mark_resolved",
            Action::Hold => "hold",
            Action::Resume => "resume",
            Action::Resolve => "resolve",
            Action::Close => "close",
            Action::QuickClose => "quick_close",
            Action::Reopen => "reopen",
            Action::Escalate => "escalate",
        }
    }

    /// Human-readable label ("start work").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// The table row governing this action.
    pub fn spec(&self) -> &'static TransitionSpec {
        spec_for(*self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    /// Accepts `start_work` and `start-work`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Payload fields an action may demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Resolution,
    EscalationTarget,
    EscalationReason,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Resolution => "resolution",
            Field::EscalationTarget => "escalation target",
            Field::EscalationReason => "escalation reason",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a transition leaves the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Status(TicketStatus),
    Unchanged,
}

/// One row of the transition table.
#[derive(Debug)]
pub struct TransitionSpec {
    pub action: Action,
    pub from: &'static [TicketStatus],
    pub roles: &'static [Role],
    pub requires: &'static [Field],
    pub target: Target,
}

impl TransitionSpec {
    pub fn allows_from(&self, status: TicketStatus) -> bool {
        self.from.contains(&status)
    }

    pub fn allows_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn permits(&self, status: TicketStatus, role: Role) -> bool {
        self.allows_from(status) && self.allows_role(role)
    }

    /// Resulting status when applied to a ticket currently in `current`.
    pub fn resulting_status(&self, current: TicketStatus) -> TicketStatus {
        match self.target {
            Target::Status(s) => s,
            Target::Unchanged => current,
        }
    }
}

const STAFF: &[Role] = &[Role::Agent, Role::Supervisor, Role::Admin];
const CLOSERS: &[Role] = &[Role::Supervisor, Role::Admin];
const NOT_CLOSED: &[TicketStatus] = &[
    TicketStatus::Open,
    TicketStatus::InProgress,
    TicketStatus::OnHold,
    TicketStatus::Resolved,
];

static START_WORK: TransitionSpec = TransitionSpec {
    action: Action::StartWork,
    from: &[TicketStatus::Open],
    roles: STAFF,
    requires: &[],
    target: Target::Status(TicketStatus::InProgress),
};

static MARK_RESOLVED: TransitionSpec = TransitionSpec {
    action: Action::MarkResolved,
    from: &[TicketStatus::InProgress],
    roles: STAFF,
    requires: &[],
    target: Target::Status(TicketStatus::Resolved),
};

static HOLD: TransitionSpec = TransitionSpec {
    action: Action::Hold,
    from: &[TicketStatus::InProgress],
    roles: STAFF,
    requires: &[],
    target: Target::Status(TicketStatus::OnHold),
};

static RESUME: TransitionSpec = TransitionSpec {
    action: Action::Resume,
    from: &[TicketStatus::OnHold],
    roles: STAFF,
    requires: &[],
    target: Target::Status(TicketStatus::InProgress),
};

static RESOLVE: TransitionSpec = TransitionSpec {
    action: Action::Resolve,
    from: &[
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::OnHold,
    ],
    roles: STAFF,
    requires: &[Field::Resolution],
    target: Target::Status(TicketStatus::Resolved),
};

static CLOSE: TransitionSpec = TransitionSpec {
    action: Action::Close,
    from: &[TicketStatus::Resolved],
    roles: CLOSERS,
    requires: &[],
    target: Target::Status(TicketStatus::Closed),
};

static QUICK_CLOSE: TransitionSpec = TransitionSpec {
    action: Action::QuickClose,
    from: &[TicketStatus::Resolved],
    roles: CLOSERS,
    requires: &[],
    target: Target::Status(TicketStatus::Closed),
};

static REOPEN: TransitionSpec = TransitionSpec {
    action: Action::Reopen,
    from: &[TicketStatus::Resolved, TicketStatus::Closed],
    roles: STAFF,
    requires: &[],
    target: Target::Status(TicketStatus::InProgress),
};

static ESCALATE: TransitionSpec = TransitionSpec {
    action: Action::Escalate,
    from: NOT_CLOSED,
    roles: STAFF,
    requires: &[Field::EscalationTarget, Field::EscalationReason],
    target: Target::Unchanged,
};

/// The transition table. Row order is the order of [`available_actions`].
pub static TRANSITIONS: [&TransitionSpec; 9] = [
    &START_WORK,
    &MARK_RESOLVED,
    &HOLD,
    &RESUME,
    &RESOLVE,
    &CLOSE,
    &QUICK_CLOSE,
    &REOPEN,
    &ESCALATE,
];

pub fn spec_for(action: Action) -> &'static TransitionSpec {
    match action {
        Action::StartWork => &START_WORK,
        Action::MarkResolved => &MARK_RESOLVED,
        Action::Hold => &HOLD,
        Action::Resume => &RESUME,
        Action::Resolve => &RESOLVE,
        Action::Close => &CLOSE,
        Action::QuickClose => &QUICK_CLOSE,
        Action::Reopen => &REOPEN,
        Action::Escalate => &ESCALATE,
    }
}

/// Caller-supplied input for a transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_to: Option<PrincipalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
}

impl TransitionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution(mut self, text: impl Into<String>) -> Self {
        self.resolution = Some(text.into());
        self
    }

    pub fn closing_note(mut self, text: impl Into<String>) -> Self {
        self.closing_note = Some(text.into());
        self
    }

    pub fn escalation(mut self, to: impl Into<PrincipalId>, reason: impl Into<String>) -> Self {
        self.escalate_to = Some(to.into());
        self.escalation_reason = Some(reason.into());
        self
    }

    /// Reduce the payload to what `action` consumes, failing on the first
    /// missing field in table order.
    fn input_for(&self, action: Action) -> Result<Input, Field> {
        Ok(match action {
            Action::Resolve => Input::Resolution(
                non_blank(self.resolution.as_deref()).ok_or(Field::Resolution)?,
            ),
            Action::Close => Input::ClosingNote(non_blank(self.closing_note.as_deref())),
            Action::Escalate => {
                let to = non_blank(self.escalate_to.as_ref().map(|id| id.as_str()))
                    .ok_or(Field::EscalationTarget)?;
                let reason =
                    non_blank(self.escalation_reason.as_deref()).ok_or(Field::EscalationReason)?;
                Input::Escalation {
                    to: PrincipalId::new(to),
                    reason,
                }
            }
            Action::StartWork
            | Action::MarkResolved
            | Action::Hold
            | Action::Resume
            | Action::QuickClose
            | Action::Reopen => Input::Nothing,
        })
    }
}

/// Validated, trimmed payload values for one action.
#[derive(Debug)]
enum Input {
    Nothing,
    Resolution(String),
    ClosingNote(Option<String>),
    Escalation { to: PrincipalId, reason: String },
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{role} may not {} a {status} ticket", .action.label())]
    Unauthorized {
        action: Action,
        role: Role,
        status: TicketStatus,
    },
    #[error("cannot {} a ticket that is {status}", .action.label())]
    InvalidState {
        action: Action,
        status: TicketStatus,
    },
    #[error("{field} is required to {}", .action.label())]
    ValidationFailed { action: Action, field: Field },
}

/// Remote write that realizes a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetStatus(TicketStatus),
    Resolve { resolution: String },
    Close { closing_note: Option<String> },
    Reopen,
    Escalate { to: PrincipalId, reason: String },
}

/// An accepted transition: the expected ticket plus the write to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub action: Action,
    pub effect: Effect,
    pub ticket: Ticket,
}

/// Actions `principal` may take on `ticket` right now, in table order.
pub fn available_actions(ticket: &Ticket, principal: &Principal) -> Vec<Action> {
    TRANSITIONS
        .iter()
        .filter(|spec| spec.permits(ticket.status, principal.role))
        .map(|spec| spec.action)
        .collect()
}

/// Apply `action` to `ticket`, returning the updated ticket.
///
/// Checks run in order: payload, state, role.
pub fn request_transition(
    ticket: &Ticket,
    action: Action,
    principal: &Principal,
    payload: &TransitionPayload,
    now: DateTime<Utc>,
) -> Result<Ticket, TransitionError> {
    plan_transition(ticket, action, principal, payload, now).map(|t| t.ticket)
}

/// Like [`request_transition`] but also reports the remote [`Effect`].
pub fn plan_transition(
    ticket: &Ticket,
    action: Action,
    principal: &Principal,
    payload: &TransitionPayload,
    now: DateTime<Utc>,
) -> Result<Transition, TransitionError> {
    let spec = spec_for(action);

    let input = payload
        .input_for(action)
        .map_err(|field| TransitionError::ValidationFailed { action, field })?;
    if !spec.allows_from(ticket.status) {
        return Err(TransitionError::InvalidState {
            action,
            status: ticket.status,
        });
    }
    if !spec.allows_role(principal.role) {
        return Err(TransitionError::Unauthorized {
            action,
            role: principal.role,
            status: ticket.status,
        });
    }

    let mut next = ticket.clone();
    next.status = spec.resulting_status(ticket.status);

    let effect = match input {
        Input::Resolution(resolution) => {
            next.resolution = Some(resolution.clone());
            Effect::Resolve { resolution }
        }
        Input::ClosingNote(closing_note) => {
            if closing_note.is_some() {
                next.closing_note = closing_note.clone();
            }
            Effect::Close { closing_note }
        }
        Input::Escalation { to, reason } => {
            next.escalated_to = Some(to.clone());
            next.escalation_reason = Some(reason.clone());
            Effect::Escalate { to, reason }
        }
        Input::Nothing => match action {
            Action::QuickClose => Effect::Close { closing_note: None },
            // Resolution and closing note are kept as history.
            Action::Reopen => Effect::Reopen,
            _ => Effect::SetStatus(next.status),
        },
    };

    next.touch(&principal.id, now);
    Ok(Transition {
        action,
        effect,
        ticket: next,
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
