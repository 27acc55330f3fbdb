// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket record and its status set.

use crate::id::{AttachmentId, PrincipalId, TicketId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    OnHold,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::OnHold,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::OnHold => "on_hold",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TicketStatus::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Hardware,
    Software,
    Network,
    Access,
    #[default]
    Other,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hardware => "hardware",
            Category::Software => "software",
            Category::Network => "network",
            Category::Access => "access",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Case-insensitive; accepts `-` for `_`.
fn parse_named<T: Copy>(
    kind: &'static str,
    all: &[T],
    name: impl Fn(&T) -> &'static str,
    s: &str,
) -> Result<T, UnknownValue> {
    let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
    all.iter()
        .find(|v| name(v) == normalized)
        .copied()
        .ok_or_else(|| UnknownValue {
            kind,
            value: s.to_string(),
        })
}

impl FromStr for TicketStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("status", &TicketStatus::ALL, TicketStatus::as_str, s)
    }
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];
}

impl FromStr for Priority {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("priority", &Priority::ALL, Priority::as_str, s)
    }
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Hardware,
        Category::Software,
        Category::Network,
        Category::Access,
        Category::Other,
    ];
}

impl FromStr for Category {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("category", &Category::ALL, Category::as_str, s)
    }
}

/// Reference to a file uploaded against a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Fields a principal supplies when opening a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
}

impl NewTicket {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: Priority::default(),
            category: Category::default(),
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

/// Which tickets a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListScope {
    /// Everything the principal may see.
    #[default]
    All,
    /// Tickets the principal opened.
    Mine,
    /// Tickets assigned to the principal. Staff only.
    AssignedToMe,
}

impl ListScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListScope::All => "all",
            ListScope::Mine => "mine",
            ListScope::AssignedToMe => "assigned_to_me",
        }
    }
}

impl fmt::Display for ListScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query for a ticket listing. Results come back newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub scope: ListScope,
    pub status: Option<TicketStatus>,
    /// Substring of title or description. Only honored for [`ListScope::All`].
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn new(scope: ListScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Whether `ticket` passes the status and text conditions. Scope is
    /// left to the caller since it depends on who is asking.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.status.is_some_and(|s| s != ticket.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() && self.scope == ListScope::All => {
                let needle = text.to_lowercase();
                ticket.title.to_lowercase().contains(&needle)
                    || ticket.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// A help-desk ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    /// Set by the guided resolve; kept across reopen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalated_to: Option<PrincipalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
    pub created_by: PrincipalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<PrincipalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<PrincipalId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Ticket {
    /// Open a new ticket on behalf of `creator`.
    pub fn new(
        id: impl Into<TicketId>,
        fields: NewTicket,
        creator: PrincipalId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: fields.title,
            description: fields.description,
            status: TicketStatus::Open,
            priority: fields.priority,
            category: fields.category,
            resolution: None,
            closing_note: None,
            escalated_to: None,
            escalation_reason: None,
            last_updated_by: Some(creator.clone()),
            created_by: creator,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            attachments: Vec::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    pub fn is_escalated(&self) -> bool {
        self.escalated_to.is_some()
    }

    /// Record a mutation by `actor` at `now`.
    pub fn touch(&mut self, actor: &PrincipalId, now: DateTime<Utc>) {
        self.updated_at = now;
        self.last_updated_by = Some(actor.clone());
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
