// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON shapes exchanged with the help-desk API.
//!
//! The backend stores enum values in Turkish (`açık`, `orta`, `ağ`), nests
//! users as objects and sends naive timestamps. Decoding accepts those forms
//! as well as the plain snake_case names; encoding always uses the backend's.

use super::RepositoryError;
use chrono::{DateTime, NaiveDateTime, Utc};
use hd_core::principal::UnknownRole;
use hd_core::{
    Attachment, Category, Comment, CommentId, NewTicket, Principal, PrincipalId, Priority, Role,
    Ticket, TicketId, TicketStatus,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::str::FromStr;

pub(super) fn backend_status(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "açık",
        TicketStatus::InProgress => "devam_ediyor",
        TicketStatus::OnHold => "beklemede",
        TicketStatus::Resolved => "çözüldü",
        TicketStatus::Closed => "kapatıldı",
    }
}

pub(super) fn backend_priority(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "düşük",
        Priority::Medium => "orta",
        Priority::High => "yüksek",
        Priority::Urgent => "acil",
    }
}

pub(super) fn backend_category(category: Category) -> &'static str {
    match category {
        Category::Hardware => "donanım",
        Category::Software => "yazılım",
        Category::Network => "ağ",
        Category::Access => "erişim",
        Category::Other => "diğer",
    }
}

/// Read either the backend's name or the snake_case name.
fn decode_named<T: Copy + FromStr>(
    kind: &str,
    all: &[T],
    backend: fn(T) -> &'static str,
    raw: &str,
) -> Result<T, RepositoryError> {
    let trimmed = raw.trim();
    if let Some(value) = all.iter().copied().find(|v| backend(*v) == trimmed) {
        return Ok(value);
    }
    trimmed
        .parse()
        .map_err(|_| RepositoryError::Decode(format!("unknown {kind} `{raw}`")))
}

pub(super) fn status_body(status: TicketStatus) -> Value {
    json!({ "status": backend_status(status) })
}

pub(super) fn new_ticket_body(fields: &NewTicket) -> Value {
    json!({
        "title": fields.title,
        "description": fields.description,
        "priority": backend_priority(fields.priority),
        "category": backend_category(fields.category),
    })
}

/// Timestamp with or without an offset. Naive values are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct WireTime(pub DateTime<Utc>);

impl<'de> Deserialize<'de> for WireTime {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(WireTime(at.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| WireTime(naive.and_utc()))
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp `{raw}`: {e}")))
    }
}

/// A user reference: a bare id or an embedded user object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum WireUserRef {
    Id(PrincipalId),
    User { id: PrincipalId },
}

impl WireUserRef {
    fn id(self) -> PrincipalId {
        match self {
            WireUserRef::Id(id) | WireUserRef::User { id } => id,
        }
    }
}

fn user_ref(nested: Option<WireUserRef>, flat: Option<PrincipalId>) -> Option<PrincipalId> {
    nested.map(WireUserRef::id).or(flat)
}

/// Ticket payload in either the backend's shape or the plain one.
#[derive(Deserialize)]
pub(super) struct WireTicket {
    id: TicketId,
    title: String,
    #[serde(default)]
    description: String,
    status: String,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    resolution: Option<String>,
    #[serde(default)]
    closing_note: Option<String>,
    #[serde(default)]
    escalated_to: Option<WireUserRef>,
    #[serde(default)]
    escalated_to_id: Option<PrincipalId>,
    #[serde(default)]
    escalation_reason: Option<String>,
    #[serde(default)]
    created_by: Option<WireUserRef>,
    #[serde(default)]
    created_by_id: Option<PrincipalId>,
    #[serde(default)]
    assigned_to: Option<WireUserRef>,
    #[serde(default)]
    assigned_to_id: Option<PrincipalId>,
    #[serde(default)]
    last_updated_by: Option<WireUserRef>,
    #[serde(default)]
    last_updated_by_id: Option<PrincipalId>,
    created_at: WireTime,
    updated_at: WireTime,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

impl TryFrom<WireTicket> for Ticket {
    type Error = RepositoryError;

    fn try_from(wire: WireTicket) -> Result<Self, Self::Error> {
        let status = decode_named("status", &TicketStatus::ALL, backend_status, &wire.status)?;
        let priority = match wire.priority.as_deref() {
            Some(raw) => decode_named("priority", &Priority::ALL, backend_priority, raw)?,
            None => Priority::default(),
        };
        let category = match wire.category.as_deref() {
            Some(raw) => decode_named("category", &Category::ALL, backend_category, raw)?,
            None => Category::default(),
        };
        let created_by = user_ref(wire.created_by, wire.created_by_id).ok_or_else(|| {
            RepositoryError::Decode(format!("ticket {} has no creator", wire.id))
        })?;

        Ok(Ticket {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            status,
            priority,
            category,
            resolution: wire.resolution,
            closing_note: wire.closing_note,
            escalated_to: user_ref(wire.escalated_to, wire.escalated_to_id),
            escalation_reason: wire.escalation_reason,
            created_by,
            assigned_to: user_ref(wire.assigned_to, wire.assigned_to_id),
            last_updated_by: user_ref(wire.last_updated_by, wire.last_updated_by_id),
            created_at: wire.created_at.0,
            updated_at: wire.updated_at.0,
            attachments: wire.attachments,
        })
    }
}

/// `/users/me` payload. The role arrives as a bare name, a `{"name": ...}`
/// object, or under `role_name` depending on the API version.
#[derive(Deserialize)]
pub(super) struct WirePrincipal {
    id: PrincipalId,
    #[serde(alias = "role_name")]
    role: WireRole,
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireRole {
    Name(String),
    Object { name: String },
}

impl TryFrom<WirePrincipal> for Principal {
    type Error = RepositoryError;

    fn try_from(wire: WirePrincipal) -> Result<Self, Self::Error> {
        let name = match wire.role {
            WireRole::Name(n) | WireRole::Object { name: n } => n,
        };
        let role: Role = name
            .parse()
            .map_err(|e: UnknownRole| RepositoryError::Decode(e.to_string()))?;
        let principal = Principal::new(wire.id, role);
        Ok(match wire.full_name {
            Some(name) => principal.with_display_name(name),
            None => principal,
        })
    }
}

/// Comment payload; the backend nests the author under `user`.
#[derive(Deserialize)]
pub(super) struct WireComment {
    id: CommentId,
    #[serde(default)]
    ticket_id: Option<TicketId>,
    #[serde(default)]
    author: Option<WireUserRef>,
    #[serde(default)]
    user: Option<WireUserRef>,
    content: String,
    #[serde(default)]
    is_internal: bool,
    created_at: WireTime,
}

impl WireComment {
    pub(super) fn into_comment(self, ticket: &TicketId) -> Result<Comment, RepositoryError> {
        let author = user_ref(self.author, None)
            .or(self.user.map(WireUserRef::id))
            .ok_or_else(|| RepositoryError::Decode(format!("comment {} has no author", self.id)))?;
        Ok(Comment {
            id: self.id,
            ticket_id: self.ticket_id.unwrap_or_else(|| ticket.clone()),
            author,
            content: self.content,
            is_internal: self.is_internal,
            created_at: self.created_at.0,
        })
    }
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
