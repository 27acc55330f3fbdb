// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket comments and internal notes.

use crate::id::{CommentId, PrincipalId, TicketId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a ticket. Internal comments are staff-only notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub ticket_id: TicketId,
    pub author: PrincipalId,
    pub content: String,
    #[serde(default)]
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}
