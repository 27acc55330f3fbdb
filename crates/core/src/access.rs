// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read/comment/assign permissions outside the lifecycle table.

use crate::comment::Comment;
use crate::principal::{Principal, Role};
use crate::ticket::Ticket;

/// Supervisors and admins see everything; agents see tickets they opened or
/// hold; customers see their own.
pub fn can_view(ticket: &Ticket, principal: &Principal) -> bool {
    match principal.role {
        Role::Supervisor | Role::Admin => true,
        Role::Agent => {
            ticket.created_by == principal.id || ticket.assigned_to.as_ref() == Some(&principal.id)
        }
        Role::Customer => ticket.created_by == principal.id,
    }
}

/// Staff may comment anywhere; customers only publicly on their own tickets.
pub fn can_comment(ticket: &Ticket, principal: &Principal, is_internal: bool) -> bool {
    if principal.is_staff() {
        return true;
    }
    !is_internal && ticket.created_by == principal.id
}

pub fn can_see_comment(comment: &Comment, principal: &Principal) -> bool {
    !comment.is_internal || principal.is_staff()
}

/// Drop internal notes the principal may not read, preserving order.
pub fn visible_comments(comments: Vec<Comment>, principal: &Principal) -> Vec<Comment> {
    comments
        .into_iter()
        .filter(|c| can_see_comment(c, principal))
        .collect()
}

pub fn can_assign(principal: &Principal) -> bool {
    matches!(principal.role, Role::Supervisor | Role::Admin)
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
