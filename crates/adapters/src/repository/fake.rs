// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory ticket repository for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AttachmentUpload, RepositoryError, TicketRepository};
use async_trait::async_trait;
use hd_core::{
    Attachment, AttachmentId, Clock, Comment, CommentId, FakeClock, IdGen, ListScope, NewTicket,
    Principal, PrincipalId, Role, SequentialIdGen, Ticket, TicketFilter, TicketId, TicketStatus,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Recorded repository call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    Get {
        id: TicketId,
    },
    SetStatus {
        id: TicketId,
        status: TicketStatus,
    },
    Resolve {
        id: TicketId,
        resolution: String,
    },
    Close {
        id: TicketId,
        closing_note: Option<String>,
    },
    Reopen {
        id: TicketId,
    },
    Escalate {
        id: TicketId,
        to: PrincipalId,
        reason: String,
    },
    Assign {
        id: TicketId,
        assignee: PrincipalId,
    },
    Create {
        title: String,
    },
    List {
        filter: TicketFilter,
    },
    ListComments {
        id: TicketId,
    },
    AddComment {
        id: TicketId,
        content: String,
        is_internal: bool,
    },
    UploadAttachment {
        id: TicketId,
        file_name: String,
        size_bytes: u64,
    },
    CurrentPrincipal,
}

impl RepoCall {
    /// Whether the call changes server state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            RepoCall::Get { .. }
                | RepoCall::List { .. }
                | RepoCall::ListComments { .. }
                | RepoCall::CurrentPrincipal
        )
    }
}

struct FakeState {
    tickets: HashMap<TicketId, Ticket>,
    comments: HashMap<TicketId, Vec<Comment>>,
    calls: Vec<RepoCall>,
    principal: Principal,
    fail_next: Option<RepositoryError>,
    latency: Option<Duration>,
}

/// Fake repository that behaves like the help-desk server
#[derive(Clone)]
pub struct FakeTicketRepository {
    inner: Arc<Mutex<FakeState>>,
    clock: FakeClock,
    ids: SequentialIdGen,
}

impl Default for FakeTicketRepository {
    fn default() -> Self {
        Self::new(Principal::new("agent-1", Role::Agent))
    }
}

impl FakeTicketRepository {
    /// Repository whose credentials belong to `principal`.
    pub fn new(principal: Principal) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                tickets: HashMap::new(),
                comments: HashMap::new(),
                calls: Vec::new(),
                principal,
                fail_next: None,
                latency: None,
            })),
            clock: FakeClock::new(),
            ids: SequentialIdGen::new("fake"),
        }
    }

    /// Stamp server-side timestamps from `clock`.
    pub fn with_clock(mut self, clock: FakeClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> &FakeClock {
        &self.clock
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RepoCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded calls that change server state
    pub fn mutations(&self) -> Vec<RepoCall> {
        self.calls()
            .into_iter()
            .filter(RepoCall::is_mutation)
            .collect()
    }

    pub fn insert(&self, ticket: Ticket) {
        self.inner.lock().tickets.insert(ticket.id.clone(), ticket);
    }

    pub fn insert_comment(&self, comment: Comment) {
        self.inner
            .lock()
            .comments
            .entry(comment.ticket_id.clone())
            .or_default()
            .push(comment);
    }

    /// Server-side copy of a ticket
    pub fn ticket(&self, id: &TicketId) -> Option<Ticket> {
        self.inner.lock().tickets.get(id).cloned()
    }

    pub fn set_principal(&self, principal: Principal) {
        self.inner.lock().principal = principal;
    }

    /// Fail the next call with `error`
    pub fn fail_next(&self, error: RepositoryError) {
        self.inner.lock().fail_next = Some(error);
    }

    /// Delay every call, after recording it and before applying it
    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().latency = Some(latency);
    }

    async fn begin(&self, call: RepoCall) -> Result<(), RepositoryError> {
        let (latency, failure) = {
            let mut state = self.inner.lock();
            state.calls.push(call);
            (state.latency, state.fail_next.take())
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn mutate(
        &self,
        id: &TicketId,
        apply: impl FnOnce(&mut Ticket) -> Result<(), RepositoryError>,
    ) -> Result<Ticket, RepositoryError> {
        let mut state = self.inner.lock();
        let actor = state.principal.id.clone();
        let ticket = state
            .tickets
            .get_mut(id)
            .ok_or_else(|| not_found(id))?;
        apply(ticket)?;
        ticket.touch(&actor, self.clock.now());
        Ok(ticket.clone())
    }
}

fn not_found(id: &TicketId) -> RepositoryError {
    RepositoryError::NotFound(format!("ticket {id} not found"))
}

fn require_text(field: &str, value: &str) -> Result<(), RepositoryError> {
    if value.trim().is_empty() {
        return Err(RepositoryError::Rejected(format!("{field} must not be empty")));
    }
    Ok(())
}

#[async_trait]
impl TicketRepository for FakeTicketRepository {
    async fn get(&self, id: &TicketId) -> Result<Ticket, RepositoryError> {
        self.begin(RepoCall::Get { id: id.clone() }).await?;
        self.ticket(id).ok_or_else(|| not_found(id))
    }

    async fn set_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, RepositoryError> {
        self.begin(RepoCall::SetStatus {
            id: id.clone(),
            status,
        })
        .await?;
        self.mutate(id, |t| {
            t.status = status;
            Ok(())
        })
    }

    async fn resolve(&self, id: &TicketId, resolution: &str) -> Result<Ticket, RepositoryError> {
        self.begin(RepoCall::Resolve {
            id: id.clone(),
            resolution: resolution.to_string(),
        })
        .await?;
        require_text("resolution", resolution)?;
        self.mutate(id, |t| {
            t.status = TicketStatus::Resolved;
            t.resolution = Some(resolution.to_string());
            Ok(())
        })
    }

    async fn close(
        &self,
        id: &TicketId,
        closing_note: Option<&str>,
    ) -> Result<Ticket, RepositoryError> {
        self.begin(RepoCall::Close {
            id: id.clone(),
            closing_note: closing_note.map(str::to_string),
        })
        .await?;
        self.mutate(id, |t| {
            t.status = TicketStatus::Closed;
            if let Some(note) = closing_note {
                t.closing_note = Some(note.to_string());
            }
            Ok(())
        })
    }

    async fn reopen(&self, id: &TicketId) -> Result<Ticket, RepositoryError> {
        self.begin(RepoCall::Reopen { id: id.clone() }).await?;
        self.mutate(id, |t| {
            t.status = TicketStatus::InProgress;
            Ok(())
        })
    }

    async fn escalate(
        &self,
        id: &TicketId,
        to: &PrincipalId,
        reason: &str,
    ) -> Result<Ticket, RepositoryError> {
        self.begin(RepoCall::Escalate {
            id: id.clone(),
            to: to.clone(),
            reason: reason.to_string(),
        })
        .await?;
        require_text("escalation_reason", reason)?;
        self.mutate(id, |t| {
            t.escalated_to = Some(to.clone());
            t.escalation_reason = Some(reason.to_string());
            Ok(())
        })
    }

    async fn assign(
        &self,
        id: &TicketId,
        assignee: &PrincipalId,
    ) -> Result<Ticket, RepositoryError> {
        self.begin(RepoCall::Assign {
            id: id.clone(),
            assignee: assignee.clone(),
        })
        .await?;
        self.mutate(id, |t| {
            if t.is_closed() {
                return Err(RepositoryError::Rejected(
                    "cannot assign a closed ticket".to_string(),
                ));
            }
            t.assigned_to = Some(assignee.clone());
            if t.status == TicketStatus::Open {
                t.status = TicketStatus::InProgress;
            }
            Ok(())
        })
    }

    async fn create(&self, fields: &NewTicket) -> Result<Ticket, RepositoryError> {
        self.begin(RepoCall::Create {
            title: fields.title.clone(),
        })
        .await?;
        require_text("title", &fields.title)?;
        require_text("description", &fields.description)?;
        let mut state = self.inner.lock();
        let ticket = Ticket::new(
            self.ids.next(),
            fields.clone(),
            state.principal.id.clone(),
            self.clock.now(),
        );
        state.tickets.insert(ticket.id.clone(), ticket.clone());
        Ok(ticket)
    }

    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RepositoryError> {
        self.begin(RepoCall::List {
            filter: filter.clone(),
        })
        .await?;
        let state = self.inner.lock();
        let me = &state.principal;
        if filter.scope == ListScope::AssignedToMe && !me.is_staff() {
            return Err(RepositoryError::Forbidden("staff only".to_string()));
        }
        let mut tickets: Vec<Ticket> = state
            .tickets
            .values()
            .filter(|t| match filter.scope {
                ListScope::Mine => t.created_by == me.id,
                ListScope::AssignedToMe => t.assigned_to.as_ref() == Some(&me.id),
                ListScope::All => me.is_staff() || t.created_by == me.id,
            })
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(tickets)
    }

    async fn list_comments(&self, id: &TicketId) -> Result<Vec<Comment>, RepositoryError> {
        self.begin(RepoCall::ListComments { id: id.clone() }).await?;
        let state = self.inner.lock();
        if !state.tickets.contains_key(id) {
            return Err(not_found(id));
        }
        Ok(state.comments.get(id).cloned().unwrap_or_default())
    }

    async fn add_comment(
        &self,
        id: &TicketId,
        content: &str,
        is_internal: bool,
    ) -> Result<Comment, RepositoryError> {
        self.begin(RepoCall::AddComment {
            id: id.clone(),
            content: content.to_string(),
            is_internal,
        })
        .await?;
        require_text("content", content)?;
        let mut state = self.inner.lock();
        if !state.tickets.contains_key(id) {
            return Err(not_found(id));
        }
        let comment = Comment {
            id: CommentId::new(self.ids.next()),
            ticket_id: id.clone(),
            author: state.principal.id.clone(),
            content: content.to_string(),
            is_internal,
            created_at: self.clock.now(),
        };
        state
            .comments
            .entry(id.clone())
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn upload_attachment(
        &self,
        id: &TicketId,
        file: AttachmentUpload,
    ) -> Result<Attachment, RepositoryError> {
        let size_bytes = u64::try_from(file.bytes.len()).unwrap_or(u64::MAX);
        self.begin(RepoCall::UploadAttachment {
            id: id.clone(),
            file_name: file.file_name.clone(),
            size_bytes,
        })
        .await?;
        let attachment_id = AttachmentId::new(self.ids.next());
        let attachment = Attachment {
            url: Some(format!("/attachments/{attachment_id}")),
            id: attachment_id,
            file_name: file.file_name,
            content_type: file.content_type,
            size_bytes,
            uploaded_at: self.clock.now(),
        };
        let stored = attachment.clone();
        self.mutate(id, move |t| {
            t.attachments.push(stored);
            Ok(())
        })?;
        Ok(attachment)
    }

    async fn current_principal(&self) -> Result<Principal, RepositoryError> {
        self.begin(RepoCall::CurrentPrincipal).await?;
        Ok(self.inner.lock().principal.clone())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
