// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket detail controller: loads a ticket, offers actions, dispatches them.
//!
//! Mutations on one ticket are serialized. Each mutation re-reads the ticket
//! inside the per-ticket critical section, so a queued request is judged
//! against the state the previous one produced. The held view only changes
//! when the repository confirms a write.

use crate::{ControllerError, SessionContext};
use hd_adapters::{AttachmentUpload, TicketRepository};
use hd_core::{
    access, plan_transition, Action, Attachment, Clock, Comment, Effect, ListScope, NewTicket,
    PrincipalId, Ticket, TicketFilter, TicketId, TransitionPayload,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type Slots = Mutex<HashMap<TicketId, Arc<tokio::sync::Mutex<()>>>>;

pub struct TicketDetailController<R, C> {
    repo: R,
    clock: C,
    session: SessionContext,
    views: Mutex<HashMap<TicketId, Ticket>>,
    slots: Slots,
}

impl<R: TicketRepository, C: Clock> TicketDetailController<R, C> {
    pub fn new(repo: R, session: SessionContext, clock: C) -> Self {
        Self {
            repo,
            clock,
            session,
            views: Mutex::new(HashMap::new()),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Fetch the ticket and replace the held view.
    pub async fn load(&self, id: &TicketId) -> Result<Ticket, ControllerError> {
        let ticket = self.repo.get(id).await?;
        self.store(id, ticket.clone());
        Ok(ticket)
    }

    /// Last fetched or confirmed state, if any.
    pub fn view(&self, id: &TicketId) -> Option<Ticket> {
        self.views.lock().get(id).cloned()
    }

    /// Actions offered on the held view, loading it first if needed.
    pub async fn available_actions(&self, id: &TicketId) -> Result<Vec<Action>, ControllerError> {
        let ticket = self.current(id).await?;
        Ok(hd_core::available_actions(&ticket, self.session.principal()))
    }

    /// Validate `action` against fresh state and write it through the repository.
    ///
    /// Dropping the returned future abandons the request and frees the slot.
    pub async fn perform(
        &self,
        id: &TicketId,
        action: Action,
        payload: &TransitionPayload,
    ) -> Result<Ticket, ControllerError> {
        let _slot = self.acquire(id).await;

        let current = self.repo.get(id).await?;
        let transition = plan_transition(
            &current,
            action,
            self.session.principal(),
            payload,
            self.clock.now(),
        )
        .inspect_err(|e| {
            tracing::info!(ticket_id = %id, %action, error = %e, "transition refused")
        })?;

        let confirmed = match &transition.effect {
            Effect::SetStatus(status) => self.repo.set_status(id, *status).await?,
            Effect::Resolve { resolution } => self.repo.resolve(id, resolution).await?,
            Effect::Close { closing_note } => self.repo.close(id, closing_note.as_deref()).await?,
            Effect::Reopen => self.repo.reopen(id).await?,
            Effect::Escalate { to, reason } => self.repo.escalate(id, to, reason).await?,
        };

        if confirmed.status != transition.ticket.status {
            tracing::warn!(
                ticket_id = %id,
                %action,
                expected = %transition.ticket.status,
                actual = %confirmed.status,
                "server disagrees with transition table"
            );
        }
        tracing::info!(
            ticket_id = %id,
            %action,
            from = %current.status,
            to = %confirmed.status,
            actor = %self.session.principal().id,
            "transition applied"
        );

        self.store(id, confirmed.clone());
        Ok(confirmed)
    }

    /// Open a ticket as the session principal. Any role may do this.
    pub async fn create(&self, fields: NewTicket) -> Result<Ticket, ControllerError> {
        let fields = NewTicket {
            title: fields.title.trim().to_string(),
            description: fields.description.trim().to_string(),
            ..fields
        };
        for (name, value) in [("title", &fields.title), ("description", &fields.description)] {
            if value.is_empty() {
                return Err(ControllerError::ValidationFailed(format!(
                    "{name} is required"
                )));
            }
        }

        let ticket = self.repo.create(&fields).await?;
        tracing::info!(
            ticket_id = %ticket.id,
            priority = %ticket.priority,
            category = %ticket.category,
            actor = %self.session.principal().id,
            "ticket created"
        );
        self.store(&ticket.id, ticket.clone());
        Ok(ticket)
    }

    /// Tickets matching `filter`, newest first, as the server scopes them.
    pub async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, ControllerError> {
        let principal = self.session.principal();
        if filter.scope == ListScope::AssignedToMe && !principal.is_staff() {
            return Err(ControllerError::Unauthorized(format!(
                "{} has no assigned tickets",
                principal.role
            )));
        }
        let tickets = self.repo.list(filter).await?;
        tracing::debug!(scope = %filter.scope, count = tickets.len(), "tickets listed");
        Ok(tickets)
    }

    /// Comments the principal may read, oldest first.
    pub async fn comments(&self, id: &TicketId) -> Result<Vec<Comment>, ControllerError> {
        let comments = self.repo.list_comments(id).await?;
        Ok(access::visible_comments(comments, self.session.principal()))
    }

    pub async fn add_comment(
        &self,
        id: &TicketId,
        content: &str,
        is_internal: bool,
    ) -> Result<Comment, ControllerError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ControllerError::ValidationFailed(
                "comment content is required".to_string(),
            ));
        }
        let ticket = self.current(id).await?;
        let principal = self.session.principal();
        if !access::can_comment(&ticket, principal, is_internal) {
            let kind = if is_internal { "internal notes" } else { "comments" };
            return Err(ControllerError::Unauthorized(format!(
                "{} may not add {kind} to ticket {id}",
                principal.role
            )));
        }
        Ok(self.repo.add_comment(id, content, is_internal).await?)
    }

    /// Hand the ticket to `assignee`. Supervisors and admins only.
    pub async fn assign(
        &self,
        id: &TicketId,
        assignee: &PrincipalId,
    ) -> Result<Ticket, ControllerError> {
        let principal = self.session.principal();
        if !access::can_assign(principal) {
            return Err(ControllerError::Unauthorized(format!(
                "{} may not assign tickets",
                principal.role
            )));
        }

        let _slot = self.acquire(id).await;

        let current = self.repo.get(id).await?;
        if current.is_closed() {
            return Err(ControllerError::InvalidState(format!(
                "cannot assign a ticket that is {}",
                current.status
            )));
        }
        let confirmed = self.repo.assign(id, assignee).await?;
        tracing::info!(ticket_id = %id, assignee = %assignee, "ticket assigned");
        self.store(id, confirmed.clone());
        Ok(confirmed)
    }

    /// Upload a file. Lifecycle state is untouched.
    pub async fn upload_attachment(
        &self,
        id: &TicketId,
        file: AttachmentUpload,
    ) -> Result<Attachment, ControllerError> {
        let ticket = self.current(id).await?;
        let principal = self.session.principal();
        if !access::can_view(&ticket, principal) {
            return Err(ControllerError::Unauthorized(format!(
                "{} may not attach files to ticket {id}",
                principal.label()
            )));
        }
        let attachment = self.repo.upload_attachment(id, file).await?;
        if let Some(view) = self.views.lock().get_mut(id) {
            view.attachments.push(attachment.clone());
        }
        Ok(attachment)
    }

    async fn current(&self, id: &TicketId) -> Result<Ticket, ControllerError> {
        match self.view(id) {
            Some(ticket) => Ok(ticket),
            None => self.load(id).await,
        }
    }

    fn store(&self, id: &TicketId, ticket: Ticket) {
        self.views.lock().insert(id.clone(), ticket);
    }

    async fn acquire(&self, id: &TicketId) -> SlotGuard<'_> {
        let slot = self.slots.lock().entry(id.clone()).or_default().clone();
        let mut guard = SlotGuard {
            slots: &self.slots,
            id: id.clone(),
            held: None,
        };
        guard.held = Some(slot.lock_owned().await);
        guard
    }
}

/// Exclusive hold on one ticket. Releasing the last reference to a slot
/// removes it from the map.
struct SlotGuard<'a> {
    slots: &'a Slots,
    id: TicketId,
    held: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        self.held = None;
        if slots
            .get(&self.id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&self.id);
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
