// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::repository::{AttachmentUpload, RepositoryError, TicketRepository};
use async_trait::async_trait;
use hd_core::{
    Attachment, Comment, NewTicket, Principal, PrincipalId, Ticket, TicketFilter, TicketId,
    TicketStatus,
};
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any TicketRepository
#[derive(Clone)]
pub struct TracedRepository<R> {
    inner: R,
}

impl<R> TracedRepository<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

/// Run `call` inside `span`, logging elapsed time and failures.
async fn traced<T, F>(span: tracing::Span, call: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    async {
        let start = Instant::now();
        let result = call.await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(_) => tracing::debug!(elapsed_ms, "ok"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "failed"),
        }
        result
    }
    .instrument(span)
    .await
}

#[async_trait]
impl<R: TicketRepository> TicketRepository for TracedRepository<R> {
    async fn get(&self, id: &TicketId) -> Result<Ticket, RepositoryError> {
        traced(
            tracing::debug_span!("repo.get", ticket_id = %id),
            self.inner.get(id),
        )
        .await
    }

    async fn set_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, RepositoryError> {
        traced(
            tracing::info_span!("repo.set_status", ticket_id = %id, %status),
            self.inner.set_status(id, status),
        )
        .await
    }

    async fn resolve(&self, id: &TicketId, resolution: &str) -> Result<Ticket, RepositoryError> {
        traced(
            tracing::info_span!(
                "repo.resolve",
                ticket_id = %id,
                resolution_len = resolution.len()
            ),
            self.inner.resolve(id, resolution),
        )
        .await
    }

    async fn close(
        &self,
        id: &TicketId,
        closing_note: Option<&str>,
    ) -> Result<Ticket, RepositoryError> {
        traced(
            tracing::info_span!(
                "repo.close",
                ticket_id = %id,
                has_note = closing_note.is_some()
            ),
            self.inner.close(id, closing_note),
        )
        .await
    }

    async fn reopen(&self, id: &TicketId) -> Result<Ticket, RepositoryError> {
        traced(
            tracing::info_span!("repo.reopen", ticket_id = %id),
            self.inner.reopen(id),
        )
        .await
    }

    async fn escalate(
        &self,
        id: &TicketId,
        to: &PrincipalId,
        reason: &str,
    ) -> Result<Ticket, RepositoryError> {
        traced(
            tracing::info_span!("repo.escalate", ticket_id = %id, to = %to),
            self.inner.escalate(id, to, reason),
        )
        .await
    }

    async fn assign(
        &self,
        id: &TicketId,
        assignee: &PrincipalId,
    ) -> Result<Ticket, RepositoryError> {
        traced(
            tracing::info_span!("repo.assign", ticket_id = %id, assignee = %assignee),
            self.inner.assign(id, assignee),
        )
        .await
    }

    async fn create(&self, fields: &NewTicket) -> Result<Ticket, RepositoryError> {
        traced(
            tracing::info_span!(
                "repo.create",
                priority = %fields.priority,
                category = %fields.category
            ),
            self.inner.create(fields),
        )
        .await
    }

    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RepositoryError> {
        let span = tracing::debug_span!(
            "repo.list",
            scope = %filter.scope,
            status = filter.status.map(|s| s.as_str()),
            searching = filter.search.is_some()
        );
        traced(span, self.inner.list(filter)).await
    }

    async fn list_comments(&self, id: &TicketId) -> Result<Vec<Comment>, RepositoryError> {
        traced(
            tracing::debug_span!("repo.list_comments", ticket_id = %id),
            self.inner.list_comments(id),
        )
        .await
    }

    async fn add_comment(
        &self,
        id: &TicketId,
        content: &str,
        is_internal: bool,
    ) -> Result<Comment, RepositoryError> {
        traced(
            tracing::info_span!("repo.add_comment", ticket_id = %id, is_internal),
            self.inner.add_comment(id, content, is_internal),
        )
        .await
    }

    async fn upload_attachment(
        &self,
        id: &TicketId,
        file: AttachmentUpload,
    ) -> Result<Attachment, RepositoryError> {
        let span = tracing::info_span!(
            "repo.upload_attachment",
            ticket_id = %id,
            file_name = %file.file_name,
            size_bytes = file.bytes.len()
        );
        traced(span, self.inner.upload_attachment(id, file)).await
    }

    async fn current_principal(&self) -> Result<Principal, RepositoryError> {
        traced(
            tracing::debug_span!("repo.current_principal"),
            self.inner.current_principal(),
        )
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
