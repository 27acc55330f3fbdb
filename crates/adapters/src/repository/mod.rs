// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket repository adapters

mod http;
mod wire;

pub use http::{HttpConfig, HttpTicketRepository};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTicketRepository, RepoCall};

use async_trait::async_trait;
use hd_core::{
    Attachment, Comment, NewTicket, Principal, PrincipalId, Ticket, TicketFilter, TicketId,
    TicketStatus,
};
use std::path::Path;
use thiserror::Error;

/// Errors from repository operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A file to attach to a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk, naming the upload after the file.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// Remote store of tickets (the help-desk REST API).
///
/// Calls are not idempotent and are never retried here; retry policy belongs
/// to the caller.
#[async_trait]
pub trait TicketRepository: Clone + Send + Sync + 'static {
    /// Fetch a ticket
    async fn get(&self, id: &TicketId) -> Result<Ticket, RepositoryError>;

    /// Overwrite the ticket's status
    async fn set_status(&self, id: &TicketId, status: TicketStatus)
        -> Result<Ticket, RepositoryError>;

    /// Move to resolved and record the resolution text
    async fn resolve(&self, id: &TicketId, resolution: &str) -> Result<Ticket, RepositoryError>;

    /// Move to closed with an optional note
    async fn close(
        &self,
        id: &TicketId,
        closing_note: Option<&str>,
    ) -> Result<Ticket, RepositoryError>;

    /// Move back to in_progress
    async fn reopen(&self, id: &TicketId) -> Result<Ticket, RepositoryError>;

    /// Record (overwrite) the escalation target and reason
    async fn escalate(
        &self,
        id: &TicketId,
        to: &PrincipalId,
        reason: &str,
    ) -> Result<Ticket, RepositoryError>;

    /// Assign the ticket to a staff member
    async fn assign(&self, id: &TicketId, assignee: &PrincipalId)
        -> Result<Ticket, RepositoryError>;

    /// Open a ticket on behalf of the current principal
    async fn create(&self, fields: &NewTicket) -> Result<Ticket, RepositoryError>;

    /// Tickets matching `filter`, newest first
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RepositoryError>;

    /// Comments on a ticket, oldest first
    async fn list_comments(&self, id: &TicketId) -> Result<Vec<Comment>, RepositoryError>;

    async fn add_comment(
        &self,
        id: &TicketId,
        content: &str,
        is_internal: bool,
    ) -> Result<Comment, RepositoryError>;

    async fn upload_attachment(
        &self,
        id: &TicketId,
        file: AttachmentUpload,
    ) -> Result<Attachment, RepositoryError>;

    /// The principal the repository credentials belong to
    async fn current_principal(&self) -> Result<Principal, RepositoryError>;
}
