// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST implementation of [`TicketRepository`]

use super::wire::{self, WireComment, WirePrincipal, WireTicket};
use super::{AttachmentUpload, RepositoryError, TicketRepository};
use async_trait::async_trait;
use hd_core::{
    Attachment, Comment, IdGen, ListScope, NewTicket, Principal, PrincipalId, Ticket,
    TicketFilter, TicketId, TicketStatus, UuidIdGen,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings, passed explicitly rather than read from ambient state.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl HttpConfig {
    /// Parse `base_url` (e.g. `http://localhost:8000/api/v1`).
    pub fn new(base_url: &str) -> Result<Self, RepositoryError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RepositoryError::Config(format!("invalid base url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::Config(format!(
                "base url cannot carry paths: {base_url}"
            )));
        }
        Ok(Self {
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

struct Inner {
    http: reqwest::Client,
    config: HttpConfig,
    request_ids: UuidIdGen,
}

/// Bearer-token JSON client for the help-desk API
#[derive(Clone)]
pub struct HttpTicketRepository {
    inner: Arc<Inner>,
}

impl HttpTicketRepository {
    pub fn new(config: HttpConfig) -> Result<Self, RepositoryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RepositoryError::Config(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                request_ids: UuidIdGen,
            }),
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.inner.config
    }

    fn url(&self, segments: &[&str]) -> Result<Url, RepositoryError> {
        let mut url = self.inner.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Config("base url cannot carry paths".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let request_id = self.inner.request_ids.next();
        tracing::debug!(%method, %url, request_id = %request_id, "http request");
        let mut builder = self
            .inner
            .http
            .request(method, url)
            .header("X-Request-ID", request_id);
        if let Some(token) = &self.inner.config.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, RepositoryError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if status.is_success() {
            return serde_json::from_slice(&body)
                .map_err(|e| RepositoryError::Decode(e.to_string()));
        }
        Err(status_error(status, &body))
    }

    async fn call<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, RepositoryError> {
        let mut builder = self.request(method, self.url(segments)?);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await
    }

    async fn ticket_call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Ticket, RepositoryError> {
        let ticket: WireTicket = self.call(method, segments, body).await?;
        Ticket::try_from(ticket)
    }
}

fn transport_error(e: reqwest::Error) -> RepositoryError {
    if e.is_timeout() {
        RepositoryError::Transport(format!("request timed out: {e}"))
    } else {
        RepositoryError::Transport(e.to_string())
    }
}

/// Map a non-success response. FastAPI-style bodies carry `{"detail": ...}`.
fn status_error(status: StatusCode, body: &[u8]) -> RepositoryError {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !body.is_empty() => String::from_utf8_lossy(body).into_owned(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    match status {
        StatusCode::NOT_FOUND => RepositoryError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::Forbidden(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            RepositoryError::Rejected(message)
        }
        _ => RepositoryError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl TicketRepository for HttpTicketRepository {
    async fn get(&self, id: &TicketId) -> Result<Ticket, RepositoryError> {
        self.ticket_call::<()>(Method::GET, &["tickets", id.as_str()], None)
            .await
    }

    async fn set_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, RepositoryError> {
        self.ticket_call(
            Method::PATCH,
            &["tickets", id.as_str(), "status"],
            Some(&wire::status_body(status)),
        )
        .await
    }

    async fn resolve(&self, id: &TicketId, resolution: &str) -> Result<Ticket, RepositoryError> {
        self.ticket_call(
            Method::POST,
            &["tickets", id.as_str(), "resolve"],
            Some(&json!({ "resolution": resolution })),
        )
        .await
    }

    async fn close(
        &self,
        id: &TicketId,
        closing_note: Option<&str>,
    ) -> Result<Ticket, RepositoryError> {
        let body = match closing_note {
            Some(note) => json!({ "closing_note": note }),
            None => json!({}),
        };
        self.ticket_call(Method::POST, &["tickets", id.as_str(), "close"], Some(&body))
            .await
    }

    async fn reopen(&self, id: &TicketId) -> Result<Ticket, RepositoryError> {
        self.ticket_call(
            Method::POST,
            &["tickets", id.as_str(), "reopen"],
            Some(&json!({})),
        )
        .await
    }

    async fn escalate(
        &self,
        id: &TicketId,
        to: &PrincipalId,
        reason: &str,
    ) -> Result<Ticket, RepositoryError> {
        self.ticket_call(
            Method::POST,
            &["tickets", id.as_str(), "escalate"],
            Some(&json!({ "escalated_to_id": to, "escalation_reason": reason })),
        )
        .await
    }

    async fn assign(
        &self,
        id: &TicketId,
        assignee: &PrincipalId,
    ) -> Result<Ticket, RepositoryError> {
        self.ticket_call(
            Method::PUT,
            &["tickets", id.as_str(), "assign"],
            Some(&json!({ "assigned_to_id": assignee })),
        )
        .await
    }

    async fn create(&self, fields: &NewTicket) -> Result<Ticket, RepositoryError> {
        self.ticket_call(
            Method::POST,
            &["tickets", ""],
            Some(&wire::new_ticket_body(fields)),
        )
        .await
    }

    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RepositoryError> {
        let route = match filter.scope {
            ListScope::All => "",
            ListScope::Mine => "my-tickets",
            ListScope::AssignedToMe => "assigned-to-me",
        };
        let mut url = self.url(&["tickets", route])?;

        let mut query = Vec::new();
        if let Some(status) = filter.status {
            query.push(("status", wire::backend_status(status).to_string()));
        }
        if filter.scope == ListScope::All {
            if let Some(text) = filter.search.as_deref().map(str::trim) {
                if !text.is_empty() {
                    query.push(("search", text.to_string()));
                }
            }
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let tickets: Vec<WireTicket> = self.send(self.request(Method::GET, url)).await?;
        tickets.into_iter().map(Ticket::try_from).collect()
    }

    async fn list_comments(&self, id: &TicketId) -> Result<Vec<Comment>, RepositoryError> {
        let comments: Vec<WireComment> = self
            .call::<_, ()>(Method::GET, &["tickets", id.as_str(), "comments"], None)
            .await?;
        comments.into_iter().map(|c| c.into_comment(id)).collect()
    }

    async fn add_comment(
        &self,
        id: &TicketId,
        content: &str,
        is_internal: bool,
    ) -> Result<Comment, RepositoryError> {
        let comment: WireComment = self
            .call(
                Method::POST,
                &["tickets", id.as_str(), "comments"],
                Some(&json!({ "content": content, "is_internal": is_internal })),
            )
            .await?;
        comment.into_comment(id)
    }

    async fn upload_attachment(
        &self,
        id: &TicketId,
        file: AttachmentUpload,
    ) -> Result<Attachment, RepositoryError> {
        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| RepositoryError::Rejected(format!("bad content type: {e}")))?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);
        let url = self.url(&["tickets", id.as_str(), "attachments"])?;
        self.send(self.request(Method::POST, url).multipart(form))
            .await
    }

    async fn current_principal(&self) -> Result<Principal, RepositoryError> {
        let principal: WirePrincipal = self
            .call::<_, ()>(Method::GET, &["users", "me"], None)
            .await?;
        Principal::try_from(principal)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
