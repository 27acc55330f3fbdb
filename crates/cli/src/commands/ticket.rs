// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hd ticket` - Ticket lifecycle commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use hd_adapters::{AttachmentUpload, TicketRepository};
use hd_core::{
    Action, Category, Clock, ListScope, NewTicket, Priority, PrincipalId, TicketFilter, TicketId,
    TicketStatus, TransitionPayload,
};
use hd_engine::TicketDetailController;

use crate::exit_error::ExitError;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum TicketCommand {
    /// Open a new ticket
    New(NewArgs),
    /// List tickets visible to you, newest first
    List(ListArgs),
    /// Show a ticket
    Show {
        /// Ticket ID
        id: String,
    },
    /// List the actions you may take on a ticket
    Actions {
        /// Ticket ID
        id: String,
    },
    /// Assign a ticket (supervisors and admins)
    Assign {
        id: String,
        /// Principal ID of the assignee
        #[arg(long)]
        to: String,
    },
    /// Upload a file to a ticket
    Attach {
        id: String,
        /// File to upload
        path: PathBuf,
        /// MIME type sent with the file
        #[arg(long)]
        content_type: Option<String>,
    },
    #[command(flatten)]
    Lifecycle(LifecycleCommand),
}

#[derive(Args, Debug, PartialEq)]
pub struct NewArgs {
    /// Short summary of the problem
    #[arg(long)]
    pub title: String,
    /// What happened and what you expected
    #[arg(short = 'd', long)]
    pub description: String,
    /// low, medium, high or urgent
    #[arg(long, default_value_t = Priority::Medium)]
    pub priority: Priority,
    /// hardware, software, network, access or other
    #[arg(long, default_value_t = Category::Other)]
    pub category: Category,
}

impl NewArgs {
    pub fn fields(&self) -> NewTicket {
        NewTicket::new(self.title.as_str(), self.description.as_str())
            .priority(self.priority)
            .category(self.category)
    }
}

#[derive(Args, Debug, PartialEq)]
pub struct ListArgs {
    /// Only tickets you opened
    #[arg(long, conflicts_with = "assigned")]
    pub mine: bool,
    /// Only tickets assigned to you (staff)
    #[arg(long)]
    pub assigned: bool,
    /// Only tickets in this status
    #[arg(long)]
    pub status: Option<TicketStatus>,
    /// Match title or description (full listing only)
    #[arg(long)]
    pub search: Option<String>,
}

impl ListArgs {
    pub fn filter(&self) -> TicketFilter {
        let scope = if self.mine {
            ListScope::Mine
        } else if self.assigned {
            ListScope::AssignedToMe
        } else {
            ListScope::All
        };
        TicketFilter {
            scope,
            status: self.status,
            search: self.search.clone(),
        }
    }
}

/// Commands that move a ticket through its lifecycle.
#[derive(Subcommand, Debug, PartialEq)]
pub enum LifecycleCommand {
    /// Start work on an open ticket
    Start { id: String },
    /// Put an in-progress ticket on hold
    Hold { id: String },
    /// Resume a ticket that is on hold
    Resume { id: String },
    /// Mark an in-progress ticket resolved without a resolution note
    MarkResolved { id: String },
    /// Resolve a ticket, recording what fixed it
    Resolve {
        id: String,
        /// What fixed the problem
        #[arg(short = 'm', long)]
        resolution: String,
    },
    /// Close a resolved ticket (supervisors and admins)
    Close {
        id: String,
        /// Closing note; omit for a quick close
        #[arg(short = 'm', long)]
        note: Option<String>,
    },
    /// Reopen a resolved or closed ticket
    Reopen { id: String },
    /// Flag a ticket for another staff member's attention
    Escalate {
        id: String,
        /// Principal ID to escalate to
        #[arg(long)]
        to: String,
        /// Why the ticket needs escalation
        #[arg(long)]
        reason: String,
    },
}

impl LifecycleCommand {
    /// The ticket, action and payload this command requests.
    pub fn transition(&self) -> (TicketId, Action, TransitionPayload) {
        let payload = TransitionPayload::new();
        let (id, action, payload) = match self {
            LifecycleCommand::Start { id } => (id, Action::StartWork, payload),
            LifecycleCommand::Hold { id } => (id, Action::Hold, payload),
            LifecycleCommand::Resume { id } => (id, Action::Resume, payload),
            LifecycleCommand::MarkResolved { id } => (id, Action::MarkResolved, payload),
            LifecycleCommand::Resolve { id, resolution } => {
                (id, Action::Resolve, payload.resolution(resolution.as_str()))
            }
            LifecycleCommand::Close { id, note: Some(note) } => {
                (id, Action::Close, payload.closing_note(note.as_str()))
            }
            LifecycleCommand::Close { id, note: None } => (id, Action::QuickClose, payload),
            LifecycleCommand::Reopen { id } => (id, Action::Reopen, payload),
            LifecycleCommand::Escalate { id, to, reason } => (
                id,
                Action::Escalate,
                payload.escalation(to.as_str(), reason.as_str()),
            ),
        };
        (TicketId::new(id.as_str()), action, payload)
    }
}

pub async fn handle<R: TicketRepository, C: Clock>(
    command: TicketCommand,
    controller: &TicketDetailController<R, C>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        TicketCommand::New(args) => {
            let ticket = controller
                .create(args.fields())
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &ticket, || output::format_ticket(&ticket))
        }
        TicketCommand::List(args) => {
            let tickets = controller
                .list(&args.filter())
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &tickets, || output::format_ticket_list(&tickets))
        }
        TicketCommand::Show { id } => {
            let ticket = controller
                .load(&TicketId::new(id))
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &ticket, || output::format_ticket(&ticket))
        }
        TicketCommand::Actions { id } => {
            let actions = controller
                .available_actions(&TicketId::new(id))
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &actions, || output::format_actions(&actions))
        }
        TicketCommand::Assign { id, to } => {
            let ticket = controller
                .assign(&TicketId::new(id), &PrincipalId::new(to))
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &ticket, || output::format_ticket(&ticket))
        }
        TicketCommand::Attach {
            id,
            path,
            content_type,
        } => {
            let mut upload = AttachmentUpload::read(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            if let Some(content_type) = content_type {
                upload = upload.with_content_type(content_type);
            }
            let attachment = controller
                .upload_attachment(&TicketId::new(id), upload)
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &attachment, || {
                output::format_attachment(&attachment)
            })
        }
        TicketCommand::Lifecycle(lifecycle) => {
            let (id, action, payload) = lifecycle.transition();
            let ticket = controller
                .perform(&id, action, &payload)
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &ticket, || output::format_ticket(&ticket))
        }
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
