// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hd comment` - Ticket comment commands

use anyhow::Result;
use clap::{Args, Subcommand};
use hd_adapters::TicketRepository;
use hd_core::{Clock, TicketId};
use hd_engine::TicketDetailController;

use crate::exit_error::ExitError;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct CommentArgs {
    #[command(subcommand)]
    pub command: CommentCommand,
}

#[derive(Subcommand)]
pub enum CommentCommand {
    /// List comments on a ticket
    List {
        /// Ticket ID
        id: String,
    },
    /// Add a comment to a ticket
    Add {
        /// Ticket ID
        id: String,
        /// Comment text
        content: String,
        /// Staff-only note, hidden from customers
        #[arg(long)]
        internal: bool,
    },
}

pub async fn handle<R: TicketRepository, C: Clock>(
    command: CommentCommand,
    controller: &TicketDetailController<R, C>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        CommentCommand::List { id } => {
            let comments = controller
                .comments(&TicketId::new(id))
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &comments, || output::format_comments(&comments))
        }
        CommentCommand::Add {
            id,
            content,
            internal,
        } => {
            let comment = controller
                .add_comment(&TicketId::new(id), &content, internal)
                .await
                .map_err(ExitError::from)?;
            output::emit(format, &comment, || {
                output::format_comments(std::slice::from_ref(&comment))
            })
        }
    }
}
