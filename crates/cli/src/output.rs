// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use hd_core::{Action, Attachment, Comment, Principal, Ticket};
use serde::Serialize;
use std::fmt::Write;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `value` as JSON, or `text` otherwise.
pub fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", text()),
    }
    Ok(())
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Multi-line ticket summary.
pub fn format_ticket(ticket: &Ticket) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Ticket {}: {}", ticket.id, ticket.title);
    let _ = writeln!(out, "  Status:     {}", ticket.status);
    let _ = writeln!(out, "  Priority:   {}", ticket.priority);
    let _ = writeln!(out, "  Category:   {}", ticket.category);
    let _ = writeln!(out, "  Created by: {}", ticket.created_by);
    let _ = writeln!(
        out,
        "  Assigned:   {}",
        or_dash(ticket.assigned_to.as_ref().map(|p| p.as_str()))
    );
    if let Some(resolution) = &ticket.resolution {
        let _ = writeln!(out, "  Resolution: {resolution}");
    }
    if let Some(note) = &ticket.closing_note {
        let _ = writeln!(out, "  Closing:    {note}");
    }
    if let Some(to) = &ticket.escalated_to {
        let _ = writeln!(
            out,
            "  Escalated:  {to} ({})",
            or_dash(ticket.escalation_reason.as_deref())
        );
    }
    let _ = writeln!(
        out,
        "  Updated:    {} by {}",
        timestamp(&ticket.updated_at),
        or_dash(ticket.last_updated_by.as_ref().map(|p| p.as_str()))
    );
    if !ticket.attachments.is_empty() {
        let _ = writeln!(out, "  Attachments:");
        for attachment in &ticket.attachments {
            let _ = writeln!(out, "    {}", format_attachment(attachment).trim_end());
        }
    }
    out
}

/// One ticket per line: id, status, priority, title.
pub fn format_ticket_list(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "No tickets\n".to_string();
    }
    let mut out = String::new();
    for ticket in tickets {
        let _ = writeln!(
            out,
            "{:<6} {:<12} {:<8} {}",
            ticket.id.as_str(),
            ticket.status.as_str(),
            ticket.priority.as_str(),
            ticket.title
        );
    }
    out
}

/// One action per line, or a note when nothing is offered.
pub fn format_actions(actions: &[Action]) -> String {
    if actions.is_empty() {
        return "No actions available\n".to_string();
    }
    actions.iter().map(|a| format!("{a}\n")).collect()
}

pub fn format_comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No comments\n".to_string();
    }
    let mut out = String::new();
    for c in comments {
        let marker = if c.is_internal { " [internal]" } else { "" };
        let _ = writeln!(
            out,
            "{} {}{marker}: {}",
            timestamp(&c.created_at),
            c.author,
            c.content
        );
    }
    out
}

pub fn format_attachment(attachment: &Attachment) -> String {
    format!(
        "{} {} ({} bytes)\n",
        attachment.id, attachment.file_name, attachment.size_bytes
    )
}

pub fn format_principal(principal: &Principal) -> String {
    format!("{} ({}, id {})\n", principal.label(), principal.role, principal.id)
}
