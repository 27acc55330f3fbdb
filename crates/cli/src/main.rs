// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hd - help-desk ticket CLI

mod commands;
mod config;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{comment, ticket};
use config::Config;
use exit_error::ExitError;
use hd_adapters::{HttpTicketRepository, TracedRepository};
use hd_core::SystemClock;
use hd_engine::{SessionContext, TicketDetailController};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "hd", version, about = "Help-desk ticket lifecycle client")]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ticket lifecycle
    Ticket(ticket::TicketArgs),
    /// Ticket comments
    Comment(comment::CommentArgs),
    /// Show the principal your credentials belong to
    Whoami,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e.downcast_ref::<ExitError>().map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped. Otherwise the full chain is rendered.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

/// Install the stderr subscriber. HD_LOG > RUST_LOG > "warn".
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = env::log_filter()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    setup_logging();

    let config = Config::load()?;
    tracing::debug!(
        api_url = %config.api_url,
        timeout_ms = config.timeout_ms(),
        "config loaded"
    );
    let repo = TracedRepository::new(HttpTicketRepository::new(config.http_config()?)?);
    let session = SessionContext::resolve(&repo)
        .await
        .map_err(ExitError::from)?;
    let controller = TicketDetailController::new(repo, session, SystemClock);

    match command {
        Commands::Ticket(args) => ticket::handle(args.command, &controller, format).await,
        Commands::Comment(args) => comment::handle(args.command, &controller, format).await,
        Commands::Whoami => {
            let principal = controller.session().principal();
            output::emit(format, principal, || output::format_principal(principal))
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
