//! Help and usage specs

use crate::prelude::*;

#[test]
fn no_args_prints_usage() {
    cli()
        .passes()
        .stdout_has("Usage:")
        .stdout_has("ticket")
        .stdout_has("comment")
        .stdout_has("whoami");
}

#[test]
fn ticket_help_lists_lifecycle_commands() {
    let out = cli().args(&["ticket", "--help"]).passes();
    for cmd in ["new", "list", "show", "actions", "start", "hold", "resume", "resolve", "close", "reopen", "escalate"] {
        assert!(out.stdout().contains(cmd), "missing {cmd}: {}", out.stdout());
    }
}

#[test]
fn version_flag_prints_version() {
    cli()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    cli().args(&["ticket", "delete", "7"]).fails().code(2);
}

#[test]
fn resolve_requires_resolution_flag() {
    cli()
        .args(&["ticket", "resolve", "7"])
        .fails()
        .code(2)
        .stderr_has("--resolution");
}
