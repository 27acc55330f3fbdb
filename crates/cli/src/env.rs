// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;
use std::time::Duration;

// --- Duration helper (private) ---

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

// --- Config file ---

/// Explicit config file path (HD_CONFIG)
pub fn config_path() -> Option<PathBuf> {
    non_empty("HD_CONFIG").map(PathBuf::from)
}

// --- API connection ---

pub fn api_url() -> Option<String> {
    non_empty("HD_API_URL")
}

pub fn token() -> Option<String> {
    non_empty("HD_TOKEN")
}

pub fn timeout_ms() -> Option<Duration> {
    parse_duration_ms("HD_TIMEOUT_MS")
}

// --- Logging ---

/// Log filter directives: HD_LOG > RUST_LOG
pub fn log_filter() -> Option<String> {
    non_empty("HD_LOG").or_else(|| non_empty("RUST_LOG"))
}
