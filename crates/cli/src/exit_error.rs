// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors that carry a process exit code.

use hd_engine::ControllerError;

pub const UNAUTHORIZED: i32 = 3;
pub const INVALID_STATE: i32 = 4;
pub const VALIDATION_FAILED: i32 = 5;
pub const NOT_FOUND: i32 = 6;
pub const TRANSPORT_FAILURE: i32 = 7;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ExitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<ControllerError> for ExitError {
    fn from(e: ControllerError) -> Self {
        let code = match &e {
            ControllerError::Unauthorized(_) => UNAUTHORIZED,
            ControllerError::InvalidState(_) => INVALID_STATE,
            ControllerError::ValidationFailed(_) => VALIDATION_FAILED,
            ControllerError::NotFound(_) => NOT_FOUND,
            ControllerError::TransportFailure(_) => TRANSPORT_FAILURE,
        };
        Self::new(code, e.to_string())
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
