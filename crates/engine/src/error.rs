// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the ticket controller

use hd_adapters::RepositoryError;
use hd_core::TransitionError;
use thiserror::Error;

/// Errors surfaced to callers of the controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("not permitted: {0}")]
    Unauthorized(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid input: {0}")]
    ValidationFailed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl From<TransitionError> for ControllerError {
    fn from(e: TransitionError) -> Self {
        let message = e.to_string();
        match e {
            TransitionError::Unauthorized { .. } => ControllerError::Unauthorized(message),
            TransitionError::InvalidState { .. } => ControllerError::InvalidState(message),
            TransitionError::ValidationFailed { .. } => ControllerError::ValidationFailed(message),
        }
    }
}

impl From<RepositoryError> for ControllerError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(m) => ControllerError::NotFound(m),
            RepositoryError::Forbidden(m) => ControllerError::Unauthorized(m),
            RepositoryError::Rejected(m) => ControllerError::ValidationFailed(m),
            other => ControllerError::TransportFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
