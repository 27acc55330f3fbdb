// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authenticated principal for a controller

use crate::ControllerError;
use hd_adapters::TicketRepository;
use hd_core::{Principal, Role};

/// Who is acting. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    principal: Principal,
}

impl SessionContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    /// Ask the repository who its credentials belong to.
    pub async fn resolve<R: TicketRepository>(repo: &R) -> Result<Self, ControllerError> {
        let principal = repo.current_principal().await?;
        tracing::debug!(
            principal = %principal.id,
            role = %principal.role,
            "session established"
        );
        Ok(Self::new(principal))
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }
}
