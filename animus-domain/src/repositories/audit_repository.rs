// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for the append-only [`AuditEvent`] trail. No update, no delete.

use async_trait::async_trait;

use crate::entities::AuditEvent;
use crate::value_objects::ProjectId;
use crate::GovernanceError;

#[derive(Debug, Clone, Default)]
pub struct AuditListFilter {
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub actor: Option<String>,
    pub limit: i64,
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, project_id: &ProjectId, event: &AuditEvent) -> Result<(), GovernanceError>;

    async fn list(&self, project_id: &ProjectId, filter: &AuditListFilter) -> Result<Vec<AuditEvent>, GovernanceError>;
}
