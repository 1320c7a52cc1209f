// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! AuditEvent entity: append-only, no update, no delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::value_objects::RequestId;
use crate::GovernanceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    id: Uuid,
    occurred_at: DateTime<Utc>,
    actor: String,
    action: String,
    resource_type: String,
    resource_id: String,
    request_id: RequestId,
    ip: Option<String>,
    user_agent: Option<String>,
    payload: Value,
}

impl AuditEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        occurred_at: DateTime<Utc>,
        actor: String,
        action: String,
        resource_type: String,
        resource_id: String,
        request_id: RequestId,
        ip: Option<String>,
        user_agent: Option<String>,
        payload: Value,
    ) -> Result<Self, GovernanceError> {
        if action.trim().is_empty() {
            return Err(GovernanceError::invalid("audit action must not be empty"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            occurred_at,
            actor,
            action,
            resource_type,
            resource_id,
            request_id,
            ip,
            user_agent,
            payload,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        occurred_at: DateTime<Utc>,
        actor: String,
        action: String,
        resource_type: String,
        resource_id: String,
        request_id: RequestId,
        ip: Option<String>,
        user_agent: Option<String>,
        payload: Value,
    ) -> Self {
        Self { id, occurred_at, actor, action, resource_type, resource_id, request_id, ip, user_agent, payload }
    }
}
