// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! LineageEvent entity: an append-only directed edge `(subject, predicate,
//! object)` forming the reproducibility graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::value_objects::{integrity_sha256, RequestId, Sha256Hex};
use crate::GovernanceError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    HasVersion,
    HasRun,
    UsedBy,
    BuiltFrom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
struct LineageEventSemanticFields<'a> {
    id: Uuid,
    occurred_at: DateTime<Utc>,
    actor: &'a str,
    request_id: &'a RequestId,
    subject: &'a EntityRef,
    predicate: Predicate,
    object: &'a EntityRef,
    metadata: &'a Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageEvent {
    id: Uuid,
    occurred_at: DateTime<Utc>,
    actor: String,
    request_id: RequestId,
    subject: EntityRef,
    predicate: Predicate,
    object: EntityRef,
    metadata: Value,
    integrity_sha256: Sha256Hex,
}

impl LineageEvent {
    pub fn new(
        occurred_at: DateTime<Utc>,
        actor: String,
        request_id: RequestId,
        subject: EntityRef,
        predicate: Predicate,
        object: EntityRef,
        metadata: Value,
    ) -> Result<Self, GovernanceError> {
        let id = Uuid::new_v4();
        let integrity_sha256 = integrity_sha256(&LineageEventSemanticFields {
            id,
            occurred_at,
            actor: &actor,
            request_id: &request_id,
            subject: &subject,
            predicate,
            object: &object,
            metadata: &metadata,
        })?;
        Ok(Self { id, occurred_at, actor, request_id, subject, predicate, object, metadata, integrity_sha256 })
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

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn subject(&self) -> &EntityRef {
        &self.subject
    }

    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    pub fn object(&self) -> &EntityRef {
        &self.object
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn integrity_sha256(&self) -> &Sha256Hex {
        &self.integrity_sha256
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        occurred_at: DateTime<Utc>,
        actor: String,
        request_id: RequestId,
        subject: EntityRef,
        predicate: Predicate,
        object: EntityRef,
        metadata: Value,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self { id, occurred_at, actor, request_id, subject, predicate, object, metadata, integrity_sha256 }
    }
}
