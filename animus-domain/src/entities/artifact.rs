// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Artifact entity: immutable scope (`project_id`, `object_key`), mutable
//! retention (`retention_until`, `legal_hold`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{integrity_sha256, ArtifactId, ProjectId, Sha256Hex};
use crate::GovernanceError;

#[derive(Debug, Clone, Serialize)]
struct ArtifactSemanticFields<'a> {
    artifact_id: &'a ArtifactId,
    project_id: &'a ProjectId,
    kind: &'a str,
    object_key: &'a str,
    content_type: &'a str,
    size_bytes: i64,
    sha256: &'a Sha256Hex,
    created_at: DateTime<Utc>,
    created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    artifact_id: ArtifactId,
    project_id: ProjectId,
    kind: String,
    object_key: String,
    content_type: String,
    size_bytes: i64,
    sha256: Sha256Hex,
    retention_until: Option<DateTime<Utc>>,
    legal_hold: bool,
    metadata: Value,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl Artifact {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        artifact_id: ArtifactId,
        project_id: ProjectId,
        kind: String,
        object_key: String,
        content_type: String,
        size_bytes: i64,
        sha256: Sha256Hex,
        retention_until: Option<DateTime<Utc>>,
        legal_hold: bool,
        metadata: Value,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        if size_bytes < 0 {
            return Err(GovernanceError::invalid("size_bytes cannot be negative"));
        }
        let integrity_sha256 = integrity_sha256(&ArtifactSemanticFields {
            artifact_id: &artifact_id,
            project_id: &project_id,
            kind: &kind,
            object_key: &object_key,
            content_type: &content_type,
            size_bytes,
            sha256: &sha256,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self {
            artifact_id,
            project_id,
            kind,
            object_key,
            content_type,
            size_bytes,
            sha256,
            retention_until,
            legal_hold,
            metadata,
            created_at,
            created_by,
            integrity_sha256,
        })
    }

    pub fn id(&self) -> &ArtifactId {
        &self.artifact_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size_bytes(&self) -> i64 {
        self.size_bytes
    }

    pub fn sha256(&self) -> &Sha256Hex {
        &self.sha256
    }

    pub fn retention_until(&self) -> Option<DateTime<Utc>> {
        self.retention_until
    }

    pub fn legal_hold(&self) -> bool {
        self.legal_hold
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Retention and legal hold are the one mutable surface on an otherwise
    /// immutable entity; scope (`project_id`, `object_key`) never changes.
    pub fn set_retention(&mut self, retention_until: Option<DateTime<Utc>>, legal_hold: bool) {
        self.retention_until = retention_until;
        self.legal_hold = legal_hold;
    }

    pub fn integrity_sha256(&self) -> &Sha256Hex {
        &self.integrity_sha256
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        artifact_id: ArtifactId,
        project_id: ProjectId,
        kind: String,
        object_key: String,
        content_type: String,
        size_bytes: i64,
        sha256: Sha256Hex,
        retention_until: Option<DateTime<Utc>>,
        legal_hold: bool,
        metadata: Value,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self {
            artifact_id,
            project_id,
            kind,
            object_key,
            content_type,
            size_bytes,
            sha256,
            retention_until,
            legal_hold,
            metadata,
            created_at,
            created_by,
            integrity_sha256,
        }
    }
}

/// Derives the object key an Artifact is stored under.
pub fn object_key_for(project_id: &ProjectId, artifact_id: &ArtifactId) -> String {
    format!("{project_id}/artifacts/{artifact_id}")
}
