// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Project entity: the root isolation boundary every other entity is owned
//! by.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{integrity_sha256, ProjectId, Sha256Hex};
use crate::GovernanceError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Archived,
}

/// Fields hashed into `integrity_sha256`, kept separate so the hash can be
/// recomputed from a persisted row without constructing a full [`Project`].
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSemanticFields<'a> {
    pub project_id: &'a ProjectId,
    pub name: &'a str,
    pub description: &'a Option<String>,
    pub metadata: &'a Value,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    project_id: ProjectId,
    name: String,
    description: Option<String>,
    metadata: Value,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl Project {
    pub fn create(
        project_id: ProjectId,
        name: String,
        description: Option<String>,
        metadata: Value,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        if name.trim().is_empty() {
            return Err(GovernanceError::invalid("project name must not be empty"));
        }
        let status = ProjectStatus::Active;
        let integrity_sha256 = integrity_sha256(&ProjectSemanticFields {
            project_id: &project_id,
            name: &name,
            description: &description,
            metadata: &metadata,
            status,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self { project_id, name, description, metadata, status, created_at, created_by, integrity_sha256 })
    }

    /// Reconstructs a project from storage without re-deriving the hash,
    /// for use by repository adapters that already verified it on write.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        project_id: ProjectId,
        name: String,
        description: Option<String>,
        metadata: Value,
        status: ProjectStatus,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self { project_id, name, description, metadata, status, created_at, created_by, integrity_sha256 }
    }

    pub fn id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, ProjectStatus::Active)
    }

    pub fn integrity_sha256(&self) -> &Sha256Hex {
        &self.integrity_sha256
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Recomputes the hash over the current fields and compares it to the
    /// stored one; used by the integrity-contract test suite.
    pub fn verify_integrity(&self) -> Result<bool, GovernanceError> {
        let recomputed = integrity_sha256(&ProjectSemanticFields {
            project_id: &self.project_id,
            name: &self.name,
            description: &self.description,
            metadata: &self.metadata,
            status: self.status,
            created_at: self.created_at,
            created_by: &self.created_by,
        })?;
        Ok(recomputed == self.integrity_sha256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        let err = Project::create(ProjectId::new(), "  ".into(), None, Value::Null, "alice".into(), Utc::now());
        assert!(err.is_err());
    }

    #[test]
    fn integrity_hash_is_reproducible() {
        let p = Project::create(ProjectId::new(), "demo".into(), None, Value::Null, "alice".into(), Utc::now()).unwrap();
        assert!(p.verify_integrity().unwrap());
    }
}
