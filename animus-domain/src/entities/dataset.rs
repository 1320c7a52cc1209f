// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Dataset entity: a named collection within one Project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{integrity_sha256, DatasetId, ProjectId, Sha256Hex};
use crate::GovernanceError;

#[derive(Debug, Clone, Serialize)]
struct DatasetSemanticFields<'a> {
    dataset_id: &'a DatasetId,
    project_id: &'a ProjectId,
    name: &'a str,
    description: &'a Option<String>,
    metadata: &'a Value,
    created_at: DateTime<Utc>,
    created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    dataset_id: DatasetId,
    project_id: ProjectId,
    name: String,
    description: Option<String>,
    metadata: Value,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl Dataset {
    pub fn create(
        dataset_id: DatasetId,
        project_id: ProjectId,
        name: String,
        description: Option<String>,
        metadata: Value,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        if name.trim().is_empty() {
            return Err(GovernanceError::invalid("dataset name must not be empty"));
        }
        let integrity_sha256 = integrity_sha256(&DatasetSemanticFields {
            dataset_id: &dataset_id,
            project_id: &project_id,
            name: &name,
            description: &description,
            metadata: &metadata,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self { dataset_id, project_id, name, description, metadata, created_at, created_by, integrity_sha256 })
    }

    pub fn id(&self) -> &DatasetId {
        &self.dataset_id
    }

    pub fn project_id(&self) -> &ProjectId {
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

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn integrity_sha256(&self) -> &Sha256Hex {
        &self.integrity_sha256
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        dataset_id: DatasetId,
        project_id: ProjectId,
        name: String,
        description: Option<String>,
        metadata: Value,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self { dataset_id, project_id, name, description, metadata, created_at, created_by, integrity_sha256 }
    }
}
