// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! DatasetVersion entity: an immutable, content-addressed snapshot of a
//! dataset.
//!
//! Uniqueness on `(dataset_id, ordinal)` and `(dataset_id, content_sha256)`
//! is enforced at the store; this entity only validates what it can see
//! locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{
    integrity_sha256, DatasetId, DatasetVersionId, Ordinal, ProjectId, QualityRuleId, Sha256Hex,
};
use crate::GovernanceError;

#[derive(Debug, Clone, Serialize)]
struct DatasetVersionSemanticFields<'a> {
    version_id: &'a DatasetVersionId,
    project_id: &'a ProjectId,
    dataset_id: &'a DatasetId,
    quality_rule_id: &'a Option<QualityRuleId>,
    ordinal: Ordinal,
    content_sha256: &'a Sha256Hex,
    object_key: &'a str,
    size_bytes: i64,
    metadata: &'a Value,
    created_at: DateTime<Utc>,
    created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetVersion {
    version_id: DatasetVersionId,
    project_id: ProjectId,
    dataset_id: DatasetId,
    quality_rule_id: Option<QualityRuleId>,
    ordinal: Ordinal,
    content_sha256: Sha256Hex,
    object_key: String,
    size_bytes: i64,
    metadata: Value,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl DatasetVersion {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        version_id: DatasetVersionId,
        project_id: ProjectId,
        dataset_id: DatasetId,
        quality_rule_id: Option<QualityRuleId>,
        ordinal: Ordinal,
        content_sha256: Sha256Hex,
        object_key: String,
        size_bytes: i64,
        metadata: Value,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        if size_bytes < 0 {
            return Err(GovernanceError::invalid("size_bytes cannot be negative"));
        }
        if object_key.trim().is_empty() {
            return Err(GovernanceError::invalid("object_key must not be empty"));
        }
        let integrity_sha256 = integrity_sha256(&DatasetVersionSemanticFields {
            version_id: &version_id,
            project_id: &project_id,
            dataset_id: &dataset_id,
            quality_rule_id: &quality_rule_id,
            ordinal,
            content_sha256: &content_sha256,
            object_key: &object_key,
            size_bytes,
            metadata: &metadata,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self {
            version_id,
            project_id,
            dataset_id,
            quality_rule_id,
            ordinal,
            content_sha256,
            object_key,
            size_bytes,
            metadata,
            created_at,
            created_by,
            integrity_sha256,
        })
    }

    pub fn id(&self) -> &DatasetVersionId {
        &self.version_id
    }

    pub fn dataset_id(&self) -> &DatasetId {
        &self.dataset_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn quality_rule_id(&self) -> Option<&QualityRuleId> {
        self.quality_rule_id.as_ref()
    }

    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    pub fn content_sha256(&self) -> &Sha256Hex {
        &self.content_sha256
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    pub fn size_bytes(&self) -> i64 {
        self.size_bytes
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
        version_id: DatasetVersionId,
        project_id: ProjectId,
        dataset_id: DatasetId,
        quality_rule_id: Option<QualityRuleId>,
        ordinal: Ordinal,
        content_sha256: Sha256Hex,
        object_key: String,
        size_bytes: i64,
        metadata: Value,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self {
            version_id,
            project_id,
            dataset_id,
            quality_rule_id,
            ordinal,
            content_sha256,
            object_key,
            size_bytes,
            metadata,
            created_at,
            created_by,
            integrity_sha256,
        }
    }
}

/// Derives the object key DatasetVersion uploads are stored under.
pub fn object_key_for(dataset_id: &DatasetId, version_id: &DatasetVersionId, sanitized_filename: &str) -> String {
    format!("{dataset_id}/{version_id}/{sanitized_filename}")
}
