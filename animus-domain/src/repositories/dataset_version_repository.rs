// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for the append-only, content-addressed [`DatasetVersion`] history of
//! a dataset.

use async_trait::async_trait;

use crate::entities::DatasetVersion;
use crate::repositories::Filter;
use crate::value_objects::{DatasetId, DatasetVersionId, Ordinal, QualityRuleId, Sha256Hex};
use crate::GovernanceError;

#[async_trait]
pub trait DatasetVersionRepository: Send + Sync {
    /// Allocates `COALESCE(MAX(ordinal), 0) + 1` for `dataset_id` and
    /// inserts `version` within the same transaction, so concurrent uploads
    /// never observe or persist duplicate ordinals.
    async fn create_next(&self, version_factory: NextVersionRequest) -> Result<DatasetVersion, GovernanceError>;

    async fn find_by_id(&self, version_id: &DatasetVersionId) -> Result<Option<DatasetVersion>, GovernanceError>;

    async fn find_by_ordinal(&self, dataset_id: &DatasetId, ordinal: Ordinal) -> Result<Option<DatasetVersion>, GovernanceError>;

    async fn find_by_content_sha256(&self, dataset_id: &DatasetId, content_sha256: &Sha256Hex) -> Result<Option<DatasetVersion>, GovernanceError>;

    async fn latest(&self, dataset_id: &DatasetId) -> Result<Option<DatasetVersion>, GovernanceError>;

    async fn list(&self, filter: &Filter, dataset_id: &DatasetId) -> Result<Vec<DatasetVersion>, GovernanceError>;
}

/// Everything needed to mint a version except the ordinal, which the
/// repository allocates atomically.
pub struct NextVersionRequest {
    pub version_id: DatasetVersionId,
    pub dataset_id: DatasetId,
    pub quality_rule_id: Option<QualityRuleId>,
    pub content_sha256: Sha256Hex,
    pub object_key: String,
    pub size_bytes: i64,
    pub metadata: serde_json::Value,
    pub created_by: String,
}
