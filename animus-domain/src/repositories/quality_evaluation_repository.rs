// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for the append-only [`QualityEvaluation`] history of a dataset
//! version, and the read-model that derives current gate status from it.

use async_trait::async_trait;

use crate::entities::QualityEvaluation;
use crate::value_objects::{DatasetVersionId, QualityEvaluationId};
use crate::GovernanceError;

#[async_trait]
pub trait QualityEvaluationRepository: Send + Sync {
    async fn create(&self, evaluation: &QualityEvaluation) -> Result<(), GovernanceError>;

    async fn find_by_id(&self, evaluation_id: &QualityEvaluationId) -> Result<Option<QualityEvaluation>, GovernanceError>;

    /// Most recent evaluation for a version, ordered by `evaluated_at`, used
    /// by the gate-status read model.
    async fn latest_for_version(&self, dataset_version_id: &DatasetVersionId) -> Result<Option<QualityEvaluation>, GovernanceError>;

    async fn list_for_version(&self, dataset_version_id: &DatasetVersionId) -> Result<Vec<QualityEvaluation>, GovernanceError>;
}
