// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Read-only quality-gate status query, the same derivation download uses to
//! decide whether to allow a transfer.

use std::sync::Arc;

use animus_domain::services::gate::{derive_gate_status, GateStatus};
use animus_domain::GovernanceError;

use crate::application::commands::GetGateStatusQuery;
use crate::infrastructure::repositories::postgres::{PostgresDatasetVersionRepository, PostgresQualityEvaluationRepository};

pub struct GetGateStatusUseCase {
    versions: Arc<PostgresDatasetVersionRepository>,
    evaluations: Arc<PostgresQualityEvaluationRepository>,
}

impl GetGateStatusUseCase {
    pub fn new(versions: Arc<PostgresDatasetVersionRepository>, evaluations: Arc<PostgresQualityEvaluationRepository>) -> Self {
        Self { versions, evaluations }
    }

    pub async fn execute(&self, query: GetGateStatusQuery) -> Result<GateStatus, GovernanceError> {
        let version = self
            .versions
            .find_by_id(&query.dataset_version_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("dataset version {} not found", query.dataset_version_id)))?;

        let latest_evaluation = if version.quality_rule_id().is_some() {
            self.evaluations
                .latest_for_version(&query.dataset_version_id)
                .await?
                .map(|e| (*e.id(), e.status(), e.evaluated_at()))
        } else {
            None
        };

        Ok(derive_gate_status(version.quality_rule_id().copied(), latest_evaluation))
    }
}
