// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Download-dataset-version use case: enforces the quality gate before a
//! single byte of the object leaves the store. Every block and every allow
//! is audited.

use std::sync::Arc;
use std::time::Duration;

use animus_domain::entities::{AuditEvent, EvaluationStatus};
use animus_domain::repositories::{AuditRepository, ObjectStore};
use animus_domain::services::gate::{derive_gate_status, GateDecision};
use animus_domain::GovernanceError;
use chrono::Utc;

use crate::application::commands::DownloadDatasetVersionCommand;
use crate::infrastructure::repositories::postgres::{PostgresDatasetVersionRepository, PostgresQualityEvaluationRepository};
use crate::infrastructure::runtime::{with_deadline, RequestContext};

pub struct DownloadDatasetVersionUseCase {
    versions: Arc<PostgresDatasetVersionRepository>,
    evaluations: Arc<PostgresQualityEvaluationRepository>,
    object_store: Arc<dyn ObjectStore>,
    audit: Arc<dyn AuditRepository>,
    timeout: Duration,
}

impl DownloadDatasetVersionUseCase {
    pub fn new(
        versions: Arc<PostgresDatasetVersionRepository>,
        evaluations: Arc<PostgresQualityEvaluationRepository>,
        object_store: Arc<dyn ObjectStore>,
        audit: Arc<dyn AuditRepository>,
        timeout: Duration,
    ) -> Self {
        Self { versions, evaluations, object_store, audit, timeout }
    }

    pub async fn execute(&self, cmd: DownloadDatasetVersionCommand) -> Result<Vec<u8>, GovernanceError> {
        let version = self
            .versions
            .find_by_id(&cmd.version_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("dataset version {} not found", cmd.version_id)))?;

        let latest_evaluation = if version.quality_rule_id().is_some() {
            self.evaluations
                .latest_for_version(&cmd.version_id)
                .await?
                .map(|e| (*e.id(), e.status(), e.evaluated_at()))
        } else {
            None
        };

        let gate = derive_gate_status(version.quality_rule_id().copied(), latest_evaluation);

        if !gate.allows_download() {
            let reason = match gate.status {
                GateDecision::NoRule => "no_rule",
                GateDecision::NotEvaluated => "not_evaluated",
                GateDecision::Fail | GateDecision::Error => "not_pass",
                GateDecision::Pass => unreachable!("pass implies allows_download"),
            };
            self.block(&cmd, reason, gate.status).await?;
            return Err(match gate.status {
                GateDecision::NoRule => GovernanceError::conflict("quality_rule_not_set"),
                GateDecision::NotEvaluated => GovernanceError::conflict("quality_not_evaluated"),
                _ => GovernanceError::conflict("quality_gate_failed"),
            });
        }

        self.allow(&cmd).await?;

        let deadline = RequestContext::new(cmd.actor.actor.clone(), cmd.project_id, cmd.actor.request_id, self.timeout);
        with_deadline(&deadline, self.object_store.get(version.object_key())).await
    }

    async fn block(&self, cmd: &DownloadDatasetVersionCommand, reason: &str, status: GateDecision) -> Result<(), GovernanceError> {
        let event = AuditEvent::new(
            Utc::now(),
            cmd.actor.actor.clone(),
            "quality_gate.block".into(),
            "dataset_version".into(),
            cmd.version_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip.clone(),
            cmd.actor.user_agent.clone(),
            serde_json::json!({ "reason": reason, "status": format!("{status:?}") }),
        )?;
        self.audit.record(&cmd.project_id, &event).await
    }

    async fn allow(&self, cmd: &DownloadDatasetVersionCommand) -> Result<(), GovernanceError> {
        let event = AuditEvent::new(
            Utc::now(),
            cmd.actor.actor.clone(),
            "quality_gate.allow".into(),
            "dataset_version".into(),
            cmd.version_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip.clone(),
            cmd.actor.user_agent.clone(),
            serde_json::json!({}),
        )?;
        self.audit.record(&cmd.project_id, &event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animus_domain::value_objects::{QualityEvaluationId, QualityRuleId};

    #[test]
    fn blocked_reasons_match_gate_decisions() {
        assert!(!derive_gate_status(None, None).allows_download());
        assert!(!derive_gate_status(Some(QualityRuleId::new()), None).allows_download());
        assert!(derive_gate_status(
            Some(QualityRuleId::new()),
            Some((QualityEvaluationId::new(), EvaluationStatus::Pass, Utc::now()))
        )
        .allows_download());
    }
}
