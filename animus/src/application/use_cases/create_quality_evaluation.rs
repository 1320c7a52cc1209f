// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Create-quality-evaluation use case: restreams a dataset version's object,
//! evaluates its bound rule spec, persists the report to the object store,
//! then inserts the Evaluation row. A DB failure after the report put is
//! compensated by removing the report object. The evaluation row and its
//! audit row commit in one transaction so a successful evaluation is never
//! missing its audit trail.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, QualityEvaluation};
use animus_domain::repositories::ObjectStore;
use animus_domain::services::quality_evaluator::{evaluate, report_to_canonical_bytes, CheckStatus, EvaluationContext};
use animus_domain::value_objects::{QualityEvaluationId, Sha256Hex};
use animus_domain::GovernanceError;
use chrono::Utc;
use tracing::warn;

use crate::application::commands::CreateQualityEvaluationCommand;
use crate::infrastructure::audit::MetricsAuditRepository;
use crate::infrastructure::repositories::postgres::{
    PostgresDatasetVersionRepository, PostgresQualityEvaluationRepository, PostgresQualityRuleRepository,
};

pub struct CreateQualityEvaluationUseCase {
    versions: Arc<PostgresDatasetVersionRepository>,
    rules: Arc<PostgresQualityRuleRepository>,
    evaluations: Arc<PostgresQualityEvaluationRepository>,
    object_store: Arc<dyn ObjectStore>,
    audit: Arc<MetricsAuditRepository>,
}

impl CreateQualityEvaluationUseCase {
    pub fn new(
        versions: Arc<PostgresDatasetVersionRepository>,
        rules: Arc<PostgresQualityRuleRepository>,
        evaluations: Arc<PostgresQualityEvaluationRepository>,
        object_store: Arc<dyn ObjectStore>,
        audit: Arc<MetricsAuditRepository>,
    ) -> Self {
        Self { versions, rules, evaluations, object_store, audit }
    }

    pub async fn execute(&self, cmd: CreateQualityEvaluationCommand) -> Result<QualityEvaluation, GovernanceError> {
        let version = self
            .versions
            .find_by_id(&cmd.dataset_version_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("dataset version {} not found", cmd.dataset_version_id)))?;
        let rule = self
            .rules
            .find_by_id(&cmd.rule_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("quality rule {} not found", cmd.rule_id)))?;

        let bytes = self.object_store.get(version.object_key()).await?;
        let streamed_content_sha256 = Sha256Hex::of(&bytes);
        let csv_first_line = first_line(&bytes);

        let filename = version.metadata().get("filename").and_then(|v| v.as_str()).unwrap_or("").to_string();
        let content_type =
            version.metadata().get("content_type").and_then(|v| v.as_str()).unwrap_or("application/octet-stream").to_string();

        let ctx = EvaluationContext {
            size_bytes: version.size_bytes() as u64,
            content_type,
            filename,
            metadata: version.metadata().clone(),
            csv_first_line,
            recorded_content_sha256: version.content_sha256().clone(),
            streamed_content_sha256: Some(streamed_content_sha256),
        };
        let report = evaluate(rule.spec(), &ctx);

        let evaluation_id = QualityEvaluationId::new();
        let report_bytes = report_to_canonical_bytes(&report)?;
        let report_sha256 = Sha256Hex::of(&report_bytes);
        let report_object_key = format!("quality/dataset-versions/{}/{}.json", cmd.dataset_version_id, evaluation_id);
        let report_stat = self.object_store.put(&report_object_key, &report_bytes).await?;

        match self.finish(&cmd, evaluation_id, &report, &report_object_key, &report_sha256, report_stat.size_bytes).await {
            Ok(evaluation) => Ok(evaluation),
            Err(err) => {
                if let Err(cleanup_err) = self.object_store.remove(&report_object_key).await {
                    warn!(object_key = %report_object_key, error = %cleanup_err, "failed to compensate report put after evaluation failure");
                }
                Err(err)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn finish(
        &self,
        cmd: &CreateQualityEvaluationCommand,
        evaluation_id: QualityEvaluationId,
        report: &animus_domain::services::quality_evaluator::EvaluationReport,
        report_object_key: &str,
        report_sha256: &Sha256Hex,
        report_size_bytes: i64,
    ) -> Result<QualityEvaluation, GovernanceError> {
        let status = match report.status {
            CheckStatus::Pass => animus_domain::entities::EvaluationStatus::Pass,
            CheckStatus::Fail => animus_domain::entities::EvaluationStatus::Fail,
            CheckStatus::Error => animus_domain::entities::EvaluationStatus::Error,
        };
        let evaluated_at = Utc::now();
        let evaluation = QualityEvaluation::create(
            evaluation_id,
            cmd.project_id.clone(),
            cmd.dataset_version_id.clone(),
            cmd.rule_id.clone(),
            status,
            evaluated_at,
            serde_json::to_value(report).map_err(GovernanceError::from)?,
            report_object_key.to_string(),
            report_sha256.clone(),
            report_size_bytes,
            cmd.actor.actor.clone(),
            evaluated_at,
        )?;
        let event = AuditEvent::new(
            evaluated_at,
            cmd.actor.actor.clone(),
            "quality_evaluation.create".into(),
            "quality_evaluation".into(),
            evaluation_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip.clone(),
            cmd.actor.user_agent.clone(),
            serde_json::json!({ "status": status.as_str() }),
        )?;

        let mut tx = self.evaluations.pool().begin().await.map_err(tx_err)?;
        self.evaluations.create_in_tx(&mut tx, &evaluation).await?;
        self.audit.record_in_tx(&mut tx, &cmd.project_id, &event).await?;
        tx.commit().await.map_err(tx_err)?;

        Ok(evaluation)
    }
}

fn tx_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

fn first_line(bytes: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(bytes).ok()?;
    text.lines().next().map(|line| line.to_string())
}
