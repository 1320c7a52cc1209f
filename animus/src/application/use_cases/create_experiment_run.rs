// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Create-experiment-run use case: gates on the bound dataset version, if
//! any, before inserting the Run and its lineage edges. The run row, its
//! lineage edges, and the audit row all commit in one transaction so a
//! successful run is never missing its audit trail.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, EntityRef, LineageEvent, Predicate, Run, RunKind};
use animus_domain::repositories::AuditRepository;
use animus_domain::services::gate::derive_gate_status;
use animus_domain::value_objects::RunId;
use animus_domain::GovernanceError;
use chrono::Utc;

use crate::application::commands::CreateExperimentRunCommand;
use crate::infrastructure::audit::MetricsAuditRepository;
use crate::infrastructure::repositories::postgres::{
    PostgresDatasetVersionRepository, PostgresExperimentRepository, PostgresLineageRepository, PostgresQualityEvaluationRepository, PostgresRunRepository,
};

pub struct CreateExperimentRunUseCase {
    runs: Arc<PostgresRunRepository>,
    experiments: Arc<PostgresExperimentRepository>,
    versions: Arc<PostgresDatasetVersionRepository>,
    evaluations: Arc<PostgresQualityEvaluationRepository>,
    audit: Arc<MetricsAuditRepository>,
}

impl CreateExperimentRunUseCase {
    pub fn new(
        runs: Arc<PostgresRunRepository>,
        experiments: Arc<PostgresExperimentRepository>,
        versions: Arc<PostgresDatasetVersionRepository>,
        evaluations: Arc<PostgresQualityEvaluationRepository>,
        audit: Arc<MetricsAuditRepository>,
    ) -> Self {
        Self { runs, experiments, versions, evaluations, audit }
    }

    pub async fn execute(&self, cmd: CreateExperimentRunCommand) -> Result<Run, GovernanceError> {
        self.experiments
            .find_by_id(&cmd.experiment_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("experiment {} not found", cmd.experiment_id)))?;

        if let Some(version_id) = &cmd.dataset_version_id {
            self.gate_or_block(&cmd, version_id).await?;
        }

        let run_id = RunId::new();
        let created_at = Utc::now();
        let kind = RunKind::ExperimentRun {
            experiment_id: cmd.experiment_id.clone(),
            dataset_version_id: cmd.dataset_version_id.clone(),
            code_ref: cmd.code_ref.clone(),
            environment_lock: cmd.environment_lock.clone(),
            params: cmd.params.clone(),
            metrics: serde_json::json!({}),
            artifacts_prefix: cmd.artifacts_prefix.clone(),
        };
        let run = Run::create(run_id.clone(), cmd.project_id.clone(), kind, Some(created_at), cmd.actor.actor.clone(), created_at)?;

        let edges = self.lineage_edges(&cmd, &run_id)?;

        let event = AuditEvent::new(
            created_at,
            cmd.actor.actor.clone(),
            "experiment_run.create".into(),
            "run".into(),
            run_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip.clone(),
            cmd.actor.user_agent.clone(),
            serde_json::json!({ "experiment_id": cmd.experiment_id.to_string() }),
        )?;

        let mut tx = self.runs.pool().begin().await.map_err(tx_err)?;
        self.runs.create_experiment_run_in_tx(&mut tx, &run).await?;
        for edge in &edges {
            PostgresLineageRepository::insert(&mut *tx, edge).await?;
        }
        self.audit.record_in_tx(&mut tx, &cmd.project_id, &event).await?;
        tx.commit().await.map_err(tx_err)?;

        Ok(run)
    }

    async fn gate_or_block(
        &self,
        cmd: &CreateExperimentRunCommand,
        version_id: &animus_domain::value_objects::DatasetVersionId,
    ) -> Result<(), GovernanceError> {
        let version = self
            .versions
            .find_by_id(version_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("dataset version {version_id} not found")))?;

        let latest_evaluation = if version.quality_rule_id().is_some() {
            self.evaluations.latest_for_version(version_id).await?.map(|e| (*e.id(), e.status(), e.evaluated_at()))
        } else {
            None
        };
        let gate = derive_gate_status(version.quality_rule_id().copied(), latest_evaluation);

        if !gate.allows_download() {
            let event = AuditEvent::new(
                Utc::now(),
                cmd.actor.actor.clone(),
                "quality_gate.block".into(),
                "dataset_version".into(),
                version_id.to_string(),
                cmd.actor.request_id,
                cmd.actor.ip.clone(),
                cmd.actor.user_agent.clone(),
                serde_json::json!({ "status": format!("{:?}", gate.status) }),
            )?;
            self.audit.record(&cmd.project_id, &event).await?;
            return Err(GovernanceError::conflict("quality_gate_failed"));
        }
        Ok(())
    }

    /// Builds the lineage edges a successful run produces. Collected before
    /// the transaction opens so a malformed edge fails the request before
    /// any row is written, rather than mid-transaction.
    fn lineage_edges(&self, cmd: &CreateExperimentRunCommand, run_id: &RunId) -> Result<Vec<LineageEvent>, GovernanceError> {
        let run_ref = EntityRef { entity_type: "run".into(), id: run_id.to_string() };
        let mut edges = Vec::with_capacity(3);

        edges.push(LineageEvent::new(
            Utc::now(),
            cmd.actor.actor.clone(),
            cmd.actor.request_id,
            EntityRef { entity_type: "experiment".into(), id: cmd.experiment_id.to_string() },
            Predicate::HasRun,
            run_ref.clone(),
            serde_json::json!({}),
        )?);

        if let Some(version_id) = &cmd.dataset_version_id {
            edges.push(LineageEvent::new(
                Utc::now(),
                cmd.actor.actor.clone(),
                cmd.actor.request_id,
                EntityRef { entity_type: "dataset_version".into(), id: version_id.to_string() },
                Predicate::UsedBy,
                run_ref.clone(),
                serde_json::json!({}),
            )?);
        }

        if let Some(code_ref) = &cmd.code_ref {
            if let Some(commit) = &code_ref.commit {
                edges.push(LineageEvent::new(
                    Utc::now(),
                    cmd.actor.actor.clone(),
                    cmd.actor.request_id,
                    run_ref,
                    Predicate::BuiltFrom,
                    EntityRef { entity_type: "git_commit".into(), id: commit.clone() },
                    serde_json::json!({}),
                )?);
            }
        }

        Ok(edges)
    }
}

fn tx_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}
