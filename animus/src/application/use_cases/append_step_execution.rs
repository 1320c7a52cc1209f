// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Append-step-execution use case: the Data Plane's only write path into a
//! Run's step history. Retries submit the same logical attempt; the
//! repository's idempotent append makes a resend a no-op rather than a
//! duplicate row.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, Run, RunKind, StepExecution};
use animus_domain::repositories::{AuditRepository, InsertStepExecutionOutcome};
use animus_domain::value_objects::{Sha256Hex, StepExecutionId};
use animus_domain::GovernanceError;
use chrono::Utc;

use crate::application::commands::AppendStepExecutionCommand;
use crate::infrastructure::repositories::postgres::{PostgresRunRepository, PostgresStepExecutionRepository};

pub struct AppendStepExecutionUseCase {
    runs: Arc<PostgresRunRepository>,
    steps: Arc<PostgresStepExecutionRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl AppendStepExecutionUseCase {
    pub fn new(runs: Arc<PostgresRunRepository>, steps: Arc<PostgresStepExecutionRepository>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { runs, steps, audit }
    }

    pub async fn execute(&self, cmd: AppendStepExecutionCommand) -> Result<StepExecution, GovernanceError> {
        let run = self
            .runs
            .find_by_id(&cmd.run_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("run {} not found", cmd.run_id)))?;
        let spec_hash = spec_hash_for_run(&run);

        let attempt = self.steps.max_attempt(&cmd.run_id, &cmd.step_name).await?.map(|a| a + 1).unwrap_or(1);
        let created_at = Utc::now();
        let step = StepExecution::create(
            StepExecutionId::new(),
            cmd.project_id.clone(),
            cmd.run_id.clone(),
            cmd.step_name.clone(),
            attempt,
            cmd.status,
            cmd.started_at,
            cmd.finished_at,
            cmd.error_code,
            cmd.error_message,
            cmd.result,
            spec_hash,
            cmd.actor.actor.clone(),
            created_at,
        )?;

        let step = match self.steps.append(&step).await? {
            InsertStepExecutionOutcome::Inserted(step) => {
                let event = AuditEvent::new(
                    created_at,
                    cmd.actor.actor,
                    "step_execution.append".into(),
                    "run".into(),
                    cmd.run_id.to_string(),
                    cmd.actor.request_id,
                    cmd.actor.ip,
                    cmd.actor.user_agent,
                    serde_json::json!({ "step_name": cmd.step_name, "attempt": attempt, "status": format!("{:?}", step.status()) }),
                )?;
                self.audit.record(&cmd.project_id, &event).await?;
                step
            }
            InsertStepExecutionOutcome::AlreadyExists(step) => step,
        };

        Ok(step)
    }
}

fn spec_hash_for_run(run: &Run) -> Sha256Hex {
    match run.kind() {
        RunKind::PipelineRun { spec_hash, .. } => spec_hash.clone(),
        RunKind::ExperimentRun { params, .. } => {
            animus_domain::value_objects::to_canonical_bytes(params).map(|bytes| Sha256Hex::of(&bytes)).unwrap_or_else(|_| Sha256Hex::of(b""))
        }
    }
}
