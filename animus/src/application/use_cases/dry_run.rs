// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Dry-run use case: records a `dry_run_succeeded` StepExecution attempt per
//! requested step without invoking any external executor.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, Run, RunKind, StepExecution, StepStatus};
use animus_domain::repositories::{AuditRepository, InsertStepExecutionOutcome};
use animus_domain::value_objects::{Sha256Hex, StepExecutionId};
use animus_domain::GovernanceError;
use chrono::Utc;

use crate::application::commands::DryRunCommand;
use crate::infrastructure::repositories::postgres::{PostgresRunRepository, PostgresStepExecutionRepository};

pub struct DryRunUseCase {
    runs: Arc<PostgresRunRepository>,
    steps: Arc<PostgresStepExecutionRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl DryRunUseCase {
    pub fn new(runs: Arc<PostgresRunRepository>, steps: Arc<PostgresStepExecutionRepository>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { runs, steps, audit }
    }

    pub async fn execute(&self, cmd: DryRunCommand) -> Result<Vec<StepExecution>, GovernanceError> {
        let run = self
            .runs
            .find_by_id(&cmd.run_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("run {} not found", cmd.run_id)))?;
        let spec_hash = spec_hash_for_run(&run);

        let mut results = Vec::with_capacity(cmd.step_names.len());
        for step_name in &cmd.step_names {
            let attempt = self.steps.max_attempt(&cmd.run_id, step_name).await?.map(|a| a + 1).unwrap_or(1);
            let started_at = Utc::now();
            let step = StepExecution::create(
                StepExecutionId::new(),
                cmd.project_id.clone(),
                cmd.run_id.clone(),
                step_name.clone(),
                attempt,
                StepStatus::DryRunSucceeded,
                Some(started_at),
                Some(Utc::now()),
                None,
                None,
                serde_json::json!({ "mode": "dry_run" }),
                spec_hash.clone(),
                cmd.actor.actor.clone(),
                started_at,
            )?;

            let step = match self.steps.append(&step).await? {
                InsertStepExecutionOutcome::Inserted(step) => step,
                InsertStepExecutionOutcome::AlreadyExists(step) => step,
            };
            results.push(step);
        }

        let event = AuditEvent::new(
            Utc::now(),
            cmd.actor.actor,
            "run.dry_run".into(),
            "run".into(),
            cmd.run_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip,
            cmd.actor.user_agent,
            serde_json::json!({ "step_names": cmd.step_names }),
        )?;
        self.audit.record(&cmd.project_id, &event).await?;

        Ok(results)
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
