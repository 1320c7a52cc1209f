// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Create-pipeline-run use case: idempotent on `(project_id,
//! idempotency_key)`. A resubmission with a matching `spec_hash` returns the
//! original run; a divergent `spec_hash` under the same key is a conflict
//! the repository surfaces.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, Run, RunKind};
use animus_domain::repositories::{AuditRepository, CreateRunOutcome};
use animus_domain::value_objects::{RunId, Sha256Hex};
use animus_domain::GovernanceError;
use chrono::Utc;
use tracing::info;

use crate::application::commands::CreatePipelineRunCommand;
use crate::infrastructure::repositories::postgres::PostgresRunRepository;

pub struct CreatePipelineRunUseCase {
    runs: Arc<PostgresRunRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl CreatePipelineRunUseCase {
    pub fn new(runs: Arc<PostgresRunRepository>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { runs, audit }
    }

    pub async fn execute(&self, cmd: CreatePipelineRunCommand) -> Result<Run, GovernanceError> {
        let spec_bytes = animus_domain::value_objects::to_canonical_bytes(&cmd.pipeline_spec)?;
        let spec_hash = Sha256Hex::of(&spec_bytes);

        let run_id = RunId::new();
        let created_at = Utc::now();
        let kind = RunKind::PipelineRun {
            idempotency_key: cmd.idempotency_key.clone(),
            pipeline_spec: cmd.pipeline_spec,
            run_spec: cmd.run_spec,
            spec_hash,
        };
        let run = Run::create(run_id, cmd.project_id.clone(), kind, None, cmd.actor.actor.clone(), created_at)?;

        let outcome = self.runs.create_pipeline_run(&run).await?;
        let run = match outcome {
            CreateRunOutcome::Created(run) => {
                let event = AuditEvent::new(
                    created_at,
                    cmd.actor.actor,
                    "pipeline_run.create".into(),
                    "run".into(),
                    run.id().to_string(),
                    cmd.actor.request_id,
                    cmd.actor.ip,
                    cmd.actor.user_agent,
                    serde_json::json!({ "idempotency_key": cmd.idempotency_key }),
                )?;
                self.audit.record(&cmd.project_id, &event).await?;
                run
            }
            CreateRunOutcome::AlreadyExists(run) => {
                info!(run_id = %run.id(), "idempotent pipeline run replay");
                run
            }
        };

        Ok(run)
    }
}
