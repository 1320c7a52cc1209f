// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Plan-a-run use case: idempotent upsert of a Run's single ExecutionPlan. A
//! divergent resubmission surfaces as a conflict from the repository rather
//! than silently overwriting the original plan.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, ExecutionPlan};
use animus_domain::repositories::{AuditRepository, UpsertPlanOutcome};
use animus_domain::value_objects::ExecutionPlanId;
use animus_domain::GovernanceError;
use chrono::Utc;

use crate::application::commands::PlanRunCommand;
use crate::infrastructure::repositories::postgres::{PostgresExecutionPlanRepository, PostgresRunRepository};

pub struct PlanRunUseCase {
    plans: Arc<PostgresExecutionPlanRepository>,
    runs: Arc<PostgresRunRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl PlanRunUseCase {
    pub fn new(plans: Arc<PostgresExecutionPlanRepository>, runs: Arc<PostgresRunRepository>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { plans, runs, audit }
    }

    pub async fn execute(&self, cmd: PlanRunCommand) -> Result<ExecutionPlan, GovernanceError> {
        self.runs
            .find_by_id(&cmd.run_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("run {} not found", cmd.run_id)))?;

        let plan_id = ExecutionPlanId::new();
        let created_at = Utc::now();
        let plan = ExecutionPlan::create(plan_id, cmd.project_id.clone(), cmd.run_id.clone(), cmd.plan_json, cmd.actor.actor.clone(), created_at)?;

        match self.plans.upsert(&plan).await? {
            UpsertPlanOutcome::Created(plan) => {
                let event = AuditEvent::new(
                    created_at,
                    cmd.actor.actor,
                    "run.plan_created".into(),
                    "run".into(),
                    cmd.run_id.to_string(),
                    cmd.actor.request_id,
                    cmd.actor.ip,
                    cmd.actor.user_agent,
                    serde_json::json!({ "plan_id": plan.id().to_string() }),
                )?;
                self.audit.record(&cmd.project_id, &event).await?;
                Ok(plan)
            }
            UpsertPlanOutcome::Unchanged(plan) => Ok(plan),
        }
    }
}
