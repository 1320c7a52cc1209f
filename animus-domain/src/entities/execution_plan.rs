// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! ExecutionPlan entity: an immutable plan pinned to a single Run. At most
//! one plan may exist per `run_id`; resubmitting an identical plan is a
//! no-op, a divergent one is a conflict (enforced by the repository).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{integrity_sha256, ExecutionPlanId, ProjectId, RunId, Sha256Hex};
use crate::GovernanceError;

#[derive(Debug, Clone, Serialize)]
struct ExecutionPlanSemanticFields<'a> {
    plan_id: &'a ExecutionPlanId,
    project_id: &'a ProjectId,
    run_id: &'a RunId,
    plan_json: &'a Value,
    created_at: DateTime<Utc>,
    created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    plan_id: ExecutionPlanId,
    project_id: ProjectId,
    run_id: RunId,
    plan_json: Value,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl ExecutionPlan {
    pub fn create(
        plan_id: ExecutionPlanId,
        project_id: ProjectId,
        run_id: RunId,
        plan_json: Value,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        let integrity_sha256 = integrity_sha256(&ExecutionPlanSemanticFields {
            plan_id: &plan_id,
            project_id: &project_id,
            run_id: &run_id,
            plan_json: &plan_json,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self { plan_id, project_id, run_id, plan_json, created_at, created_by, integrity_sha256 })
    }

    pub fn id(&self) -> &ExecutionPlanId {
        &self.plan_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn plan_json(&self) -> &Value {
        &self.plan_json
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn integrity_sha256(&self) -> &Sha256Hex {
        &self.integrity_sha256
    }

    pub fn from_parts(
        plan_id: ExecutionPlanId,
        project_id: ProjectId,
        run_id: RunId,
        plan_json: Value,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self { plan_id, project_id, run_id, plan_json, created_at, created_by, integrity_sha256 }
    }

    /// Plan-equality as used by the idempotent upsert contract: same
    /// canonical JSON plan for the same run.
    pub fn matches_plan(&self, other_plan_json: &Value) -> bool {
        &self.plan_json == other_plan_json
    }
}
