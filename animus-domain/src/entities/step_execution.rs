// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! StepExecution entity: append-only per-attempt history of a Run's steps.
//! Retries never mutate prior attempts; they insert a new row with
//! `attempt = max + 1`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{integrity_sha256, ProjectId, RunId, Sha256Hex, StepExecutionId};
use crate::GovernanceError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Created,
    Planned,
    Running,
    Succeeded,
    Failed,
    DryRunRunning,
    DryRunSucceeded,
    DryRunFailed,
}

#[derive(Debug, Clone, Serialize)]
struct StepExecutionSemanticFields<'a> {
    step_execution_id: &'a StepExecutionId,
    project_id: &'a ProjectId,
    run_id: &'a RunId,
    step_name: &'a str,
    attempt: u32,
    status: StepStatus,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    error_code: &'a Option<String>,
    error_message: &'a Option<String>,
    result: &'a Value,
    spec_hash: &'a Sha256Hex,
    created_at: DateTime<Utc>,
    created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepExecution {
    step_execution_id: StepExecutionId,
    project_id: ProjectId,
    run_id: RunId,
    step_name: String,
    attempt: u32,
    status: StepStatus,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    error_code: Option<String>,
    error_message: Option<String>,
    result: Value,
    spec_hash: Sha256Hex,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl StepExecution {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        step_execution_id: StepExecutionId,
        project_id: ProjectId,
        run_id: RunId,
        step_name: String,
        attempt: u32,
        status: StepStatus,
        started_at: Option<DateTime<Utc>>,
        finished_at: Option<DateTime<Utc>>,
        error_code: Option<String>,
        error_message: Option<String>,
        result: Value,
        spec_hash: Sha256Hex,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        if attempt == 0 {
            return Err(GovernanceError::invalid("attempt must be >= 1"));
        }
        if step_name.trim().is_empty() {
            return Err(GovernanceError::invalid("step_name must not be empty"));
        }
        let integrity_sha256 = integrity_sha256(&StepExecutionSemanticFields {
            step_execution_id: &step_execution_id,
            project_id: &project_id,
            run_id: &run_id,
            step_name: &step_name,
            attempt,
            status,
            started_at,
            finished_at,
            error_code: &error_code,
            error_message: &error_message,
            result: &result,
            spec_hash: &spec_hash,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self {
            step_execution_id,
            project_id,
            run_id,
            step_name,
            attempt,
            status,
            started_at,
            finished_at,
            error_code,
            error_message,
            result,
            spec_hash,
            created_at,
            created_by,
            integrity_sha256,
        })
    }

    pub fn id(&self) -> &StepExecutionId {
        &self.step_execution_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn result(&self) -> &Value {
        &self.result
    }

    pub fn spec_hash(&self) -> &Sha256Hex {
        &self.spec_hash
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

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        step_execution_id: StepExecutionId,
        project_id: ProjectId,
        run_id: RunId,
        step_name: String,
        attempt: u32,
        status: StepStatus,
        started_at: Option<DateTime<Utc>>,
        finished_at: Option<DateTime<Utc>>,
        error_code: Option<String>,
        error_message: Option<String>,
        result: Value,
        spec_hash: Sha256Hex,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self {
            step_execution_id,
            project_id,
            run_id,
            step_name,
            attempt,
            status,
            started_at,
            finished_at,
            error_code,
            error_message,
            result,
            spec_hash,
            created_at,
            created_by,
            integrity_sha256,
        }
    }
}
