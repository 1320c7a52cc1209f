// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`StepExecutionRepository`]. Retries append a new
//! row; `(run_id, step_name, attempt)` is unique, and a conflicting insert
//! means the caller already recorded this exact attempt.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use animus_domain::entities::{StepExecution, StepStatus};
use animus_domain::repositories::{InsertStepExecutionOutcome, StepExecutionRepository};
use animus_domain::value_objects::{ProjectId, RunId, Sha256Hex, StepExecutionId};
use animus_domain::GovernanceError;

pub struct PostgresStepExecutionRepository {
    pool: PgPool,
}

impl PostgresStepExecutionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<StepExecution, GovernanceError> {
        let step_execution_id = StepExecutionId::from_uuid(row.try_get("step_execution_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let run_id = RunId::from_uuid(row.try_get("run_id").map_err(db_err)?).map_err(db_err)?;
        let status_str: String = row.try_get("status").map_err(db_err)?;
        let status = parse_status(&status_str)?;
        let spec_hash = Sha256Hex::parse(row.try_get::<String, _>("spec_hash").map_err(db_err)?)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(StepExecution::from_parts(
            step_execution_id,
            project_id,
            run_id,
            row.try_get("step_name").map_err(db_err)?,
            row.try_get::<i32, _>("attempt").map_err(db_err)? as u32,
            status,
            row.try_get("started_at").map_err(db_err)?,
            row.try_get("finished_at").map_err(db_err)?,
            row.try_get("error_code").map_err(db_err)?,
            row.try_get("error_message").map_err(db_err)?,
            row.try_get("result").map_err(db_err)?,
            spec_hash,
            row.try_get("created_at").map_err(db_err)?,
            row.try_get("created_by").map_err(db_err)?,
            integrity_sha256,
        ))
    }
}

fn db_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

fn status_str(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Created => "created",
        StepStatus::Planned => "planned",
        StepStatus::Running => "running",
        StepStatus::Succeeded => "succeeded",
        StepStatus::Failed => "failed",
        StepStatus::DryRunRunning => "dry_run_running",
        StepStatus::DryRunSucceeded => "dry_run_succeeded",
        StepStatus::DryRunFailed => "dry_run_failed",
    }
}

fn parse_status(s: &str) -> Result<StepStatus, GovernanceError> {
    match s {
        "created" => Ok(StepStatus::Created),
        "planned" => Ok(StepStatus::Planned),
        "running" => Ok(StepStatus::Running),
        "succeeded" => Ok(StepStatus::Succeeded),
        "failed" => Ok(StepStatus::Failed),
        "dry_run_running" => Ok(StepStatus::DryRunRunning),
        "dry_run_succeeded" => Ok(StepStatus::DryRunSucceeded),
        "dry_run_failed" => Ok(StepStatus::DryRunFailed),
        other => Err(GovernanceError::internal(format!("unknown step status: {other}"))),
    }
}

#[async_trait]
impl StepExecutionRepository for PostgresStepExecutionRepository {
    async fn append(&self, step: &StepExecution) -> Result<InsertStepExecutionOutcome, GovernanceError> {
        let inserted = sqlx::query(
            "INSERT INTO step_executions
             (step_execution_id, project_id, run_id, step_name, attempt, status, started_at, finished_at,
              error_code, error_message, result, spec_hash, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             ON CONFLICT (run_id, step_name, attempt) DO NOTHING",
        )
        .bind(step.id().as_uuid())
        .bind(step.project_id().as_uuid())
        .bind(step.run_id().as_uuid())
        .bind(step.step_name())
        .bind(step.attempt() as i32)
        .bind(status_str(step.status()))
        .bind(step.started_at())
        .bind(step.finished_at())
        .bind(step.error_code())
        .bind(step.error_message())
        .bind(step.result())
        .bind(step.spec_hash().as_str())
        .bind(step.created_at())
        .bind(step.created_by())
        .bind(step.integrity_sha256().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if inserted.rows_affected() == 1 {
            return Ok(InsertStepExecutionOutcome::Inserted(step.clone()));
        }
        let row = sqlx::query("SELECT * FROM step_executions WHERE run_id = $1 AND step_name = $2 AND attempt = $3")
            .bind(step.run_id().as_uuid())
            .bind(step.step_name())
            .bind(step.attempt() as i32)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(InsertStepExecutionOutcome::AlreadyExists(Self::from_row(&row)?))
    }

    async fn find_by_id(&self, step_execution_id: &StepExecutionId) -> Result<Option<StepExecution>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM step_executions WHERE step_execution_id = $1")
            .bind(step_execution_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn max_attempt(&self, run_id: &RunId, step_name: &str) -> Result<Option<u32>, GovernanceError> {
        let max: Option<i32> = sqlx::query_scalar("SELECT MAX(attempt) FROM step_executions WHERE run_id = $1 AND step_name = $2")
            .bind(run_id.as_uuid())
            .bind(step_name)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(max.map(|m| m as u32))
    }

    async fn list_for_run(&self, run_id: &RunId) -> Result<Vec<StepExecution>, GovernanceError> {
        let rows = sqlx::query("SELECT * FROM step_executions WHERE run_id = $1 ORDER BY step_name, attempt")
            .bind(run_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
