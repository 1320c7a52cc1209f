// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`ExecutionPlanRepository`]. At most one plan per
//! run; resubmitting the identical plan is a no-op, a divergent one errors.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use animus_domain::entities::ExecutionPlan;
use animus_domain::repositories::{ExecutionPlanRepository, UpsertPlanOutcome};
use animus_domain::value_objects::{ExecutionPlanId, ProjectId, RunId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresExecutionPlanRepository {
    pool: PgPool,
}

impl PostgresExecutionPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<ExecutionPlan, GovernanceError> {
        let plan_id = ExecutionPlanId::from_uuid(row.try_get("plan_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let run_id = RunId::from_uuid(row.try_get("run_id").map_err(db_err)?).map_err(db_err)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(ExecutionPlan::from_parts(
            plan_id,
            project_id,
            run_id,
            row.try_get("plan_json").map_err(db_err)?,
            row.try_get("created_at").map_err(db_err)?,
            row.try_get("created_by").map_err(db_err)?,
            integrity_sha256,
        ))
    }
}

fn db_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

#[async_trait]
impl ExecutionPlanRepository for PostgresExecutionPlanRepository {
    async fn upsert(&self, plan: &ExecutionPlan) -> Result<UpsertPlanOutcome, GovernanceError> {
        let inserted = sqlx::query(
            "INSERT INTO execution_plans (plan_id, project_id, run_id, plan_json, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (run_id) DO NOTHING",
        )
        .bind(plan.id().as_uuid())
        .bind(plan.project_id().as_uuid())
        .bind(plan.run_id().as_uuid())
        .bind(plan.plan_json())
        .bind(plan.created_at())
        .bind(plan.created_by())
        .bind(plan.integrity_sha256().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if inserted.rows_affected() == 1 {
            return Ok(UpsertPlanOutcome::Created(plan.clone()));
        }

        let existing = self
            .find_by_run_id(plan.run_id())
            .await?
            .ok_or_else(|| GovernanceError::internal("execution plan insert conflicted but no row found"))?;
        if !existing.matches_plan(plan.plan_json()) {
            return Err(GovernanceError::conflict("plan_conflict"));
        }
        Ok(UpsertPlanOutcome::Unchanged(existing))
    }

    async fn find_by_run_id(&self, run_id: &RunId) -> Result<Option<ExecutionPlan>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM execution_plans WHERE run_id = $1").bind(run_id.as_uuid()).fetch_optional(&self.pool).await.map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }
}
