// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`RunRepository`]. A `Run` is one of two shapes
//! ([`RunKind::ExperimentRun`] or [`RunKind::PipelineRun`]); both are stored
//! in a single `runs` table discriminated by the `kind` column, with the
//! shape-specific fields left null on the row that doesn't use them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use animus_domain::entities::{CodeRef, Run, RunKind, RunStatus};
use animus_domain::repositories::{CreateRunOutcome, Filter, RunRepository};
use animus_domain::value_objects::{ExperimentId, ProjectId, RunId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresRunRepository {
    pool: PgPool,
}

impl PostgresRunRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts an experiment run using `tx`, so a caller can commit it
    /// together with an audit row and lineage edges in one transaction.
    pub async fn create_experiment_run_in_tx(&self, tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, run: &Run) -> Result<(), GovernanceError> {
        insert_experiment_run(&mut *tx, run).await
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Run, GovernanceError> {
        let run_id = RunId::from_uuid(row.try_get("run_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let kind_str: String = row.try_get("kind").map_err(db_err)?;
        let kind = match kind_str.as_str() {
            "experiment_run" => {
                let experiment_id = ExperimentId::from_uuid(row.try_get("experiment_id").map_err(db_err)?).map_err(db_err)?;
                let dataset_version_id = row
                    .try_get::<Option<uuid::Uuid>, _>("dataset_version_id")
                    .map_err(db_err)?
                    .map(animus_domain::value_objects::DatasetVersionId::from_uuid)
                    .transpose()?;
                let code_ref: Option<Json<CodeRef>> = row.try_get("code_ref").map_err(db_err)?;
                let environment_lock: Option<Value> = row.try_get("environment_lock").map_err(db_err)?;
                RunKind::ExperimentRun {
                    experiment_id,
                    dataset_version_id,
                    code_ref: code_ref.map(|Json(c)| c),
                    environment_lock,
                    params: row.try_get("params").map_err(db_err)?,
                    metrics: row.try_get("metrics").map_err(db_err)?,
                    artifacts_prefix: row.try_get("artifacts_prefix").map_err(db_err)?,
                }
            }
            "pipeline_run" => {
                let spec_hash = Sha256Hex::parse(row.try_get::<String, _>("spec_hash").map_err(db_err)?)?;
                RunKind::PipelineRun {
                    idempotency_key: row.try_get("idempotency_key").map_err(db_err)?,
                    pipeline_spec: row.try_get("pipeline_spec").map_err(db_err)?,
                    run_spec: row.try_get("run_spec").map_err(db_err)?,
                    spec_hash,
                }
            }
            other => return Err(GovernanceError::internal(format!("unknown run kind: {other}"))),
        };
        let status_str: String = row.try_get("status").map_err(db_err)?;
        let status = parse_status(&status_str)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(Run::from_parts(
            run_id,
            project_id,
            kind,
            status,
            row.try_get("started_at").map_err(db_err)?,
            row.try_get("ended_at").map_err(db_err)?,
            row.try_get("created_at").map_err(db_err)?,
            row.try_get("created_by").map_err(db_err)?,
            integrity_sha256,
        ))
    }
}

fn db_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

fn status_str(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Queued => "queued",
        RunStatus::Pending => "pending",
        RunStatus::Running => "running",
        RunStatus::Succeeded => "succeeded",
        RunStatus::Failed => "failed",
        RunStatus::Canceled => "canceled",
        RunStatus::Unknown => "unknown",
    }
}

fn parse_status(s: &str) -> Result<RunStatus, GovernanceError> {
    match s {
        "queued" => Ok(RunStatus::Queued),
        "pending" => Ok(RunStatus::Pending),
        "running" => Ok(RunStatus::Running),
        "succeeded" => Ok(RunStatus::Succeeded),
        "failed" => Ok(RunStatus::Failed),
        "canceled" => Ok(RunStatus::Canceled),
        "unknown" => Ok(RunStatus::Unknown),
        other => Err(GovernanceError::internal(format!("unknown run status: {other}"))),
    }
}

async fn insert_experiment_run<'c, E>(executor: E, run: &Run) -> Result<(), GovernanceError>
where
    E: sqlx::PgExecutor<'c>,
{
    let RunKind::ExperimentRun { experiment_id, dataset_version_id, code_ref, environment_lock, params, metrics, artifacts_prefix } = run.kind() else {
        return Err(GovernanceError::invalid("create_experiment_run requires an ExperimentRun"));
    };
    sqlx::query(
        "INSERT INTO runs
         (run_id, project_id, kind, experiment_id, dataset_version_id, code_ref, environment_lock,
          params, metrics, artifacts_prefix, status, started_at, ended_at, created_at, created_by, integrity_sha256)
         VALUES ($1, $2, 'experiment_run', $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
    )
    .bind(run.id().as_uuid())
    .bind(run.project_id().as_uuid())
    .bind(experiment_id.as_uuid())
    .bind(dataset_version_id.as_ref().map(|id| id.as_uuid()))
    .bind(code_ref.as_ref().map(Json))
    .bind(environment_lock)
    .bind(params)
    .bind(metrics)
    .bind(artifacts_prefix)
    .bind(status_str(run.status()))
    .bind(run.started_at())
    .bind(run.ended_at())
    .bind(run.created_at())
    .bind(run.created_by())
    .bind(run.integrity_sha256().as_str())
    .execute(executor)
    .await
    .map_err(db_err)?;
    Ok(())
}

#[async_trait]
impl RunRepository for PostgresRunRepository {
    async fn create_experiment_run(&self, run: &Run) -> Result<(), GovernanceError> {
        insert_experiment_run(&self.pool, run).await
    }

    async fn create_pipeline_run(&self, run: &Run) -> Result<CreateRunOutcome, GovernanceError> {
        let RunKind::PipelineRun { idempotency_key, pipeline_spec, run_spec, spec_hash } = run.kind() else {
            return Err(GovernanceError::invalid("create_pipeline_run requires a PipelineRun"));
        };
        let inserted = sqlx::query(
            "INSERT INTO runs
             (run_id, project_id, kind, idempotency_key, pipeline_spec, run_spec, spec_hash,
              status, started_at, ended_at, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, 'pipeline_run', $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             ON CONFLICT (project_id, idempotency_key) WHERE kind = 'pipeline_run' DO NOTHING",
        )
        .bind(run.id().as_uuid())
        .bind(run.project_id().as_uuid())
        .bind(idempotency_key)
        .bind(pipeline_spec)
        .bind(run_spec)
        .bind(spec_hash.as_str())
        .bind(status_str(run.status()))
        .bind(run.started_at())
        .bind(run.ended_at())
        .bind(run.created_at())
        .bind(run.created_by())
        .bind(run.integrity_sha256().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if inserted.rows_affected() == 1 {
            return Ok(CreateRunOutcome::Created(run.clone()));
        }

        let existing = self
            .find_by_idempotency_key(run.project_id(), idempotency_key)
            .await?
            .ok_or_else(|| GovernanceError::internal("pipeline run insert conflicted but no row found"))?;
        if existing.spec_hash() != Some(spec_hash) {
            return Err(GovernanceError::conflict("idempotency_key reused with a different pipeline spec"));
        }
        Ok(CreateRunOutcome::AlreadyExists(existing))
    }

    async fn find_by_id(&self, run_id: &RunId) -> Result<Option<Run>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM runs WHERE run_id = $1").bind(run_id.as_uuid()).fetch_optional(&self.pool).await.map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_idempotency_key(&self, project_id: &ProjectId, idempotency_key: &str) -> Result<Option<Run>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM runs WHERE project_id = $1 AND kind = 'pipeline_run' AND idempotency_key = $2")
            .bind(project_id.as_uuid())
            .bind(idempotency_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self, filter: &Filter, status: Option<RunStatus>) -> Result<Vec<Run>, GovernanceError> {
        let rows = match status {
            Some(s) => sqlx::query("SELECT * FROM runs WHERE project_id = $1 AND status = $2 ORDER BY created_at DESC LIMIT $3")
                .bind(filter.project_id.as_uuid())
                .bind(status_str(s))
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await,
            None => sqlx::query("SELECT * FROM runs WHERE project_id = $1 ORDER BY created_at DESC LIMIT $2")
                .bind(filter.project_id.as_uuid())
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await,
        }
        .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn update_status(&self, run_id: &RunId, next: RunStatus, ended_at: Option<DateTime<Utc>>) -> Result<Run, GovernanceError> {
        let row = sqlx::query(
            "UPDATE runs SET status = $2, ended_at = COALESCE($3, ended_at) WHERE run_id = $1 AND status NOT IN ('succeeded', 'failed', 'canceled')
             RETURNING *",
        )
        .bind(run_id.as_uuid())
        .bind(status_str(next))
        .bind(ended_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        match row {
            Some(row) => Self::from_row(&row),
            None => self.find_by_id(run_id).await?.ok_or_else(|| GovernanceError::not_found(format!("run {run_id} not found"))),
        }
    }
}
