// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`QualityEvaluationRepository`].

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use animus_domain::entities::{EvaluationStatus, QualityEvaluation};
use animus_domain::repositories::QualityEvaluationRepository;
use animus_domain::value_objects::{DatasetVersionId, ProjectId, QualityEvaluationId, QualityRuleId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresQualityEvaluationRepository {
    pool: PgPool,
}

impl PostgresQualityEvaluationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts `evaluation` using `tx`, so a caller can commit it together
    /// with an audit row in one transaction.
    pub async fn create_in_tx(&self, tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, evaluation: &QualityEvaluation) -> Result<(), GovernanceError> {
        insert_evaluation(&mut *tx, evaluation).await
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<QualityEvaluation, GovernanceError> {
        let evaluation_id = QualityEvaluationId::from_uuid(row.try_get("evaluation_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let dataset_version_id = DatasetVersionId::from_uuid(row.try_get("dataset_version_id").map_err(db_err)?).map_err(db_err)?;
        let rule_id = QualityRuleId::from_uuid(row.try_get("rule_id").map_err(db_err)?).map_err(db_err)?;
        let status_str: String = row.try_get("status").map_err(db_err)?;
        let status = EvaluationStatus::parse_case_insensitive(&status_str)
            .ok_or_else(|| GovernanceError::internal(format!("unknown evaluation status: {status_str}")))?;
        let report_sha256 = Sha256Hex::parse(row.try_get::<String, _>("report_sha256").map_err(db_err)?)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(QualityEvaluation::from_parts(
            evaluation_id,
            project_id,
            dataset_version_id,
            rule_id,
            status,
            row.try_get("evaluated_at").map_err(db_err)?,
            row.try_get("summary").map_err(db_err)?,
            row.try_get("report_object_key").map_err(db_err)?,
            report_sha256,
            row.try_get("report_size_bytes").map_err(db_err)?,
            row.try_get("created_at").map_err(db_err)?,
            row.try_get("created_by").map_err(db_err)?,
            integrity_sha256,
        ))
    }
}

fn db_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

async fn insert_evaluation<'c, E>(executor: E, evaluation: &QualityEvaluation) -> Result<(), GovernanceError>
where
    E: sqlx::PgExecutor<'c>,
{
    sqlx::query(
        "INSERT INTO quality_evaluations
         (evaluation_id, project_id, dataset_version_id, rule_id, status, evaluated_at, summary,
          report_object_key, report_sha256, report_size_bytes, created_at, created_by, integrity_sha256)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(evaluation.id().as_uuid())
    .bind(evaluation.project_id().as_uuid())
    .bind(evaluation.dataset_version_id().as_uuid())
    .bind(evaluation.rule_id().as_uuid())
    .bind(evaluation.status().as_str())
    .bind(evaluation.evaluated_at())
    .bind(evaluation.summary())
    .bind(evaluation.report_object_key())
    .bind(evaluation.report_sha256().as_str())
    .bind(evaluation.report_size_bytes())
    .bind(evaluation.created_at())
    .bind(evaluation.created_by())
    .bind(evaluation.integrity_sha256().as_str())
    .execute(executor)
    .await
    .map_err(db_err)?;
    Ok(())
}

#[async_trait]
impl QualityEvaluationRepository for PostgresQualityEvaluationRepository {
    async fn create(&self, evaluation: &QualityEvaluation) -> Result<(), GovernanceError> {
        insert_evaluation(&self.pool, evaluation).await
    }

    async fn find_by_id(&self, evaluation_id: &QualityEvaluationId) -> Result<Option<QualityEvaluation>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM quality_evaluations WHERE evaluation_id = $1")
            .bind(evaluation_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn latest_for_version(&self, dataset_version_id: &DatasetVersionId) -> Result<Option<QualityEvaluation>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM quality_evaluations WHERE dataset_version_id = $1 ORDER BY evaluated_at DESC LIMIT 1")
            .bind(dataset_version_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_for_version(&self, dataset_version_id: &DatasetVersionId) -> Result<Vec<QualityEvaluation>, GovernanceError> {
        let rows = sqlx::query("SELECT * FROM quality_evaluations WHERE dataset_version_id = $1 ORDER BY evaluated_at DESC")
            .bind(dataset_version_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
