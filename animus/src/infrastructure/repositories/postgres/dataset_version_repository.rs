// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`DatasetVersionRepository`]. Ordinal allocation and
//! insert happen inside one transaction so concurrent uploads of the same
//! dataset never race on `(dataset_id, ordinal)`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use animus_domain::entities::DatasetVersion;
use animus_domain::repositories::{DatasetVersionRepository, Filter, NextVersionRequest};
use animus_domain::value_objects::{DatasetId, DatasetVersionId, Ordinal, ProjectId, QualityRuleId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresDatasetVersionRepository {
    pool: PgPool,
}

impl PostgresDatasetVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<DatasetVersion, GovernanceError> {
        let version_id = DatasetVersionId::from_uuid(row.try_get("version_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let dataset_id = DatasetId::from_uuid(row.try_get("dataset_id").map_err(db_err)?).map_err(db_err)?;
        let quality_rule_id = row
            .try_get::<Option<uuid::Uuid>, _>("quality_rule_id")
            .map_err(db_err)?
            .map(QualityRuleId::from_uuid)
            .transpose()?;
        let ordinal = Ordinal::new(row.try_get::<i32, _>("ordinal").map_err(db_err)? as u32)?;
        let content_sha256 = Sha256Hex::parse(row.try_get::<String, _>("content_sha256").map_err(db_err)?)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(DatasetVersion::from_parts(
            version_id,
            project_id,
            dataset_id,
            quality_rule_id,
            ordinal,
            content_sha256,
            row.try_get("object_key").map_err(db_err)?,
            row.try_get("size_bytes").map_err(db_err)?,
            row.try_get("metadata").map_err(db_err)?,
            row.try_get("created_at").map_err(db_err)?,
            row.try_get("created_by").map_err(db_err)?,
            integrity_sha256,
        ))
    }
}

fn db_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

impl PostgresDatasetVersionRepository {
    /// Allocates the next ordinal and inserts `req` using `tx` rather than a
    /// transaction of its own, so a caller can commit it together with an
    /// audit row and lineage edges written against the same `tx`. Does not
    /// commit or roll back; that is the caller's responsibility.
    pub async fn create_next_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        req: NextVersionRequest,
    ) -> Result<DatasetVersion, GovernanceError> {
        let project_id: uuid::Uuid = sqlx::query_scalar("SELECT project_id FROM datasets WHERE dataset_id = $1 FOR UPDATE")
            .bind(req.dataset_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| GovernanceError::not_found(format!("dataset {} not found", req.dataset_id)))?;

        let duplicate: Option<uuid::Uuid> =
            sqlx::query_scalar("SELECT version_id FROM dataset_versions WHERE dataset_id = $1 AND content_sha256 = $2")
                .bind(req.dataset_id.as_uuid())
                .bind(req.content_sha256.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
        if duplicate.is_some() {
            return Err(GovernanceError::conflict("duplicate_content"));
        }

        let next_ordinal: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(ordinal), 0) + 1 FROM dataset_versions WHERE dataset_id = $1")
            .bind(req.dataset_id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;

        let created_at = chrono::Utc::now();
        let version = DatasetVersion::create(
            req.version_id,
            ProjectId::from_uuid(project_id).map_err(db_err)?,
            req.dataset_id,
            req.quality_rule_id,
            Ordinal::new(next_ordinal as u32)?,
            req.content_sha256,
            req.object_key,
            req.size_bytes,
            req.metadata,
            req.created_by,
            created_at,
        )?;

        sqlx::query(
            "INSERT INTO dataset_versions
             (version_id, project_id, dataset_id, quality_rule_id, ordinal, content_sha256, object_key,
              size_bytes, metadata, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(version.id().as_uuid())
        .bind(version.project_id().as_uuid())
        .bind(version.dataset_id().as_uuid())
        .bind(version.quality_rule_id().map(|id| id.as_uuid()))
        .bind(version.ordinal().value() as i32)
        .bind(version.content_sha256().as_str())
        .bind(version.object_key())
        .bind(version.size_bytes())
        .bind(version.metadata())
        .bind(version.created_at())
        .bind(version.created_by())
        .bind(version.integrity_sha256().as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        Ok(version)
    }
}

#[async_trait]
impl DatasetVersionRepository for PostgresDatasetVersionRepository {
    async fn create_next(&self, req: NextVersionRequest) -> Result<DatasetVersion, GovernanceError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let version = self.create_next_in_tx(&mut tx, req).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(version)
    }

    async fn find_by_id(&self, version_id: &DatasetVersionId) -> Result<Option<DatasetVersion>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM dataset_versions WHERE version_id = $1").bind(version_id.as_uuid()).fetch_optional(&self.pool).await.map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_ordinal(&self, dataset_id: &DatasetId, ordinal: Ordinal) -> Result<Option<DatasetVersion>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM dataset_versions WHERE dataset_id = $1 AND ordinal = $2")
            .bind(dataset_id.as_uuid())
            .bind(ordinal.value() as i32)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_content_sha256(&self, dataset_id: &DatasetId, content_sha256: &Sha256Hex) -> Result<Option<DatasetVersion>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM dataset_versions WHERE dataset_id = $1 AND content_sha256 = $2")
            .bind(dataset_id.as_uuid())
            .bind(content_sha256.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn latest(&self, dataset_id: &DatasetId) -> Result<Option<DatasetVersion>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM dataset_versions WHERE dataset_id = $1 ORDER BY ordinal DESC LIMIT 1")
            .bind(dataset_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self, filter: &Filter, dataset_id: &DatasetId) -> Result<Vec<DatasetVersion>, GovernanceError> {
        let rows = sqlx::query("SELECT * FROM dataset_versions WHERE project_id = $1 AND dataset_id = $2 ORDER BY ordinal DESC LIMIT $3")
            .bind(filter.project_id.as_uuid())
            .bind(dataset_id.as_uuid())
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
