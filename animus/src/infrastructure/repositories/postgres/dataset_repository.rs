// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`DatasetRepository`].

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use animus_domain::entities::Dataset;
use animus_domain::repositories::{DatasetRepository, Filter};
use animus_domain::value_objects::{DatasetId, ProjectId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresDatasetRepository {
    pool: PgPool,
}

impl PostgresDatasetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Dataset, GovernanceError> {
        let dataset_id = DatasetId::from_uuid(row.try_get("dataset_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(Dataset::from_parts(
            dataset_id,
            project_id,
            row.try_get("name").map_err(db_err)?,
            row.try_get("description").map_err(db_err)?,
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

#[async_trait]
impl DatasetRepository for PostgresDatasetRepository {
    async fn create(&self, dataset: &Dataset) -> Result<(), GovernanceError> {
        sqlx::query(
            "INSERT INTO datasets (dataset_id, project_id, name, description, metadata, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(dataset.id().as_uuid())
        .bind(dataset.project_id().as_uuid())
        .bind(dataset.name())
        .bind(dataset.description())
        .bind(dataset.metadata())
        .bind(dataset.created_at())
        .bind(dataset.created_by())
        .bind(dataset.integrity_sha256().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, dataset_id: &DatasetId) -> Result<Option<Dataset>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM datasets WHERE dataset_id = $1").bind(dataset_id.as_uuid()).fetch_optional(&self.pool).await.map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_name(&self, filter: &Filter, name: &str) -> Result<Option<Dataset>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM datasets WHERE project_id = $1 AND name = $2")
            .bind(filter.project_id.as_uuid())
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<Dataset>, GovernanceError> {
        let rows = sqlx::query("SELECT * FROM datasets WHERE project_id = $1 ORDER BY created_at DESC LIMIT $2")
            .bind(filter.project_id.as_uuid())
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
