// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`ExperimentRepository`].

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use animus_domain::entities::Experiment;
use animus_domain::repositories::{ExperimentRepository, Filter};
use animus_domain::value_objects::{ExperimentId, ProjectId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresExperimentRepository {
    pool: PgPool,
}

impl PostgresExperimentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Experiment, GovernanceError> {
        let experiment_id = ExperimentId::from_uuid(row.try_get("experiment_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(Experiment::from_parts(
            experiment_id,
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
impl ExperimentRepository for PostgresExperimentRepository {
    async fn create(&self, experiment: &Experiment) -> Result<(), GovernanceError> {
        sqlx::query(
            "INSERT INTO experiments (experiment_id, project_id, name, description, metadata, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(experiment.id().as_uuid())
        .bind(experiment.project_id().as_uuid())
        .bind(experiment.name())
        .bind(experiment.description())
        .bind(experiment.metadata())
        .bind(experiment.created_at())
        .bind(experiment.created_by())
        .bind(experiment.integrity_sha256().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, experiment_id: &ExperimentId) -> Result<Option<Experiment>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM experiments WHERE experiment_id = $1")
            .bind(experiment_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<Experiment>, GovernanceError> {
        let rows = sqlx::query("SELECT * FROM experiments WHERE project_id = $1 ORDER BY created_at DESC LIMIT $2")
            .bind(filter.project_id.as_uuid())
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
