// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`ArtifactRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use animus_domain::entities::Artifact;
use animus_domain::repositories::{ArtifactRepository, Filter};
use animus_domain::value_objects::{ArtifactId, ProjectId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresArtifactRepository {
    pool: PgPool,
}

impl PostgresArtifactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Artifact, GovernanceError> {
        let artifact_id = ArtifactId::from_uuid(row.try_get("artifact_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let sha256 = Sha256Hex::parse(row.try_get::<String, _>("sha256").map_err(db_err)?)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(Artifact::from_parts(
            artifact_id,
            project_id,
            row.try_get("kind").map_err(db_err)?,
            row.try_get("object_key").map_err(db_err)?,
            row.try_get("content_type").map_err(db_err)?,
            row.try_get("size_bytes").map_err(db_err)?,
            sha256,
            row.try_get("retention_until").map_err(db_err)?,
            row.try_get("legal_hold").map_err(db_err)?,
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
impl ArtifactRepository for PostgresArtifactRepository {
    async fn create(&self, artifact: &Artifact) -> Result<(), GovernanceError> {
        sqlx::query(
            "INSERT INTO artifacts
             (artifact_id, project_id, kind, object_key, content_type, size_bytes, sha256,
              retention_until, legal_hold, metadata, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(artifact.id().as_uuid())
        .bind(artifact.project_id().as_uuid())
        .bind(artifact.kind())
        .bind(artifact.object_key())
        .bind(artifact.content_type())
        .bind(artifact.size_bytes())
        .bind(artifact.sha256().as_str())
        .bind(artifact.retention_until())
        .bind(artifact.legal_hold())
        .bind(artifact.metadata())
        .bind(artifact.created_at())
        .bind(artifact.created_by())
        .bind(artifact.integrity_sha256().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, artifact_id: &ArtifactId) -> Result<Option<Artifact>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM artifacts WHERE artifact_id = $1").bind(artifact_id.as_uuid()).fetch_optional(&self.pool).await.map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<Artifact>, GovernanceError> {
        let rows = sqlx::query("SELECT * FROM artifacts WHERE project_id = $1 ORDER BY created_at DESC LIMIT $2")
            .bind(filter.project_id.as_uuid())
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn update_retention(&self, artifact_id: &ArtifactId, retention_until: Option<DateTime<Utc>>, legal_hold: bool) -> Result<Artifact, GovernanceError> {
        let row = sqlx::query("UPDATE artifacts SET retention_until = $2, legal_hold = $3 WHERE artifact_id = $1 RETURNING *")
            .bind(artifact_id.as_uuid())
            .bind(retention_until)
            .bind(legal_hold)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        match row {
            Some(row) => Self::from_row(&row),
            None => Err(GovernanceError::not_found(format!("artifact {artifact_id} not found"))),
        }
    }
}
