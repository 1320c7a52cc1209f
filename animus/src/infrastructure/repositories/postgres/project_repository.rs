// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`ProjectRepository`].

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use animus_domain::entities::{Project, ProjectStatus};
use animus_domain::repositories::{ProjectListFilter, ProjectRepository};
use animus_domain::value_objects::{ProjectId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Project, GovernanceError> {
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let status_str: String = row.try_get("status").map_err(db_err)?;
        let status = match status_str.as_str() {
            "active" => ProjectStatus::Active,
            "archived" => ProjectStatus::Archived,
            other => return Err(GovernanceError::internal(format!("unknown project status: {other}"))),
        };
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(Project::from_parts(
            project_id,
            row.try_get("name").map_err(db_err)?,
            row.try_get("description").map_err(db_err)?,
            row.try_get("metadata").map_err(db_err)?,
            status,
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
impl ProjectRepository for PostgresProjectRepository {
    async fn create(&self, project: &Project) -> Result<(), GovernanceError> {
        sqlx::query(
            "INSERT INTO projects (project_id, name, description, metadata, status, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, $3, $4, 'active', $5, $6, $7)",
        )
        .bind(project.id().as_uuid())
        .bind(project.name())
        .bind(project.description())
        .bind(project.metadata())
        .bind(project.created_at())
        .bind(project.created_by())
        .bind(project.integrity_sha256().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, project_id: &ProjectId) -> Result<Option<Project>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM projects WHERE project_id = $1").bind(project_id.as_uuid()).fetch_optional(&self.pool).await.map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Project>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM projects WHERE name = $1").bind(name).fetch_optional(&self.pool).await.map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self, filter: &ProjectListFilter) -> Result<Vec<Project>, GovernanceError> {
        let rows = if filter.include_archived {
            sqlx::query("SELECT * FROM projects ORDER BY created_at DESC LIMIT $1").bind(filter.limit).fetch_all(&self.pool).await
        } else {
            sqlx::query("SELECT * FROM projects WHERE status = 'active' ORDER BY created_at DESC LIMIT $1")
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await
        }
        .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn archive(&self, project_id: &ProjectId) -> Result<(), GovernanceError> {
        sqlx::query("UPDATE projects SET status = 'archived' WHERE project_id = $1")
            .bind(project_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
