// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`AuditRepository`]. Append-only: no update, no
//! delete methods exist on the port, and none are added here.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use animus_domain::entities::AuditEvent;
use animus_domain::repositories::{AuditListFilter, AuditRepository};
use animus_domain::value_objects::{ProjectId, RequestId};
use animus_domain::GovernanceError;

pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<AuditEvent, GovernanceError> {
        let request_id = RequestId::from_uuid(row.try_get("request_id").map_err(db_err)?)?;
        Ok(AuditEvent::from_parts(
            row.try_get("id").map_err(db_err)?,
            row.try_get("occurred_at").map_err(db_err)?,
            row.try_get("actor").map_err(db_err)?,
            row.try_get("action").map_err(db_err)?,
            row.try_get("resource_type").map_err(db_err)?,
            row.try_get("resource_id").map_err(db_err)?,
            request_id,
            row.try_get("ip").map_err(db_err)?,
            row.try_get("user_agent").map_err(db_err)?,
            row.try_get("payload").map_err(db_err)?,
        ))
    }
}

fn db_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

impl PostgresAuditRepository {
    /// Inserts `event` against any executor — a pool, or a transaction a
    /// caller wants the audit row to commit inside of.
    pub async fn insert<'c, E>(executor: E, project_id: &ProjectId, event: &AuditEvent) -> Result<(), GovernanceError>
    where
        E: sqlx::PgExecutor<'c>,
    {
        sqlx::query(
            "INSERT INTO audit_events
             (id, project_id, occurred_at, actor, action, resource_type, resource_id, request_id, ip, user_agent, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(event.id())
        .bind(project_id.as_uuid())
        .bind(event.occurred_at())
        .bind(event.actor())
        .bind(event.action())
        .bind(event.resource_type())
        .bind(event.resource_id())
        .bind(event.request_id().as_uuid())
        .bind(event.ip())
        .bind(event.user_agent())
        .bind(event.payload())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn record(&self, project_id: &ProjectId, event: &AuditEvent) -> Result<(), GovernanceError> {
        Self::insert(&self.pool, project_id, event).await
    }

    async fn list(&self, project_id: &ProjectId, filter: &AuditListFilter) -> Result<Vec<AuditEvent>, GovernanceError> {
        let rows = sqlx::query(
            "SELECT * FROM audit_events
             WHERE project_id = $1
               AND ($2::text IS NULL OR resource_type = $2)
               AND ($3::text IS NULL OR resource_id = $3)
               AND ($4::text IS NULL OR actor = $4)
             ORDER BY occurred_at DESC
             LIMIT $5",
        )
        .bind(project_id.as_uuid())
        .bind(&filter.resource_type)
        .bind(&filter.resource_id)
        .bind(&filter.actor)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
