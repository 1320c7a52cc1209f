// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`LineageRepository`]: an append-only directed edge
//! store queried by subject-or-object membership.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use animus_domain::entities::{EntityRef, LineageEvent, Predicate};
use animus_domain::repositories::LineageRepository;
use animus_domain::value_objects::{RequestId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresLineageRepository {
    pool: PgPool,
}

impl PostgresLineageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<LineageEvent, GovernanceError> {
        let request_id = RequestId::from_uuid(row.try_get("request_id").map_err(db_err)?)?;
        let predicate_str: String = row.try_get("predicate").map_err(db_err)?;
        let predicate = parse_predicate(&predicate_str)?;
        let Json(subject): Json<EntityRef> = row.try_get("subject").map_err(db_err)?;
        let Json(object): Json<EntityRef> = row.try_get("object").map_err(db_err)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        Ok(LineageEvent::from_parts(
            row.try_get("id").map_err(db_err)?,
            row.try_get("occurred_at").map_err(db_err)?,
            row.try_get("actor").map_err(db_err)?,
            request_id,
            subject,
            predicate,
            object,
            row.try_get("metadata").map_err(db_err)?,
            integrity_sha256,
        ))
    }
}

fn db_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

fn predicate_str(predicate: Predicate) -> &'static str {
    match predicate {
        Predicate::HasVersion => "has_version",
        Predicate::HasRun => "has_run",
        Predicate::UsedBy => "used_by",
        Predicate::BuiltFrom => "built_from",
    }
}

fn parse_predicate(s: &str) -> Result<Predicate, GovernanceError> {
    match s {
        "has_version" => Ok(Predicate::HasVersion),
        "has_run" => Ok(Predicate::HasRun),
        "used_by" => Ok(Predicate::UsedBy),
        "built_from" => Ok(Predicate::BuiltFrom),
        other => Err(GovernanceError::internal(format!("unknown lineage predicate: {other}"))),
    }
}

impl PostgresLineageRepository {
    /// Inserts `event` against any executor — a pool, or a transaction a
    /// caller wants the lineage edge to commit inside of.
    pub async fn insert<'c, E>(executor: E, event: &LineageEvent) -> Result<(), GovernanceError>
    where
        E: sqlx::PgExecutor<'c>,
    {
        sqlx::query(
            "INSERT INTO lineage_events (id, occurred_at, actor, request_id, subject, predicate, object, metadata, integrity_sha256)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(event.id())
        .bind(event.occurred_at())
        .bind(event.actor())
        .bind(event.request_id().as_uuid())
        .bind(Json(event.subject()))
        .bind(predicate_str(event.predicate()))
        .bind(Json(event.object()))
        .bind(event.metadata())
        .bind(event.integrity_sha256().as_str())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl LineageRepository for PostgresLineageRepository {
    async fn record(&self, event: &LineageEvent) -> Result<(), GovernanceError> {
        Self::insert(&self.pool, event).await
    }

    async fn edges_touching(&self, entity: &EntityRef) -> Result<Vec<LineageEvent>, GovernanceError> {
        let rows = sqlx::query(
            "SELECT * FROM lineage_events
             WHERE (subject->>'type' = $1 AND subject->>'id' = $2)
                OR (object->>'type' = $1 AND object->>'id' = $2)
             ORDER BY occurred_at DESC",
        )
        .bind(&entity.entity_type)
        .bind(&entity.id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
