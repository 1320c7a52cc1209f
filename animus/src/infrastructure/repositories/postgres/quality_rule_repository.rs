// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Postgres adapter for [`QualityRuleRepository`].

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use animus_domain::entities::QualityRule;
use animus_domain::repositories::{Filter, QualityRuleRepository};
use animus_domain::services::rule_spec::RuleSpec;
use animus_domain::value_objects::{ProjectId, QualityRuleId, Sha256Hex};
use animus_domain::GovernanceError;

pub struct PostgresQualityRuleRepository {
    pool: PgPool,
}

impl PostgresQualityRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<QualityRule, GovernanceError> {
        let rule_id = QualityRuleId::from_uuid(row.try_get("rule_id").map_err(db_err)?).map_err(db_err)?;
        let project_id = ProjectId::from_uuid(row.try_get("project_id").map_err(db_err)?).map_err(db_err)?;
        let integrity_sha256 = Sha256Hex::parse(row.try_get::<String, _>("integrity_sha256").map_err(db_err)?)?;
        let Json(spec): Json<RuleSpec> = row.try_get("spec").map_err(db_err)?;
        Ok(QualityRule::from_parts(
            rule_id,
            project_id,
            row.try_get("name").map_err(db_err)?,
            spec,
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
impl QualityRuleRepository for PostgresQualityRuleRepository {
    async fn create(&self, rule: &QualityRule) -> Result<(), GovernanceError> {
        sqlx::query(
            "INSERT INTO quality_rules (rule_id, project_id, name, spec, created_at, created_by, integrity_sha256)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(rule.id().as_uuid())
        .bind(rule.project_id().as_uuid())
        .bind(rule.name())
        .bind(Json(rule.spec()))
        .bind(rule.created_at())
        .bind(rule.created_by())
        .bind(rule.integrity_sha256().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, rule_id: &QualityRuleId) -> Result<Option<QualityRule>, GovernanceError> {
        let row = sqlx::query("SELECT * FROM quality_rules WHERE rule_id = $1").bind(rule_id.as_uuid()).fetch_optional(&self.pool).await.map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<QualityRule>, GovernanceError> {
        let rows = sqlx::query("SELECT * FROM quality_rules WHERE project_id = $1 ORDER BY created_at DESC LIMIT $2")
            .bind(filter.project_id.as_uuid())
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
