// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Connection pool setup shared by every Postgres repository adapter.
//! Applies pending migrations on start-up so tests and services see a
//! consistent schema.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use animus_domain::GovernanceError;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, GovernanceError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| GovernanceError::DatabaseError(format!("failed to connect: {e}")))?;

    sqlx::migrate!("../migrations").run(&pool).await.map_err(|e| GovernanceError::DatabaseError(format!("migration failed: {e}")))?;

    info!("database schema is up to date");
    Ok(pool)
}
