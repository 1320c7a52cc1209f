// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Mint-run-token use case: issues a narrow, time-boxed editor token for a
//! live run's Data Plane workload.

use std::sync::Arc;

use animus_domain::services::run_token::{generate_run_token, RunTokenClaims};
use animus_domain::GovernanceError;

use crate::application::commands::MintRunTokenCommand;
use crate::infrastructure::repositories::postgres::PostgresRunRepository;

pub struct MintRunTokenUseCase {
    runs: Arc<PostgresRunRepository>,
    secret: Vec<u8>,
    ttl_seconds: i64,
}

impl MintRunTokenUseCase {
    pub fn new(runs: Arc<PostgresRunRepository>, secret: Vec<u8>, ttl_seconds: i64) -> Self {
        Self { runs, secret, ttl_seconds }
    }

    pub async fn execute(&self, cmd: MintRunTokenCommand) -> Result<String, GovernanceError> {
        self.runs
            .find_by_id(&cmd.run_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("run {} not found", cmd.run_id)))?;

        let now = chrono::Utc::now().timestamp();
        let claims = RunTokenClaims { run_id: cmd.run_id, dataset_version_id: cmd.dataset_version_id, iat: now, exp: now + self.ttl_seconds };
        generate_run_token(&self.secret, &claims)
    }
}
