// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for persisting, transitioning, and querying [`Run`] entities.

use async_trait::async_trait;

use crate::entities::{Run, RunStatus};
use crate::repositories::Filter;
use crate::value_objects::RunId;
use crate::GovernanceError;

/// Outcome of an idempotent pipeline-run create: the same
/// `(project_id, idempotency_key)` submitted twice returns the original Run
/// instead of erroring.
#[derive(Debug)]
pub enum CreateRunOutcome {
    Created(Run),
    AlreadyExists(Run),
}

#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Inserts an experiment run. No idempotency key applies to this shape.
    async fn create_experiment_run(&self, run: &Run) -> Result<(), GovernanceError>;

    /// `INSERT ... ON CONFLICT (project_id, idempotency_key) DO NOTHING
    /// RETURNING`-shaped idempotent create for pipeline runs: a conflicting
    /// insert returns the row already on disk rather than erroring, but only
    /// when `spec_hash` matches; a divergent `spec_hash` under the same key
    /// is a `Conflict`.
    async fn create_pipeline_run(&self, run: &Run) -> Result<CreateRunOutcome, GovernanceError>;

    async fn find_by_id(&self, run_id: &RunId) -> Result<Option<Run>, GovernanceError>;

    async fn find_by_idempotency_key(&self, project_id: &crate::value_objects::ProjectId, idempotency_key: &str) -> Result<Option<Run>, GovernanceError>;

    async fn list(&self, filter: &Filter, status: Option<RunStatus>) -> Result<Vec<Run>, GovernanceError>;

    /// Applies a status transition already validated by
    /// [`crate::services::run_state_machine`]; the repository enforces the
    /// terminal-is-frozen invariant again at the row level as a last line of
    /// defense under concurrent writers.
    async fn update_status(&self, run_id: &RunId, next: RunStatus, ended_at: Option<chrono::DateTime<chrono::Utc>>) -> Result<Run, GovernanceError>;
}
