// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for the at-most-one-per-run [`ExecutionPlan`].

use async_trait::async_trait;

use crate::entities::ExecutionPlan;
use crate::value_objects::RunId;
use crate::GovernanceError;

/// Outcome of the idempotent plan upsert: resubmitting the identical plan
/// for a run is a no-op; a divergent plan for the same run is a conflict the
/// repository surfaces rather than silently overwriting.
#[derive(Debug)]
pub enum UpsertPlanOutcome {
    Created(ExecutionPlan),
    Unchanged(ExecutionPlan),
}

#[async_trait]
pub trait ExecutionPlanRepository: Send + Sync {
    async fn upsert(&self, plan: &ExecutionPlan) -> Result<UpsertPlanOutcome, GovernanceError>;

    async fn find_by_run_id(&self, run_id: &RunId) -> Result<Option<ExecutionPlan>, GovernanceError>;
}
