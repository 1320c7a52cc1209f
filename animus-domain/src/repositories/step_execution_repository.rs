// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for the append-only, per-attempt [`StepExecution`] history of a Run.

use async_trait::async_trait;

use crate::entities::StepExecution;
use crate::value_objects::{RunId, StepExecutionId};
use crate::GovernanceError;

/// Outcome of appending a step execution: a retry submitted with the same
/// `(run_id, step_name, attempt)` the caller already recorded returns the
/// existing row instead of erroring.
#[derive(Debug)]
pub enum InsertStepExecutionOutcome {
    Inserted(StepExecution),
    AlreadyExists(StepExecution),
}

#[async_trait]
pub trait StepExecutionRepository: Send + Sync {
    async fn append(&self, step: &StepExecution) -> Result<InsertStepExecutionOutcome, GovernanceError>;

    async fn find_by_id(&self, step_execution_id: &StepExecutionId) -> Result<Option<StepExecution>, GovernanceError>;

    /// `MAX(attempt)` recorded so far for `(run_id, step_name)`, used to
    /// compute the next attempt number for a retry.
    async fn max_attempt(&self, run_id: &RunId, step_name: &str) -> Result<Option<u32>, GovernanceError>;

    async fn list_for_run(&self, run_id: &RunId) -> Result<Vec<StepExecution>, GovernanceError>;
}
