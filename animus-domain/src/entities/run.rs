// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Run entity: either an experiment run or a pipeline run. All fields other
//! than [`RunStatus`] are immutable once created; status transitions are
//! governed by [`crate::services::run_state_machine`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{integrity_sha256, DatasetVersionId, ExperimentId, ProjectId, RunId, Sha256Hex};
use crate::GovernanceError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Git coordinates a Run's code was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRef {
    pub repo: String,
    pub commit: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

/// Discriminates the two Run shapes the spec describes. `spec_hash` is
/// present for pipeline runs (`SHA-256(canonical_json(pipeline_spec))`) and
/// absent for experiment runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunKind {
    ExperimentRun {
        experiment_id: ExperimentId,
        dataset_version_id: Option<DatasetVersionId>,
        code_ref: Option<CodeRef>,
        environment_lock: Option<Value>,
        params: Value,
        metrics: Value,
        artifacts_prefix: String,
    },
    PipelineRun {
        idempotency_key: String,
        pipeline_spec: Value,
        run_spec: Value,
        spec_hash: Sha256Hex,
    },
}

#[derive(Debug, Clone, Serialize)]
struct RunSemanticFields<'a> {
    run_id: &'a RunId,
    project_id: &'a ProjectId,
    kind: &'a RunKind,
    started_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    run_id: RunId,
    project_id: ProjectId,
    kind: RunKind,
    status: RunStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl Run {
    pub fn create(
        run_id: RunId,
        project_id: ProjectId,
        kind: RunKind,
        started_at: Option<DateTime<Utc>>,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        let integrity_sha256 = integrity_sha256(&RunSemanticFields {
            run_id: &run_id,
            project_id: &project_id,
            kind: &kind,
            started_at,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self {
            run_id,
            project_id,
            kind,
            status: RunStatus::Queued,
            started_at,
            ended_at: None,
            created_at,
            created_by,
            integrity_sha256,
        })
    }

    pub fn id(&self) -> &RunId {
        &self.run_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn kind(&self) -> &RunKind {
        &self.kind
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn spec_hash(&self) -> Option<&Sha256Hex> {
        match &self.kind {
            RunKind::PipelineRun { spec_hash, .. } => Some(spec_hash),
            RunKind::ExperimentRun { .. } => None,
        }
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        match &self.kind {
            RunKind::PipelineRun { idempotency_key, .. } => Some(idempotency_key),
            RunKind::ExperimentRun { .. } => None,
        }
    }

    pub fn integrity_sha256(&self) -> &Sha256Hex {
        &self.integrity_sha256
    }

    /// Applies a new status, enforcing the monotonic-toward-terminal rule.
    /// Callers in the application layer should go through
    /// [`crate::services::run_state_machine::transition`] instead of calling
    /// this directly so that `Unknown` re-entry rules are respected too.
    pub(crate) fn set_status_unchecked(&mut self, status: RunStatus, ended_at: Option<DateTime<Utc>>) {
        self.status = status;
        if status.is_terminal() {
            self.ended_at = ended_at;
        }
    }

    /// Reconstructs a run from storage without re-deriving the hash.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        run_id: RunId,
        project_id: ProjectId,
        kind: RunKind,
        status: RunStatus,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self { run_id, project_id, kind, status, started_at, ended_at, created_at, created_by, integrity_sha256 }
    }
}
