// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Commands: self-contained, immutable inputs to the use cases in
//! [`crate::application::use_cases`]. Each carries everything its use case
//! needs plus the caller's actor/request_id for audit attribution.

use serde_json::Value;
use tokio::io::AsyncRead;

use animus_domain::value_objects::{DatasetId, DatasetVersionId, ExperimentId, ProjectId, QualityRuleId, RequestId, RunId};

/// Common request-scoped attribution every command carries.
#[derive(Debug, Clone)]
pub struct Actor {
    pub actor: String,
    pub request_id: RequestId,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
    pub name: String,
    pub description: Option<String>,
    pub metadata: Value,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct CreateDatasetCommand {
    pub project_id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub metadata: Value,
    pub actor: Actor,
}

/// The already-demultiplexed equivalent of a parsed upload multipart body:
/// an HTTP layer out of this crate's scope is responsible for splitting a
/// request into these parts before calling the use case.
pub struct UploadDatasetVersionCommand<R: AsyncRead + Unpin + Send> {
    pub project_id: ProjectId,
    pub dataset_id: DatasetId,
    pub quality_rule_id: Option<QualityRuleId>,
    pub metadata: Value,
    pub filename: String,
    pub content_type: Option<String>,
    pub body: R,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct DownloadDatasetVersionCommand {
    pub project_id: ProjectId,
    pub version_id: DatasetVersionId,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct CreateQualityRuleCommand {
    pub project_id: ProjectId,
    pub name: String,
    pub spec: animus_domain::services::RuleSpec,
    pub actor: Actor,
}

/// Evaluates one rule against one already-uploaded version. The engine
/// gathers the observed facts itself via the object store and dataset
/// version repository; the caller only names what to evaluate.
#[derive(Debug, Clone)]
pub struct CreateQualityEvaluationCommand {
    pub project_id: ProjectId,
    pub dataset_version_id: DatasetVersionId,
    pub rule_id: QualityRuleId,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct GetGateStatusQuery {
    pub project_id: ProjectId,
    pub dataset_version_id: DatasetVersionId,
}

#[derive(Debug, Clone)]
pub struct CreateExperimentCommand {
    pub project_id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub metadata: Value,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct CreateExperimentRunCommand {
    pub project_id: ProjectId,
    pub experiment_id: ExperimentId,
    pub dataset_version_id: Option<DatasetVersionId>,
    pub code_ref: Option<animus_domain::entities::CodeRef>,
    pub environment_lock: Option<Value>,
    pub params: Value,
    pub artifacts_prefix: String,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct CreatePipelineRunCommand {
    pub project_id: ProjectId,
    pub idempotency_key: String,
    pub pipeline_spec: Value,
    pub run_spec: Value,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct PlanRunCommand {
    pub project_id: ProjectId,
    pub run_id: RunId,
    pub plan_json: Value,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct DryRunCommand {
    pub project_id: ProjectId,
    pub run_id: RunId,
    pub step_names: Vec<String>,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct MintRunTokenCommand {
    pub run_id: RunId,
    pub dataset_version_id: Option<DatasetVersionId>,
}

#[derive(Debug, Clone)]
pub struct AppendStepExecutionCommand {
    pub project_id: ProjectId,
    pub run_id: RunId,
    pub step_name: String,
    pub status: animus_domain::entities::StepStatus,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub result: Value,
    pub actor: Actor,
}
