// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Repository interfaces: infrastructure ports the application layer
//! depends on and the infrastructure layer implements against Postgres.
//!
//! Every method is project-scoped; a query without a `project_id` is a
//! programming error at the call site, not something these traits allow.

pub mod artifact_repository;
pub mod audit_repository;
pub mod dataset_repository;
pub mod dataset_version_repository;
pub mod execution_plan_repository;
pub mod experiment_repository;
pub mod lineage_repository;
pub mod object_store;
pub mod project_repository;
pub mod quality_evaluation_repository;
pub mod quality_rule_repository;
pub mod run_repository;
pub mod step_execution_repository;

pub use artifact_repository::ArtifactRepository;
pub use audit_repository::{AuditListFilter, AuditRepository};
pub use dataset_repository::DatasetRepository;
pub use dataset_version_repository::{DatasetVersionRepository, NextVersionRequest};
pub use execution_plan_repository::{ExecutionPlanRepository, UpsertPlanOutcome};
pub use experiment_repository::ExperimentRepository;
pub use lineage_repository::LineageRepository;
pub use object_store::{ObjectStat, ObjectStore};
pub use project_repository::{ProjectListFilter, ProjectRepository};
pub use quality_evaluation_repository::QualityEvaluationRepository;
pub use quality_rule_repository::QualityRuleRepository;
pub use run_repository::{CreateRunOutcome, RunRepository};
pub use step_execution_repository::{InsertStepExecutionOutcome, StepExecutionRepository};

use crate::value_objects::ProjectId;

/// Result-set limit clamp shared by every `ListX` operation.
pub const MIN_LIST_LIMIT: i64 = 1;
pub const MAX_LIST_LIMIT: i64 = 500;
pub const DEFAULT_LIST_LIMIT: i64 = 100;

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(MIN_LIST_LIMIT, MAX_LIST_LIMIT)
}

/// Common list filter: every selector beyond `project_id` is optional and
/// specific to the entity being listed.
#[derive(Debug, Clone)]
pub struct Filter {
    pub project_id: ProjectId,
    pub limit: i64,
}

impl Filter {
    pub fn new(project_id: ProjectId, limit: Option<i64>) -> Self {
        Self { project_id, limit: clamp_limit(limit) }
    }
}
