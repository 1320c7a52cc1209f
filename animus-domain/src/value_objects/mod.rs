// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Value objects: immutable, self-validating types with no identity of
//! their own.

pub mod artifact_id;
pub mod canonical_json;
pub mod dataset_id;
pub mod dataset_version_id;
pub mod execution_plan_id;
pub mod experiment_id;
pub mod generic_id;
pub mod ordinal;
pub mod project_id;
pub mod quality_evaluation_id;
pub mod quality_rule_id;
pub mod request_id;
pub mod run_id;
pub mod sha256_hex;
pub mod step_execution_id;

pub use artifact_id::ArtifactId;
pub use canonical_json::{integrity_sha256, to_canonical_bytes};
pub use dataset_id::DatasetId;
pub use dataset_version_id::DatasetVersionId;
pub use execution_plan_id::ExecutionPlanId;
pub use experiment_id::ExperimentId;
pub use ordinal::Ordinal;
pub use project_id::ProjectId;
pub use quality_evaluation_id::QualityEvaluationId;
pub use quality_rule_id::QualityRuleId;
pub use request_id::RequestId;
pub use run_id::RunId;
pub use sha256_hex::{Sha256Hex, StreamingHasher};
pub use step_execution_id::StepExecutionId;
