// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Use cases: one module per operation the control plane exposes, each
//! orchestrating domain services and repository ports within a single
//! logical transaction.

pub mod append_step_execution;
pub mod create_dataset;
pub mod create_experiment;
pub mod create_experiment_run;
pub mod create_pipeline_run;
pub mod create_project;
pub mod create_quality_evaluation;
pub mod create_quality_rule;
pub mod download_dataset_version;
pub mod dry_run;
pub mod get_gate_status;
pub mod mint_run_token;
pub mod plan_run;
pub mod upload_dataset_version;

pub use append_step_execution::AppendStepExecutionUseCase;
pub use create_dataset::CreateDatasetUseCase;
pub use create_experiment::CreateExperimentUseCase;
pub use create_experiment_run::CreateExperimentRunUseCase;
pub use create_pipeline_run::CreatePipelineRunUseCase;
pub use create_project::CreateProjectUseCase;
pub use create_quality_evaluation::CreateQualityEvaluationUseCase;
pub use create_quality_rule::CreateQualityRuleUseCase;
pub use download_dataset_version::DownloadDatasetVersionUseCase;
pub use dry_run::DryRunUseCase;
pub use get_gate_status::GetGateStatusUseCase;
pub use mint_run_token::MintRunTokenUseCase;
pub use plan_run::PlanRunUseCase;
pub use upload_dataset_version::UploadDatasetVersionUseCase;
