// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse_cli()             │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate_cli()                  │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated arguments
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `parser` - CLI structure and clap parsing
//! - `validator` - Security validation layer

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

use serde_json::Value;
use std::path::PathBuf;
use uuid::Uuid;

/// Validated CLI configuration, produced after clap parsing and
/// [`SecureArgParser`] screening. All UUIDs are parsed, all JSON arguments
/// are parsed, and all file paths are resolved to the shape the command
/// expects (existing input vs. not-yet-existing output).
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub actor: String,
}

/// Validated command variants, one per administrative operation.
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Migrate,
    CreateProject {
        name: String,
        description: String,
        metadata: Value,
    },
    CreateDataset {
        project_id: Uuid,
        name: String,
        description: String,
        metadata: Value,
    },
    UploadDatasetVersion {
        project_id: Uuid,
        dataset_id: Uuid,
        file: PathBuf,
        quality_rule_id: Option<Uuid>,
        metadata: Value,
    },
    DownloadDatasetVersion {
        project_id: Uuid,
        version_id: Uuid,
        output: PathBuf,
    },
    CreateQualityRule {
        project_id: Uuid,
        name: String,
        spec: Value,
    },
    CreateQualityEvaluation {
        project_id: Uuid,
        dataset_version_id: Uuid,
        rule_id: Uuid,
        status: String,
        summary: String,
        report: PathBuf,
    },
    GetGateStatus {
        project_id: Uuid,
        dataset_version_id: Uuid,
    },
    CreateExperiment {
        project_id: Uuid,
        name: String,
        description: String,
        metadata: Value,
    },
    CreateExperimentRun {
        project_id: Uuid,
        experiment_id: Uuid,
        dataset_version_id: Option<Uuid>,
        params: Value,
    },
    CreatePipelineRun {
        project_id: Uuid,
        idempotency_key: String,
        pipeline_spec: PathBuf,
        run_spec: PathBuf,
    },
    PlanRun {
        project_id: Uuid,
        run_id: Uuid,
        plan: PathBuf,
    },
    DryRun {
        project_id: Uuid,
        run_id: Uuid,
    },
    AppendStepExecution {
        project_id: Uuid,
        run_id: Uuid,
        step_name: String,
        status: String,
        result: Value,
    },
    MintRunToken {
        run_id: Uuid,
        dataset_version_id: Option<Uuid>,
    },
}

/// Parse and validate CLI arguments in one step.
///
/// # Errors
///
/// Returns [`ParseError`] if any argument fails security validation.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

/// Apply [`SecureArgParser`] checks to every argument of a parsed [`Cli`].
fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = if let Some(ref path) = cli.config {
        SecureArgParser::validate_argument(&path.to_string_lossy())?;
        Some(path.clone())
    } else {
        None
    };

    SecureArgParser::validate_argument(&cli.actor)?;

    let command = match cli.command {
        Commands::Migrate => ValidatedCommand::Migrate,

        Commands::CreateProject {
            name,
            description,
            metadata,
        } => {
            SecureArgParser::validate_argument(&name)?;
            SecureArgParser::validate_argument(&description)?;
            ValidatedCommand::CreateProject {
                name,
                description,
                metadata: SecureArgParser::validate_json("metadata", &metadata)?,
            }
        }

        Commands::CreateDataset {
            project_id,
            name,
            description,
            metadata,
        } => {
            SecureArgParser::validate_argument(&name)?;
            SecureArgParser::validate_argument(&description)?;
            ValidatedCommand::CreateDataset {
                project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
                name,
                description,
                metadata: SecureArgParser::validate_json("metadata", &metadata)?,
            }
        }

        Commands::UploadDatasetVersion {
            project_id,
            dataset_id,
            file,
            quality_rule_id,
            metadata,
        } => {
            let validated_file = SecureArgParser::validate_path(&file.to_string_lossy())?;
            let quality_rule_id = quality_rule_id
                .map(|id| SecureArgParser::validate_uuid("quality-rule-id", &id))
                .transpose()?;
            ValidatedCommand::UploadDatasetVersion {
                project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
                dataset_id: SecureArgParser::validate_uuid("dataset-id", &dataset_id)?,
                file: validated_file,
                quality_rule_id,
                metadata: SecureArgParser::validate_json("metadata", &metadata)?,
            }
        }

        Commands::DownloadDatasetVersion {
            project_id,
            version_id,
            output,
        } => ValidatedCommand::DownloadDatasetVersion {
            project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
            version_id: SecureArgParser::validate_uuid("version-id", &version_id)?,
            output: SecureArgParser::validate_output_path(&output.to_string_lossy())?,
        },

        Commands::CreateQualityRule { project_id, name, spec } => {
            SecureArgParser::validate_argument(&name)?;
            ValidatedCommand::CreateQualityRule {
                project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
                name,
                spec: SecureArgParser::validate_json("spec", &spec)?,
            }
        }

        Commands::CreateQualityEvaluation {
            project_id,
            dataset_version_id,
            rule_id,
            status,
            summary,
            report,
        } => {
            SecureArgParser::validate_argument(&status)?;
            SecureArgParser::validate_argument(&summary)?;
            ValidatedCommand::CreateQualityEvaluation {
                project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
                dataset_version_id: SecureArgParser::validate_uuid("dataset-version-id", &dataset_version_id)?,
                rule_id: SecureArgParser::validate_uuid("rule-id", &rule_id)?,
                status,
                summary,
                report: SecureArgParser::validate_path(&report.to_string_lossy())?,
            }
        }

        Commands::GetGateStatus {
            project_id,
            dataset_version_id,
        } => ValidatedCommand::GetGateStatus {
            project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
            dataset_version_id: SecureArgParser::validate_uuid("dataset-version-id", &dataset_version_id)?,
        },

        Commands::CreateExperiment {
            project_id,
            name,
            description,
            metadata,
        } => {
            SecureArgParser::validate_argument(&name)?;
            SecureArgParser::validate_argument(&description)?;
            ValidatedCommand::CreateExperiment {
                project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
                name,
                description,
                metadata: SecureArgParser::validate_json("metadata", &metadata)?,
            }
        }

        Commands::CreateExperimentRun {
            project_id,
            experiment_id,
            dataset_version_id,
            params,
        } => {
            let dataset_version_id = dataset_version_id
                .map(|id| SecureArgParser::validate_uuid("dataset-version-id", &id))
                .transpose()?;
            ValidatedCommand::CreateExperimentRun {
                project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
                experiment_id: SecureArgParser::validate_uuid("experiment-id", &experiment_id)?,
                dataset_version_id,
                params: SecureArgParser::validate_json("params", &params)?,
            }
        }

        Commands::CreatePipelineRun {
            project_id,
            idempotency_key,
            pipeline_spec,
            run_spec,
        } => {
            SecureArgParser::validate_argument(&idempotency_key)?;
            ValidatedCommand::CreatePipelineRun {
                project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
                idempotency_key,
                pipeline_spec: SecureArgParser::validate_path(&pipeline_spec.to_string_lossy())?,
                run_spec: SecureArgParser::validate_path(&run_spec.to_string_lossy())?,
            }
        }

        Commands::PlanRun {
            project_id,
            run_id,
            plan,
        } => ValidatedCommand::PlanRun {
            project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
            run_id: SecureArgParser::validate_uuid("run-id", &run_id)?,
            plan: SecureArgParser::validate_path(&plan.to_string_lossy())?,
        },

        Commands::DryRun { project_id, run_id } => ValidatedCommand::DryRun {
            project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
            run_id: SecureArgParser::validate_uuid("run-id", &run_id)?,
        },

        Commands::AppendStepExecution {
            project_id,
            run_id,
            step_name,
            status,
            result,
        } => {
            SecureArgParser::validate_argument(&step_name)?;
            SecureArgParser::validate_argument(&status)?;
            ValidatedCommand::AppendStepExecution {
                project_id: SecureArgParser::validate_uuid("project-id", &project_id)?,
                run_id: SecureArgParser::validate_uuid("run-id", &run_id)?,
                step_name,
                status,
                result: SecureArgParser::validate_json("result", &result)?,
            }
        }

        Commands::MintRunToken {
            run_id,
            dataset_version_id,
        } => {
            let dataset_version_id = dataset_version_id
                .map(|id| SecureArgParser::validate_uuid("dataset-version-id", &id))
                .transpose()?;
            ValidatedCommand::MintRunToken {
                run_id: SecureArgParser::validate_uuid("run-id", &run_id)?,
                dataset_version_id,
            }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config,
        actor: cli.actor,
    })
}
