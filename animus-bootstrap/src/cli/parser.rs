// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line structure for the administrative CLI that drives the
//! governed-execution use cases directly (no HTTP surface is part of this
//! workspace; see `animus::application::use_cases`). Security validation of
//! the parsed values happens in [`super::validator`].

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Administrative CLI for the Animus control plane.
#[derive(Parser, Debug, Clone)]
#[command(name = "animusd")]
#[command(about = concat!("Animus control plane administrative CLI v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path, overriding ANIMUS_CONFIG_FILE
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Identity subject to run the command as (maps to `created_by`/`actor`)
    #[arg(long, default_value = "cli-admin")]
    pub actor: String,
}

/// CLI subcommands, one per governed-execution use case plus `migrate`.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Create a project
    CreateProject {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Metadata as an inline JSON object
        #[arg(long, default_value = "{}")]
        metadata: String,
    },

    /// Create a dataset within a project
    CreateDataset {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "{}")]
        metadata: String,
    },

    /// Upload a new dataset version from a local file
    UploadDatasetVersion {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        dataset_id: String,
        /// Local file to upload as the version's content
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        quality_rule_id: Option<String>,
        #[arg(long, default_value = "{}")]
        metadata: String,
    },

    /// Download a dataset version's content to a local file
    DownloadDatasetVersion {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        version_id: String,
        #[arg(long)]
        output: PathBuf,
    },

    /// Create a quality rule
    CreateQualityRule {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        name: String,
        /// Rule spec as an inline JSON object
        #[arg(long)]
        spec: String,
    },

    /// Record a quality evaluation for a dataset version
    CreateQualityEvaluation {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        dataset_version_id: String,
        #[arg(long)]
        rule_id: String,
        /// One of pass, fail, error
        #[arg(long)]
        status: String,
        #[arg(long, default_value = "")]
        summary: String,
        /// Evaluation report file to upload alongside the evaluation
        #[arg(long)]
        report: PathBuf,
    },

    /// Read the current quality-gate status for a dataset version
    GetGateStatus {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        dataset_version_id: String,
    },

    /// Create an experiment
    CreateExperiment {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "{}")]
        metadata: String,
    },

    /// Create an experiment run
    CreateExperimentRun {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        experiment_id: String,
        #[arg(long)]
        dataset_version_id: Option<String>,
        /// Run parameters as an inline JSON object
        #[arg(long, default_value = "{}")]
        params: String,
    },

    /// Create (or idempotently resume) a pipeline run
    CreatePipelineRun {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        idempotency_key: String,
        /// Path to a JSON file containing the pipeline spec
        #[arg(long)]
        pipeline_spec: PathBuf,
        /// Path to a JSON file containing the run spec
        #[arg(long)]
        run_spec: PathBuf,
    },

    /// Submit (or confirm) an execution plan for a run
    PlanRun {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        run_id: String,
        /// Path to a JSON file containing the execution plan
        #[arg(long)]
        plan: PathBuf,
    },

    /// Evaluate what a run would do without admitting it
    DryRun {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        run_id: String,
    },

    /// Append a step-execution attempt to a run's ledger
    AppendStepExecution {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        run_id: String,
        #[arg(long)]
        step_name: String,
        #[arg(long)]
        status: String,
        /// Step result as an inline JSON object
        #[arg(long, default_value = "{}")]
        result: String,
    },

    /// Mint a short-lived run token for a Data Plane workload
    MintRunToken {
        #[arg(long)]
        run_id: String,
        #[arg(long)]
        dataset_version_id: Option<String>,
    },
}

/// Parse CLI arguments from `std::env::args`.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
