// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `animusd`: the administrative CLI binary. Parses and validates arguments
//! through `animus_bootstrap`, wires every Postgres repository adapter and
//! the object store against configuration, then dispatches to exactly one
//! use case per subcommand.

use std::sync::Arc;

use animus_bootstrap::{ValidatedCli, ValidatedCommand};
use animus_domain::entities::StepStatus;
use animus_domain::repositories::{AuditRepository, ExecutionPlanRepository, ObjectStore};
use animus_domain::services::RuleSpec;
use animus_domain::value_objects::{DatasetId, DatasetVersionId, ExperimentId, ProjectId, QualityRuleId, RequestId, RunId};
use animus_domain::GovernanceError;

use animus::application::commands::{
    Actor, AppendStepExecutionCommand, CreateDatasetCommand, CreateExperimentCommand, CreateExperimentRunCommand,
    CreatePipelineRunCommand, CreateProjectCommand, CreateQualityEvaluationCommand, CreateQualityRuleCommand,
    DownloadDatasetVersionCommand, DryRunCommand, GetGateStatusQuery, MintRunTokenCommand, PlanRunCommand,
    UploadDatasetVersionCommand,
};
use animus::application::use_cases::{
    AppendStepExecutionUseCase, CreateDatasetUseCase, CreateExperimentRunUseCase, CreateExperimentUseCase,
    CreatePipelineRunUseCase, CreateProjectUseCase, CreateQualityEvaluationUseCase, CreateQualityRuleUseCase,
    DownloadDatasetVersionUseCase, DryRunUseCase, GetGateStatusUseCase, MintRunTokenUseCase, PlanRunUseCase,
    UploadDatasetVersionUseCase,
};
use animus::infrastructure::audit::MetricsAuditRepository;
use animus::infrastructure::config::AppConfig;
use animus::infrastructure::metrics::Metrics;
use animus::infrastructure::object_store::S3ObjectStore;
use animus::infrastructure::repositories::postgres;

/// Every wired use case, held for the lifetime of one CLI invocation.
struct Application {
    create_project: CreateProjectUseCase,
    create_dataset: CreateDatasetUseCase,
    upload_dataset_version: UploadDatasetVersionUseCase,
    download_dataset_version: DownloadDatasetVersionUseCase,
    create_quality_rule: CreateQualityRuleUseCase,
    create_quality_evaluation: CreateQualityEvaluationUseCase,
    get_gate_status: GetGateStatusUseCase,
    create_experiment: CreateExperimentUseCase,
    create_experiment_run: CreateExperimentRunUseCase,
    create_pipeline_run: CreatePipelineRunUseCase,
    plan_run: PlanRunUseCase,
    dry_run: DryRunUseCase,
    append_step_execution: AppendStepExecutionUseCase,
    mint_run_token: MintRunTokenUseCase,
    plans: Arc<dyn ExecutionPlanRepository>,
}

impl Application {
    async fn wire(config: &AppConfig, metrics: Arc<Metrics>) -> Result<Self, GovernanceError> {
        let pool = postgres::connect(&config.database_url, config.database_max_connections).await?;

        let projects = Arc::new(postgres::PostgresProjectRepository::new(pool.clone()));
        let datasets = Arc::new(postgres::PostgresDatasetRepository::new(pool.clone()));
        let dataset_versions = Arc::new(postgres::PostgresDatasetVersionRepository::new(pool.clone()));
        let quality_rules = Arc::new(postgres::PostgresQualityRuleRepository::new(pool.clone()));
        let quality_evaluations = Arc::new(postgres::PostgresQualityEvaluationRepository::new(pool.clone()));
        let experiments = Arc::new(postgres::PostgresExperimentRepository::new(pool.clone()));
        let runs = Arc::new(postgres::PostgresRunRepository::new(pool.clone()));
        let step_executions = Arc::new(postgres::PostgresStepExecutionRepository::new(pool.clone()));
        let execution_plans = Arc::new(postgres::PostgresExecutionPlanRepository::new(pool.clone()));
        let audit_metrics =
            Arc::new(MetricsAuditRepository::new(Arc::new(postgres::PostgresAuditRepository::new(pool.clone())), metrics.clone()));
        let audit: Arc<dyn AuditRepository> = audit_metrics.clone();

        let object_store: Arc<dyn ObjectStore> =
            Arc::new(S3ObjectStore::new(&config.object_store, config.object_store.datasets_bucket.clone()).await);

        let secret = config.animus_internal_auth_secret.as_bytes().to_vec();
        let ttl_seconds = config.animus_run_token_ttl.as_secs() as i64;

        Ok(Self {
            create_project: CreateProjectUseCase::new(projects.clone(), audit.clone()),
            create_dataset: CreateDatasetUseCase::new(datasets.clone(), projects.clone(), audit.clone()),
            upload_dataset_version: UploadDatasetVersionUseCase::new(
                dataset_versions.clone(),
                quality_rules.clone(),
                object_store.clone(),
                audit_metrics.clone(),
                config.dataset_registry_upload_max_mib,
                config.dataset_registry_upload_timeout,
            ),
            download_dataset_version: DownloadDatasetVersionUseCase::new(
                dataset_versions.clone(),
                quality_evaluations.clone(),
                object_store.clone(),
                audit.clone(),
                config.dataset_registry_upload_timeout,
            ),
            create_quality_rule: CreateQualityRuleUseCase::new(quality_rules.clone(), audit.clone()),
            create_quality_evaluation: CreateQualityEvaluationUseCase::new(
                dataset_versions.clone(),
                quality_rules.clone(),
                quality_evaluations.clone(),
                object_store.clone(),
                audit_metrics.clone(),
            ),
            get_gate_status: GetGateStatusUseCase::new(dataset_versions.clone(), quality_evaluations.clone()),
            create_experiment: CreateExperimentUseCase::new(experiments.clone(), projects.clone(), audit.clone()),
            create_experiment_run: CreateExperimentRunUseCase::new(
                runs.clone(),
                experiments.clone(),
                dataset_versions.clone(),
                quality_evaluations.clone(),
                audit_metrics.clone(),
            ),
            create_pipeline_run: CreatePipelineRunUseCase::new(runs.clone(), audit.clone()),
            plan_run: PlanRunUseCase::new(execution_plans.clone(), runs.clone(), audit.clone()),
            dry_run: DryRunUseCase::new(runs.clone(), step_executions.clone(), audit.clone()),
            append_step_execution: AppendStepExecutionUseCase::new(runs.clone(), step_executions.clone(), audit.clone()),
            mint_run_token: MintRunTokenUseCase::new(runs.clone(), secret, ttl_seconds),
            plans: execution_plans,
        })
    }
}

fn project_id(raw: uuid::Uuid) -> Result<ProjectId, GovernanceError> {
    ProjectId::from_uuid(raw)
}

fn actor_from(cli: &ValidatedCli) -> Actor {
    Actor { actor: cli.actor.clone(), request_id: RequestId::new(), ip: None, user_agent: None }
}

async fn read_json_file(path: &std::path::Path) -> Result<serde_json::Value, GovernanceError> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

/// Extracts step names from a plan's opaque JSON under a `"steps"` array,
/// where each element is either a bare name or an object carrying `"name"`.
fn step_names_from_plan(plan_json: &serde_json::Value) -> Vec<String> {
    plan_json
        .get("steps")
        .and_then(|v| v.as_array())
        .map(|steps| {
            steps
                .iter()
                .filter_map(|step| {
                    step.as_str().map(str::to_string).or_else(|| step.get("name").and_then(|n| n.as_str()).map(str::to_string))
                })
                .collect()
        })
        .unwrap_or_default()
}

async fn dispatch(app: &Application, cli: ValidatedCli) -> Result<serde_json::Value, GovernanceError> {
    let actor = actor_from(&cli);

    match cli.command {
        ValidatedCommand::Migrate => Ok(serde_json::json!({ "status": "migrated" })),

        ValidatedCommand::CreateProject { name, description, metadata } => {
            let project = app
                .create_project
                .execute(CreateProjectCommand { name, description: Some(description).filter(|d| !d.is_empty()), metadata, actor })
                .await?;
            Ok(serde_json::to_value(project)?)
        }

        ValidatedCommand::CreateDataset { project_id: pid, name, description, metadata } => {
            let dataset = app
                .create_dataset
                .execute(CreateDatasetCommand {
                    project_id: project_id(pid)?,
                    name,
                    description: Some(description).filter(|d| !d.is_empty()),
                    metadata,
                    actor,
                })
                .await?;
            Ok(serde_json::to_value(dataset)?)
        }

        ValidatedCommand::UploadDatasetVersion { project_id: pid, dataset_id, file, quality_rule_id, metadata } => {
            let filename = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "upload".into());
            let body = tokio::fs::File::open(&file).await?;
            let command = UploadDatasetVersionCommand {
                project_id: project_id(pid)?,
                dataset_id: DatasetId::from_uuid(dataset_id)?,
                quality_rule_id: quality_rule_id.map(QualityRuleId::from_uuid).transpose()?,
                metadata,
                filename,
                content_type: None,
                body,
                actor,
            };
            let version = app.upload_dataset_version.execute(command).await?;
            Ok(serde_json::to_value(version)?)
        }

        ValidatedCommand::DownloadDatasetVersion { project_id: pid, version_id, output } => {
            let bytes = app
                .download_dataset_version
                .execute(DownloadDatasetVersionCommand {
                    project_id: project_id(pid)?,
                    version_id: DatasetVersionId::from_uuid(version_id)?,
                    actor,
                })
                .await?;
            tokio::fs::write(&output, &bytes).await?;
            Ok(serde_json::json!({ "output": output, "bytes_written": bytes.len() }))
        }

        ValidatedCommand::CreateQualityRule { project_id: pid, name, spec } => {
            let spec: RuleSpec = serde_json::from_value(spec)?;
            let rule = app
                .create_quality_rule
                .execute(CreateQualityRuleCommand { project_id: project_id(pid)?, name, spec, actor })
                .await?;
            Ok(serde_json::to_value(rule)?)
        }

        // status/summary/report are accepted by the CLI for symmetry with the
        // other record-shaped commands, but the evaluation engine recomputes
        // the verdict itself from the dataset version's stored object.
        ValidatedCommand::CreateQualityEvaluation { project_id: pid, dataset_version_id, rule_id, status: _, summary: _, report: _ } => {
            let evaluation = app
                .create_quality_evaluation
                .execute(CreateQualityEvaluationCommand {
                    project_id: project_id(pid)?,
                    dataset_version_id: DatasetVersionId::from_uuid(dataset_version_id)?,
                    rule_id: QualityRuleId::from_uuid(rule_id)?,
                    actor,
                })
                .await?;
            Ok(serde_json::to_value(evaluation)?)
        }

        ValidatedCommand::GetGateStatus { project_id: pid, dataset_version_id } => {
            let gate = app
                .get_gate_status
                .execute(GetGateStatusQuery {
                    project_id: project_id(pid)?,
                    dataset_version_id: DatasetVersionId::from_uuid(dataset_version_id)?,
                })
                .await?;
            Ok(serde_json::to_value(gate)?)
        }

        ValidatedCommand::CreateExperiment { project_id: pid, name, description, metadata } => {
            let experiment = app
                .create_experiment
                .execute(CreateExperimentCommand {
                    project_id: project_id(pid)?,
                    name,
                    description: Some(description).filter(|d| !d.is_empty()),
                    metadata,
                    actor,
                })
                .await?;
            Ok(serde_json::to_value(experiment)?)
        }

        ValidatedCommand::CreateExperimentRun { project_id: pid, experiment_id, dataset_version_id, params } => {
            let experiment_id = ExperimentId::from_uuid(experiment_id)?;
            let artifacts_prefix = format!("experiments/{experiment_id}/");
            let run = app
                .create_experiment_run
                .execute(CreateExperimentRunCommand {
                    project_id: project_id(pid)?,
                    experiment_id,
                    dataset_version_id: dataset_version_id.map(DatasetVersionId::from_uuid).transpose()?,
                    code_ref: None,
                    environment_lock: None,
                    params,
                    artifacts_prefix,
                    actor,
                })
                .await?;
            Ok(serde_json::to_value(run)?)
        }

        ValidatedCommand::CreatePipelineRun { project_id: pid, idempotency_key, pipeline_spec, run_spec } => {
            let pipeline_spec = read_json_file(&pipeline_spec).await?;
            let run_spec = read_json_file(&run_spec).await?;
            let run = app
                .create_pipeline_run
                .execute(CreatePipelineRunCommand { project_id: project_id(pid)?, idempotency_key, pipeline_spec, run_spec, actor })
                .await?;
            Ok(serde_json::to_value(run)?)
        }

        ValidatedCommand::PlanRun { project_id: pid, run_id, plan } => {
            let plan_json = read_json_file(&plan).await?;
            let plan = app
                .plan_run
                .execute(PlanRunCommand { project_id: project_id(pid)?, run_id: RunId::from_uuid(run_id)?, plan_json, actor })
                .await?;
            Ok(serde_json::to_value(plan)?)
        }

        ValidatedCommand::DryRun { project_id: pid, run_id } => {
            let run_id = RunId::from_uuid(run_id)?;
            let step_names = match app.plans.find_by_run_id(&run_id).await? {
                Some(plan) => step_names_from_plan(plan.plan_json()),
                None => Vec::new(),
            };
            let results =
                app.dry_run.execute(DryRunCommand { project_id: project_id(pid)?, run_id, step_names, actor }).await?;
            Ok(serde_json::to_value(results)?)
        }

        ValidatedCommand::AppendStepExecution { project_id: pid, run_id, step_name, status, result } => {
            let status: StepStatus = serde_json::from_value(serde_json::Value::String(status))?;
            let step = app
                .append_step_execution
                .execute(AppendStepExecutionCommand {
                    project_id: project_id(pid)?,
                    run_id: RunId::from_uuid(run_id)?,
                    step_name,
                    status,
                    started_at: None,
                    finished_at: None,
                    error_code: None,
                    error_message: None,
                    result,
                    actor,
                })
                .await?;
            Ok(serde_json::to_value(step)?)
        }

        ValidatedCommand::MintRunToken { run_id, dataset_version_id } => {
            let token = app
                .mint_run_token
                .execute(MintRunTokenCommand {
                    run_id: RunId::from_uuid(run_id)?,
                    dataset_version_id: dataset_version_id.map(DatasetVersionId::from_uuid).transpose()?,
                })
                .await?;
            Ok(serde_json::json!({ "run_token": token }))
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = match animus_bootstrap::parse_and_validate() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("argument error: {err}");
            return std::process::ExitCode::from(64);
        }
    };

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return animus_bootstrap::result_to_exit_code::<()>(Err(err)),
    };

    animus::infrastructure::logging::init(&config.log_level, config.log_format);

    let metrics = match Metrics::new() {
        Ok(metrics) => Arc::new(metrics),
        Err(err) => return animus_bootstrap::result_to_exit_code::<()>(Err(GovernanceError::internal(err.to_string()))),
    };

    let result = run(cli, &config, metrics).await;
    animus_bootstrap::result_to_exit_code(result)
}

async fn run(cli: ValidatedCli, config: &AppConfig, metrics: Arc<Metrics>) -> Result<(), GovernanceError> {
    let app = Application::wire(config, metrics).await?;
    let output = dispatch(&app, cli).await?;
    println!("{}", serde_json::to_string_pretty(&output).map_err(GovernanceError::from)?);
    Ok(())
}
