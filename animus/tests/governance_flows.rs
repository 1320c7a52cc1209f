// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end coverage of the control plane's governance contracts against
//! a real Postgres schema: upload-and-gate, idempotent run creation, and
//! run-token issuance. Every test provisions its own ephemeral database via
//! `#[sqlx::test]` and needs `DATABASE_URL` pointed at a reachable server.

mod common;

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use animus::application::commands::{
    CreateDatasetCommand, CreatePipelineRunCommand, CreateProjectCommand, CreateQualityEvaluationCommand,
    CreateQualityRuleCommand, GetGateStatusQuery, MintRunTokenCommand, UploadDatasetVersionCommand,
};
use animus::application::use_cases::{
    CreateDatasetUseCase, CreatePipelineRunUseCase, CreateProjectUseCase, CreateQualityEvaluationUseCase,
    CreateQualityRuleUseCase, GetGateStatusUseCase, MintRunTokenUseCase, UploadDatasetVersionUseCase,
};
use animus::infrastructure::audit::MetricsAuditRepository;
use animus::infrastructure::metrics::Metrics;
use animus::infrastructure::repositories::postgres;
use animus_domain::repositories::ObjectStore;
use animus_domain::services::gate::GateDecision;
use animus_domain::services::rule_spec::{Check, RuleSpec};
use animus_domain::services::run_token::{verify_run_token, VerifyOutcome};
use animus_domain::GovernanceError;

use common::{actor, InMemoryObjectStore};

fn test_audit_metrics(pool: &PgPool) -> Arc<MetricsAuditRepository> {
    let inner: Arc<dyn animus_domain::repositories::AuditRepository> = Arc::new(postgres::PostgresAuditRepository::new(pool.clone()));
    let metrics = Arc::new(Metrics::new().expect("metrics register cleanly"));
    Arc::new(MetricsAuditRepository::new(inner, metrics))
}

async fn seed_project_and_dataset(pool: &PgPool) -> (animus_domain::value_objects::ProjectId, animus_domain::value_objects::DatasetId) {
    let projects = Arc::new(postgres::PostgresProjectRepository::new(pool.clone()));
    let datasets = Arc::new(postgres::PostgresDatasetRepository::new(pool.clone()));
    let audit: Arc<dyn animus_domain::repositories::AuditRepository> = Arc::new(postgres::PostgresAuditRepository::new(pool.clone()));

    let create_project = CreateProjectUseCase::new(projects.clone(), audit.clone());
    let project = create_project
        .execute(CreateProjectCommand {
            name: "ml-governance".into(),
            description: None,
            metadata: serde_json::json!({}),
            actor: actor("alice"),
        })
        .await
        .unwrap();

    let create_dataset = CreateDatasetUseCase::new(datasets, projects, audit);
    let dataset = create_dataset
        .execute(CreateDatasetCommand {
            project_id: project.id().clone(),
            name: "training-data".into(),
            description: None,
            metadata: serde_json::json!({}),
            actor: actor("alice"),
        })
        .await
        .unwrap();

    (project.id().clone(), dataset.id().clone())
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn upload_then_duplicate_content_is_rejected(pool: PgPool) {
    sqlx::migrate!("../migrations").run(&pool).await.unwrap();
    let (project_id, dataset_id) = seed_project_and_dataset(&pool).await;

    let versions = Arc::new(postgres::PostgresDatasetVersionRepository::new(pool.clone()));
    let rules = Arc::new(postgres::PostgresQualityRuleRepository::new(pool.clone()));
    let audit = test_audit_metrics(&pool);
    let object_store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());

    let upload = UploadDatasetVersionUseCase::new(versions, rules, object_store.clone(), audit, 512, Duration::from_secs(300));

    let first = upload
        .execute(UploadDatasetVersionCommand {
            project_id: project_id.clone(),
            dataset_id: dataset_id.clone(),
            quality_rule_id: None,
            metadata: serde_json::json!({}),
            filename: "train.csv".into(),
            content_type: Some("text/csv".into()),
            body: Cursor::new(b"a,b,c\n1,2,3\n".to_vec()),
            actor: actor("alice"),
        })
        .await
        .unwrap();
    assert_eq!(first.ordinal().value(), 1);
    assert!(object_store.stat(first.object_key()).await.unwrap().is_some());

    let duplicate = upload
        .execute(UploadDatasetVersionCommand {
            project_id,
            dataset_id,
            quality_rule_id: None,
            metadata: serde_json::json!({}),
            filename: "train-copy.csv".into(),
            content_type: Some("text/csv".into()),
            body: Cursor::new(b"a,b,c\n1,2,3\n".to_vec()),
            actor: actor("alice"),
        })
        .await;

    assert!(matches!(duplicate, Err(GovernanceError::Conflict(reason)) if reason == "duplicate_content"));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn gate_status_with_no_rule_bound(pool: PgPool) {
    sqlx::migrate!("../migrations").run(&pool).await.unwrap();
    let (project_id, dataset_id) = seed_project_and_dataset(&pool).await;

    let versions = Arc::new(postgres::PostgresDatasetVersionRepository::new(pool.clone()));
    let rules = Arc::new(postgres::PostgresQualityRuleRepository::new(pool.clone()));
    let evaluations = Arc::new(postgres::PostgresQualityEvaluationRepository::new(pool.clone()));
    let audit = test_audit_metrics(&pool);
    let object_store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());

    let upload = UploadDatasetVersionUseCase::new(versions.clone(), rules, object_store, audit, 512, Duration::from_secs(300));
    let version = upload
        .execute(UploadDatasetVersionCommand {
            project_id: project_id.clone(),
            dataset_id,
            quality_rule_id: None,
            metadata: serde_json::json!({}),
            filename: "unrated.csv".into(),
            content_type: None,
            body: Cursor::new(b"x\n1\n".to_vec()),
            actor: actor("alice"),
        })
        .await
        .unwrap();

    let get_gate_status = GetGateStatusUseCase::new(versions, evaluations);
    let gate = get_gate_status
        .execute(GetGateStatusQuery { project_id, dataset_version_id: version.id().clone() })
        .await
        .unwrap();

    assert_eq!(gate.status, GateDecision::NoRule);
    assert!(!gate.allows_download());
}

async fn upload_with_rule(
    pool: &PgPool,
    project_id: &animus_domain::value_objects::ProjectId,
    dataset_id: &animus_domain::value_objects::DatasetId,
    spec: RuleSpec,
    content: &[u8],
) -> (
    animus_domain::entities::DatasetVersion,
    animus_domain::value_objects::QualityRuleId,
    Arc<dyn ObjectStore>,
    Arc<postgres::PostgresDatasetVersionRepository>,
    Arc<postgres::PostgresQualityRuleRepository>,
    Arc<postgres::PostgresQualityEvaluationRepository>,
    Arc<MetricsAuditRepository>,
) {
    let versions = Arc::new(postgres::PostgresDatasetVersionRepository::new(pool.clone()));
    let rules = Arc::new(postgres::PostgresQualityRuleRepository::new(pool.clone()));
    let evaluations = Arc::new(postgres::PostgresQualityEvaluationRepository::new(pool.clone()));
    let audit = test_audit_metrics(pool);
    let object_store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());

    let create_rule = CreateQualityRuleUseCase::new(rules.clone(), audit.clone());
    let rule = create_rule
        .execute(CreateQualityRuleCommand { project_id: project_id.clone(), name: "csv-columns".into(), spec, actor: actor("alice") })
        .await
        .unwrap();

    let upload =
        UploadDatasetVersionUseCase::new(versions.clone(), rules.clone(), object_store.clone(), audit.clone(), 512, Duration::from_secs(300));
    let version = upload
        .execute(UploadDatasetVersionCommand {
            project_id: project_id.clone(),
            dataset_id: dataset_id.clone(),
            quality_rule_id: Some(*rule.id()),
            metadata: serde_json::json!({}),
            filename: "rated.csv".into(),
            content_type: Some("text/csv".into()),
            body: Cursor::new(content.to_vec()),
            actor: actor("alice"),
        })
        .await
        .unwrap();

    (version, *rule.id(), object_store, versions, rules, evaluations, audit)
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn gate_passes_after_a_passing_evaluation(pool: PgPool) {
    sqlx::migrate!("../migrations").run(&pool).await.unwrap();
    let (project_id, dataset_id) = seed_project_and_dataset(&pool).await;

    let spec = RuleSpec {
        schema: "animus.quality.rule.v1".into(),
        checks: vec![Check::CsvHeaderHasColumns { id: "has_abc".into(), columns: vec!["a".into(), "b".into(), "c".into()], delimiter: None }],
    };
    let (version, rule_id, object_store, versions, rules, evaluations, audit) =
        upload_with_rule(&pool, &project_id, &dataset_id, spec, b"a,b,c\n1,2,3\n").await;

    let create_evaluation = CreateQualityEvaluationUseCase::new(versions.clone(), rules, evaluations.clone(), object_store, audit);
    let evaluation = create_evaluation
        .execute(CreateQualityEvaluationCommand { project_id: project_id.clone(), dataset_version_id: version.id().clone(), rule_id, actor: actor("alice") })
        .await
        .unwrap();
    assert_eq!(evaluation.status(), animus_domain::entities::EvaluationStatus::Pass);

    let get_gate_status = GetGateStatusUseCase::new(versions, evaluations);
    let gate = get_gate_status.execute(GetGateStatusQuery { project_id, dataset_version_id: version.id().clone() }).await.unwrap();

    assert_eq!(gate.status, GateDecision::Pass);
    assert!(gate.allows_download());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn gate_fails_after_a_failing_evaluation_and_blocks_download(pool: PgPool) {
    sqlx::migrate!("../migrations").run(&pool).await.unwrap();
    let (project_id, dataset_id) = seed_project_and_dataset(&pool).await;

    let spec = RuleSpec {
        schema: "animus.quality.rule.v1".into(),
        checks: vec![Check::CsvHeaderHasColumns { id: "has_z".into(), columns: vec!["z".into()], delimiter: None }],
    };
    let (version, rule_id, object_store, versions, rules, evaluations, audit) =
        upload_with_rule(&pool, &project_id, &dataset_id, spec, b"a,b,c\n1,2,3\n").await;

    let create_evaluation = CreateQualityEvaluationUseCase::new(versions.clone(), rules, evaluations.clone(), object_store.clone(), audit.clone());
    let evaluation = create_evaluation
        .execute(CreateQualityEvaluationCommand { project_id: project_id.clone(), dataset_version_id: version.id().clone(), rule_id, actor: actor("alice") })
        .await
        .unwrap();
    assert_eq!(evaluation.status(), animus_domain::entities::EvaluationStatus::Fail);

    let get_gate_status = GetGateStatusUseCase::new(versions.clone(), evaluations.clone());
    let gate = get_gate_status.execute(GetGateStatusQuery { project_id: project_id.clone(), dataset_version_id: version.id().clone() }).await.unwrap();
    assert_eq!(gate.status, GateDecision::Fail);
    assert!(!gate.allows_download());

    let download_audit: Arc<dyn animus_domain::repositories::AuditRepository> = audit;
    let download = animus::application::use_cases::DownloadDatasetVersionUseCase::new(
        versions,
        evaluations,
        object_store,
        download_audit,
        Duration::from_secs(300),
    );
    let result = download
        .execute(animus::application::commands::DownloadDatasetVersionCommand { project_id, version_id: version.id().clone(), actor: actor("alice") })
        .await;
    assert!(matches!(result, Err(GovernanceError::Conflict(reason)) if reason == "quality_gate_failed"));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn pipeline_run_creation_is_idempotent_on_project_and_key(pool: PgPool) {
    sqlx::migrate!("../migrations").run(&pool).await.unwrap();
    let (project_id, _dataset_id) = seed_project_and_dataset(&pool).await;

    let runs = Arc::new(postgres::PostgresRunRepository::new(pool.clone()));
    let audit: Arc<dyn animus_domain::repositories::AuditRepository> = Arc::new(postgres::PostgresAuditRepository::new(pool.clone()));
    let create_run = CreatePipelineRunUseCase::new(runs, audit);

    let pipeline_spec = serde_json::json!({ "steps": ["extract", "transform", "load"] });
    let run_spec = serde_json::json!({ "environment": "staging" });

    let first = create_run
        .execute(CreatePipelineRunCommand {
            project_id: project_id.clone(),
            idempotency_key: "nightly-2026-07-26".into(),
            pipeline_spec: pipeline_spec.clone(),
            run_spec: run_spec.clone(),
            actor: actor("scheduler"),
        })
        .await
        .unwrap();

    let replay = create_run
        .execute(CreatePipelineRunCommand {
            project_id,
            idempotency_key: "nightly-2026-07-26".into(),
            pipeline_spec,
            run_spec,
            actor: actor("scheduler"),
        })
        .await
        .unwrap();

    assert_eq!(first.id(), replay.id());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn run_token_mints_and_verifies_against_its_run(pool: PgPool) {
    sqlx::migrate!("../migrations").run(&pool).await.unwrap();
    let (project_id, _dataset_id) = seed_project_and_dataset(&pool).await;

    let runs = Arc::new(postgres::PostgresRunRepository::new(pool.clone()));
    let audit: Arc<dyn animus_domain::repositories::AuditRepository> = Arc::new(postgres::PostgresAuditRepository::new(pool.clone()));
    let create_run = CreatePipelineRunUseCase::new(runs.clone(), audit);

    let run = create_run
        .execute(CreatePipelineRunCommand {
            project_id,
            idempotency_key: "token-lifecycle".into(),
            pipeline_spec: serde_json::json!({ "steps": [] }),
            run_spec: serde_json::json!({}),
            actor: actor("scheduler"),
        })
        .await
        .unwrap();

    let secret = b"test-run-token-secret".to_vec();
    let mint_run_token = MintRunTokenUseCase::new(runs, secret.clone(), 3600);
    let token = mint_run_token.execute(MintRunTokenCommand { run_id: run.id().clone(), dataset_version_id: None }).await.unwrap();

    match verify_run_token(&secret, &token, chrono::Utc::now().timestamp()) {
        VerifyOutcome::Valid(claims) => assert_eq!(claims.run_id, *run.id()),
        VerifyOutcome::Expired => panic!("expected a valid token, got Expired"),
        VerifyOutcome::Malformed => panic!("expected a valid token, got Malformed"),
    }

    match verify_run_token(&secret, &token, chrono::Utc::now().timestamp() + 7200) {
        VerifyOutcome::Expired => {}
        VerifyOutcome::Valid(_) => panic!("expected the token to be expired once its ttl elapses"),
        VerifyOutcome::Malformed => panic!("expected Expired, got Malformed"),
    }
}
