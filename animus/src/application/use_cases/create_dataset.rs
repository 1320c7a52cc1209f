// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Create-dataset use case: requires the parent project to exist;
//! `(project_id, name)` uniqueness is enforced by the repository.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, Dataset};
use animus_domain::repositories::AuditRepository;
use animus_domain::value_objects::DatasetId;
use animus_domain::GovernanceError;
use chrono::Utc;

use crate::application::commands::CreateDatasetCommand;
use crate::infrastructure::repositories::postgres::{PostgresDatasetRepository, PostgresProjectRepository};

pub struct CreateDatasetUseCase {
    datasets: Arc<PostgresDatasetRepository>,
    projects: Arc<PostgresProjectRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl CreateDatasetUseCase {
    pub fn new(
        datasets: Arc<PostgresDatasetRepository>,
        projects: Arc<PostgresProjectRepository>,
        audit: Arc<dyn AuditRepository>,
    ) -> Self {
        Self { datasets, projects, audit }
    }

    pub async fn execute(&self, cmd: CreateDatasetCommand) -> Result<Dataset, GovernanceError> {
        self.projects
            .find_by_id(&cmd.project_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("project {} not found", cmd.project_id)))?;

        let dataset_id = DatasetId::new();
        let created_at = Utc::now();
        let dataset = Dataset::create(
            dataset_id.clone(),
            cmd.project_id.clone(),
            cmd.name,
            cmd.description,
            cmd.metadata,
            cmd.actor.actor.clone(),
            created_at,
        )?;

        self.datasets.create(&dataset).await?;

        let event = AuditEvent::new(
            created_at,
            cmd.actor.actor,
            "dataset.create".into(),
            "dataset".into(),
            dataset_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip,
            cmd.actor.user_agent,
            serde_json::json!({ "name": dataset.name() }),
        )?;
        self.audit.record(&cmd.project_id, &event).await?;

        Ok(dataset)
    }
}
