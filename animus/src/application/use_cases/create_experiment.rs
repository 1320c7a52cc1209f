// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Create-experiment use case: requires the parent project to exist;
//! `(project_id, name)` uniqueness is enforced by the repository.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, Experiment};
use animus_domain::repositories::AuditRepository;
use animus_domain::value_objects::ExperimentId;
use animus_domain::GovernanceError;
use chrono::Utc;

use crate::application::commands::CreateExperimentCommand;
use crate::infrastructure::repositories::postgres::{PostgresExperimentRepository, PostgresProjectRepository};

pub struct CreateExperimentUseCase {
    experiments: Arc<PostgresExperimentRepository>,
    projects: Arc<PostgresProjectRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl CreateExperimentUseCase {
    pub fn new(
        experiments: Arc<PostgresExperimentRepository>,
        projects: Arc<PostgresProjectRepository>,
        audit: Arc<dyn AuditRepository>,
    ) -> Self {
        Self { experiments, projects, audit }
    }

    pub async fn execute(&self, cmd: CreateExperimentCommand) -> Result<Experiment, GovernanceError> {
        self.projects
            .find_by_id(&cmd.project_id)
            .await?
            .ok_or_else(|| GovernanceError::not_found(format!("project {} not found", cmd.project_id)))?;

        let experiment_id = ExperimentId::new();
        let created_at = Utc::now();
        let experiment = Experiment::create(
            experiment_id.clone(),
            cmd.project_id.clone(),
            cmd.name,
            cmd.description,
            cmd.metadata,
            cmd.actor.actor.clone(),
            created_at,
        )?;

        self.experiments.create(&experiment).await?;

        let event = AuditEvent::new(
            created_at,
            cmd.actor.actor,
            "experiment.create".into(),
            "experiment".into(),
            experiment_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip,
            cmd.actor.user_agent,
            serde_json::json!({ "name": experiment.name() }),
        )?;
        self.audit.record(&cmd.project_id, &event).await?;

        Ok(experiment)
    }
}
