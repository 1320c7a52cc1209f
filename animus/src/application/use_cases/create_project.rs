// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Create-project use case: validates the name, persists the project, and
//! writes the audit trail in one logical unit.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, Project};
use animus_domain::repositories::AuditRepository;
use animus_domain::value_objects::ProjectId;
use animus_domain::GovernanceError;
use chrono::Utc;
use tracing::info;

use crate::application::commands::CreateProjectCommand;
use crate::infrastructure::repositories::postgres::PostgresProjectRepository;

pub struct CreateProjectUseCase {
    projects: Arc<PostgresProjectRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl CreateProjectUseCase {
    pub fn new(projects: Arc<PostgresProjectRepository>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { projects, audit }
    }

    pub async fn execute(&self, cmd: CreateProjectCommand) -> Result<Project, GovernanceError> {
        let project_id = ProjectId::new();
        let created_at = Utc::now();
        let project = Project::create(
            project_id.clone(),
            cmd.name,
            cmd.description,
            cmd.metadata,
            cmd.actor.actor.clone(),
            created_at,
        )?;

        self.projects.create(&project).await?;

        let event = AuditEvent::new(
            created_at,
            cmd.actor.actor,
            "project.create".into(),
            "project".into(),
            project_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip,
            cmd.actor.user_agent,
            serde_json::json!({ "name": project.name() }),
        )?;
        self.audit.record(&project_id, &event).await?;

        info!(project_id = %project_id, "project created");
        Ok(project)
    }
}
