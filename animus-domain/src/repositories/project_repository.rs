// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for persisting and querying [`Project`] aggregates.

use async_trait::async_trait;

use crate::entities::Project;
use crate::value_objects::ProjectId;
use crate::GovernanceError;

/// Listing is unscoped by project since a Project is itself the scope root.
#[derive(Debug, Clone, Default)]
pub struct ProjectListFilter {
    pub include_archived: bool,
    pub limit: i64,
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Inserts a new project. Returns `Duplicate` if `(name)` already exists.
    async fn create(&self, project: &Project) -> Result<(), GovernanceError>;

    async fn find_by_id(&self, project_id: &ProjectId) -> Result<Option<Project>, GovernanceError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Project>, GovernanceError>;

    async fn list(&self, filter: &ProjectListFilter) -> Result<Vec<Project>, GovernanceError>;

    /// Flips status to `Archived`. Archiving is not a delete: history,
    /// lineage, and audit trail remain queryable.
    async fn archive(&self, project_id: &ProjectId) -> Result<(), GovernanceError>;
}
