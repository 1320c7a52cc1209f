// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for persisting and querying [`Dataset`] entities.

use async_trait::async_trait;

use crate::entities::Dataset;
use crate::repositories::Filter;
use crate::value_objects::DatasetId;
use crate::GovernanceError;

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Inserts a dataset. Returns `Duplicate` if `(project_id, name)` exists.
    async fn create(&self, dataset: &Dataset) -> Result<(), GovernanceError>;

    async fn find_by_id(&self, dataset_id: &DatasetId) -> Result<Option<Dataset>, GovernanceError>;

    async fn find_by_name(&self, filter: &Filter, name: &str) -> Result<Option<Dataset>, GovernanceError>;

    async fn list(&self, filter: &Filter) -> Result<Vec<Dataset>, GovernanceError>;
}
