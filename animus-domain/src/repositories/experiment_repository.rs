// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for persisting and querying [`Experiment`] entities.

use async_trait::async_trait;

use crate::entities::Experiment;
use crate::repositories::Filter;
use crate::value_objects::ExperimentId;
use crate::GovernanceError;

#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    async fn create(&self, experiment: &Experiment) -> Result<(), GovernanceError>;

    async fn find_by_id(&self, experiment_id: &ExperimentId) -> Result<Option<Experiment>, GovernanceError>;

    async fn list(&self, filter: &Filter) -> Result<Vec<Experiment>, GovernanceError>;
}
