// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for [`Artifact`] records: immutable scope, mutable retention.

use async_trait::async_trait;

use crate::entities::Artifact;
use crate::repositories::Filter;
use crate::value_objects::ArtifactId;
use crate::GovernanceError;

#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    async fn create(&self, artifact: &Artifact) -> Result<(), GovernanceError>;

    async fn find_by_id(&self, artifact_id: &ArtifactId) -> Result<Option<Artifact>, GovernanceError>;

    async fn list(&self, filter: &Filter) -> Result<Vec<Artifact>, GovernanceError>;

    /// Persists a retention/legal-hold change. A record under legal hold
    /// must not also be deletable by any retention-sweep caller; enforcing
    /// that is this method's responsibility, not the domain entity's.
    async fn update_retention(&self, artifact_id: &ArtifactId, retention_until: Option<chrono::DateTime<chrono::Utc>>, legal_hold: bool) -> Result<Artifact, GovernanceError>;
}
