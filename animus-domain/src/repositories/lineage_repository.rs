// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for the append-only [`LineageEvent`] graph backing reproducibility
//! queries.

use async_trait::async_trait;

use crate::entities::{EntityRef, LineageEvent};
use crate::GovernanceError;

#[async_trait]
pub trait LineageRepository: Send + Sync {
    async fn record(&self, event: &LineageEvent) -> Result<(), GovernanceError>;

    /// All edges where `entity` appears as either subject or object, the
    /// traversal primitive the lineage-query use case walks outward from.
    async fn edges_touching(&self, entity: &EntityRef) -> Result<Vec<LineageEvent>, GovernanceError>;
}
