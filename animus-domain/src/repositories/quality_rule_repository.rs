// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for persisting and querying [`QualityRule`] specs.

use async_trait::async_trait;

use crate::entities::QualityRule;
use crate::repositories::Filter;
use crate::value_objects::QualityRuleId;
use crate::GovernanceError;

#[async_trait]
pub trait QualityRuleRepository: Send + Sync {
    async fn create(&self, rule: &QualityRule) -> Result<(), GovernanceError>;

    async fn find_by_id(&self, rule_id: &QualityRuleId) -> Result<Option<QualityRule>, GovernanceError>;

    async fn list(&self, filter: &Filter) -> Result<Vec<QualityRule>, GovernanceError>;
}
