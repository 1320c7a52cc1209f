// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! QualityRule entity: a named, immutable declarative check spec.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::rule_spec::RuleSpec;
use crate::value_objects::{integrity_sha256, ProjectId, QualityRuleId, Sha256Hex};
use crate::GovernanceError;

#[derive(Debug, Clone, Serialize)]
struct QualityRuleSemanticFields<'a> {
    rule_id: &'a QualityRuleId,
    project_id: &'a ProjectId,
    name: &'a str,
    spec: &'a RuleSpec,
    created_at: DateTime<Utc>,
    created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityRule {
    rule_id: QualityRuleId,
    project_id: ProjectId,
    name: String,
    spec: RuleSpec,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl QualityRule {
    pub fn create(
        rule_id: QualityRuleId,
        project_id: ProjectId,
        name: String,
        spec: RuleSpec,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        if name.trim().is_empty() {
            return Err(GovernanceError::invalid("rule name must not be empty"));
        }
        spec.validate()?;
        let integrity_sha256 = integrity_sha256(&QualityRuleSemanticFields {
            rule_id: &rule_id,
            project_id: &project_id,
            name: &name,
            spec: &spec,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self { rule_id, project_id, name, spec, created_at, created_by, integrity_sha256 })
    }

    pub fn id(&self) -> &QualityRuleId {
        &self.rule_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn integrity_sha256(&self) -> &Sha256Hex {
        &self.integrity_sha256
    }

    pub fn from_parts(
        rule_id: QualityRuleId,
        project_id: ProjectId,
        name: String,
        spec: RuleSpec,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self { rule_id, project_id, name, spec, created_at, created_by, integrity_sha256 }
    }
}
