// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Create-quality-rule use case: validates the check spec and persists it as
//! an immutable, named rule.

use std::sync::Arc;

use animus_domain::entities::{AuditEvent, QualityRule};
use animus_domain::repositories::AuditRepository;
use animus_domain::value_objects::QualityRuleId;
use animus_domain::GovernanceError;
use chrono::Utc;

use crate::application::commands::CreateQualityRuleCommand;
use crate::infrastructure::repositories::postgres::PostgresQualityRuleRepository;

pub struct CreateQualityRuleUseCase {
    rules: Arc<PostgresQualityRuleRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl CreateQualityRuleUseCase {
    pub fn new(rules: Arc<PostgresQualityRuleRepository>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { rules, audit }
    }

    pub async fn execute(&self, cmd: CreateQualityRuleCommand) -> Result<QualityRule, GovernanceError> {
        let rule_id = QualityRuleId::new();
        let created_at = Utc::now();
        let rule = QualityRule::create(rule_id, cmd.project_id.clone(), cmd.name, cmd.spec, cmd.actor.actor.clone(), created_at)?;

        self.rules.create(&rule).await?;

        let event = AuditEvent::new(
            created_at,
            cmd.actor.actor,
            "quality_rule.create".into(),
            "quality_rule".into(),
            rule_id.to_string(),
            cmd.actor.request_id,
            cmd.actor.ip,
            cmd.actor.user_agent,
            serde_json::json!({ "name": rule.name() }),
        )?;
        self.audit.record(&cmd.project_id, &event).await?;

        Ok(rule)
    }
}
