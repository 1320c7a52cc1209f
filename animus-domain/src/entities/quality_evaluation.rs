// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! QualityEvaluation entity: an immutable record of evaluating one
//! QualityRule against one DatasetVersion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{integrity_sha256, DatasetVersionId, ProjectId, QualityEvaluationId, QualityRuleId, Sha256Hex};
use crate::GovernanceError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Pass,
    Fail,
    Error,
}

impl EvaluationStatus {
    /// Case-insensitive parse, matching the gate's `not pass (case-insensitive)` rule.
    pub fn parse_case_insensitive(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct QualityEvaluationSemanticFields<'a> {
    evaluation_id: &'a QualityEvaluationId,
    project_id: &'a ProjectId,
    dataset_version_id: &'a DatasetVersionId,
    rule_id: &'a QualityRuleId,
    status: EvaluationStatus,
    evaluated_at: DateTime<Utc>,
    summary: &'a Value,
    report_object_key: &'a str,
    report_sha256: &'a Sha256Hex,
    report_size_bytes: i64,
    created_at: DateTime<Utc>,
    created_by: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityEvaluation {
    evaluation_id: QualityEvaluationId,
    project_id: ProjectId,
    dataset_version_id: DatasetVersionId,
    rule_id: QualityRuleId,
    status: EvaluationStatus,
    evaluated_at: DateTime<Utc>,
    summary: Value,
    report_object_key: String,
    report_sha256: Sha256Hex,
    report_size_bytes: i64,
    created_at: DateTime<Utc>,
    created_by: String,
    integrity_sha256: Sha256Hex,
}

impl QualityEvaluation {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        evaluation_id: QualityEvaluationId,
        project_id: ProjectId,
        dataset_version_id: DatasetVersionId,
        rule_id: QualityRuleId,
        status: EvaluationStatus,
        evaluated_at: DateTime<Utc>,
        summary: Value,
        report_object_key: String,
        report_sha256: Sha256Hex,
        report_size_bytes: i64,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        if evaluated_at > created_at {
            return Err(GovernanceError::invalid("evaluated_at cannot be in the future"));
        }
        let integrity_sha256 = integrity_sha256(&QualityEvaluationSemanticFields {
            evaluation_id: &evaluation_id,
            project_id: &project_id,
            dataset_version_id: &dataset_version_id,
            rule_id: &rule_id,
            status,
            evaluated_at,
            summary: &summary,
            report_object_key: &report_object_key,
            report_sha256: &report_sha256,
            report_size_bytes,
            created_at,
            created_by: &created_by,
        })?;
        Ok(Self {
            evaluation_id,
            project_id,
            dataset_version_id,
            rule_id,
            status,
            evaluated_at,
            summary,
            report_object_key,
            report_sha256,
            report_size_bytes,
            created_at,
            created_by,
            integrity_sha256,
        })
    }

    pub fn id(&self) -> &QualityEvaluationId {
        &self.evaluation_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn dataset_version_id(&self) -> &DatasetVersionId {
        &self.dataset_version_id
    }

    pub fn rule_id(&self) -> &QualityRuleId {
        &self.rule_id
    }

    pub fn status(&self) -> EvaluationStatus {
        self.status
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }

    pub fn summary(&self) -> &Value {
        &self.summary
    }

    pub fn report_object_key(&self) -> &str {
        &self.report_object_key
    }

    pub fn report_sha256(&self) -> &Sha256Hex {
        &self.report_sha256
    }

    pub fn report_size_bytes(&self) -> i64 {
        self.report_size_bytes
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

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        evaluation_id: QualityEvaluationId,
        project_id: ProjectId,
        dataset_version_id: DatasetVersionId,
        rule_id: QualityRuleId,
        status: EvaluationStatus,
        evaluated_at: DateTime<Utc>,
        summary: Value,
        report_object_key: String,
        report_sha256: Sha256Hex,
        report_size_bytes: i64,
        created_at: DateTime<Utc>,
        created_by: String,
        integrity_sha256: Sha256Hex,
    ) -> Self {
        Self {
            evaluation_id,
            project_id,
            dataset_version_id,
            rule_id,
            status,
            evaluated_at,
            summary,
            report_object_key,
            report_sha256,
            report_size_bytes,
            created_at,
            created_by,
            integrity_sha256,
        }
    }
}
