// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Quality-gate decision derived from a DatasetVersion's bound rule and the
//! latest evaluation against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::EvaluationStatus;
use crate::value_objects::{QualityEvaluationId, QualityRuleId};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    NoRule,
    NotEvaluated,
    Pass,
    Fail,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateStatus {
    pub status: GateDecision,
    pub rule_id: Option<QualityRuleId>,
    pub evaluation_id: Option<QualityEvaluationId>,
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl GateStatus {
    pub fn no_rule() -> Self {
        Self { status: GateDecision::NoRule, rule_id: None, evaluation_id: None, evaluated_at: None }
    }

    pub fn not_evaluated(rule_id: QualityRuleId) -> Self {
        Self { status: GateDecision::NotEvaluated, rule_id: Some(rule_id), evaluation_id: None, evaluated_at: None }
    }

    pub fn allows_download(&self) -> bool {
        matches!(self.status, GateDecision::Pass)
    }
}

/// Derives the gate decision from a version's bound rule (if any) and its
/// latest evaluation (by `evaluated_at DESC`, if any).
pub fn derive_gate_status(
    rule_id: Option<QualityRuleId>,
    latest_evaluation: Option<(QualityEvaluationId, EvaluationStatus, DateTime<Utc>)>,
) -> GateStatus {
    let Some(rule_id) = rule_id else {
        return GateStatus::no_rule();
    };
    let Some((evaluation_id, status, evaluated_at)) = latest_evaluation else {
        return GateStatus::not_evaluated(rule_id);
    };
    let status = match status {
        EvaluationStatus::Pass => GateDecision::Pass,
        EvaluationStatus::Fail => GateDecision::Fail,
        EvaluationStatus::Error => GateDecision::Error,
    };
    GateStatus { status, rule_id: Some(rule_id), evaluation_id: Some(evaluation_id), evaluated_at: Some(evaluated_at) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{QualityEvaluationId, QualityRuleId};

    #[test]
    fn no_rule_blocks() {
        let gate = derive_gate_status(None, None);
        assert!(!gate.allows_download());
        assert_eq!(gate.status, GateDecision::NoRule);
    }

    #[test]
    fn rule_without_evaluation_blocks() {
        let gate = derive_gate_status(Some(QualityRuleId::new()), None);
        assert_eq!(gate.status, GateDecision::NotEvaluated);
    }

    #[test]
    fn passing_evaluation_allows_download() {
        let gate = derive_gate_status(
            Some(QualityRuleId::new()),
            Some((QualityEvaluationId::new(), EvaluationStatus::Pass, Utc::now())),
        );
        assert!(gate.allows_download());
    }
}
