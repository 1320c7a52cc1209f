// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Deterministic evaluation of a [`RuleSpec`] against the observed facts of
//! one DatasetVersion, producing a signed, persistable report.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::rule_spec::{Check, RuleSpec};
use crate::value_objects::Sha256Hex;
use crate::GovernanceError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub id: String,
    #[serde(rename = "type")]
    pub check_type: String,
    pub status: CheckStatus,
    pub message: Option<String>,
    pub observed: Option<Value>,
    pub expected: Option<Value>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub checks: Vec<CheckReport>,
    pub status: CheckStatus,
}

/// Observed facts the evaluator checks a rule spec against. All fields are
/// gathered up-front by the caller (the application layer reads the version
/// row and, for `verify_content_sha256`, restreams the object).
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub size_bytes: u64,
    pub content_type: String,
    pub filename: String,
    pub metadata: Value,
    pub csv_first_line: Option<String>,
    pub recorded_content_sha256: Sha256Hex,
    pub streamed_content_sha256: Option<Sha256Hex>,
}

/// Evaluates every check in declared order and rolls the overall status up:
/// `error` if any check errored, else `fail` if any failed, else `pass`.
pub fn evaluate(spec: &RuleSpec, ctx: &EvaluationContext) -> EvaluationReport {
    let checks: Vec<CheckReport> = spec.checks.iter().map(|check| evaluate_one(check, ctx)).collect();
    let status = if checks.iter().any(|c| c.status == CheckStatus::Error) {
        CheckStatus::Error
    } else if checks.iter().any(|c| c.status == CheckStatus::Fail) {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };
    EvaluationReport { checks, status }
}

fn evaluate_one(check: &Check, ctx: &EvaluationContext) -> CheckReport {
    let started = Instant::now();
    let (status, message, observed, expected) = run_check(check, ctx);
    CheckReport {
        id: check.id().to_string(),
        check_type: check.type_name().to_string(),
        status,
        message,
        observed,
        expected,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

type CheckRunOutcome = (CheckStatus, Option<String>, Option<Value>, Option<Value>);

fn run_check(check: &Check, ctx: &EvaluationContext) -> CheckRunOutcome {
    match check {
        Check::ObjectSizeBytes { min_bytes, max_bytes, .. } => {
            let within_min = min_bytes.is_none_or(|min| ctx.size_bytes >= min);
            let within_max = max_bytes.is_none_or(|max| ctx.size_bytes <= max);
            let pass = within_min && within_max;
            (
                status_for(pass),
                None,
                Some(Value::from(ctx.size_bytes)),
                Some(serde_json::json!({"min_bytes": min_bytes, "max_bytes": max_bytes})),
            )
        }
        Check::ContentTypeIn { allowed, .. } => {
            let pass = allowed.iter().any(|a| a.eq_ignore_ascii_case(&ctx.content_type));
            (status_for(pass), None, Some(Value::from(ctx.content_type.clone())), Some(Value::from(allowed.clone())))
        }
        Check::FilenameSuffixIn { allowed, .. } => {
            let lower = ctx.filename.to_ascii_lowercase();
            let pass = allowed.iter().any(|suffix| lower.ends_with(&suffix.to_ascii_lowercase()));
            (status_for(pass), None, Some(Value::from(ctx.filename.clone())), Some(Value::from(allowed.clone())))
        }
        Check::MetadataRequiredKeys { keys, .. } => {
            let missing: Vec<&String> = keys
                .iter()
                .filter(|k| !matches!(ctx.metadata.get(k.as_str()), Some(Value::String(s)) if !s.is_empty()))
                .collect();
            let pass = missing.is_empty();
            let message = if pass { None } else { Some(format!("missing keys: {missing:?}")) };
            (status_for(pass), message, Some(ctx.metadata.clone()), Some(Value::from(keys.clone())))
        }
        Check::CsvHeaderHasColumns { columns, delimiter, .. } => {
            let delimiter = delimiter.unwrap_or(',');
            match &ctx.csv_first_line {
                None => (CheckStatus::Error, Some("no csv header line available".into()), None, None),
                Some(line) => {
                    let header_cols: Vec<String> = line.split(delimiter).map(|c| c.trim().to_ascii_lowercase()).collect();
                    let missing: Vec<&String> = columns
                        .iter()
                        .filter(|want| !header_cols.contains(&want.to_ascii_lowercase()))
                        .collect();
                    let pass = missing.is_empty();
                    let message = if pass { None } else { Some(format!("missing columns: {missing:?}")) };
                    (status_for(pass), message, Some(Value::from(header_cols)), Some(Value::from(columns.clone())))
                }
            }
        }
        Check::VerifyContentSha256 { .. } => match &ctx.streamed_content_sha256 {
            None => (CheckStatus::Error, Some("content was not restreamed for verification".into()), None, None),
            Some(streamed) => {
                let pass = streamed == &ctx.recorded_content_sha256;
                (
                    status_for(pass),
                    None,
                    Some(Value::from(streamed.as_str().to_string())),
                    Some(Value::from(ctx.recorded_content_sha256.as_str().to_string())),
                )
            }
        },
        Check::ContentSha256In { allowed, .. } => {
            let pass = allowed.iter().any(|a| a.eq_ignore_ascii_case(ctx.recorded_content_sha256.as_str()));
            (
                status_for(pass),
                None,
                Some(Value::from(ctx.recorded_content_sha256.as_str().to_string())),
                Some(Value::from(allowed.clone())),
            )
        }
    }
}

fn status_for(pass: bool) -> CheckStatus {
    if pass {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    }
}

/// Serializes the report as canonical JSON for hashing and object-store
/// persistence.
pub fn report_to_canonical_bytes(report: &EvaluationReport) -> Result<Vec<u8>, GovernanceError> {
    crate::value_objects::to_canonical_bytes(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rule_spec::Check;

    fn ctx() -> EvaluationContext {
        EvaluationContext {
            size_bytes: 13,
            content_type: "text/plain".into(),
            filename: "file.txt".into(),
            metadata: serde_json::json!({}),
            csv_first_line: None,
            recorded_content_sha256: Sha256Hex::of(b"hello, world\n"),
            streamed_content_sha256: None,
        }
    }

    #[test]
    fn size_within_bounds_passes() {
        let spec = RuleSpec {
            schema: "animus.quality.rule.v1".into(),
            checks: vec![Check::ObjectSizeBytes { id: "sz".into(), min_bytes: None, max_bytes: Some(100) }],
        };
        let report = evaluate(&spec, &ctx());
        assert_eq!(report.status, CheckStatus::Pass);
    }

    #[test]
    fn size_exceeding_max_fails() {
        let spec = RuleSpec {
            schema: "animus.quality.rule.v1".into(),
            checks: vec![Check::ObjectSizeBytes { id: "sz".into(), min_bytes: None, max_bytes: Some(5) }],
        };
        let report = evaluate(&spec, &ctx());
        assert_eq!(report.status, CheckStatus::Fail);
    }

    #[test]
    fn unavailable_csv_header_errors() {
        let spec = RuleSpec {
            schema: "animus.quality.rule.v1".into(),
            checks: vec![Check::CsvHeaderHasColumns { id: "hdr".into(), columns: vec!["a".into()], delimiter: None }],
        };
        let report = evaluate(&spec, &ctx());
        assert_eq!(report.status, CheckStatus::Error);
    }
}
