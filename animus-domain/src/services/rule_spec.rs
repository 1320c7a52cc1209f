// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `animus.quality.rule.v1` rule spec: declarative checks a QualityRule
//! carries, validated here and evaluated by
//! [`crate::services::quality_evaluator`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::GovernanceError;

const SCHEMA_V1: &str = "animus.quality.rule.v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    ObjectSizeBytes {
        id: String,
        #[serde(default)]
        min_bytes: Option<u64>,
        #[serde(default)]
        max_bytes: Option<u64>,
    },
    ContentTypeIn {
        id: String,
        allowed: Vec<String>,
    },
    FilenameSuffixIn {
        id: String,
        allowed: Vec<String>,
    },
    MetadataRequiredKeys {
        id: String,
        keys: Vec<String>,
    },
    CsvHeaderHasColumns {
        id: String,
        columns: Vec<String>,
        #[serde(default)]
        delimiter: Option<char>,
    },
    VerifyContentSha256 {
        id: String,
    },
    ContentSha256In {
        id: String,
        allowed: Vec<String>,
    },
}

impl Check {
    pub fn id(&self) -> &str {
        match self {
            Check::ObjectSizeBytes { id, .. }
            | Check::ContentTypeIn { id, .. }
            | Check::FilenameSuffixIn { id, .. }
            | Check::MetadataRequiredKeys { id, .. }
            | Check::CsvHeaderHasColumns { id, .. }
            | Check::VerifyContentSha256 { id }
            | Check::ContentSha256In { id, .. } => id,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Check::ObjectSizeBytes { .. } => "object_size_bytes",
            Check::ContentTypeIn { .. } => "content_type_in",
            Check::FilenameSuffixIn { .. } => "filename_suffix_in",
            Check::MetadataRequiredKeys { .. } => "metadata_required_keys",
            Check::CsvHeaderHasColumns { .. } => "csv_header_has_columns",
            Check::VerifyContentSha256 { .. } => "verify_content_sha256",
            Check::ContentSha256In { .. } => "content_sha256_in",
        }
    }

    fn validate(&self) -> Result<(), GovernanceError> {
        if self.id().trim().is_empty() {
            return Err(GovernanceError::invalid("check id must not be empty"));
        }
        match self {
            Check::ObjectSizeBytes { min_bytes, max_bytes, .. } => {
                if let (Some(min), Some(max)) = (min_bytes, max_bytes) {
                    if min > max {
                        return Err(GovernanceError::invalid("object_size_bytes: min_bytes must be <= max_bytes"));
                    }
                }
                if min_bytes.is_none() && max_bytes.is_none() {
                    return Err(GovernanceError::invalid("object_size_bytes: at least one of min_bytes/max_bytes is required"));
                }
            }
            Check::ContentTypeIn { allowed, .. } | Check::FilenameSuffixIn { allowed, .. } => {
                if allowed.is_empty() {
                    return Err(GovernanceError::invalid(format!("{}: allowed must not be empty", self.type_name())));
                }
            }
            Check::MetadataRequiredKeys { keys, .. } => {
                if keys.is_empty() {
                    return Err(GovernanceError::invalid("metadata_required_keys: keys must not be empty"));
                }
            }
            Check::CsvHeaderHasColumns { columns, delimiter, .. } => {
                if columns.is_empty() {
                    return Err(GovernanceError::invalid("csv_header_has_columns: columns must not be empty"));
                }
                if delimiter.is_some_and(|d| d.len_utf8() != 1) {
                    return Err(GovernanceError::invalid("csv_header_has_columns: delimiter must be a single char"));
                }
            }
            Check::ContentSha256In { allowed, .. } => {
                if allowed.is_empty() {
                    return Err(GovernanceError::invalid("content_sha256_in: allowed must not be empty"));
                }
                for hash in allowed {
                    if hash.len() != 64 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
                        return Err(GovernanceError::invalid(format!("content_sha256_in: not a 64-char hex digest: {hash}")));
                    }
                }
            }
            Check::VerifyContentSha256 { .. } => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub schema: String,
    pub checks: Vec<Check>,
}

impl RuleSpec {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.schema != SCHEMA_V1 {
            return Err(GovernanceError::invalid(format!("unsupported rule schema: {}", self.schema)));
        }
        if self.checks.is_empty() {
            return Err(GovernanceError::invalid("rule spec must declare at least one check"));
        }
        let mut seen = HashSet::new();
        for check in &self.checks {
            check.validate()?;
            if !seen.insert(check.id().to_string()) {
                return Err(GovernanceError::invalid(format!("duplicate check id: {}", check.id())));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(checks: Vec<Check>) -> RuleSpec {
        RuleSpec { schema: SCHEMA_V1.to_string(), checks }
    }

    #[test]
    fn rejects_unknown_schema() {
        let s = RuleSpec { schema: "other".into(), checks: vec![] };
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let s = spec(vec![
            Check::VerifyContentSha256 { id: "a".into() },
            Check::VerifyContentSha256 { id: "a".into() },
        ]);
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_inverted_size_bounds() {
        let s = spec(vec![Check::ObjectSizeBytes { id: "sz".into(), min_bytes: Some(10), max_bytes: Some(5) }]);
        assert!(s.validate().is_err());
    }

    #[test]
    fn accepts_valid_spec() {
        let s = spec(vec![Check::ObjectSizeBytes { id: "sz".into(), min_bytes: None, max_bytes: Some(100) }]);
        assert!(s.validate().is_ok());
    }
}
