// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Secure Command-Line Argument Parsing
//!
//! Security-first validation for the admin CLI's arguments. Names and
//! metadata strings typed here end up in audit payloads and entity fields,
//! so the same dangerous-pattern screening the bootstrap layer has always
//! applied to file paths is applied to every string argument.

use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Maximum single argument length
const MAX_ARG_LENGTH: usize = 1000;

/// Maximum path length
const MAX_PATH_LENGTH: usize = 4096;

/// Dangerous patterns that indicate potential shell or path-traversal attacks
const DANGEROUS_PATTERNS: &[&str] = &[
    "..", "~", "$", "`", ";", "&", "|", ">", "<", "\n", "\r", "\0",
];

/// Secure argument parsing errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("argument too long (max {MAX_ARG_LENGTH} characters): {0}")]
    ArgumentTooLong(String),

    #[error("dangerous pattern detected in argument: {pattern} in {arg}")]
    DangerousPattern { pattern: String, arg: String },

    #[error("path exceeds maximum length (max {MAX_PATH_LENGTH})")]
    PathTooLong,

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid UUID for {arg}: {value}")]
    InvalidUuid { arg: String, value: String },

    #[error("invalid JSON for {arg}: {reason}")]
    InvalidJson { arg: String, reason: String },

    #[error("invalid value for {arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Secure argument parser shared by every CLI subcommand.
pub struct SecureArgParser;

impl SecureArgParser {
    /// Validate a single string argument for security issues.
    pub fn validate_argument(arg: &str) -> Result<(), ParseError> {
        if arg.len() > MAX_ARG_LENGTH {
            return Err(ParseError::ArgumentTooLong(arg.chars().take(50).collect::<String>() + "..."));
        }
        for pattern in DANGEROUS_PATTERNS {
            if arg.contains(pattern) {
                return Err(ParseError::DangerousPattern {
                    pattern: pattern.to_string(),
                    arg: arg.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate and canonicalize a path that must already exist (e.g. a
    /// dataset upload source file or a pipeline-spec JSON file).
    pub fn validate_path(path: &str) -> Result<PathBuf, ParseError> {
        let path_obj = Path::new(path);
        let canonical = path_obj.canonicalize().map_err(|e| {
            if !path_obj.exists() {
                ParseError::PathNotFound(path.to_string())
            } else {
                ParseError::InvalidPath(format!("{path}: {e}"))
            }
        })?;

        if canonical.to_string_lossy().len() > MAX_PATH_LENGTH {
            return Err(ParseError::PathTooLong);
        }
        Ok(canonical)
    }

    /// Validate a path that does not need to exist yet (an output file).
    pub fn validate_output_path(path: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(path)?;
        Ok(PathBuf::from(path))
    }

    /// Parse and validate a UUID-shaped identifier argument.
    pub fn validate_uuid(arg_name: &str, value: &str) -> Result<Uuid, ParseError> {
        Self::validate_argument(value)?;
        Uuid::parse_str(value).map_err(|_| ParseError::InvalidUuid {
            arg: arg_name.to_string(),
            value: value.to_string(),
        })
    }

    /// Parse and validate a JSON object/value argument (inline metadata,
    /// rule specs, pipeline specs passed directly rather than via file).
    pub fn validate_json(arg_name: &str, value: &str) -> Result<serde_json::Value, ParseError> {
        Self::validate_argument(value)?;
        serde_json::from_str(value).map_err(|e| ParseError::InvalidJson {
            arg: arg_name.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_safe_arguments() {
        assert!(SecureArgParser::validate_argument("my-project").is_ok());
        assert!(SecureArgParser::validate_argument("dataset-01").is_ok());
    }

    #[test]
    fn rejects_too_long_arguments() {
        let long_arg = "a".repeat(MAX_ARG_LENGTH + 1);
        assert!(matches!(SecureArgParser::validate_argument(&long_arg), Err(ParseError::ArgumentTooLong(_))));
    }

    #[test]
    fn detects_dangerous_patterns() {
        for arg in ["../etc/passwd", "$(whoami)", "`ls`", "name;rm -rf /"] {
            assert!(matches!(SecureArgParser::validate_argument(arg), Err(ParseError::DangerousPattern { .. })), "arg: {arg}");
        }
    }

    #[test]
    fn validates_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(SecureArgParser::validate_uuid("project_id", &id.to_string()).unwrap(), id);
        assert!(SecureArgParser::validate_uuid("project_id", "not-a-uuid").is_err());
    }

    #[test]
    fn validates_json() {
        assert!(SecureArgParser::validate_json("metadata", r#"{"k":"v"}"#).is_ok());
        assert!(SecureArgParser::validate_json("metadata", "{not json").is_err());
    }
}
