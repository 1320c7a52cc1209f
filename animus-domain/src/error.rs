// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain error system for the Animus control plane.
//!
//! Errors are categorized by how a caller should react to them rather than by
//! which subsystem raised them: conflicts and not-found are routed to a 4xx-ish
//! response by the bootstrap layer, internal/database errors to a 5xx-ish one.

use thiserror::Error;

/// Domain-specific errors for the governance control plane.
#[derive(Error, Debug, Clone)]
pub enum GovernanceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("invalid: {0}")]
    Invalid(String),

    #[error("immutable entity: {0}")]
    Immutable(String),

    #[error("integrity check failed: {0}")]
    IntegrityError(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("io error: {0}")]
    IoError(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("timeout error: {0}")]
    TimeoutError(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl GovernanceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Whether a caller can reasonably retry the operation unchanged.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GovernanceError::TimeoutError(_) | GovernanceError::ResourceExhausted(_) | GovernanceError::IoError(_)
        )
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, GovernanceError::AuthenticationFailed(_) | GovernanceError::NotAuthorized(_))
    }

    /// Stable category tag, used for metrics and logging.
    pub fn category(&self) -> &'static str {
        match self {
            GovernanceError::NotFound(_) => "not_found",
            GovernanceError::Duplicate(_) => "duplicate",
            GovernanceError::Conflict(_) => "conflict",
            GovernanceError::PayloadTooLarge(_) => "payload_too_large",
            GovernanceError::Invalid(_) => "invalid",
            GovernanceError::Immutable(_) => "immutable",
            GovernanceError::IntegrityError(_) => "integrity",
            GovernanceError::AuthenticationFailed(_) => "authentication",
            GovernanceError::NotAuthorized(_) => "authorization",
            GovernanceError::ResourceExhausted(_) => "resource",
            GovernanceError::IoError(_) => "io",
            GovernanceError::DatabaseError(_) => "database",
            GovernanceError::SerializationError(_) => "serialization",
            GovernanceError::TimeoutError(_) => "timeout",
            GovernanceError::Cancelled(_) => "cancellation",
            GovernanceError::InternalError(_) => "internal",
        }
    }
}

impl From<std::io::Error> for GovernanceError {
    fn from(err: std::io::Error) -> Self {
        GovernanceError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for GovernanceError {
    fn from(err: serde_json::Error) -> Self {
        GovernanceError::SerializationError(err.to_string())
    }
}
