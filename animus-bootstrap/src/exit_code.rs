// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Process Exit Codes
//!
//! The bootstrap binary is the only place in this workspace that turns a
//! [`GovernanceError`] into a process exit code. Everywhere else, errors
//! propagate with `?`.
//!
//! Codes follow the BSD `sysexits.h` convention the same way the rest of
//! this codebase's error taxonomy maps onto HTTP status in spec.md §7:
//! each `GovernanceError` category gets one fixed exit code so operators
//! and shell scripts can branch on it without parsing messages.

use animus_domain::GovernanceError;

/// Process exit code returned by `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Successful termination.
    Ok = 0,
    /// Generic failure with no more specific code.
    Failure = 1,
    /// CLI usage error (bad arguments, bad flag combination).
    Usage = 64,
    /// Input data was invalid (`GovernanceError::Invalid`).
    DataError = 65,
    /// A referenced entity could not be found.
    NotFound = 66,
    /// Authentication failed.
    NoPermission = 77,
    /// I/O error talking to the filesystem or a socket.
    IoError = 74,
    /// Could not reach the database or object store.
    Unavailable = 69,
    /// A uniqueness or idempotency conflict was reported.
    Conflict = 75,
    /// Internal error: a bug, not an operator mistake.
    Software = 70,
    /// The operation timed out.
    Timeout = 73,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Map a [`GovernanceError`] to the exit code an operator should see.
pub fn map_error_to_exit_code(err: &GovernanceError) -> ExitCode {
    match err {
        GovernanceError::NotFound(_) => ExitCode::NotFound,
        GovernanceError::Duplicate(_) | GovernanceError::Conflict(_) => ExitCode::Conflict,
        GovernanceError::PayloadTooLarge(_) => ExitCode::DataError,
        GovernanceError::Invalid(_) | GovernanceError::Immutable(_) | GovernanceError::IntegrityError(_) => ExitCode::DataError,
        GovernanceError::AuthenticationFailed(_) | GovernanceError::NotAuthorized(_) => ExitCode::NoPermission,
        GovernanceError::ResourceExhausted(_) => ExitCode::Unavailable,
        GovernanceError::IoError(_) => ExitCode::IoError,
        GovernanceError::DatabaseError(_) => ExitCode::Unavailable,
        GovernanceError::SerializationError(_) => ExitCode::DataError,
        GovernanceError::TimeoutError(_) => ExitCode::Timeout,
        GovernanceError::Cancelled(_) => ExitCode::Failure,
        GovernanceError::InternalError(_) => ExitCode::Software,
    }
}

/// Convert a use-case `Result` into the process exit code `main` returns.
///
/// Logs the error at `error` level (via `tracing`) before converting, so the
/// failure is visible even when stderr is not captured by the caller.
pub fn result_to_exit_code<T>(result: Result<T, GovernanceError>) -> std::process::ExitCode {
    match result {
        Ok(_) => ExitCode::Ok.into(),
        Err(err) => {
            tracing::error!(category = err.category(), "{err}");
            map_error_to_exit_code(&err).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_66() {
        let err = GovernanceError::not_found("project xyz");
        assert_eq!(map_error_to_exit_code(&err), ExitCode::NotFound);
    }

    #[test]
    fn conflict_maps_to_75() {
        let err = GovernanceError::conflict("idempotency_key reused");
        assert_eq!(map_error_to_exit_code(&err), ExitCode::Conflict);
    }

    #[test]
    fn invalid_maps_to_data_error() {
        let err = GovernanceError::invalid("missing name");
        assert_eq!(map_error_to_exit_code(&err), ExitCode::DataError);
    }

    #[test]
    fn ok_result_does_not_panic() {
        let result: Result<(), GovernanceError> = Ok(());
        let _code = result_to_exit_code(result);
    }
}
