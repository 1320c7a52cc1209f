// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Request-scoped context and deadline propagation.
//!
//! Identity and project id travel implicitly through a request in an HTTP
//! binding; this crate has no such binding, so every use case accepts an
//! explicit context carrying the same fields: actor identity, request id,
//! and a deadline. Every I/O boundary (database, object store, presigning)
//! is expected to wrap its await in [`with_deadline`] so a stuck call fails
//! with a typed timeout instead of hanging the caller indefinitely.

use std::future::Future;
use std::time::{Duration, Instant};

use animus_domain::value_objects::{ProjectId, RequestId};
use animus_domain::GovernanceError;

/// Startup bucket-ensure calls get a short, fixed budget.
pub const STARTUP_DEADLINE: Duration = Duration::from_secs(5);
/// Readiness probes must answer fast or the orchestrator kills the process.
pub const READINESS_DEADLINE: Duration = Duration::from_millis(750);
/// Default budget for dataset version uploads, which stream large bodies.
pub const UPLOAD_DEADLINE: Duration = Duration::from_secs(30 * 60);

/// Identity, tenancy, and timing for a single logical unit of work.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub actor: String,
    pub project_id: ProjectId,
    pub request_id: RequestId,
    deadline: Instant,
}

impl RequestContext {
    pub fn new(actor: String, project_id: ProjectId, request_id: RequestId, budget: Duration) -> Self {
        Self { actor, project_id, request_id, deadline: Instant::now() + budget }
    }

    /// Time remaining before this context's deadline, zero if already past it.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Run `future` under `context`'s remaining budget, mapping an elapsed
/// deadline to [`GovernanceError::TimeoutError`]. Callers that are
/// cancelled mid-flight are responsible for running their own compensation
/// (e.g. removing a partially written object) before propagating the error.
pub async fn with_deadline<F, T>(context: &RequestContext, future: F) -> Result<T, GovernanceError>
where
    F: Future<Output = Result<T, GovernanceError>>,
{
    tokio::time::timeout(context.remaining(), future)
        .await
        .map_err(|_| GovernanceError::TimeoutError(format!("deadline exceeded for request {}", context.request_id)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_within_budget() {
        let context = RequestContext::new(
            "tester".into(),
            ProjectId::new(),
            RequestId::new(),
            Duration::from_millis(200),
        );
        let result = with_deadline(&context, async { Ok::<_, GovernanceError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn exceeding_budget_yields_timeout_error() {
        let context = RequestContext::new(
            "tester".into(),
            ProjectId::new(),
            RequestId::new(),
            Duration::from_millis(10),
        );
        let result = with_deadline(&context, async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, GovernanceError>(())
        })
        .await;
        assert!(matches!(result, Err(GovernanceError::TimeoutError(_))));
    }
}
