// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Metrics-instrumented decorator over an [`AuditRepository`].
//!
//! Use cases construct [`AuditEvent`]s and call `record` directly against
//! whatever `Arc<dyn AuditRepository>` the composition root hands them; this
//! module exists so that an audit write that fails *after* its governing
//! mutation has already committed is counted, not silently lost. A failed
//! `record` here does not roll back the mutation — the gate/run/dataset
//! state is already durable — it only surfaces an operational signal that
//! the audit trail for that resource has a gap.

use std::sync::Arc;

use async_trait::async_trait;

use animus_domain::entities::AuditEvent;
use animus_domain::repositories::{AuditListFilter, AuditRepository};
use animus_domain::value_objects::ProjectId;
use animus_domain::GovernanceError;
use tracing::error;

use super::metrics::Metrics;
use super::repositories::postgres::PostgresAuditRepository;

/// Wraps an [`AuditRepository`], incrementing
/// [`Metrics::audit_write_failures_total`] whenever `record` fails.
pub struct MetricsAuditRepository {
    inner: Arc<dyn AuditRepository>,
    metrics: Arc<Metrics>,
}

impl MetricsAuditRepository {
    pub fn new(inner: Arc<dyn AuditRepository>, metrics: Arc<Metrics>) -> Self {
        Self { inner, metrics }
    }

    /// Writes `event` inside `tx`, so it commits atomically with the
    /// mutation the caller is already holding `tx` open for. Bypasses
    /// `inner` and writes straight to Postgres: a transactional audit write
    /// only ever makes sense against the same database the mutation lives
    /// in, regardless of what `inner` happens to be.
    pub async fn record_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        project_id: &ProjectId,
        event: &AuditEvent,
    ) -> Result<(), GovernanceError> {
        match PostgresAuditRepository::insert(&mut *tx, project_id, event).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.metrics
                    .audit_write_failures_total
                    .with_label_values(&[event.resource_type()])
                    .inc();
                error!(
                    project_id = %project_id,
                    resource_type = event.resource_type(),
                    resource_id = event.resource_id(),
                    error = %err,
                    "audit event write failed inside governing mutation's transaction"
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl AuditRepository for MetricsAuditRepository {
    async fn record(&self, project_id: &ProjectId, event: &AuditEvent) -> Result<(), GovernanceError> {
        match self.inner.record(project_id, event).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.metrics
                    .audit_write_failures_total
                    .with_label_values(&[event.resource_type()])
                    .inc();
                error!(
                    project_id = %project_id,
                    resource_type = event.resource_type(),
                    resource_id = event.resource_id(),
                    error = %err,
                    "audit event write failed after governing mutation committed"
                );
                Err(err)
            }
        }
    }

    async fn list(&self, project_id: &ProjectId, filter: &AuditListFilter) -> Result<Vec<AuditEvent>, GovernanceError> {
        self.inner.list(project_id, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animus_domain::value_objects::RequestId;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingAudit {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AuditRepository for FailingAudit {
        async fn record(&self, _project_id: &ProjectId, _event: &AuditEvent) -> Result<(), GovernanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GovernanceError::internal("write failed"))
        }

        async fn list(&self, _project_id: &ProjectId, _filter: &AuditListFilter) -> Result<Vec<AuditEvent>, GovernanceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn failed_record_increments_failure_metric_and_propagates_error() {
        let metrics = Arc::new(Metrics::new().expect("metrics register cleanly"));
        let inner = Arc::new(FailingAudit { calls: AtomicUsize::new(0) });
        let decorated = MetricsAuditRepository::new(inner, metrics.clone());

        let project_id = ProjectId::new();
        let event = AuditEvent::new(
            Utc::now(),
            "tester".into(),
            "project.create".into(),
            "project".into(),
            project_id.to_string(),
            RequestId::new(),
            None,
            None,
            serde_json::json!({}),
        )
        .expect("valid audit event");

        let result = decorated.record(&project_id, &event).await;
        assert!(result.is_err());
        assert_eq!(metrics.audit_write_failures_total.with_label_values(&["project"]).get(), 1);
    }
}
