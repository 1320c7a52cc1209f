// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Upload-dataset-version use case: streams the payload into the object
//! store while teeing a hash and byte counter, then allocates the next
//! ordinal and inserts the version row. Any failure after a successful
//! object put is compensated by removing the object. The ordinal allocation,
//! the version row, the lineage edge, and the audit row all commit in one
//! transaction so a successful upload is never missing its audit trail.

use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;

use animus_domain::entities::{dataset_version, AuditEvent, DatasetVersion, EntityRef, LineageEvent, Predicate};
use animus_domain::repositories::{NextVersionRequest, ObjectStore};
use animus_domain::value_objects::DatasetVersionId;
use animus_domain::GovernanceError;
use chrono::Utc;
use tracing::warn;

use crate::application::commands::UploadDatasetVersionCommand;
use crate::infrastructure::audit::MetricsAuditRepository;
use crate::infrastructure::repositories::postgres::{PostgresDatasetVersionRepository, PostgresLineageRepository, PostgresQualityRuleRepository};
use crate::infrastructure::runtime::{with_deadline, RequestContext};

const DATASETS_BUCKET: &str = "datasets";

pub struct UploadDatasetVersionUseCase {
    versions: Arc<PostgresDatasetVersionRepository>,
    rules: Arc<PostgresQualityRuleRepository>,
    object_store: Arc<dyn ObjectStore>,
    audit: Arc<MetricsAuditRepository>,
    max_upload_bytes: u64,
    upload_timeout: Duration,
}

impl UploadDatasetVersionUseCase {
    pub fn new(
        versions: Arc<PostgresDatasetVersionRepository>,
        rules: Arc<PostgresQualityRuleRepository>,
        object_store: Arc<dyn ObjectStore>,
        audit: Arc<MetricsAuditRepository>,
        max_upload_mib: u64,
        upload_timeout: Duration,
    ) -> Self {
        Self { versions, rules, object_store, audit, max_upload_bytes: max_upload_mib * 1024 * 1024, upload_timeout }
    }

    pub async fn execute<R: AsyncRead + Unpin + Send>(
        &self,
        cmd: UploadDatasetVersionCommand<R>,
    ) -> Result<DatasetVersion, GovernanceError> {
        let version_id = DatasetVersionId::new();
        let sanitized_filename = sanitize_filename(&cmd.filename);
        let object_key = dataset_version::object_key_for(&cmd.dataset_id, &version_id, &sanitized_filename);
        let deadline = RequestContext::new(cmd.actor.actor.clone(), cmd.project_id.clone(), cmd.actor.request_id.clone(), self.upload_timeout);

        let bytes = read_all(cmd.body, self.max_upload_bytes).await?;
        let stat = with_deadline(&deadline, self.object_store.put(&object_key, &bytes)).await?;

        match self.finish_upload(&cmd, &version_id, &object_key, &stat, &sanitized_filename).await {
            Ok(version) => Ok(version),
            Err(err) => {
                if let Err(cleanup_err) = self.object_store.remove(&object_key).await {
                    warn!(object_key, error = %cleanup_err, "failed to compensate object put after upload failure");
                }
                Err(err)
            }
        }
    }

    async fn finish_upload<R: AsyncRead + Unpin + Send>(
        &self,
        cmd: &UploadDatasetVersionCommand<R>,
        version_id: &DatasetVersionId,
        object_key: &str,
        stat: &animus_domain::repositories::ObjectStat,
        sanitized_filename: &str,
    ) -> Result<DatasetVersion, GovernanceError> {
        if let Some(rule_id) = &cmd.quality_rule_id {
            self.rules
                .find_by_id(rule_id)
                .await?
                .ok_or_else(|| GovernanceError::not_found(format!("quality rule {rule_id} not found")))?;
        }

        let mut metadata = cmd.metadata.clone();
        if let Some(obj) = metadata.as_object_mut() {
            obj.insert("filename".into(), sanitized_filename.into());
            obj.insert(
                "content_type".into(),
                cmd.content_type.clone().unwrap_or_else(|| "application/octet-stream".into()).into(),
            );
            obj.insert("content_sha256".into(), stat.sha256.to_string().into());
        }

        let lineage = LineageEvent::new(
            Utc::now(),
            cmd.actor.actor.clone(),
            cmd.actor.request_id.clone(),
            EntityRef { entity_type: "dataset".into(), id: cmd.dataset_id.to_string() },
            Predicate::HasVersion,
            EntityRef { entity_type: "dataset_version".into(), id: version_id.to_string() },
            serde_json::json!({}),
        )?;

        let mut tx = self.versions.pool().begin().await.map_err(tx_err)?;

        let version = self
            .versions
            .create_next_in_tx(
                &mut tx,
                NextVersionRequest {
                    version_id: version_id.clone(),
                    dataset_id: cmd.dataset_id.clone(),
                    quality_rule_id: cmd.quality_rule_id.clone(),
                    content_sha256: stat.sha256.clone(),
                    object_key: object_key.to_string(),
                    size_bytes: stat.size_bytes,
                    metadata,
                    created_by: cmd.actor.actor.clone(),
                },
            )
            .await?;

        PostgresLineageRepository::insert(&mut *tx, &lineage).await?;

        let event = AuditEvent::new(
            Utc::now(),
            cmd.actor.actor.clone(),
            "dataset_version.create".into(),
            "dataset_version".into(),
            version.id().to_string(),
            cmd.actor.request_id.clone(),
            cmd.actor.ip.clone(),
            cmd.actor.user_agent.clone(),
            serde_json::json!({ "ordinal": version.ordinal().value() }),
        )?;
        self.audit.record_in_tx(&mut tx, &cmd.project_id, &event).await?;

        tx.commit().await.map_err(tx_err)?;

        Ok(version)
    }
}

/// Keeps alphanumerics, dot, dash, underscore; everything else becomes `_`,
/// and any path separators are stripped so the result can never escape its
/// object-store prefix.
fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

fn tx_err(err: sqlx::Error) -> GovernanceError {
    GovernanceError::DatabaseError(err.to_string())
}

/// Reads at most `max_bytes` into memory; a body one byte longer than the
/// cap fails with `upload_too_large` before anything is written to storage.
async fn read_all<R: AsyncRead + Unpin + Send>(body: R, max_bytes: u64) -> Result<Vec<u8>, GovernanceError> {
    use tokio::io::AsyncReadExt;
    let mut limited = body.take(max_bytes + 1);
    let mut buf = Vec::new();
    limited.read_to_end(&mut buf).await.map_err(GovernanceError::from)?;
    if buf.len() as u64 > max_bytes {
        return Err(GovernanceError::payload_too_large("upload_too_large"));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_traversal_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my file (v2).csv"), "my_file__v2_.csv");
        assert_eq!(sanitize_filename(""), "upload");
    }
}
