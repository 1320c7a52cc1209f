// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! S3-compatible adapter for [`ObjectStore`], backing dataset version
//! uploads, quality-evaluation reports, and artifact blobs. One instance is
//! constructed per named bucket (datasets, artifacts, evidence, quality
//! reports); the bucket is fixed at construction, keys are caller-chosen
//! content-addressed paths.

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use std::time::Duration;

use animus_domain::repositories::ObjectStore;
use animus_domain::value_objects::Sha256Hex;
use animus_domain::GovernanceError;
use async_trait::async_trait;

use super::config::ObjectStoreConfig;

/// One [`S3ObjectStore`] talks to exactly one bucket.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client against the configured S3-compatible endpoint and
    /// bind it to a single bucket.
    pub async fn new(config: &ObjectStoreConfig, bucket: String) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "animus-static",
        );
        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint.clone())
            .load()
            .await;
        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&shared_config)
                .force_path_style(true)
                .build(),
        );
        Self { client, bucket }
    }
}

fn store_err(err: impl std::fmt::Display) -> GovernanceError {
    GovernanceError::IoError(err.to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<animus_domain::repositories::ObjectStat, GovernanceError> {
        let sha256 = Sha256Hex::of(bytes);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(bytes.to_vec().into())
            .send()
            .await
            .map_err(store_err)?;
        Ok(animus_domain::repositories::ObjectStat { size_bytes: bytes.len() as i64, sha256 })
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, GovernanceError> {
        let output = self.client.get_object().bucket(&self.bucket).key(key).send().await.map_err(store_err)?;
        let bytes = output.body.collect().await.map_err(store_err)?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn stat(&self, key: &str) -> Result<Option<animus_domain::repositories::ObjectStat>, GovernanceError> {
        match self.client.head_object().bucket(&self.bucket).key(key).send().await {
            Ok(output) => {
                let size_bytes = output.content_length().unwrap_or_default();
                let bytes = self.get(key).await?;
                let sha256 = Sha256Hex::of(&bytes);
                Ok(Some(animus_domain::repositories::ObjectStat { size_bytes, sha256 }))
            }
            Err(aws_sdk_s3::error::SdkError::ServiceError(service_err)) if service_err.err().is_not_found() => {
                Ok(None)
            }
            Err(err) => Err(store_err(err)),
        }
    }

    async fn presign_put(&self, key: &str, expires_in_seconds: u32) -> Result<String, GovernanceError> {
        let presign_config = PresigningConfig::expires_in(Duration::from_secs(expires_in_seconds as u64))
            .map_err(store_err)?;
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(store_err)?;
        Ok(presigned.uri().to_string())
    }

    async fn presign_get(&self, key: &str, expires_in_seconds: u32) -> Result<String, GovernanceError> {
        let presign_config = PresigningConfig::expires_in(Duration::from_secs(expires_in_seconds as u64))
            .map_err(store_err)?;
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(store_err)?;
        Ok(presigned.uri().to_string())
    }

    async fn remove(&self, key: &str) -> Result<(), GovernanceError> {
        self.client.delete_object().bucket(&self.bucket).key(key).send().await.map_err(store_err)?;
        Ok(())
    }
}
