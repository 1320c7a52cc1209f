// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port for the content-addressed blob store backing dataset version
//! uploads, quality-evaluation reports, and artifacts. Infrastructure
//! implements this against S3-compatible storage; the domain only knows
//! keys and byte streams.

use async_trait::async_trait;

use crate::value_objects::Sha256Hex;
use crate::GovernanceError;

#[derive(Debug, Clone)]
pub struct ObjectStat {
    pub size_bytes: i64,
    pub sha256: Sha256Hex,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<ObjectStat, GovernanceError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, GovernanceError>;

    async fn stat(&self, key: &str) -> Result<Option<ObjectStat>, GovernanceError>;

    /// A short-lived, externally usable URL for an upload the caller streams
    /// directly to storage rather than through this process.
    async fn presign_put(&self, key: &str, expires_in_seconds: u32) -> Result<String, GovernanceError>;

    /// A short-lived, externally usable URL for a download, issued only
    /// after the caller has confirmed the quality gate allows it.
    async fn presign_get(&self, key: &str, expires_in_seconds: u32) -> Result<String, GovernanceError>;

    async fn remove(&self, key: &str) -> Result<(), GovernanceError>;
}
