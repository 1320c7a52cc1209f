// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared fixtures for the Postgres-backed end-to-end tests.

use std::collections::HashMap;
use std::sync::Mutex;

use animus::application::commands::Actor;
use animus_domain::repositories::{ObjectStat, ObjectStore};
use animus_domain::value_objects::{RequestId, Sha256Hex};
use animus_domain::GovernanceError;
use async_trait::async_trait;

/// A content-addressed store held entirely in memory, standing in for the
/// S3-compatible backend in tests that don't need a real bucket.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<ObjectStat, GovernanceError> {
        let sha256 = Sha256Hex::of(bytes);
        self.objects.lock().unwrap().insert(key.to_string(), bytes.to_vec());
        Ok(ObjectStat { size_bytes: bytes.len() as i64, sha256 })
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, GovernanceError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| GovernanceError::not_found(format!("object {key} not found")))
    }

    async fn stat(&self, key: &str) -> Result<Option<ObjectStat>, GovernanceError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .map(|bytes| ObjectStat { size_bytes: bytes.len() as i64, sha256: Sha256Hex::of(bytes) }))
    }

    async fn presign_put(&self, key: &str, expires_in_seconds: u32) -> Result<String, GovernanceError> {
        Ok(format!("memory://{key}?expires_in={expires_in_seconds}"))
    }

    async fn presign_get(&self, key: &str, expires_in_seconds: u32) -> Result<String, GovernanceError> {
        Ok(format!("memory://{key}?expires_in={expires_in_seconds}"))
    }

    async fn remove(&self, key: &str) -> Result<(), GovernanceError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A fresh [`Actor`] attributed to `name`, one request id per call.
pub fn actor(name: &str) -> Actor {
    Actor { actor: name.to_string(), request_id: RequestId::new(), ip: None, user_agent: None }
}
