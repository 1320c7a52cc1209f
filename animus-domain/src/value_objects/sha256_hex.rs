// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Lower-case hex encoding of a SHA-256 digest, validated on construction.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::GovernanceError;

/// A validated, lower-case 64-character hex SHA-256 digest.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Hex(String);

impl Sha256Hex {
    /// Parses and validates a hex digest string.
    pub fn parse(s: impl Into<String>) -> Result<Self, GovernanceError> {
        let s = s.into();
        if s.len() != 64 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(GovernanceError::invalid(format!("not a 64-character hex sha256 digest: {s}")));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Hashes the given bytes in one shot.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Sha256Hex {
    type Error = GovernanceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Sha256Hex> for String {
    fn from(value: Sha256Hex) -> Self {
        value.0
    }
}

impl fmt::Display for Sha256Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Incremental SHA-256 hasher used by streaming put/get paths that must tee
/// bytes through a digest while counting them.
#[derive(Default)]
pub struct StreamingHasher {
    hasher: Sha256,
    bytes_seen: u64,
}

impl StreamingHasher {
    pub fn new() -> Self {
        Self { hasher: Sha256::new(), bytes_seen: 0 }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes_seen += chunk.len() as u64;
    }

    pub fn bytes_seen(&self) -> u64 {
        self.bytes_seen
    }

    pub fn finalize(self) -> Sha256Hex {
        Sha256Hex(hex::encode(self.hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert!(Sha256Hex::parse("abcd").is_err());
    }

    #[test]
    fn accepts_and_lowercases() {
        let digest = Sha256Hex::of(b"hello");
        let parsed = Sha256Hex::parse(digest.as_str().to_ascii_uppercase()).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut streaming = StreamingHasher::new();
        streaming.update(b"hel");
        streaming.update(b"lo");
        assert_eq!(streaming.bytes_seen(), 5);
        assert_eq!(streaming.finalize(), Sha256Hex::of(b"hello"));
    }
}
