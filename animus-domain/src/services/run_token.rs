// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Self-contained, HMAC-signed run tokens:
//! `animus_run_v1.<payload_b64>.<sig_b64>`, carrying narrow editor authority
//! into Data Plane workloads.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::services::hmac::{hmac_sign, hmac_verify};
use crate::value_objects::{DatasetVersionId, RunId};
use crate::GovernanceError;

const TOKEN_PREFIX: &str = "animus_run_v1";
const DOMAIN_SEPARATOR: &str = "animus-run-token-v1\n";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunTokenClaims {
    pub run_id: RunId,
    pub dataset_version_id: Option<DatasetVersionId>,
    /// Unix seconds.
    pub iat: i64,
    /// Unix seconds.
    pub exp: i64,
}

#[derive(Eq, PartialEq)]
pub enum VerifyOutcome {
    Valid(RunTokenClaims),
    Expired,
    Malformed,
}

/// Mints a signed run token for `claims`.
pub fn generate_run_token(secret: &[u8], claims: &RunTokenClaims) -> Result<String, GovernanceError> {
    let payload_json = serde_json::to_vec(claims)?;
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json);
    let mut message = Vec::with_capacity(DOMAIN_SEPARATOR.len() + payload_b64.len());
    message.extend_from_slice(DOMAIN_SEPARATOR.as_bytes());
    message.extend_from_slice(payload_b64.as_bytes());
    let sig_b64 = hmac_sign(secret, &message)?;
    Ok(format!("{TOKEN_PREFIX}.{payload_b64}.{sig_b64}"))
}

/// Verifies `token` against `now` (Unix seconds). Does not error on
/// malformed/expired tokens — those are represented in [`VerifyOutcome`] so
/// callers can audit the distinct `auth.invalid_token` cases.
pub fn verify_run_token(secret: &[u8], token: &str, now: i64) -> VerifyOutcome {
    let mut parts = token.splitn(3, '.');
    let (prefix, payload_b64, sig_b64) = match (parts.next(), parts.next(), parts.next()) {
        (Some(p), Some(payload), Some(sig)) => (p, payload, sig),
        _ => return VerifyOutcome::Malformed,
    };
    if prefix != TOKEN_PREFIX {
        return VerifyOutcome::Malformed;
    }

    let mut message = Vec::with_capacity(DOMAIN_SEPARATOR.len() + payload_b64.len());
    message.extend_from_slice(DOMAIN_SEPARATOR.as_bytes());
    message.extend_from_slice(payload_b64.as_bytes());

    match hmac_verify(secret, &message, sig_b64) {
        Ok(true) => {}
        _ => return VerifyOutcome::Malformed,
    }

    let payload_bytes = match URL_SAFE_NO_PAD.decode(payload_b64) {
        Ok(bytes) => bytes,
        Err(_) => return VerifyOutcome::Malformed,
    };
    let claims: RunTokenClaims = match serde_json::from_slice(&payload_bytes) {
        Ok(c) => c,
        Err(_) => return VerifyOutcome::Malformed,
    };

    if now >= claims.exp {
        return VerifyOutcome::Expired;
    }

    VerifyOutcome::Valid(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> RunTokenClaims {
        RunTokenClaims { run_id: RunId::new(), dataset_version_id: None, iat: 1000, exp: 1000 + 1800 }
    }

    #[test]
    fn verify_within_window_returns_claims() {
        let c = claims();
        let token = generate_run_token(b"secret", &c).unwrap();
        match verify_run_token(b"secret", &token, 1000 + 100) {
            VerifyOutcome::Valid(back) => assert_eq!(back.run_id, c.run_id),
            other => panic!("expected Valid, got {other:?}"),
        }
    }

    #[test]
    fn verify_after_expiry_returns_expired() {
        let c = claims();
        let token = generate_run_token(b"secret", &c).unwrap();
        assert_eq!(verify_run_token(b"secret", &token, c.exp), VerifyOutcome::Expired);
    }

    #[test]
    fn tampered_token_is_malformed() {
        let c = claims();
        let mut token = generate_run_token(b"secret", &c).unwrap();
        token.push('x');
        assert_eq!(verify_run_token(b"secret", &token, 1000), VerifyOutcome::Malformed);
    }
}

impl std::fmt::Debug for VerifyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyOutcome::Valid(c) => write!(f, "Valid({:?})", c.run_id),
            VerifyOutcome::Expired => write!(f, "Expired"),
            VerifyOutcome::Malformed => write!(f, "Malformed"),
        }
    }
}
