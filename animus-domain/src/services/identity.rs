// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared identity model and the gateway-header canonical signature used by
//! the zero-trust internal auth layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::hmac::{hmac_sign, hmac_verify};
use crate::GovernanceError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    pub fn satisfies(&self, required: Role) -> bool {
        *self >= required
    }
}

/// Authenticated caller, shared by every authenticator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub email: Option<String>,
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn has_role_at_least(&self, required: Role) -> bool {
        self.roles.iter().any(|r| r.satisfies(required))
    }

    /// Synthesizes the identity a run token authenticates as:
    /// `run:<run_id>[:dv:<dv_id>]`, role editor.
    pub fn for_run_token(run_id: &str, dataset_version_id: Option<&str>) -> Self {
        let subject = match dataset_version_id {
            Some(dv) => format!("run:{run_id}:dv:{dv}"),
            None => format!("run:{run_id}"),
        };
        Self { subject, email: None, roles: vec![Role::Editor] }
    }
}

/// Builds the canonical signing string for gateway-header auth: the
/// newline-join of `[ts, UPPER(method), path, request_id, subject, email, roles]`.
pub fn gateway_canonical_string(
    ts: &str,
    method: &str,
    path: &str,
    request_id: &str,
    subject: &str,
    email: &str,
    roles: &str,
) -> String {
    [ts, &method.to_ascii_uppercase(), path, request_id, subject, email, roles].join("\n")
}

/// Signs a gateway-header request, for use by trusted callers (tests, the
/// gateway itself) that need to mint these headers.
pub fn gateway_sign(secret: &[u8], canonical: &str) -> Result<String, GovernanceError> {
    hmac_sign(secret, canonical.as_bytes())
}

#[derive(Debug, Clone, Copy)]
pub struct SkewWindow {
    pub seconds: i64,
}

/// Validates a gateway-header signature and timestamp skew. `now` and `ts`
/// are both Unix seconds; callers are expected to have already parsed the
/// `X-Animus-Auth-Ts` header.
pub fn verify_gateway_auth(
    secret: &[u8],
    canonical: &str,
    signature: &str,
    ts: i64,
    now: DateTime<Utc>,
    skew: SkewWindow,
) -> Result<(), GovernanceError> {
    if !hmac_verify(secret, canonical.as_bytes(), signature)? {
        return Err(GovernanceError::AuthenticationFailed("gateway signature mismatch".into()));
    }
    let delta = (now.timestamp() - ts).abs();
    if delta > skew.seconds {
        return Err(GovernanceError::AuthenticationFailed("gateway auth timestamp outside skew window".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordering_satisfies_lower_requirements() {
        assert!(Role::Admin.satisfies(Role::Editor));
        assert!(!Role::Viewer.satisfies(Role::Editor));
    }

    #[test]
    fn run_token_identity_includes_dataset_version_when_present() {
        let id = Identity::for_run_token("r1", Some("dv1"));
        assert_eq!(id.subject, "run:r1:dv:dv1");
        assert!(id.has_role_at_least(Role::Editor));
    }

    #[test]
    fn gateway_auth_roundtrips() {
        let canonical = gateway_canonical_string("100", "get", "/x", "req1", "alice", "a@x.com", "viewer");
        let sig = gateway_sign(b"secret", &canonical).unwrap();
        verify_gateway_auth(b"secret", &canonical, &sig, 100, DateTime::from_timestamp(105, 0).unwrap(), SkewWindow {
            seconds: 10,
        })
        .unwrap();
    }

    #[test]
    fn gateway_auth_rejects_outside_skew() {
        let canonical = gateway_canonical_string("100", "get", "/x", "req1", "alice", "a@x.com", "viewer");
        let sig = gateway_sign(b"secret", &canonical).unwrap();
        let result = verify_gateway_auth(
            b"secret",
            &canonical,
            &sig,
            100,
            DateTime::from_timestamp(200, 0).unwrap(),
            SkewWindow { seconds: 10 },
        );
        assert!(result.is_err());
    }
}
