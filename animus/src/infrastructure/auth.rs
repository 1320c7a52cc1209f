// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Zero-trust internal auth middleware: authenticate, authorize, resolve
//! project, attach identity to a [`RequestContext`].
//!
//! No HTTP framework sits in this crate, so "method" and "path" are plain
//! fields on [`InboundRequest`] rather than anything tied to a wire
//! protocol — a caller (an HTTP gateway binding, the CLI, or a test) builds
//! one and hands it to [`authenticate_authorize_resolve`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use animus_domain::entities::AuditEvent;
use animus_domain::repositories::AuditRepository;
use animus_domain::services::hmac::hmac_sign;
use animus_domain::services::identity::{gateway_canonical_string, verify_gateway_auth, Identity, Role, SkewWindow};
use animus_domain::services::run_token::{verify_run_token, VerifyOutcome};
use animus_domain::value_objects::{ProjectId, RequestId};
use animus_domain::GovernanceError;

use super::runtime::RequestContext;

/// Gateway-header bundle, or a bearer token, or neither.
#[derive(Debug, Clone)]
pub enum Credential {
    GatewayHeaders { subject: String, email: String, roles: String, ts: String, sig: String },
    Bearer(String),
    None,
}

/// Whether a request needs a resolved project. Project creation and health
/// probes are the only exemptions (spec's C2 project-resolver contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRequirement {
    Required,
    Exempt,
}

/// The pure-data equivalent of an inbound HTTP request: whatever a binding
/// (HTTP gateway, CLI dispatcher, test) needs to drive auth with no
/// dependency on that binding's wire format.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    pub request_id: RequestId,
    pub credential: Credential,
    pub project_id: Option<ProjectId>,
    pub project_requirement: ProjectRequirement,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Process-wide auth settings: the shared HMAC secret and the allowed
/// clock skew for gateway-header timestamps.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: Vec<u8>,
    pub skew: SkewWindow,
    pub request_budget: Duration,
}

fn method_role(method: &str) -> Role {
    if method.eq_ignore_ascii_case("GET") {
        Role::Viewer
    } else {
        Role::Editor
    }
}

async fn audit_denial(
    audit: &Arc<dyn AuditRepository>,
    project_id: Option<&ProjectId>,
    action: &str,
    request_id: RequestId,
    ip: Option<String>,
    user_agent: Option<String>,
) {
    let Some(project_id) = project_id else { return };
    if let Ok(event) = AuditEvent::new(
        Utc::now(),
        "anonymous".into(),
        action.into(),
        "auth".into(),
        request_id.to_string(),
        request_id,
        ip,
        user_agent,
        serde_json::json!({}),
    ) {
        let _ = audit.record(project_id, &event).await;
    }
}

/// Authenticate via run token first, falling back to gateway headers, per
/// the composite authenticator contract.
fn authenticate(config: &AuthConfig, request: &InboundRequest, now: DateTime<Utc>) -> Result<Identity, GovernanceError> {
    match &request.credential {
        Credential::Bearer(token) => match verify_run_token(&config.secret, token, now.timestamp()) {
            VerifyOutcome::Valid(claims) => Ok(Identity::for_run_token(
                &claims.run_id.to_string(),
                claims.dataset_version_id.as_ref().map(|dv| dv.to_string()).as_deref(),
            )),
            VerifyOutcome::Expired => Err(GovernanceError::AuthenticationFailed("run token expired".into())),
            VerifyOutcome::Malformed => Err(GovernanceError::AuthenticationFailed("run token malformed".into())),
        },
        Credential::GatewayHeaders { subject, email, roles, ts, sig } => {
            let canonical = gateway_canonical_string(ts, &request.method, &request.path, &request.request_id.to_string(), subject, email, roles);
            let parsed_ts: i64 = ts
                .parse()
                .map_err(|_| GovernanceError::AuthenticationFailed("gateway auth timestamp not numeric".into()))?;
            verify_gateway_auth(&config.secret, &canonical, sig, parsed_ts, now, config.skew)?;
            let parsed_roles = roles
                .split(',')
                .filter(|r| !r.is_empty())
                .filter_map(|r| match r {
                    "viewer" => Some(Role::Viewer),
                    "editor" => Some(Role::Editor),
                    "admin" => Some(Role::Admin),
                    _ => None,
                })
                .collect();
            Ok(Identity { subject: subject.clone(), email: Some(email.clone()), roles: parsed_roles })
        }
        Credential::None => Err(GovernanceError::AuthenticationFailed("no credential presented".into())),
    }
}

/// `authenticate -> authorize -> resolve-project -> attach identity`, with
/// an audit write on every denial.
pub async fn authenticate_authorize_resolve(
    config: &AuthConfig,
    audit: &Arc<dyn AuditRepository>,
    request: InboundRequest,
    now: DateTime<Utc>,
) -> Result<RequestContext, GovernanceError> {
    let identity = match authenticate(config, &request, now) {
        Ok(identity) => identity,
        Err(err) => {
            let action = if matches!(request.credential, Credential::Bearer(_)) { "auth.invalid_token" } else { "auth.unauthenticated" };
            audit_denial(audit, request.project_id.as_ref(), action, request.request_id, request.ip, request.user_agent).await;
            return Err(err);
        }
    };

    let required = method_role(&request.method);
    if !identity.has_role_at_least(required) {
        audit_denial(
            audit,
            request.project_id.as_ref(),
            "auth.forbidden",
            request.request_id,
            request.ip,
            request.user_agent,
        )
        .await;
        return Err(GovernanceError::NotAuthorized(format!(
            "subject {} lacks role {:?} for {} {}",
            identity.subject, required, request.method, request.path
        )));
    }

    let project_id = match (request.project_requirement, request.project_id) {
        (ProjectRequirement::Exempt, project_id) => project_id.unwrap_or_else(ProjectId::new),
        (ProjectRequirement::Required, Some(project_id)) => project_id,
        (ProjectRequirement::Required, None) => {
            audit_denial(audit, None, "auth.project_required", request.request_id, request.ip, request.user_agent).await;
            return Err(GovernanceError::invalid("request requires a resolved project id"));
        }
    };

    Ok(RequestContext::new(identity.subject, project_id, request.request_id, config.request_budget))
}

/// Signs a gateway-header request on behalf of a trusted caller (the
/// gateway itself, or a test harness standing in for it).
pub fn sign_gateway_headers(
    secret: &[u8],
    ts: &str,
    method: &str,
    path: &str,
    request_id: &str,
    subject: &str,
    email: &str,
    roles: &str,
) -> Result<String, GovernanceError> {
    let canonical = gateway_canonical_string(ts, method, path, request_id, subject, email, roles);
    hmac_sign(secret, canonical.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use animus_domain::repositories::AuditListFilter;
    use async_trait::async_trait;

    struct NoopAudit;

    #[async_trait]
    impl AuditRepository for NoopAudit {
        async fn record(&self, _project_id: &ProjectId, _event: &AuditEvent) -> Result<(), GovernanceError> {
            Ok(())
        }
        async fn list(&self, _project_id: &ProjectId, _filter: &AuditListFilter) -> Result<Vec<AuditEvent>, GovernanceError> {
            Ok(Vec::new())
        }
    }

    fn config() -> AuthConfig {
        AuthConfig { secret: b"secret".to_vec(), skew: SkewWindow { seconds: 30 }, request_budget: Duration::from_secs(5) }
    }

    #[tokio::test]
    async fn bearer_run_token_authenticates_as_editor() {
        let claims = animus_domain::services::run_token::RunTokenClaims {
            run_id: animus_domain::value_objects::RunId::new(),
            dataset_version_id: None,
            iat: 0,
            exp: 1_000_000,
        };
        let token = animus_domain::services::run_token::generate_run_token(b"secret", &claims).unwrap();
        let audit: Arc<dyn AuditRepository> = Arc::new(NoopAudit);
        let project_id = ProjectId::new();
        let request = InboundRequest {
            method: "POST".into(),
            path: "/dataset-versions/abc/download".into(),
            request_id: RequestId::new(),
            credential: Credential::Bearer(token),
            project_id: Some(project_id.clone()),
            project_requirement: ProjectRequirement::Required,
            ip: None,
            user_agent: None,
        };
        let context = authenticate_authorize_resolve(&config(), &audit, request, DateTime::from_timestamp(500, 0).unwrap())
            .await
            .unwrap();
        assert!(context.actor.starts_with("run:"));
    }

    #[tokio::test]
    async fn missing_credential_is_rejected() {
        let audit: Arc<dyn AuditRepository> = Arc::new(NoopAudit);
        let request = InboundRequest {
            method: "GET".into(),
            path: "/projects/1".into(),
            request_id: RequestId::new(),
            credential: Credential::None,
            project_id: Some(ProjectId::new()),
            project_requirement: ProjectRequirement::Required,
            ip: None,
            user_agent: None,
        };
        let result = authenticate_authorize_resolve(&config(), &audit, request, Utc::now()).await;
        assert!(matches!(result, Err(GovernanceError::AuthenticationFailed(_))));
    }

    #[tokio::test]
    async fn viewer_role_is_forbidden_from_write_methods() {
        let ts = "100";
        let canonical = gateway_canonical_string(ts, "POST", "/datasets", "req1", "alice", "a@x.com", "viewer");
        let sig = hmac_sign(b"secret", canonical.as_bytes()).unwrap();
        let audit: Arc<dyn AuditRepository> = Arc::new(NoopAudit);
        let request = InboundRequest {
            method: "POST".into(),
            path: "/datasets".into(),
            request_id: RequestId::new(),
            credential: Credential::GatewayHeaders {
                subject: "alice".into(),
                email: "a@x.com".into(),
                roles: "viewer".into(),
                ts: ts.into(),
                sig,
            },
            project_id: Some(ProjectId::new()),
            project_requirement: ProjectRequirement::Required,
            ip: None,
            user_agent: None,
        };
        let result =
            authenticate_authorize_resolve(&config(), &audit, request, DateTime::from_timestamp(105, 0).unwrap()).await;
        assert!(matches!(result, Err(GovernanceError::NotAuthorized(_))));
    }

    #[tokio::test]
    async fn project_required_without_resolved_project_is_rejected() {
        let ts = "100";
        let canonical = gateway_canonical_string(ts, "GET", "/datasets", "req1", "alice", "a@x.com", "editor");
        let sig = hmac_sign(b"secret", canonical.as_bytes()).unwrap();
        let audit: Arc<dyn AuditRepository> = Arc::new(NoopAudit);
        let request = InboundRequest {
            method: "GET".into(),
            path: "/datasets".into(),
            request_id: RequestId::new(),
            credential: Credential::GatewayHeaders {
                subject: "alice".into(),
                email: "a@x.com".into(),
                roles: "editor".into(),
                ts: ts.into(),
                sig,
            },
            project_id: None,
            project_requirement: ProjectRequirement::Required,
            ip: None,
            user_agent: None,
        };
        let result =
            authenticate_authorize_resolve(&config(), &audit, request, DateTime::from_timestamp(105, 0).unwrap()).await;
        assert!(matches!(result, Err(GovernanceError::Invalid(_))));
    }
}
