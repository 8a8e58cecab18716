// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Request Admission middlewares (spec §4.3)
//!
//! `RequireAuth`, `RequireAuthWithPathValidation`, `RequireCentralService`
//! and `RequireRole`, plus the `…WithProvenance` variants that additionally
//! parse the subject as a user ID. Every middleware here is a thin wrapper
//! around [`validate_request`] and [`require_project_and_user`] — the admission
//! logic itself is ordinary, testable functions; the `axum` layer only wires
//! them to the request/response cycle and the error JSON body.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use engine_domain::{Claims, EngineError};

use crate::infrastructure::auth::JwksValidator;
use crate::presentation::context_keys::{
    ClaimsContext, Provenance, ProvenanceContext, ProvenanceSource, TokenContext, TokenSource, TokenSourceContext,
    UpstreamTokenRefContext,
};
use crate::presentation::error_response::error_response;

const JWT_COOKIE_NAME: &str = "ekaya_jwt";

/// State shared by every admission middleware: the validator alone. Cheap
/// to clone — it is an `Arc` under the hood.
#[derive(Clone)]
pub struct AdmissionState {
    pub validator: Arc<JwksValidator>,
}

/// Configuration for [`require_auth_with_path_validation`]: the validator
/// plus which path parameter carries the project ID.
#[derive(Clone)]
pub struct PathValidationState {
    pub admission: AdmissionState,
    pub path_param_name: &'static str,
}

/// Configuration for [`require_role`]: the role set that satisfies it.
#[derive(Clone)]
pub struct RoleState {
    pub allowed: Arc<Vec<String>>,
}

/// Extracts the bearer token per spec §4.3's precedence: `Authorization:
/// Bearer <token>` wins over the `ekaya_jwt` cookie. An `Authorization`
/// header present but not exactly `Bearer <token>` is `invalid-format`,
/// even if a usable cookie is also present — header wins outright, it does
/// not merely take priority on success.
fn extract_token(req: &Request) -> Result<(String, TokenSource), EngineError> {
    if let Some(header_value) = req.headers().get(header::AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        let parts: Vec<&str> = header_value.split_whitespace().collect();
        return match parts.as_slice() {
            [scheme, token] if *scheme == "Bearer" && !token.is_empty() => Ok((token.to_string(), TokenSource::Header)),
            _ => Err(EngineError::InvalidAuthFormat),
        };
    }

    let cookie_header = req.headers().get(header::COOKIE).and_then(|h| h.to_str().ok());
    if let Some(cookie_header) = cookie_header {
        for cookie in cookie_header.split(';') {
            let cookie = cookie.trim();
            if let Some(value) = cookie.strip_prefix(JWT_COOKIE_NAME).and_then(|rest| rest.strip_prefix('=')) {
                return Ok((value.to_string(), TokenSource::Cookie));
            }
        }
    }

    Err(EngineError::MissingAuthorization)
}

/// spec §4.1 `require-project-and-user`: parses the claims' project ID into
/// a UUID, failing distinctly on "absent" vs. "malformed".
fn require_project_and_user(claims: &Claims) -> Result<(), EngineError> {
    if claims.project_id.is_empty() {
        return Err(EngineError::MissingProject);
    }
    Uuid::parse_str(&claims.project_id).map_err(|_| EngineError::InvalidProjectFormat)?;
    Ok(())
}

/// spec §4.3 `validate-path-project`: an empty path value is skipped
/// (no project-scoped segment to check); otherwise it must equal the
/// claims' project ID exactly.
fn validate_path_project(claims: &Claims, path_project: &str) -> Result<(), EngineError> {
    if path_project.is_empty() || path_project == claims.project_id {
        Ok(())
    } else {
        Err(EngineError::ProjectMismatch)
    }
}

fn parse_user_id(claims: &Claims) -> Result<Uuid, EngineError> {
    Uuid::parse_str(&claims.subject).map_err(|_| EngineError::MissingUser)
}

async fn validate_and_inject(state: &AdmissionState, req: &mut Request) -> Result<Claims, EngineError> {
    let (token, source) = extract_token(req)?;
    let claims = state.validator.validate(&token).await?;
    require_project_and_user(&claims)?;

    if let Some(upstream_ref) = claims.upstream_token_ref.clone() {
        req.extensions_mut().insert(UpstreamTokenRefContext(upstream_ref));
    }
    req.extensions_mut().insert(TokenContext(token));
    req.extensions_mut().insert(TokenSourceContext(source));
    req.extensions_mut().insert(ClaimsContext(claims.clone()));
    Ok(claims)
}

fn attach_provenance(req: &mut Request, claims: &Claims) -> Result<(), EngineError> {
    let user_id = parse_user_id(claims)?;
    req.extensions_mut().insert(ProvenanceContext(Provenance { source: ProvenanceSource::Manual, user_id }));
    Ok(())
}

/// **RequireAuth**: validate the bearer token, require a well-formed
/// project ID, inject claims/token/upstream-token-reference, then run the
/// downstream handler.
pub async fn require_auth(State(state): State<AdmissionState>, mut req: Request, next: Next) -> Response {
    match validate_and_inject(&state, &mut req).await {
        Ok(_claims) => next.run(req).await,
        Err(err) => error_response(err),
    }
}

/// **RequireAuth** + provenance: as above, and additionally attaches a
/// `{source=manual, userID}` provenance record, failing 400 if the
/// subject is not UUID-parseable.
pub async fn require_auth_with_provenance(State(state): State<AdmissionState>, mut req: Request, next: Next) -> Response {
    let claims = match validate_and_inject(&state, &mut req).await {
        Ok(claims) => claims,
        Err(err) => return error_response(err),
    };
    if let Err(err) = attach_provenance(&mut req, &claims) {
        return error_response(err);
    }
    next.run(req).await
}

/// **RequireAuthWithPathValidation(pathParamName)**: as `RequireAuth`, plus
/// a mismatch between the named path parameter and the claims' project ID
/// is rejected with 403.
pub async fn require_auth_with_path_validation(
    State(state): State<PathValidationState>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = match validate_and_inject(&state.admission, &mut req).await {
        Ok(claims) => claims,
        Err(err) => return error_response(err),
    };
    let path_value = params.get(state.path_param_name).cloned().unwrap_or_default();
    if let Err(err) = validate_path_project(&claims, &path_value) {
        return error_response(err);
    }
    next.run(req).await
}

/// `RequireAuthWithPathValidation` + provenance.
pub async fn require_auth_with_path_validation_and_provenance(
    State(state): State<PathValidationState>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = match validate_and_inject(&state.admission, &mut req).await {
        Ok(claims) => claims,
        Err(err) => return error_response(err),
    };
    let path_value = params.get(state.path_param_name).cloned().unwrap_or_default();
    if let Err(err) = validate_path_project(&claims, &path_value) {
        return error_response(err);
    }
    if let Err(err) = attach_provenance(&mut req, &claims) {
        return error_response(err);
    }
    next.run(req).await
}

/// **RequireCentralService**: validate only, then accept iff the subject
/// is the literal `"central"`.
pub async fn require_central_service(State(state): State<AdmissionState>, mut req: Request, next: Next) -> Response {
    let (token, source) = match extract_token(&req) {
        Ok(pair) => pair,
        Err(err) => return error_response(err),
    };
    let claims = match state.validator.validate(&token).await {
        Ok(claims) => claims,
        Err(err) => return error_response(err),
    };
    if !claims.is_central_service() {
        return error_response(EngineError::NotCentral);
    }
    req.extensions_mut().insert(TokenContext(token));
    req.extensions_mut().insert(TokenSourceContext(source));
    req.extensions_mut().insert(ClaimsContext(claims));
    next.run(req).await
}

/// **RequireRole(allowedSet)**: runs after a prior admission middleware
/// has already populated [`ClaimsContext`]; absent claims is a 401 (the
/// caller wired this middleware without an auth middleware ahead of it,
/// which we still must not crash on), an empty role intersection is 403.
pub async fn require_role(State(state): State<RoleState>, req: Request, next: Next) -> Response {
    let Some(claims) = req.extensions().get::<ClaimsContext>() else {
        return error_response(EngineError::MissingAuthorization);
    };
    if !claims.0.has_any_role(&state.allowed) {
        return error_response(EngineError::InsufficientRole);
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use engine_domain::JwksProvider;
    use tower::ServiceExt;

    struct NoKeysProvider;
    #[async_trait]
    impl JwksProvider for NoKeysProvider {
        async fn key_for_issuer(&self, _issuer: &str) -> Result<Vec<u8>, EngineError> {
            Err(EngineError::UnauthorizedIssuer)
        }
    }

    fn admission_state() -> AdmissionState {
        AdmissionState { validator: Arc::new(JwksValidator::new(Arc::new(NoKeysProvider), true)) }
    }

    fn encode_segment(value: &serde_json::Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    fn token_with_claims(claims: serde_json::Value) -> String {
        let header = serde_json::json!({"alg": "RS256", "typ": "JWT"});
        format!("{}.{}.unsigned", encode_segment(&header), encode_segment(&claims))
    }

    fn base_claims(project_id: &str) -> serde_json::Value {
        serde_json::json!({
            "sub": "11111111-1111-1111-1111-111111111111",
            "iss": "https://issuer.example",
            "aud": ["engine"],
            "exp": 9999999999i64,
            "iat": 0,
            "pid": project_id,
            "email": null,
            "preg": null,
            "roles": ["viewer"],
            "papi": null,
            "scp": null,
            "upstream_token_ref": null,
            "inline_upstream_token": null,
        })
    }

    fn app() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn_with_state(admission_state(), require_auth))
    }

    #[tokio::test]
    async fn header_wins_over_cookie() {
        let header_token = token_with_claims(base_claims("00000000-0000-0000-0000-000000000000"));
        let cookie_token = "cookie-token-should-be-ignored";
        let request = HttpRequest::builder()
            .uri("/ping")
            .header(header::AUTHORIZATION, format!("Bearer {header_token}"))
            .header(header::COOKIE, format!("{JWT_COOKIE_NAME}={cookie_token}"))
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_authorization_is_rejected() {
        let request = HttpRequest::builder().uri("/ping").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_audience_fails_admission() {
        let mut claims = base_claims("00000000-0000-0000-0000-000000000000");
        claims["aud"] = serde_json::json!(["other-service"]);
        let token = token_with_claims(claims);
        let request = HttpRequest::builder()
            .uri("/ping")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn path_project_mismatch_is_forbidden() {
        let token = token_with_claims(base_claims("project-123"));
        let state = PathValidationState { admission: admission_state(), path_param_name: "project_id" };
        let app = Router::new()
            .route("/projects/:project_id", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(state, require_auth_with_path_validation));
        let request = HttpRequest::builder()
            .uri("/projects/project-456")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn matching_path_project_is_admitted() {
        let token = token_with_claims(base_claims("project-123"));
        let state = PathValidationState { admission: admission_state(), path_param_name: "project_id" };
        let app = Router::new()
            .route("/projects/:project_id", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(state, require_auth_with_path_validation));
        let request = HttpRequest::builder()
            .uri("/projects/project-123")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn central_service_rejects_non_central_subject() {
        let token = token_with_claims(base_claims("00000000-0000-0000-0000-000000000000"));
        let app = Router::new()
            .route("/internal", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(admission_state(), require_central_service));
        let request = HttpRequest::builder()
            .uri("/internal")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn extract_token_rejects_malformed_header() {
        let request = HttpRequest::builder()
            .uri("/ping")
            .header(header::AUTHORIZATION, "Token abc")
            .body(Body::empty())
            .unwrap();
        assert!(matches!(extract_token(&request), Err(EngineError::InvalidAuthFormat)));
    }

    #[test]
    fn extract_token_rejects_header_with_embedded_spaces() {
        let request = HttpRequest::builder()
            .uri("/ping")
            .header(header::AUTHORIZATION, "Bearer abc def")
            .body(Body::empty())
            .unwrap();
        assert!(matches!(extract_token(&request), Err(EngineError::InvalidAuthFormat)));
    }

    #[test]
    fn validate_path_project_skips_empty_path_value() {
        let claims = serde_json::from_value::<Claims>(serde_json::json!({
            "subject": "s", "issuer": "i", "audience": ["engine"], "expires_at": 0, "issued_at": 0,
            "project_id": "project-123", "email": null, "project_region": null, "roles": [],
            "auth_base_url": null, "scope": null, "upstream_token_ref": null, "inline_upstream_token": null,
        }))
        .unwrap();
        assert!(validate_path_project(&claims, "").is_ok());
        assert!(validate_path_project(&claims, "project-123").is_ok());
        assert!(validate_path_project(&claims, "project-456").is_err());
    }
}
