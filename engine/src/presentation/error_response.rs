// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Maps an [`EngineError`] that reaches the admission boundary to the
//! `{error, message}` JSON error body (spec §6, §7).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use engine_domain::EngineError;

/// Errors that never reach an HTTP response (node/store errors) fall back to
/// 500 here; in practice only admission-boundary errors, which all carry a
/// status, are ever passed to this function.
pub fn error_response(err: EngineError) -> Response {
    let status = err.http_status().unwrap_or(500);
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = Json(json!({
        "error": err.error_code(),
        "message": err.to_string(),
    }));
    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn project_mismatch_maps_to_403_forbidden() {
        let response = error_response(EngineError::ProjectMismatch);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_authorization_maps_to_401_unauthorized() {
        let response = error_response(EngineError::MissingAuthorization);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_auth_url_maps_to_400_with_its_own_error_code() {
        let response = error_response(EngineError::InvalidAuthUrl);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
