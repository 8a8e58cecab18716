// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `reqwest`-backed [`AuthorizationClient`] (spec §4.4 "Fetcher"/"Refresh").

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use engine_domain::{AuthorizationClient, EngineError, RefreshedToken};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
    #[serde(default)]
    azure_token_refreshed: bool,
}

pub struct HttpAuthorizationClient {
    http: reqwest::Client,
}

impl HttpAuthorizationClient {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    fn join(auth_base_url: &str, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = Url::parse(auth_base_url).map_err(|e| EngineError::UpstreamError(format!("invalid auth base url: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| EngineError::UpstreamError("auth base url cannot be a base".to_string()))?;
            path.extend(segments);
        }
        Ok(url)
    }
}

impl Default for HttpAuthorizationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorizationClient for HttpAuthorizationClient {
    async fn fetch_by_reference(&self, ref_id: &str, auth_base_url: &str, bearer_jwt: &str) -> Result<String, EngineError> {
        let url = Self::join(auth_base_url, &["tokens", ref_id])?;
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(bearer_jwt)
            .send()
            .await
            .map_err(|e| EngineError::UpstreamError(e.to_string()))?;

        match response.status().as_u16() {
            404 => Err(EngineError::UpstreamNotFound),
            403 => Err(EngineError::UpstreamForbidden),
            200 => {
                let body: TokenResponse = response.json().await.map_err(|e| EngineError::UpstreamError(e.to_string()))?;
                if body.token.is_empty() {
                    Err(EngineError::EmptyToken)
                } else {
                    Ok(body.token)
                }
            }
            status => Err(EngineError::UpstreamError(format!("unexpected status {status}"))),
        }
    }

    async fn refresh(&self, auth_base_url: &str, bearer_jwt: &str) -> Result<RefreshedToken, EngineError> {
        let url = Self::join(auth_base_url, &["project", "token", "refresh"])?;
        let response = self
            .http
            .post(url)
            .bearer_auth(bearer_jwt)
            .send()
            .await
            .map_err(|e| EngineError::UpstreamError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::UpstreamError(format!("refresh returned status {}", response.status())));
        }
        let body: RefreshResponse = response.json().await.map_err(|e| EngineError::UpstreamError(e.to_string()))?;
        Ok(RefreshedToken {
            access_token: body.access_token,
            token_type: body.token_type,
            expires_in: body.expires_in,
            azure_token_refreshed: body.azure_token_refreshed,
        })
    }
}
