// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Authorization Service Client Port (spec §4.4 "Fetcher")

use async_trait::async_trait;

use crate::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub azure_token_refreshed: bool,
}

#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    /// `GET {auth_base_url}/tokens/{ref_id}` (spec §6). Maps `404` to
    /// `UpstreamNotFound`, `403` to `UpstreamForbidden`, any other non-200
    /// or an empty token body to `UpstreamError`.
    async fn fetch_by_reference(
        &self,
        ref_id: &str,
        auth_base_url: &str,
        bearer_jwt: &str,
    ) -> Result<String, EngineError>;

    /// `POST {auth_base_url}/project/token/refresh` (spec §4.4, §6).
    async fn refresh(&self, auth_base_url: &str, bearer_jwt: &str) -> Result<RefreshedToken, EngineError>;
}
