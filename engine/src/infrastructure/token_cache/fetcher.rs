// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Upstream token fetch/refresh orchestration (spec §4.4 "Fetcher",
//! "Refresh"), layered over [`super::lru_cache::TokenCache`] and an
//! [`AuthorizationClient`] adapter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use engine_domain::{AuthorizationClient, EngineError, UpstreamTokenRef};

use super::lru_cache::TokenCache;
use crate::infrastructure::auth::jwks_validator::parse_claims_unverified;

pub struct UpstreamTokenFetcher {
    client: Arc<dyn AuthorizationClient>,
    cache: Arc<TokenCache>,
}

impl UpstreamTokenFetcher {
    pub fn new(client: Arc<dyn AuthorizationClient>, cache: Arc<TokenCache>) -> Self {
        Self { client, cache }
    }

    /// Fetches the upstream token named by `ref_id`, serving a cached
    /// value when present and unexpired (spec §4.4 "Fetcher").
    pub async fn fetch_by_reference(
        &self,
        ref_id: &str,
        auth_base_url: &str,
        bearer_jwt: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, EngineError> {
        let now = Utc::now();
        if let Some(cached) = self.cache.get(ref_id, now).await {
            return Ok(cached);
        }
        let token = self.client.fetch_by_reference(ref_id, auth_base_url, bearer_jwt).await?;
        if token.is_empty() {
            return Err(EngineError::EmptyToken);
        }
        self.cache.set(ref_id.to_string(), token.clone(), expires_at, now).await;
        Ok(token)
    }

    /// Refreshes the caller's upstream access, then fetches the token the
    /// refreshed JWT references (spec §4.4 "Refresh").
    pub async fn refresh(
        &self,
        auth_base_url: &str,
        bearer_jwt: &str,
        original_ref: Option<&UpstreamTokenRef>,
    ) -> Result<String, EngineError> {
        let refreshed = self.client.refresh(auth_base_url, bearer_jwt).await?;
        let new_claims = parse_claims_unverified(&refreshed.access_token)?;

        match &new_claims.upstream_token_ref {
            Some(new_ref) => {
                let auth_base_url = new_claims.auth_base_url.as_deref().unwrap_or(auth_base_url);
                let expires_at = DateTime::from_timestamp(new_ref.expires_at_epoch, 0).unwrap_or(now_plus_refresh(refreshed.expires_in));
                self.fetch_by_reference(&new_ref.id, auth_base_url, &refreshed.access_token, expires_at).await
            }
            None if original_ref.is_some() => {
                Err(EngineError::UpstreamError("upstream-token reference lost after refresh".to_string()))
            }
            None => Err(EngineError::UpstreamError("refresh not performed by server".to_string())),
        }
    }
}

fn now_plus_refresh(expires_in: i64) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::seconds(expires_in.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use engine_domain::RefreshedToken;
    use std::sync::Mutex;

    struct FakeClient {
        fetch_result: Mutex<Option<Result<String, EngineError>>>,
        refresh_token: String,
    }

    #[async_trait]
    impl AuthorizationClient for FakeClient {
        async fn fetch_by_reference(&self, _ref_id: &str, _auth_base_url: &str, _bearer_jwt: &str) -> Result<String, EngineError> {
            self.fetch_result.lock().unwrap().take().unwrap_or(Ok("fetched-token".to_string()))
        }

        async fn refresh(&self, _auth_base_url: &str, _bearer_jwt: &str) -> Result<RefreshedToken, EngineError> {
            Ok(RefreshedToken {
                access_token: self.refresh_token.clone(),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
                azure_token_refreshed: false,
            })
        }
    }

    fn jwt_with_ref(has_ref: bool) -> String {
        let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&serde_json::json!({"alg": "RS256"})).unwrap());
        let mut claims = serde_json::json!({
            "sub": "user-1", "iss": "https://issuer.example", "aud": ["engine"],
            "exp": 9999999999i64, "iat": 0, "pid": "00000000-0000-0000-0000-000000000000",
            "email": null, "preg": null, "roles": [], "papi": null, "scp": null,
            "upstream_token_ref": null, "inline_upstream_token": null,
        });
        if has_ref {
            claims["upstream_token_ref"] = serde_json::json!({"id": "ref-1", "expires_at_epoch": 9999999999i64});
        }
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        format!("{header}.{payload}.sig")
    }

    #[tokio::test]
    async fn fetch_by_reference_caches_across_calls() {
        let client = Arc::new(FakeClient { fetch_result: Mutex::new(None), refresh_token: String::new() });
        let cache = Arc::new(TokenCache::new(4));
        let fetcher = UpstreamTokenFetcher::new(client, cache);
        let expires_at = Utc::now() + chrono::Duration::seconds(60);
        let first = fetcher.fetch_by_reference("ref-1", "https://auth.example", "jwt", expires_at).await.unwrap();
        assert_eq!(first, "fetched-token");
        // second call must not need the client, since fetch_result is consumed.
        let second = fetcher.fetch_by_reference("ref-1", "https://auth.example", "jwt", expires_at).await.unwrap();
        assert_eq!(second, "fetched-token");
    }

    #[tokio::test]
    async fn refresh_fetches_the_token_the_new_jwt_references() {
        let client = Arc::new(FakeClient { fetch_result: Mutex::new(Some(Ok("new-upstream-token".to_string()))), refresh_token: jwt_with_ref(true) });
        let cache = Arc::new(TokenCache::new(4));
        let fetcher = UpstreamTokenFetcher::new(client, cache);
        let token = fetcher.refresh("https://auth.example", "jwt", None).await.unwrap();
        assert_eq!(token, "new-upstream-token");
    }

    #[tokio::test]
    async fn refresh_reports_reference_lost_when_original_had_one() {
        let client = Arc::new(FakeClient { fetch_result: Mutex::new(None), refresh_token: jwt_with_ref(false) });
        let cache = Arc::new(TokenCache::new(4));
        let fetcher = UpstreamTokenFetcher::new(client, cache);
        let original = UpstreamTokenRef::new("ref-0", 0);
        let result = fetcher.refresh("https://auth.example", "jwt", Some(&original)).await;
        assert!(matches!(result, Err(EngineError::UpstreamError(msg)) if msg.contains("lost")));
    }
}
