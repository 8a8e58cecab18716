// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # JWKS Validator (spec §4.2)
//!
//! Verifies a compact RS256 JWS against a per-issuer keyset obtained from
//! [`engine_domain::JwksProvider`]. A verification-disabled mode parses
//! claims without checking the signature but still enforces the required
//! audience — used in local/dev runs where no JWKS endpoint is reachable.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer};

use engine_domain::{Claims, EngineError, JwksProvider, UpstreamTokenRef};

#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: String,
}

fn deserialize_audience<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: String,
    iss: String,
    #[serde(deserialize_with = "deserialize_audience")]
    aud: Vec<String>,
    exp: i64,
    iat: i64,
    pid: String,
    email: Option<String>,
    preg: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    papi: Option<String>,
    scp: Option<String>,
    upstream_token_ref: Option<UpstreamTokenRef>,
    inline_upstream_token: Option<String>,
}

impl From<RawClaims> for Claims {
    fn from(raw: RawClaims) -> Self {
        Claims {
            subject: raw.sub,
            issuer: raw.iss,
            audience: raw.aud,
            expires_at: raw.exp,
            issued_at: raw.iat,
            project_id: raw.pid,
            email: raw.email,
            project_region: raw.preg,
            roles: raw.roles,
            auth_base_url: raw.papi,
            scope: raw.scp,
            upstream_token_ref: raw.upstream_token_ref,
            inline_upstream_token: raw.inline_upstream_token,
        }
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, EngineError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| EngineError::MalformedToken(format!("invalid base64: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| EngineError::MalformedToken(format!("invalid JSON: {e}")))
}

/// Parses a JWT's claims without checking its signature. Used both by
/// [`JwksValidator::validate`] in verification-disabled mode and by the
/// upstream token refresh flow, which must read the claims of a freshly
/// issued JWT before fetching the upstream token it references.
pub fn parse_claims_unverified(token: &str) -> Result<Claims, EngineError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [_header_segment, payload_segment, _signature] = parts[..] else {
        return Err(EngineError::MalformedToken("token is not three dot-separated segments".to_string()));
    };
    let raw_claims: RawClaims = decode_segment(payload_segment)?;
    Ok(raw_claims.into())
}

pub struct JwksValidator {
    jwks_provider: Arc<dyn JwksProvider>,
    verification_disabled: bool,
}

impl JwksValidator {
    pub fn new(jwks_provider: Arc<dyn JwksProvider>, verification_disabled: bool) -> Self {
        Self { jwks_provider, verification_disabled }
    }

    /// Verifies `token` and returns its claims (spec §4.2).
    pub async fn validate(&self, token: &str) -> Result<Claims, EngineError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [header_segment, payload_segment, _signature] = parts[..] else {
            return Err(EngineError::MalformedToken("token is not three dot-separated segments".to_string()));
        };

        let header: RawHeader = decode_segment(header_segment)?;
        if header.alg != "RS256" {
            return Err(EngineError::MalformedToken(format!("unsupported signing algorithm family: {}", header.alg)));
        }

        let raw_claims: RawClaims = decode_segment(payload_segment)?;

        if !self.verification_disabled {
            let pem = self
                .jwks_provider
                .key_for_issuer(&raw_claims.iss)
                .await
                .map_err(|_| EngineError::UnauthorizedIssuer)?;
            let decoding_key =
                DecodingKey::from_rsa_pem(&pem).map_err(|e| EngineError::MalformedToken(format!("invalid JWKS key material: {e}")))?;
            let mut validation = Validation::new(Algorithm::RS256);
            validation.validate_aud = false;
            jsonwebtoken::decode::<serde_json::Value>(token, &decoding_key, &validation)
                .map_err(|_| EngineError::InvalidSignature)?;
        }

        let claims: Claims = raw_claims.into();
        if !claims.has_required_audience() {
            return Err(EngineError::InvalidAudience);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoKeysProvider;

    #[async_trait]
    impl JwksProvider for NoKeysProvider {
        async fn key_for_issuer(&self, _issuer: &str) -> Result<Vec<u8>, EngineError> {
            Err(EngineError::UnauthorizedIssuer)
        }
    }

    fn encode_segment(value: &serde_json::Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    fn unsigned_token(claims: serde_json::Value) -> String {
        let header = serde_json::json!({"alg": "RS256", "typ": "JWT"});
        format!("{}.{}.unsigned", encode_segment(&header), encode_segment(&claims))
    }

    fn base_claims() -> serde_json::Value {
        serde_json::json!({
            "sub": "user-1",
            "iss": "https://issuer.example",
            "aud": ["engine"],
            "exp": 9999999999i64,
            "iat": 0,
            "pid": "00000000-0000-0000-0000-000000000000",
            "email": null,
            "preg": null,
            "roles": [],
            "papi": null,
            "scp": null,
            "upstream_token_ref": null,
            "inline_upstream_token": null,
        })
    }

    #[tokio::test]
    async fn verification_disabled_still_enforces_audience() {
        let validator = JwksValidator::new(Arc::new(NoKeysProvider), true);
        let mut claims = base_claims();
        claims["aud"] = serde_json::json!(["other-service"]);
        let result = validator.validate(&unsigned_token(claims)).await;
        assert!(matches!(result, Err(EngineError::InvalidAudience)));
    }

    #[tokio::test]
    async fn verification_disabled_parses_valid_claims() {
        let validator = JwksValidator::new(Arc::new(NoKeysProvider), true);
        let claims = validator.validate(&unsigned_token(base_claims())).await.unwrap();
        assert_eq!(claims.subject, "user-1");
        assert!(claims.has_required_audience());
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let validator = JwksValidator::new(Arc::new(NoKeysProvider), true);
        let result = validator.validate("not-a-jwt").await;
        assert!(matches!(result, Err(EngineError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn unknown_issuer_fails_when_verification_is_enabled() {
        let validator = JwksValidator::new(Arc::new(NoKeysProvider), false);
        let result = validator.validate(&unsigned_token(base_claims())).await;
        assert!(matches!(result, Err(EngineError::UnauthorizedIssuer)));
    }
}
