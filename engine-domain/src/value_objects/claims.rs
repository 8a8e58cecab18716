// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Typed bearer claims (spec §3 "Claims", §6 "JWT claims").
//!
//! `Claims` is the shape the JWKS Validator hands back on success; it is
//! never constructed directly from an inbound request — only by
//! [`crate::services::jwks_provider`] consumers after signature/issuer/
//! audience checks pass.

use serde::{Deserialize, Serialize};

use crate::value_objects::upstream_token_ref::UpstreamTokenRef;

pub const REQUIRED_AUDIENCE: &str = "engine";
pub const CENTRAL_SERVICE_SUBJECT: &str = "central";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// `sub` — subject. The literal `"central"` identifies the internal
    /// provisioning service (glossary: "Central service token").
    pub subject: String,
    pub issuer: String,
    pub audience: Vec<String>,
    pub expires_at: i64,
    pub issued_at: i64,

    /// `pid` — project identifier, carried as the raw string from the
    /// token so format errors can be reported distinctly from "absent".
    pub project_id: String,
    pub email: Option<String>,
    /// `preg` — project region.
    pub project_region: Option<String>,
    pub roles: Vec<String>,
    /// `papi` — authorization-service base URL.
    pub auth_base_url: Option<String>,
    /// `scp` — scope string.
    pub scope: Option<String>,
    pub upstream_token_ref: Option<UpstreamTokenRef>,
    /// An upstream access token embedded directly in the claims, bypassing
    /// the reference-based fetch path.
    pub inline_upstream_token: Option<String>,
}

impl Claims {
    /// spec §3: "a request is admissible only if audience contains the
    /// literal value `engine` AND issuer is in the JWKS-whitelist map."
    /// This checks only the audience half; issuer whitelisting is the
    /// JWKS Validator's job since it alone knows the configured map.
    pub fn has_required_audience(&self) -> bool {
        self.audience.iter().any(|a| a == REQUIRED_AUDIENCE)
    }

    pub fn is_central_service(&self) -> bool {
        self.subject == CENTRAL_SERVICE_SUBJECT
    }

    pub fn has_any_role(&self, allowed: &[String]) -> bool {
        self.roles.iter().any(|r| allowed.contains(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_audience(aud: Vec<&str>) -> Claims {
        Claims {
            subject: "user-1".to_string(),
            issuer: "https://issuer.example".to_string(),
            audience: aud.into_iter().map(String::from).collect(),
            expires_at: 0,
            issued_at: 0,
            project_id: "00000000-0000-0000-0000-000000000000".to_string(),
            email: None,
            project_region: None,
            roles: vec![],
            auth_base_url: None,
            scope: None,
            upstream_token_ref: None,
            inline_upstream_token: None,
        }
    }

    #[test]
    fn requires_exact_engine_audience_literal() {
        assert!(claims_with_audience(vec!["engine"]).has_required_audience());
        assert!(!claims_with_audience(vec!["other-service"]).has_required_audience());
    }

    #[test]
    fn central_service_subject_is_recognized() {
        let mut claims = claims_with_audience(vec!["engine"]);
        claims.subject = CENTRAL_SERVICE_SUBJECT.to_string();
        assert!(claims.is_central_service());
    }

    #[test]
    fn role_intersection_checks_any_match() {
        let mut claims = claims_with_audience(vec!["engine"]);
        claims.roles = vec!["viewer".to_string(), "editor".to_string()];
        assert!(claims.has_any_role(&["editor".to_string(), "admin".to_string()]));
        assert!(!claims.has_any_role(&["admin".to_string()]));
    }
}
