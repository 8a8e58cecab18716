// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! OAuth discovery helpers (spec §6, §9).
//!
//! Serving `/.well-known/oauth-authorization-server` itself is out of
//! scope (spec §1's Non-goals); what belongs here is the two pure
//! decisions that endpoint depends on: deriving a cookie domain from the
//! configured base URL, and rejecting an `auth_url` query parameter that
//! is not in the issuer whitelist.

/// Known suffixes the engine is deployed under. A host outside all of
/// these (and not `localhost`/`127.0.0.1`) gets an empty, host-only cookie
/// domain rather than guessing at a suffix that might leak the cookie to
/// an unrelated sibling domain.
const KNOWN_SUFFIXES: &[&str] = &[".ekaya.app", ".staging.ekaya.app", ".internal.ekaya.app"];

/// spec §9 "Cookie domain auto-derivation": a pure function of the base
/// URL's host. `localhost`/`127.0.0.1` match exactly and derive no domain
/// (the cookie is host-only); a known suffix derives that suffix so the
/// cookie is shared across subdomains; anything else derives no domain.
pub fn derive_cookie_domain(host: &str) -> String {
    if host == "localhost" || host == "127.0.0.1" {
        return String::new();
    }
    for suffix in KNOWN_SUFFIXES {
        if host.ends_with(suffix) {
            return (*suffix).to_string();
        }
    }
    String::new()
}

/// spec §6: "the server must reject any `auth_url` not in the issuer
/// whitelist with HTTP 400." `whitelist` is the same `issuer → jwks-url`
/// map's key set the JWKS Validator is configured with.
pub fn is_auth_url_whitelisted(auth_url: &str, whitelist: &[String]) -> bool {
    whitelist.iter().any(|issuer| issuer == auth_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_and_loopback_derive_no_domain() {
        assert_eq!(derive_cookie_domain("localhost"), "");
        assert_eq!(derive_cookie_domain("127.0.0.1"), "");
    }

    #[test]
    fn known_suffix_derives_the_suffix() {
        assert_eq!(derive_cookie_domain("api.ekaya.app"), ".ekaya.app");
        assert_eq!(derive_cookie_domain("app.staging.ekaya.app"), ".staging.ekaya.app");
    }

    #[test]
    fn unknown_host_derives_no_domain() {
        assert_eq!(derive_cookie_domain("example.com"), "");
    }

    #[test]
    fn auth_url_must_be_in_the_whitelist() {
        let whitelist = vec!["https://issuer.example".to_string()];
        assert!(is_auth_url_whitelisted("https://issuer.example", &whitelist));
        assert!(!is_auth_url_whitelisted("https://evil.example", &whitelist));
    }
}
