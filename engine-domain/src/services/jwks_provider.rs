// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # JWKS Key Provider Port
//!
//! Fetch/refresh of signing keys is an infrastructure concern (HTTP +
//! background cache per spec §5 "JWKS cache: process-wide; refreshed by a
//! background task per issuer"); this crate only needs the resolved key
//! material, kept as opaque PEM bytes so the domain layer does not depend
//! on a particular JWT library's key type.

use async_trait::async_trait;

use crate::EngineError;

#[async_trait]
pub trait JwksProvider: Send + Sync {
    /// Returns the RSA public key (PEM-encoded) to verify tokens from
    /// `issuer`, or `EngineError::UnauthorizedIssuer` if `issuer` is not in
    /// the configured whitelist.
    async fn key_for_issuer(&self, issuer: &str) -> Result<Vec<u8>, EngineError>;
}
