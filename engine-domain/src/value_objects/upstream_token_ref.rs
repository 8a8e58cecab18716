// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// An opaque reference to a third-party token the authorization service can
/// exchange for a short-lived access token (glossary: "Upstream-token
/// reference").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamTokenRef {
    pub id: String,
    /// Expiry as a Unix epoch second, per the JWT claim's own encoding.
    pub expires_at_epoch: i64,
}

impl UpstreamTokenRef {
    pub fn new(id: impl Into<String>, expires_at_epoch: i64) -> Self {
        Self { id: id.into(), expires_at_epoch }
    }
}
