// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use chrono::{DateTime, Utc};

/// One entry in the upstream delegated-token cache (spec §3, §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCacheEntry {
    pub key: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub last_access: DateTime<Utc>,
}

impl TokenCacheEntry {
    pub fn new(key: impl Into<String>, token: impl Into<String>, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self { key: key.into(), token: token.into(), expires_at, last_access: now }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
