// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// A node's progress snapshot, e.g. "Enriching table 3/10" (spec §4.7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub message: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, message: impl Into<String>) -> Self {
        Self { current, total, message: message.into() }
    }

    pub fn zero_work(message: impl Into<String>) -> Self {
        Self::new(0, 0, message)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(0, 0, String::new())
    }
}
