// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// How a relationship candidate was found (spec §3, glossary).
///
/// Doubles as the tie-break priority order used by relationship discovery
/// (spec §4.9): `DeclaredFk` > `ColumnFeatureFk` > `ValueMatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Lowest priority first so derived `Ord` ranks declared FKs highest.
    ValueMatch,
    ColumnFeatureFk,
    DeclaredFk,
}

impl DetectionMethod {
    /// True for methods that are preserved outright rather than routed
    /// through LLM validation (spec §4.9 steps 1-2).
    pub fn is_preserved(self) -> bool {
        matches!(self, DetectionMethod::DeclaredFk | DetectionMethod::ColumnFeatureFk)
    }
}
