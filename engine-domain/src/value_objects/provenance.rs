// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

use crate::value_objects::ids::UserId;

/// The origin tag attached to a persisted relationship (glossary:
/// "Provenance").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipProvenance {
    Declared,
    ColumnFeature,
    LlmConfirmed,
    LlmNeedsReview,
    LlmNew,
}

/// Attached to a request's context by the `…WithProvenance` admission
/// middleware variants (spec §4.3): the subject, parsed as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestProvenance {
    pub source: RequestProvenanceSource,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestProvenanceSource {
    Manual,
}
