// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// The LLM's verdict on a candidate relationship (spec §3, §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Confirm,
    Reject,
    NeedsReview,
}

/// The LLM's structured response for one candidate, prior to the
/// confidence-threshold gate that decides whether a `Confirm` persists
/// outright or is downgraded to `needs_review` (spec §4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmDecision {
    pub candidate_id: crate::value_objects::ids::CandidateId,
    pub action: Decision,
    pub confidence: f64,
    pub reasoning: String,
}
