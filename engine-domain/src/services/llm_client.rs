// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LLM Client Port
//!
//! Prompt assembly and the concrete provider HTTP client are out of scope
//! (spec §1 Non-goals); this crate only defines the seam every LLM-fronted
//! node (§4.8 items 1, 3, 7, 9, 11, 12) and the relationship discovery core
//! (§4.9) call through. A failed call must be classified into an
//! [`crate::LlmErrorKind`] so the node executor framework's fatal/degradable
//! rule (§4.7) can apply.

use async_trait::async_trait;
use std::time::Duration;

use crate::EngineError;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `prompt` and returns the model's raw text response.
    /// Implementations classify transport/auth/protocol failures into
    /// `EngineError::Llm { kind, .. }`; callers parse the response body
    /// themselves (e.g. as the strict JSON schema in §4.9).
    async fn complete(&self, prompt: &str, deadline: Duration) -> Result<String, EngineError>;
}
