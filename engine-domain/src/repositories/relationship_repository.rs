// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Relationship Repository Port
//!
//! The persistence seam for the deduplicated relationship set Relationship
//! Discovery produces (spec §4.9 step 5, "persist the deduplicated
//! relationship set").

use async_trait::async_trait;

use crate::entities::RelationshipCandidate;
use crate::value_objects::OntologyId;
use crate::EngineError;

#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Replaces the ontology's stored relationship set with
    /// `relationships` — the caller has already deduplicated and resolved
    /// decisions, so this is a full write, not an append.
    async fn save_relationships(&self, ontology_id: OntologyId, relationships: Vec<RelationshipCandidate>) -> Result<(), EngineError>;
}
