// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ontology Repository Port
//!
//! The persistence seam for the pipeline's actual output (spec §1, §4.9
//! step 5): table/column/entity descriptions, glossary terms, and the
//! finalized [`DomainSummary`]. Distinct from [`crate::DagStore`], which
//! persists run/node scheduling state rather than the ontology those nodes
//! produce.

use async_trait::async_trait;

use crate::entities::{ColumnDescription, DomainSummary, EntityDescription, GlossaryTerm, TableDescription};
use crate::value_objects::OntologyId;
use crate::EngineError;

#[async_trait]
pub trait OntologyRepository: Send + Sync {
    async fn save_table_description(&self, ontology_id: OntologyId, description: TableDescription) -> Result<(), EngineError>;

    async fn save_column_description(&self, ontology_id: OntologyId, description: ColumnDescription) -> Result<(), EngineError>;

    async fn save_entity_description(&self, ontology_id: OntologyId, description: EntityDescription) -> Result<(), EngineError>;

    /// Merges the given terms into the ontology's glossary by `term` name:
    /// a field left `None` on an incoming term does not clear a
    /// previously-saved value for that field, so discovery's definition
    /// and enrichment's validated SQL can be saved independently.
    async fn save_glossary_terms(&self, ontology_id: OntologyId, terms: Vec<GlossaryTerm>) -> Result<(), EngineError>;

    async fn save_domain_summary(&self, ontology_id: OntologyId, summary: DomainSummary) -> Result<(), EngineError>;
}
