// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The thirteen pipeline stage executors (spec §4.8), one module per stage,
//! in the same fixed order as [`engine_domain::NodeName::ORDERED`].

pub mod column_enrichment;
pub mod column_feature_extraction;
pub mod entity_discovery;
pub mod entity_enrichment;
pub mod entity_promotion;
pub mod fk_discovery;
pub mod glossary_discovery;
pub mod glossary_enrichment;
pub mod knowledge_seeding;
pub mod ontology_finalization;
pub mod relationship_discovery;
pub mod relationship_enrichment;
pub mod table_feature_extraction;

use std::sync::Arc;

use engine_domain::NodeName;

use crate::application::executor::NodeExecutor;

/// Builds the fixed set of node executors, one per [`NodeName::ORDERED`]
/// entry, in execution order. The orchestrator (spec §4.10) looks up the
/// executor for whatever node the DAG Store reports as next-pending.
pub fn build_executors(project_overview: Option<String>) -> Vec<Arc<dyn NodeExecutor>> {
    vec![
        Arc::new(knowledge_seeding::KnowledgeSeedingExecutor::new(project_overview)),
        Arc::new(column_feature_extraction::ColumnFeatureExtractionExecutor::new()),
        Arc::new(table_feature_extraction::TableFeatureExtractionExecutor::new()),
        Arc::new(fk_discovery::FkDiscoveryExecutor::new()),
        Arc::new(relationship_discovery::RelationshipDiscoveryExecutor::new()),
        Arc::new(entity_discovery::EntityDiscoveryExecutor::new()),
        Arc::new(entity_enrichment::EntityEnrichmentExecutor::new()),
        Arc::new(entity_promotion::EntityPromotionExecutor::new()),
        Arc::new(column_enrichment::ColumnEnrichmentExecutor::new()),
        Arc::new(glossary_discovery::GlossaryDiscoveryExecutor::new()),
        Arc::new(glossary_enrichment::GlossaryEnrichmentExecutor::new()),
        Arc::new(relationship_enrichment::RelationshipEnrichmentExecutor::new()),
        Arc::new(ontology_finalization::OntologyFinalizationExecutor::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_executors_covers_every_ordered_node_name_once() {
        let executors = build_executors(None);
        let names: Vec<NodeName> = executors.iter().map(|e| e.name()).collect();
        assert_eq!(names, NodeName::ORDERED.to_vec());
    }
}
