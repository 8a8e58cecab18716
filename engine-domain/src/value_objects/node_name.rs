// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The fixed, versioned sequence of pipeline stages (spec §4.8). The DAG
//! topology is never user-defined: a DAG Run's nodes are always these
//! thirteen, in this order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeName {
    KnowledgeSeeding,
    ColumnFeatureExtraction,
    TableFeatureExtraction,
    FkDiscovery,
    RelationshipDiscovery,
    EntityDiscovery,
    EntityEnrichment,
    EntityPromotion,
    ColumnEnrichment,
    GlossaryDiscovery,
    GlossaryEnrichment,
    RelationshipEnrichment,
    OntologyFinalization,
}

impl NodeName {
    /// The thirteen stages in their fixed execution order.
    pub const ORDERED: [NodeName; 13] = [
        NodeName::KnowledgeSeeding,
        NodeName::ColumnFeatureExtraction,
        NodeName::TableFeatureExtraction,
        NodeName::FkDiscovery,
        NodeName::RelationshipDiscovery,
        NodeName::EntityDiscovery,
        NodeName::EntityEnrichment,
        NodeName::EntityPromotion,
        NodeName::ColumnEnrichment,
        NodeName::GlossaryDiscovery,
        NodeName::GlossaryEnrichment,
        NodeName::RelationshipEnrichment,
        NodeName::OntologyFinalization,
    ];

    /// Nodes that operate on a specific ontology and must fail fast with
    /// `ontology-id-required` when the owning DAG has no ontology ID
    /// (spec §4.7). Knowledge seeding and the two deterministic discovery
    /// passes that precede ontology assignment run without one.
    pub fn requires_ontology_id(self) -> bool {
        !matches!(
            self,
            NodeName::KnowledgeSeeding | NodeName::ColumnFeatureExtraction | NodeName::FkDiscovery
        )
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeName::KnowledgeSeeding => "knowledge_seeding",
            NodeName::ColumnFeatureExtraction => "column_feature_extraction",
            NodeName::TableFeatureExtraction => "table_feature_extraction",
            NodeName::FkDiscovery => "fk_discovery",
            NodeName::RelationshipDiscovery => "relationship_discovery",
            NodeName::EntityDiscovery => "entity_discovery",
            NodeName::EntityEnrichment => "entity_enrichment",
            NodeName::EntityPromotion => "entity_promotion",
            NodeName::ColumnEnrichment => "column_enrichment",
            NodeName::GlossaryDiscovery => "glossary_discovery",
            NodeName::GlossaryEnrichment => "glossary_enrichment",
            NodeName::RelationshipEnrichment => "relationship_enrichment",
            NodeName::OntologyFinalization => "ontology_finalization",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_sequence_has_thirteen_stages_starting_with_seeding() {
        assert_eq!(NodeName::ORDERED.len(), 13);
        assert_eq!(NodeName::ORDERED[0], NodeName::KnowledgeSeeding);
        assert_eq!(NodeName::ORDERED[12], NodeName::OntologyFinalization);
    }

    #[test]
    fn only_pre_ontology_stages_skip_the_ontology_id_requirement() {
        assert!(!NodeName::KnowledgeSeeding.requires_ontology_id());
        assert!(!NodeName::ColumnFeatureExtraction.requires_ontology_id());
        assert!(!NodeName::FkDiscovery.requires_ontology_id());
        assert!(NodeName::RelationshipDiscovery.requires_ontology_id());
        assert!(NodeName::OntologyFinalization.requires_ontology_id());
    }
}
