// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! In-memory [`OntologyRepository`]/[`RelationshipRepository`] for tests
//! and single-process local runs, mirroring [`super::super::dag_store::
//! in_memory::InMemoryDagStore`]'s role for run/node state.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use engine_domain::{
    ColumnDescription, DomainSummary, EngineError, EntityDescription, GlossaryTerm, OntologyId, OntologyRepository,
    RelationshipCandidate, RelationshipRepository, TableDescription,
};

#[derive(Default)]
struct State {
    table_descriptions: HashMap<OntologyId, Vec<TableDescription>>,
    column_descriptions: HashMap<OntologyId, Vec<ColumnDescription>>,
    entity_descriptions: HashMap<OntologyId, Vec<EntityDescription>>,
    glossary_terms: HashMap<OntologyId, HashMap<String, GlossaryTerm>>,
    domain_summaries: HashMap<OntologyId, DomainSummary>,
    relationships: HashMap<OntologyId, Vec<RelationshipCandidate>>,
}

pub struct InMemoryOntologyStore {
    state: Mutex<State>,
}

impl InMemoryOntologyStore {
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn table_descriptions(&self, ontology_id: OntologyId) -> Vec<TableDescription> {
        self.lock().table_descriptions.get(&ontology_id).cloned().unwrap_or_default()
    }

    pub fn column_descriptions(&self, ontology_id: OntologyId) -> Vec<ColumnDescription> {
        self.lock().column_descriptions.get(&ontology_id).cloned().unwrap_or_default()
    }

    pub fn entity_descriptions(&self, ontology_id: OntologyId) -> Vec<EntityDescription> {
        self.lock().entity_descriptions.get(&ontology_id).cloned().unwrap_or_default()
    }

    pub fn glossary_terms(&self, ontology_id: OntologyId) -> Vec<GlossaryTerm> {
        self.lock().glossary_terms.get(&ontology_id).map(|m| m.values().cloned().collect()).unwrap_or_default()
    }

    pub fn domain_summary(&self, ontology_id: OntologyId) -> Option<DomainSummary> {
        self.lock().domain_summaries.get(&ontology_id).cloned()
    }

    pub fn relationships(&self, ontology_id: OntologyId) -> Vec<RelationshipCandidate> {
        self.lock().relationships.get(&ontology_id).cloned().unwrap_or_default()
    }
}

impl Default for InMemoryOntologyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OntologyRepository for InMemoryOntologyStore {
    async fn save_table_description(&self, ontology_id: OntologyId, description: TableDescription) -> Result<(), EngineError> {
        self.lock().table_descriptions.entry(ontology_id).or_default().push(description);
        Ok(())
    }

    async fn save_column_description(&self, ontology_id: OntologyId, description: ColumnDescription) -> Result<(), EngineError> {
        self.lock().column_descriptions.entry(ontology_id).or_default().push(description);
        Ok(())
    }

    async fn save_entity_description(&self, ontology_id: OntologyId, description: EntityDescription) -> Result<(), EngineError> {
        self.lock().entity_descriptions.entry(ontology_id).or_default().push(description);
        Ok(())
    }

    async fn save_glossary_terms(&self, ontology_id: OntologyId, terms: Vec<GlossaryTerm>) -> Result<(), EngineError> {
        let mut state = self.lock();
        let existing = state.glossary_terms.entry(ontology_id).or_default();
        for incoming in terms {
            existing
                .entry(incoming.term.clone())
                .and_modify(|current| {
                    if incoming.definition.is_some() {
                        current.definition = incoming.definition.clone();
                    }
                    if incoming.validating_sql.is_some() {
                        current.validating_sql = incoming.validating_sql.clone();
                    }
                })
                .or_insert(incoming);
        }
        Ok(())
    }

    async fn save_domain_summary(&self, ontology_id: OntologyId, summary: DomainSummary) -> Result<(), EngineError> {
        self.lock().domain_summaries.insert(ontology_id, summary);
        Ok(())
    }
}

#[async_trait]
impl RelationshipRepository for InMemoryOntologyStore {
    async fn save_relationships(&self, ontology_id: OntologyId, relationships: Vec<RelationshipCandidate>) -> Result<(), EngineError> {
        self.lock().relationships.insert(ontology_id, relationships);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_domain::{ColumnRef, DetectionMethod};

    #[tokio::test]
    async fn table_descriptions_accumulate_per_ontology() {
        let store = InMemoryOntologyStore::new();
        let ontology_id = OntologyId::new();
        store
            .save_table_description(ontology_id, TableDescription { table: "orders".into(), description: "order records".into() })
            .await
            .unwrap();
        store
            .save_table_description(ontology_id, TableDescription { table: "customers".into(), description: "customer records".into() })
            .await
            .unwrap();
        assert_eq!(store.table_descriptions(ontology_id).len(), 2);
    }

    #[tokio::test]
    async fn glossary_terms_merge_by_term_name_without_clearing_untouched_fields() {
        let store = InMemoryOntologyStore::new();
        let ontology_id = OntologyId::new();
        store
            .save_glossary_terms(ontology_id, vec![GlossaryTerm { term: "Churn".into(), definition: Some("customer loss".into()), validating_sql: None }])
            .await
            .unwrap();
        store
            .save_glossary_terms(ontology_id, vec![GlossaryTerm { term: "Churn".into(), definition: None, validating_sql: Some("SELECT 1".into()) }])
            .await
            .unwrap();

        let terms = store.glossary_terms(ontology_id);
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].definition.as_deref(), Some("customer loss"));
        assert_eq!(terms[0].validating_sql.as_deref(), Some("SELECT 1"));
    }

    #[tokio::test]
    async fn save_relationships_replaces_the_stored_set() {
        let store = InMemoryOntologyStore::new();
        let ontology_id = OntologyId::new();
        let candidate = RelationshipCandidate::new(
            ColumnRef { table: "orders".into(), column: "customer_id".into(), data_type: "uuid".into() },
            ColumnRef { table: "customers".into(), column: "id".into(), data_type: "uuid".into() },
            DetectionMethod::DeclaredFk,
        );
        store.save_relationships(ontology_id, vec![candidate]).await.unwrap();
        assert_eq!(store.relationships(ontology_id).len(), 1);

        store.save_relationships(ontology_id, vec![]).await.unwrap();
        assert!(store.relationships(ontology_id).is_empty());
    }
}
