// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `ExecutionContext` carried into every node executor (spec §4.7, §9
//! "Typed context keys"). It bundles the DAG identifiers a node needs, the
//! collaborators it calls out to, and a cancellation signal that all
//! suspension points must honor (spec §5 "Suspension points").

use std::sync::Arc;

use engine_domain::{DagId, DatasourceId, OntologyId, ProjectId};

use crate::infrastructure::cancellation::CancellationToken;

/// Cloned cheaply (everything behind `Arc`) so each node executor can hold
/// its own copy without the orchestrator giving up ownership.
#[derive(Clone)]
pub struct ExecutionContext {
    pub dag_id: DagId,
    pub project_id: ProjectId,
    pub datasource_id: DatasourceId,
    pub ontology_id: Option<OntologyId>,
    pub cancellation: CancellationToken,
    pub llm_client: Arc<dyn engine_domain::LlmClient>,
    pub schema_introspection: Arc<dyn engine_domain::SchemaIntrospectionService>,
    pub dag_store: Arc<dyn engine_domain::DagStore>,
    pub ontology_repository: Arc<dyn engine_domain::OntologyRepository>,
    pub relationship_repository: Arc<dyn engine_domain::RelationshipRepository>,
}

impl ExecutionContext {
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
