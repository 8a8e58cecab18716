// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Black-box exercise of the public use-case surface, as the bootstrap CLI
//! calls it: create a DAG, drive it to completion against the in-memory
//! store, then read its status back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use engine::infrastructure::cancellation::CancellationToken;
use engine::infrastructure::dag_store::InMemoryDagStore;
use engine::infrastructure::ontology_store::InMemoryOntologyStore;
use engine::{create_and_run_dag, get_dag_status, resume_dag, DagStatus, DagStore, DatasourceId, ExecutionContextDeps, OntologyId, ProjectId};
use engine_domain::{EngineError, ForeignKeyConstraint, LlmClient, SchemaIntrospectionService, TableSchema};

struct EmptySchema;

#[async_trait]
impl SchemaIntrospectionService for EmptySchema {
    async fn list_tables(&self, _datasource_id: DatasourceId) -> Result<Vec<TableSchema>, EngineError> {
        Ok(vec![])
    }
    async fn declared_foreign_keys(&self, _datasource_id: DatasourceId) -> Result<Vec<ForeignKeyConstraint>, EngineError> {
        Ok(vec![])
    }
    async fn validate_sql(&self, _datasource_id: DatasourceId, _sql: &str) -> Result<bool, EngineError> {
        Ok(true)
    }
}

struct EchoLlm;

#[async_trait]
impl LlmClient for EchoLlm {
    async fn complete(&self, _prompt: &str, _deadline: Duration) -> Result<String, EngineError> {
        Ok("{}".to_string())
    }
}

fn deps() -> ExecutionContextDeps {
    let ontology_store = Arc::new(InMemoryOntologyStore::new());
    ExecutionContextDeps {
        cancellation: CancellationToken::new(),
        llm_client: Arc::new(EchoLlm),
        schema_introspection: Arc::new(EmptySchema),
        ontology_repository: ontology_store.clone(),
        relationship_repository: ontology_store,
    }
}

#[tokio::test]
async fn create_run_and_show_reaches_succeeded_with_all_thirteen_nodes() {
    let store: Arc<dyn DagStore> = Arc::new(InMemoryDagStore::new());

    let dag_id = create_and_run_dag(
        store.clone(),
        ProjectId::new(),
        DatasourceId::new(),
        Some(OntologyId::new()),
        Some("a small storefront schema".to_string()),
        deps(),
        "integration-test-owner",
        chrono::Duration::seconds(60),
        Duration::from_secs(30),
    )
    .await
    .expect("dag run should complete");

    let (run, nodes) = get_dag_status(store, dag_id).await.expect("status should be readable");

    assert_eq!(run.status, DagStatus::Succeeded);
    assert_eq!(nodes.len(), 13);
    assert!(nodes.iter().all(|n| n.status == engine_domain::NodeStatus::Succeeded));
}

#[tokio::test]
async fn resume_dag_on_an_unknown_id_fails_with_dag_not_found() {
    let store: Arc<dyn DagStore> = Arc::new(InMemoryDagStore::new());

    let result = resume_dag(
        store,
        engine_domain::DagId::new(),
        None,
        deps(),
        "integration-test-owner",
        chrono::Duration::seconds(60),
        Duration::from_secs(30),
    )
    .await;

    assert!(matches!(result, Err(EngineError::DagNotFound(_))));
}
