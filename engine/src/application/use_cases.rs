// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Application entry points the presentation layer and the bootstrap CLI
//! call into, so neither needs to know how a DAG run is assembled or
//! driven.

use std::sync::Arc;
use std::time::Duration;

use engine_domain::{
    DagId, DagNode, DagRun, DagStore, DatasourceId, EngineError, OntologyId, ProjectId,
};

use crate::application::execution_context::ExecutionContext;
use crate::application::nodes::build_executors;
use crate::application::orchestrator::Orchestrator;
use crate::infrastructure::cancellation::CancellationToken;

/// Creates a new DAG run with its full ordered node set (spec §4.10 step
/// setup) and hands it to a fresh [`Orchestrator`] to drive to completion.
pub async fn create_and_run_dag(
    dag_store: Arc<dyn DagStore>,
    project_id: ProjectId,
    datasource_id: DatasourceId,
    ontology_id: Option<OntologyId>,
    project_overview: Option<String>,
    ctx_deps: ExecutionContextDeps,
    owner_id: impl Into<String>,
    lease_timeout: chrono::Duration,
    heartbeat_interval: Duration,
) -> Result<DagId, EngineError> {
    let run = DagRun::new(project_id, datasource_id, ontology_id);
    dag_store.create_dag(run.clone()).await?;
    dag_store.create_nodes(DagNode::ordered_for(run.id)).await?;

    let ctx = ExecutionContext {
        dag_id: run.id,
        project_id,
        datasource_id,
        ontology_id,
        cancellation: ctx_deps.cancellation,
        llm_client: ctx_deps.llm_client,
        schema_introspection: ctx_deps.schema_introspection,
        dag_store: dag_store.clone(),
        ontology_repository: ctx_deps.ontology_repository,
        relationship_repository: ctx_deps.relationship_repository,
    };

    let orchestrator = Orchestrator::new(dag_store, build_executors(project_overview), owner_id, lease_timeout, heartbeat_interval);
    orchestrator.run(run.id, &ctx).await?;
    Ok(run.id)
}

/// Drives an existing, already-created DAG run — the `run-dag` CLI path,
/// used to resume a crashed or manually re-queued run.
pub async fn resume_dag(
    dag_store: Arc<dyn DagStore>,
    dag_id: DagId,
    project_overview: Option<String>,
    ctx_deps: ExecutionContextDeps,
    owner_id: impl Into<String>,
    lease_timeout: chrono::Duration,
    heartbeat_interval: Duration,
) -> Result<(), EngineError> {
    let run = dag_store.get_by_id(dag_id).await?.ok_or_else(|| EngineError::DagNotFound(dag_id.to_string()))?;

    let ctx = ExecutionContext {
        dag_id: run.id,
        project_id: run.project_id,
        datasource_id: run.datasource_id,
        ontology_id: run.ontology_id,
        cancellation: ctx_deps.cancellation,
        llm_client: ctx_deps.llm_client,
        schema_introspection: ctx_deps.schema_introspection,
        dag_store: dag_store.clone(),
        ontology_repository: ctx_deps.ontology_repository,
        relationship_repository: ctx_deps.relationship_repository,
    };

    let orchestrator = Orchestrator::new(dag_store, build_executors(project_overview), owner_id, lease_timeout, heartbeat_interval);
    orchestrator.run(dag_id, &ctx).await
}

/// Fetches a DAG run together with its nodes — the `show-dag` CLI path.
pub async fn get_dag_status(dag_store: Arc<dyn DagStore>, dag_id: DagId) -> Result<(DagRun, Vec<DagNode>), EngineError> {
    let run = dag_store.get_by_id(dag_id).await?.ok_or_else(|| EngineError::DagNotFound(dag_id.to_string()))?;
    let nodes = dag_store.get_nodes(dag_id).await?;
    Ok((run, nodes))
}

/// The collaborators an `ExecutionContext` needs that are not already
/// implied by the DAG store or the identifiers being driven.
pub struct ExecutionContextDeps {
    pub cancellation: CancellationToken,
    pub llm_client: Arc<dyn engine_domain::LlmClient>,
    pub schema_introspection: Arc<dyn engine_domain::SchemaIntrospectionService>,
    pub ontology_repository: Arc<dyn engine_domain::OntologyRepository>,
    pub relationship_repository: Arc<dyn engine_domain::RelationshipRepository>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::execution_context::tests::fake_context;
    use crate::infrastructure::dag_store::InMemoryDagStore;

    #[tokio::test]
    async fn create_and_run_dag_produces_a_succeeded_run() {
        let store: Arc<dyn DagStore> = Arc::new(InMemoryDagStore::new());
        let fake = fake_context(None);
        let deps = ExecutionContextDeps {
            cancellation: fake.cancellation.clone(),
            llm_client: fake.llm_client.clone(),
            schema_introspection: fake.schema_introspection.clone(),
            ontology_repository: fake.ontology_repository.clone(),
            relationship_repository: fake.relationship_repository.clone(),
        };
        let dag_id = create_and_run_dag(
            store.clone(),
            ProjectId::new(),
            DatasourceId::new(),
            Some(OntologyId::new()),
            None,
            deps,
            "worker-a",
            chrono::Duration::seconds(60),
            Duration::from_secs(30),
        )
        .await
        .unwrap();

        let (run, nodes) = get_dag_status(store, dag_id).await.unwrap();
        assert_eq!(run.status, engine_domain::DagStatus::Succeeded);
        assert_eq!(nodes.len(), 13);
    }
}
