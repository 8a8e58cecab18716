// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Orchestrator (spec §4.10)
//!
//! Drives one DAG run to completion: claim ownership, heartbeat while
//! working, loop over the lowest-ordinal pending node, invoke its
//! executor, and transition node/DAG state on the outcome.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use engine_domain::{DagId, DagStatus, DagStore, EngineError, NodeName, NodeStatus};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::NodeExecutor;

/// Retry policy for non-fatal, non-degraded node failures. Nodes do not
/// self-retry; the orchestrator owns backoff so a crash mid-backoff simply
/// resumes at the same pending node (spec §9 "Resumability").
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, backoff: Duration::from_secs(2) }
    }
}

pub struct Orchestrator {
    dag_store: Arc<dyn DagStore>,
    executors: HashMap<NodeName, Arc<dyn NodeExecutor>>,
    owner_id: String,
    lease_timeout: chrono::Duration,
    heartbeat_interval: Duration,
    retry_policy: RetryPolicy,
}

impl Orchestrator {
    pub fn new(
        dag_store: Arc<dyn DagStore>,
        executors: Vec<Arc<dyn NodeExecutor>>,
        owner_id: impl Into<String>,
        lease_timeout: chrono::Duration,
        heartbeat_interval: Duration,
    ) -> Self {
        Self {
            dag_store,
            executors: executors.into_iter().map(|e| (e.name(), e)).collect(),
            owner_id: owner_id.into(),
            lease_timeout,
            heartbeat_interval,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Drives `dag_id` until it reaches a terminal state, the owner loses
    /// the lease race, or the context is cancelled. Returns without error
    /// when ownership simply could not be claimed — that is the expected
    /// outcome of a lost CAS, not a failure (spec §7 "store-conflict").
    pub async fn run(&self, dag_id: DagId, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let claimed = self.dag_store.claim_ownership(dag_id, &self.owner_id, self.lease_timeout).await?;
        if !claimed {
            tracing::info!(%dag_id, owner = %self.owner_id, "ownership claim lost, not driving this run");
            return Ok(());
        }

        let heartbeat_handle = self.spawn_heartbeat(dag_id);
        let result = self.drive(dag_id, ctx).await;
        heartbeat_handle.abort();
        self.dag_store.release_ownership(dag_id).await?;
        result
    }

    fn spawn_heartbeat(&self, dag_id: DagId) -> tokio::task::JoinHandle<()> {
        let dag_store = self.dag_store.clone();
        let owner_id = self.owner_id.clone();
        let interval = self.heartbeat_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(err) = dag_store.update_heartbeat(dag_id, &owner_id).await {
                    tracing::warn!(%dag_id, error = %err, "heartbeat update failed");
                }
            }
        })
    }

    async fn drive(&self, dag_id: DagId, ctx: &ExecutionContext) -> Result<(), EngineError> {
        loop {
            if ctx.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let Some(node) = self.dag_store.get_next_pending_node(dag_id).await? else {
                self.dag_store.update_status(dag_id, DagStatus::Succeeded, None).await?;
                tracing::info!(%dag_id, "dag run succeeded");
                return Ok(());
            };

            let executor = self
                .executors
                .get(&node.name)
                .ok_or_else(|| EngineError::Other(format!("no executor registered for node {}", node.name)))?;

            self.dag_store.update_status(dag_id, DagStatus::Running, Some(node.name)).await?;
            self.dag_store.update_node_status(node.id, NodeStatus::Running, None).await?;

            let outcome = executor.execute(ctx).await;
            match outcome {
                Ok(()) => {
                    self.dag_store.update_node_status(node.id, NodeStatus::Succeeded, None).await?;
                }
                Err(err) if !err.is_fatal() => {
                    let retries = self.dag_store.increment_node_retry(node.id).await?;
                    if retries > self.retry_policy.max_retries {
                        self.fail_dag(dag_id, node.id, &err).await?;
                        return Err(err);
                    }
                    tracing::warn!(%dag_id, node = %node.name, retries, error = %err, "retrying node after backoff");
                    self.dag_store.update_node_status(node.id, NodeStatus::Pending, None).await?;
                    tokio::time::sleep(self.retry_policy.backoff).await;
                }
                Err(err) => {
                    self.fail_dag(dag_id, node.id, &err).await?;
                    return Err(err);
                }
            }
        }
    }

    async fn fail_dag(&self, dag_id: DagId, node_id: engine_domain::NodeId, err: &EngineError) -> Result<(), EngineError> {
        self.dag_store.update_node_status(node_id, NodeStatus::Failed, Some(err.to_string())).await?;
        self.dag_store.update_status(dag_id, DagStatus::Failed, None).await?;
        tracing::error!(%dag_id, error = %err, "dag run failed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::execution_context::tests::fake_context;
    use crate::application::nodes::build_executors;
    use crate::infrastructure::dag_store::InMemoryDagStore;
    use async_trait::async_trait;
    use engine_domain::{DagNode, DagRun, DatasourceId, OntologyId, ProjectId};

    struct AlwaysFailExecutor;
    #[async_trait]
    impl NodeExecutor for AlwaysFailExecutor {
        fn name(&self) -> NodeName {
            NodeName::KnowledgeSeeding
        }
        async fn execute(&self, _ctx: &ExecutionContext) -> Result<(), EngineError> {
            Err(EngineError::LlmConfiguration("endpoint unreachable".to_string()))
        }
    }

    struct FlakyOnceExecutor {
        attempts: std::sync::atomic::AtomicU32,
    }
    #[async_trait]
    impl NodeExecutor for FlakyOnceExecutor {
        fn name(&self) -> NodeName {
            NodeName::KnowledgeSeeding
        }
        async fn execute(&self, _ctx: &ExecutionContext) -> Result<(), EngineError> {
            if self.attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                Err(EngineError::Llm { kind: engine_domain::LlmErrorKind::Transient, message: "rate limited".to_string() })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn successful_dag_transitions_to_succeeded() {
        let store = Arc::new(InMemoryDagStore::new());
        let run = DagRun::new(ProjectId::new(), DatasourceId::new(), Some(OntologyId::new()));
        store.create_dag(run.clone()).await.unwrap();
        store.create_nodes(DagNode::ordered_for(run.id)).await.unwrap();

        let orchestrator = Orchestrator::new(
            store.clone(),
            build_executors(None),
            "worker-a",
            chrono::Duration::seconds(60),
            Duration::from_secs(30),
        );
        let ctx = fake_context(run.ontology_id);
        orchestrator.run(run.id, &ctx).await.unwrap();

        let fetched = store.get_by_id(run.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, DagStatus::Succeeded);
        assert!(fetched.owner_id.is_none());
    }

    #[tokio::test]
    async fn fatal_error_transitions_dag_to_failed_and_releases_ownership() {
        let store = Arc::new(InMemoryDagStore::new());
        let run = DagRun::new(ProjectId::new(), DatasourceId::new(), Some(OntologyId::new()));
        store.create_dag(run.clone()).await.unwrap();
        store.create_nodes(DagNode::ordered_for(run.id)).await.unwrap();

        let orchestrator = Orchestrator::new(
            store.clone(),
            vec![Arc::new(AlwaysFailExecutor)],
            "worker-a",
            chrono::Duration::seconds(60),
            Duration::from_secs(30),
        );
        let ctx = fake_context(run.ontology_id);
        let result = orchestrator.run(run.id, &ctx).await;
        assert!(result.is_err());

        let fetched = store.get_by_id(run.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, DagStatus::Failed);
        assert!(fetched.owner_id.is_none());

        let nodes = store.get_nodes(run.id).await.unwrap();
        assert_eq!(nodes[0].status, NodeStatus::Failed);
        assert!(nodes[0].error_message.as_deref().unwrap().contains("LLM configuration error"));
    }

    #[tokio::test]
    async fn retryable_failure_resets_the_node_to_pending_so_it_is_retried() {
        let store = Arc::new(InMemoryDagStore::new());
        let run = DagRun::new(ProjectId::new(), DatasourceId::new(), Some(OntologyId::new()));
        store.create_dag(run.clone()).await.unwrap();
        store.create_nodes(vec![DagNode::ordered_for(run.id).remove(0)]).await.unwrap();

        let executor: Arc<dyn NodeExecutor> =
            Arc::new(FlakyOnceExecutor { attempts: std::sync::atomic::AtomicU32::new(0) });
        let orchestrator = Orchestrator::new(store.clone(), vec![executor], "worker-a", chrono::Duration::seconds(60), Duration::from_secs(30))
            .with_retry_policy(RetryPolicy { max_retries: 3, backoff: Duration::from_millis(1) });
        let ctx = fake_context(run.ontology_id);
        orchestrator.run(run.id, &ctx).await.unwrap();

        let fetched = store.get_by_id(run.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, DagStatus::Succeeded);

        let nodes = store.get_nodes(run.id).await.unwrap();
        assert_eq!(nodes[0].status, NodeStatus::Succeeded);
        assert_eq!(nodes[0].retry_count, 1);
    }

    #[tokio::test]
    async fn losing_the_ownership_race_is_not_an_error() {
        let store = Arc::new(InMemoryDagStore::new());
        let run = DagRun::new(ProjectId::new(), DatasourceId::new(), Some(OntologyId::new()));
        store.create_dag(run.clone()).await.unwrap();
        store.create_nodes(DagNode::ordered_for(run.id)).await.unwrap();
        store.claim_ownership(run.id, "other-worker", chrono::Duration::seconds(300)).await.unwrap();

        let orchestrator = Orchestrator::new(
            store.clone(),
            build_executors(None),
            "worker-a",
            chrono::Duration::seconds(300),
            Duration::from_secs(30),
        );
        let ctx = fake_context(run.ontology_id);
        assert!(orchestrator.run(run.id, &ctx).await.is_ok());

        let fetched = store.get_by_id(run.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, DagStatus::Pending);
    }
}
