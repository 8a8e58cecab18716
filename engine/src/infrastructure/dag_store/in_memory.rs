// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! In-memory [`DagStore`] (spec §4.6) for tests and single-process local
//! runs. Mirrors the exact CAS and ordering semantics the `sqlx` store
//! provides so the orchestrator can be exercised without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use engine_domain::{
    DagId, DagNode, DagRun, DagStatus, DagStore, DatasourceId, EngineError, NodeId, NodeName, NodeStatus, ProjectId,
    Progress,
};

#[derive(Default)]
struct State {
    runs: HashMap<DagId, DagRun>,
    nodes: HashMap<DagId, Vec<DagNode>>,
}

pub struct InMemoryDagStore {
    state: Mutex<State>,
}

impl InMemoryDagStore {
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryDagStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DagStore for InMemoryDagStore {
    async fn create_dag(&self, dag: DagRun) -> Result<(), EngineError> {
        let mut state = self.lock();
        state.nodes.entry(dag.id).or_default();
        state.runs.insert(dag.id, dag);
        Ok(())
    }

    async fn create_nodes(&self, nodes: Vec<DagNode>) -> Result<(), EngineError> {
        let mut state = self.lock();
        for node in nodes {
            state.nodes.entry(node.dag_id).or_default().push(node);
        }
        Ok(())
    }

    async fn get_by_id(&self, id: DagId) -> Result<Option<DagRun>, EngineError> {
        Ok(self.lock().runs.get(&id).cloned())
    }

    async fn get_nodes(&self, dag_id: DagId) -> Result<Vec<DagNode>, EngineError> {
        let mut nodes = self.lock().nodes.get(&dag_id).cloned().unwrap_or_default();
        nodes.sort_by_key(|n| n.ordinal);
        Ok(nodes)
    }

    async fn get_latest_by_project(&self, project_id: ProjectId) -> Result<Option<DagRun>, EngineError> {
        Ok(self
            .lock()
            .runs
            .values()
            .filter(|r| r.project_id == project_id)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn get_latest_by_datasource(&self, datasource_id: DatasourceId) -> Result<Option<DagRun>, EngineError> {
        Ok(self
            .lock()
            .runs
            .values()
            .filter(|r| r.datasource_id == datasource_id)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn get_active_by_project(&self, project_id: ProjectId) -> Result<Vec<DagRun>, EngineError> {
        let mut runs: Vec<DagRun> = self
            .lock()
            .runs
            .values()
            .filter(|r| r.project_id == project_id && !r.status.is_terminal())
            .cloned()
            .collect();
        runs.sort_by_key(|r| r.created_at);
        Ok(runs)
    }

    async fn update_status(&self, id: DagId, status: DagStatus, current_node: Option<NodeName>) -> Result<(), EngineError> {
        let mut state = self.lock();
        let run = state.runs.get_mut(&id).ok_or_else(|| EngineError::DagNotFound(id.to_string()))?;
        run.status = status;
        run.current_node = current_node;
        run.updated_at = Utc::now();
        Ok(())
    }

    async fn claim_ownership(&self, dag_id: DagId, owner_id: &str, lease_timeout: chrono::Duration) -> Result<bool, EngineError> {
        let mut state = self.lock();
        let run = state.runs.get_mut(&dag_id).ok_or_else(|| EngineError::DagNotFound(dag_id.to_string()))?;
        let now = Utc::now();
        if run.has_live_lease(now, lease_timeout) {
            return Ok(false);
        }
        run.owner_id = Some(owner_id.to_string());
        run.heartbeat_at = Some(now);
        run.updated_at = now;
        Ok(true)
    }

    async fn update_heartbeat(&self, dag_id: DagId, owner_id: &str) -> Result<(), EngineError> {
        let mut state = self.lock();
        if let Some(run) = state.runs.get_mut(&dag_id) {
            if run.owner_id.as_deref() == Some(owner_id) {
                run.heartbeat_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn release_ownership(&self, dag_id: DagId) -> Result<(), EngineError> {
        let mut state = self.lock();
        if let Some(run) = state.runs.get_mut(&dag_id) {
            run.owner_id = None;
            run.heartbeat_at = None;
        }
        Ok(())
    }

    async fn get_next_pending_node(&self, dag_id: DagId) -> Result<Option<DagNode>, EngineError> {
        let state = self.lock();
        let nodes = state.nodes.get(&dag_id).ok_or_else(|| EngineError::DagNotFound(dag_id.to_string()))?;
        Ok(nodes.iter().filter(|n| n.status == NodeStatus::Pending).min_by_key(|n| n.ordinal).cloned())
    }

    async fn update_node_status(&self, node_id: NodeId, status: NodeStatus, error_message: Option<String>) -> Result<(), EngineError> {
        let mut state = self.lock();
        for nodes in state.nodes.values_mut() {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == node_id) {
                node.status = status;
                node.error_message = error_message;
                return Ok(());
            }
        }
        Err(EngineError::NodeNotFound(node_id.to_string()))
    }

    async fn increment_node_retry(&self, node_id: NodeId) -> Result<u32, EngineError> {
        let mut state = self.lock();
        for nodes in state.nodes.values_mut() {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == node_id) {
                node.retry_count += 1;
                return Ok(node.retry_count);
            }
        }
        Err(EngineError::NodeNotFound(node_id.to_string()))
    }

    async fn update_node_progress(&self, node_id: NodeId, progress: Progress) -> Result<(), EngineError> {
        let mut state = self.lock();
        for nodes in state.nodes.values_mut() {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == node_id) {
                node.progress = progress;
                return Ok(());
            }
        }
        Err(EngineError::NodeNotFound(node_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_domain::OntologyId;

    fn seeded_store() -> (InMemoryDagStore, DagRun) {
        let store = InMemoryDagStore::new();
        let run = DagRun::new(ProjectId::new(), DatasourceId::new(), Some(OntologyId::new()));
        (store, run)
    }

    #[tokio::test]
    async fn get_next_pending_node_returns_lowest_ordinal() {
        let (store, run) = seeded_store();
        store.create_dag(run.clone()).await.unwrap();
        store.create_nodes(DagNode::ordered_for(run.id)).await.unwrap();
        store.update_node_status(store.get_nodes(run.id).await.unwrap()[0].id, NodeStatus::Succeeded, None).await.unwrap();
        let next = store.get_next_pending_node(run.id).await.unwrap().unwrap();
        assert_eq!(next.name, NodeName::ColumnFeatureExtraction);
    }

    #[tokio::test]
    async fn claim_ownership_is_exclusive_until_lease_expires() {
        let (store, run) = seeded_store();
        store.create_dag(run.clone()).await.unwrap();
        let lease = chrono::Duration::seconds(60);
        assert!(store.claim_ownership(run.id, "worker-a", lease).await.unwrap());
        assert!(!store.claim_ownership(run.id, "worker-b", lease).await.unwrap());

        store.release_ownership(run.id).await.unwrap();
        assert!(store.claim_ownership(run.id, "worker-b", lease).await.unwrap());
    }

    #[tokio::test]
    async fn claim_ownership_succeeds_once_lease_is_stale() {
        let (store, run) = seeded_store();
        store.create_dag(run.clone()).await.unwrap();
        let short_lease = chrono::Duration::milliseconds(10);
        assert!(store.claim_ownership(run.id, "worker-a", short_lease).await.unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert!(store.claim_ownership(run.id, "worker-b", short_lease).await.unwrap());
    }

    #[tokio::test]
    async fn update_heartbeat_is_a_no_op_for_non_owners() {
        let (store, run) = seeded_store();
        store.create_dag(run.clone()).await.unwrap();
        store.claim_ownership(run.id, "worker-a", chrono::Duration::seconds(60)).await.unwrap();
        store.update_heartbeat(run.id, "worker-b").await.unwrap();
        let fetched = store.get_by_id(run.id).await.unwrap().unwrap();
        assert!(fetched.has_live_lease(Utc::now(), chrono::Duration::seconds(60)));
    }
}
