// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `sqlx`-backed [`DagStore`] (spec §4.6) for durable, crash-resumable
//! runs. Each row stores its entity as a JSON blob alongside the columns
//! needed to filter and order without deserializing every row.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use engine_domain::{
    DagId, DagNode, DagRun, DagStatus, DagStore, DatasourceId, EngineError, NodeId, NodeName, NodeStatus, ProjectId,
    Progress,
};

pub struct SqliteDagStore {
    pool: SqlitePool,
}

impl SqliteDagStore {
    pub async fn connect(database_url: &str) -> Result<Self, EngineError> {
        let pool = SqlitePool::connect(database_url).await.map_err(|e| EngineError::Store(e.to_string()))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn in_memory() -> Result<Self, EngineError> {
        Self::connect("sqlite::memory:").await
    }

    async fn ensure_schema(&self) -> Result<(), EngineError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS dag_runs (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                datasource_id TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                data TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Store(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS dag_nodes (
                id TEXT PRIMARY KEY,
                dag_id TEXT NOT NULL,
                ordinal INTEGER NOT NULL,
                status TEXT NOT NULL,
                data TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Store(e.to_string()))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_dag_runs_project ON dag_runs(project_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_dag_nodes_dag ON dag_nodes(dag_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;

        Ok(())
    }

    fn deserialize_run(row: &sqlx::sqlite::SqliteRow) -> Result<DagRun, EngineError> {
        let data: String = row.try_get("data").map_err(|e| EngineError::Store(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| EngineError::Store(e.to_string()))
    }

    fn deserialize_node(row: &sqlx::sqlite::SqliteRow) -> Result<DagNode, EngineError> {
        let data: String = row.try_get("data").map_err(|e| EngineError::Store(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| EngineError::Store(e.to_string()))
    }

    async fn write_run(&self, run: &DagRun) -> Result<(), EngineError> {
        let data = serde_json::to_string(run).map_err(|e| EngineError::Store(e.to_string()))?;
        sqlx::query(
            "INSERT OR REPLACE INTO dag_runs (id, project_id, datasource_id, status, created_at, data)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(run.id.to_string())
        .bind(run.project_id.to_string())
        .bind(run.datasource_id.to_string())
        .bind(run.status.to_string())
        .bind(run.created_at.to_rfc3339())
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Store(e.to_string()))?;
        Ok(())
    }

    async fn write_node(&self, node: &DagNode) -> Result<(), EngineError> {
        let data = serde_json::to_string(node).map_err(|e| EngineError::Store(e.to_string()))?;
        sqlx::query(
            "INSERT OR REPLACE INTO dag_nodes (id, dag_id, ordinal, status, data) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(node.id.to_string())
        .bind(node.dag_id.to_string())
        .bind(node.ordinal)
        .bind(node.status.to_string())
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Store(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DagStore for SqliteDagStore {
    async fn create_dag(&self, dag: DagRun) -> Result<(), EngineError> {
        self.write_run(&dag).await
    }

    async fn create_nodes(&self, nodes: Vec<DagNode>) -> Result<(), EngineError> {
        for node in &nodes {
            self.write_node(node).await?;
        }
        Ok(())
    }

    async fn get_by_id(&self, id: DagId) -> Result<Option<DagRun>, EngineError> {
        let row = sqlx::query("SELECT data FROM dag_runs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        row.as_ref().map(Self::deserialize_run).transpose()
    }

    async fn get_nodes(&self, dag_id: DagId) -> Result<Vec<DagNode>, EngineError> {
        let rows = sqlx::query("SELECT data FROM dag_nodes WHERE dag_id = ? ORDER BY ordinal ASC")
            .bind(dag_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        rows.iter().map(Self::deserialize_node).collect()
    }

    async fn get_latest_by_project(&self, project_id: ProjectId) -> Result<Option<DagRun>, EngineError> {
        let row = sqlx::query("SELECT data FROM dag_runs WHERE project_id = ? ORDER BY created_at DESC LIMIT 1")
            .bind(project_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        row.as_ref().map(Self::deserialize_run).transpose()
    }

    async fn get_latest_by_datasource(&self, datasource_id: DatasourceId) -> Result<Option<DagRun>, EngineError> {
        let row = sqlx::query("SELECT data FROM dag_runs WHERE datasource_id = ? ORDER BY created_at DESC LIMIT 1")
            .bind(datasource_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        row.as_ref().map(Self::deserialize_run).transpose()
    }

    async fn get_active_by_project(&self, project_id: ProjectId) -> Result<Vec<DagRun>, EngineError> {
        let rows = sqlx::query(
            "SELECT data FROM dag_runs WHERE project_id = ? AND status IN ('pending', 'running') ORDER BY created_at ASC",
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EngineError::Store(e.to_string()))?;
        rows.iter().map(Self::deserialize_run).collect()
    }

    async fn update_status(&self, id: DagId, status: DagStatus, current_node: Option<NodeName>) -> Result<(), EngineError> {
        let mut run = self.get_by_id(id).await?.ok_or_else(|| EngineError::DagNotFound(id.to_string()))?;
        run.status = status;
        run.current_node = current_node;
        run.updated_at = Utc::now();
        self.write_run(&run).await
    }

    /// Re-reads then conditionally writes inside a single write connection.
    /// `SqlitePool`'s serialized writer makes this compare-and-set safe
    /// against concurrent callers without a separate transaction (spec §4.6).
    async fn claim_ownership(&self, dag_id: DagId, owner_id: &str, lease_timeout: chrono::Duration) -> Result<bool, EngineError> {
        let mut tx = self.pool.begin().await.map_err(|e| EngineError::Store(e.to_string()))?;
        let row = sqlx::query("SELECT data FROM dag_runs WHERE id = ?")
            .bind(dag_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?
            .ok_or_else(|| EngineError::DagNotFound(dag_id.to_string()))?;
        let mut run = Self::deserialize_run(&row)?;

        let now = Utc::now();
        if run.has_live_lease(now, lease_timeout) {
            tx.commit().await.map_err(|e| EngineError::Store(e.to_string()))?;
            return Ok(false);
        }
        run.owner_id = Some(owner_id.to_string());
        run.heartbeat_at = Some(now);
        run.updated_at = now;
        let data = serde_json::to_string(&run).map_err(|e| EngineError::Store(e.to_string()))?;
        sqlx::query("UPDATE dag_runs SET data = ? WHERE id = ?")
            .bind(data)
            .bind(dag_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        tx.commit().await.map_err(|e| EngineError::Store(e.to_string()))?;
        Ok(true)
    }

    async fn update_heartbeat(&self, dag_id: DagId, owner_id: &str) -> Result<(), EngineError> {
        if let Some(mut run) = self.get_by_id(dag_id).await? {
            if run.owner_id.as_deref() == Some(owner_id) {
                run.heartbeat_at = Some(Utc::now());
                self.write_run(&run).await?;
            }
        }
        Ok(())
    }

    async fn release_ownership(&self, dag_id: DagId) -> Result<(), EngineError> {
        if let Some(mut run) = self.get_by_id(dag_id).await? {
            run.owner_id = None;
            run.heartbeat_at = None;
            self.write_run(&run).await?;
        }
        Ok(())
    }

    async fn get_next_pending_node(&self, dag_id: DagId) -> Result<Option<DagNode>, EngineError> {
        let row = sqlx::query(
            "SELECT data FROM dag_nodes WHERE dag_id = ? AND status = 'pending' ORDER BY ordinal ASC LIMIT 1",
        )
        .bind(dag_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EngineError::Store(e.to_string()))?;
        row.as_ref().map(Self::deserialize_node).transpose()
    }

    async fn update_node_status(&self, node_id: NodeId, status: NodeStatus, error_message: Option<String>) -> Result<(), EngineError> {
        let mut node = self.node_by_id(node_id).await?;
        node.status = status;
        node.error_message = error_message;
        self.write_node(&node).await
    }

    async fn increment_node_retry(&self, node_id: NodeId) -> Result<u32, EngineError> {
        let mut node = self.node_by_id(node_id).await?;
        node.retry_count += 1;
        self.write_node(&node).await?;
        Ok(node.retry_count)
    }

    async fn update_node_progress(&self, node_id: NodeId, progress: Progress) -> Result<(), EngineError> {
        let mut node = self.node_by_id(node_id).await?;
        node.progress = progress;
        self.write_node(&node).await
    }
}

impl SqliteDagStore {
    async fn node_by_id(&self, node_id: NodeId) -> Result<DagNode, EngineError> {
        let row = sqlx::query("SELECT data FROM dag_nodes WHERE id = ?")
            .bind(node_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?
            .ok_or_else(|| EngineError::NodeNotFound(node_id.to_string()))?;
        Self::deserialize_node(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_domain::OntologyId;

    async fn seeded_store() -> (SqliteDagStore, DagRun) {
        let store = SqliteDagStore::in_memory().await.unwrap();
        let run = DagRun::new(ProjectId::new(), DatasourceId::new(), Some(OntologyId::new()));
        store.create_dag(run.clone()).await.unwrap();
        store.create_nodes(DagNode::ordered_for(run.id)).await.unwrap();
        (store, run)
    }

    #[tokio::test]
    async fn round_trips_a_dag_run_and_its_nodes() {
        let (store, run) = seeded_store().await;
        let fetched = store.get_by_id(run.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, run.id);
        let nodes = store.get_nodes(run.id).await.unwrap();
        assert_eq!(nodes.len(), 13);
        assert_eq!(nodes[0].name, NodeName::KnowledgeSeeding);
    }

    #[tokio::test]
    async fn get_next_pending_node_advances_as_nodes_complete() {
        let (store, run) = seeded_store().await;
        let first = store.get_next_pending_node(run.id).await.unwrap().unwrap();
        assert_eq!(first.name, NodeName::KnowledgeSeeding);
        store.update_node_status(first.id, NodeStatus::Succeeded, None).await.unwrap();
        let second = store.get_next_pending_node(run.id).await.unwrap().unwrap();
        assert_eq!(second.name, NodeName::ColumnFeatureExtraction);
    }

    #[tokio::test]
    async fn claim_ownership_is_exclusive_until_lease_expires() {
        let (store, run) = seeded_store().await;
        let lease = chrono::Duration::seconds(60);
        assert!(store.claim_ownership(run.id, "worker-a", lease).await.unwrap());
        assert!(!store.claim_ownership(run.id, "worker-b", lease).await.unwrap());
    }

    #[tokio::test]
    async fn increment_node_retry_accumulates() {
        let (store, run) = seeded_store().await;
        let node = store.get_next_pending_node(run.id).await.unwrap().unwrap();
        assert_eq!(store.increment_node_retry(node.id).await.unwrap(), 1);
        assert_eq!(store.increment_node_retry(node.id).await.unwrap(), 2);
    }
}
