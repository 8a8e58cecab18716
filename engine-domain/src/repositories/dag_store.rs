// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # DAG Store Port
//!
//! The persistence seam for DAG runs and nodes (spec §4.6). `engine`'s
//! infrastructure layer provides an in-memory implementation for tests and
//! local runs, and a `sqlx`-backed SQLite implementation for durability;
//! the orchestrator and node executors depend only on this trait.

use async_trait::async_trait;

use crate::entities::{DagNode, DagRun};
use crate::value_objects::{DagId, DagStatus, DatasourceId, NodeId, NodeName, NodeStatus, ProjectId, Progress};
use crate::EngineError;

#[async_trait]
pub trait DagStore: Send + Sync {
    async fn create_dag(&self, dag: DagRun) -> Result<(), EngineError>;
    async fn create_nodes(&self, nodes: Vec<DagNode>) -> Result<(), EngineError>;

    async fn get_by_id(&self, id: DagId) -> Result<Option<DagRun>, EngineError>;
    async fn get_nodes(&self, dag_id: DagId) -> Result<Vec<DagNode>, EngineError>;

    async fn get_latest_by_project(&self, project_id: ProjectId) -> Result<Option<DagRun>, EngineError>;
    async fn get_latest_by_datasource(&self, datasource_id: DatasourceId) -> Result<Option<DagRun>, EngineError>;

    /// DAGs whose status is `pending` or `running`.
    async fn get_active_by_project(&self, project_id: ProjectId) -> Result<Vec<DagRun>, EngineError>;

    async fn update_status(
        &self,
        id: DagId,
        status: DagStatus,
        current_node: Option<NodeName>,
    ) -> Result<(), EngineError>;

    /// Atomic compare-and-set: succeeds iff the current owner is unset or
    /// its heartbeat is older than `lease_timeout`. Returns `claimed =
    /// false` rather than an `Err` on a lost race (spec §7
    /// "store-conflict... not an error to the caller").
    async fn claim_ownership(
        &self,
        dag_id: DagId,
        owner_id: &str,
        lease_timeout: chrono::Duration,
    ) -> Result<bool, EngineError>;

    /// Refreshes the heartbeat iff `owner_id` still holds the lease;
    /// silent no-op otherwise.
    async fn update_heartbeat(&self, dag_id: DagId, owner_id: &str) -> Result<(), EngineError>;

    /// Clears the owner unconditionally (used after terminal transitions).
    async fn release_ownership(&self, dag_id: DagId) -> Result<(), EngineError>;

    async fn get_next_pending_node(&self, dag_id: DagId) -> Result<Option<DagNode>, EngineError>;

    async fn update_node_status(
        &self,
        node_id: NodeId,
        status: NodeStatus,
        error_message: Option<String>,
    ) -> Result<(), EngineError>;

    async fn increment_node_retry(&self, node_id: NodeId) -> Result<u32, EngineError>;

    async fn update_node_progress(&self, node_id: NodeId, progress: Progress) -> Result<(), EngineError>;
}
