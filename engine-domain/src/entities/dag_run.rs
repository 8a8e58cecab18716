// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The DAG Run entity (spec §3): one execution attempt of the fixed
//! pipeline for a (project, datasource) pair, and the ownership-lease
//! lifecycle that makes it crash-resumable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{DagId, DagStatus, DatasourceId, NodeName, OntologyId, ProjectId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagRun {
    pub id: DagId,
    pub project_id: ProjectId,
    pub datasource_id: DatasourceId,
    pub ontology_id: Option<OntologyId>,
    pub status: DagStatus,
    pub current_node: Option<NodeName>,
    pub owner_id: Option<String>,
    pub heartbeat_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DagRun {
    pub fn new(project_id: ProjectId, datasource_id: DatasourceId, ontology_id: Option<OntologyId>) -> Self {
        let now = Utc::now();
        Self {
            id: DagId::new(),
            project_id,
            datasource_id,
            ontology_id,
            status: DagStatus::Pending,
            current_node: None,
            owner_id: None,
            heartbeat_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this run's lease is currently live, i.e. owned and whose
    /// heartbeat is newer than `lease_timeout` (spec §4.6 `claim-ownership`,
    /// §5 "DAG ownership").
    pub fn has_live_lease(&self, now: DateTime<Utc>, lease_timeout: chrono::Duration) -> bool {
        match (&self.owner_id, self.heartbeat_at) {
            (Some(_), Some(hb)) => now - hb < lease_timeout,
            _ => false,
        }
    }
}
