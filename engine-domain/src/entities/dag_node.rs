// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

use crate::value_objects::{DagId, NodeId, NodeName, NodeStatus, Progress};

/// One stage within a DAG run (spec §3 "DAG Node"). Nodes of one DAG are
/// totally ordered by `ordinal`; at most one is `Running` at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagNode {
    pub id: NodeId,
    pub dag_id: DagId,
    pub ordinal: u32,
    pub name: NodeName,
    pub status: NodeStatus,
    pub retry_count: u32,
    pub error_message: Option<String>,
    pub progress: Progress,
}

impl DagNode {
    pub fn new(dag_id: DagId, ordinal: u32, name: NodeName) -> Self {
        Self {
            id: NodeId::new(),
            dag_id,
            ordinal,
            name,
            status: NodeStatus::Pending,
            retry_count: 0,
            error_message: None,
            progress: Progress::default(),
        }
    }

    /// Builds the full, ordered node set for a freshly-created DAG run
    /// (spec §4.10 step setup, `create-nodes`).
    pub fn ordered_for(dag_id: DagId) -> Vec<DagNode> {
        NodeName::ORDERED
            .iter()
            .enumerate()
            .map(|(i, &name)| DagNode::new(dag_id, i as u32, name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::DagId;

    #[test]
    fn ordered_for_produces_thirteen_pending_nodes_in_sequence() {
        let dag_id = DagId::new();
        let nodes = DagNode::ordered_for(dag_id);
        assert_eq!(nodes.len(), 13);
        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(node.ordinal, i as u32);
            assert_eq!(node.status, NodeStatus::Pending);
            assert_eq!(node.dag_id, dag_id);
        }
        assert_eq!(nodes[0].name, NodeName::KnowledgeSeeding);
    }
}
