// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The DAG aggregate: a `DagRun` together with its ordered `DagNode`s,
//! enforcing the invariants spec §3 states for them as a unit (total
//! ordering, at most one running node) and the terminal-state invariants
//! from spec §8.

use crate::entities::{DagNode, DagRun};
use crate::value_objects::{DagStatus, NodeStatus};
use crate::EngineError;

#[derive(Debug, Clone)]
pub struct DagAggregate {
    pub run: DagRun,
    pub nodes: Vec<DagNode>,
}

impl DagAggregate {
    pub fn new(run: DagRun, mut nodes: Vec<DagNode>) -> Self {
        nodes.sort_by_key(|n| n.ordinal);
        Self { run, nodes }
    }

    /// The lowest-ordinal `pending` node (spec §4.6 `get-next-pending-node`).
    pub fn next_pending_node(&self) -> Option<&DagNode> {
        self.nodes.iter().find(|n| n.status == NodeStatus::Pending)
    }

    /// spec §8: "For every pair of live workers at any instant, at most one
    /// holds any given DAG's ownership"; within one aggregate snapshot that
    /// reduces to "at most one node is running".
    pub fn running_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.status == NodeStatus::Running).count()
    }

    /// spec §8 terminal-state invariant: verifies (rather than enforces) the
    /// shape a `succeeded`/`failed` DAG must have, for use in tests and
    /// store-layer assertions.
    pub fn check_terminal_invariant(&self) -> Result<(), EngineError> {
        match self.run.status {
            DagStatus::Succeeded => {
                if self.nodes.iter().all(|n| n.status == NodeStatus::Succeeded) {
                    Ok(())
                } else {
                    Err(EngineError::Other("succeeded DAG has a non-succeeded node".to_string()))
                }
            }
            DagStatus::Failed => {
                let failed_idx = self.nodes.iter().position(|n| n.status == NodeStatus::Failed);
                match failed_idx {
                    Some(idx) => {
                        let rest_ok = self.nodes[idx + 1..]
                            .iter()
                            .all(|n| matches!(n.status, NodeStatus::Pending | NodeStatus::Skipped));
                        let exactly_one_failed =
                            self.nodes.iter().filter(|n| n.status == NodeStatus::Failed).count() == 1;
                        if rest_ok && exactly_one_failed {
                            Ok(())
                        } else {
                            Err(EngineError::Other("failed DAG does not match the single-failure shape".to_string()))
                        }
                    }
                    None => Err(EngineError::Other("failed DAG has no failed node".to_string())),
                }
            }
            DagStatus::Pending | DagStatus::Running => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DagNode;
    use crate::value_objects::{DatasourceId, NodeName, ProjectId};

    fn aggregate_with_statuses(statuses: &[(NodeName, NodeStatus)]) -> DagAggregate {
        let run = DagRun::new(ProjectId::new(), DatasourceId::new(), None);
        let nodes = statuses
            .iter()
            .enumerate()
            .map(|(i, (name, status))| {
                let mut n = DagNode::new(run.id, i as u32, *name);
                n.status = *status;
                n
            })
            .collect();
        DagAggregate::new(run, nodes)
    }

    #[test]
    fn next_pending_node_is_lowest_ordinal_pending() {
        let agg = aggregate_with_statuses(&[
            (NodeName::KnowledgeSeeding, NodeStatus::Succeeded),
            (NodeName::ColumnFeatureExtraction, NodeStatus::Pending),
            (NodeName::TableFeatureExtraction, NodeStatus::Pending),
        ]);
        assert_eq!(agg.next_pending_node().unwrap().name, NodeName::ColumnFeatureExtraction);
    }

    #[test]
    fn succeeded_dag_requires_all_nodes_succeeded() {
        let mut agg = aggregate_with_statuses(&[
            (NodeName::KnowledgeSeeding, NodeStatus::Succeeded),
            (NodeName::ColumnFeatureExtraction, NodeStatus::Pending),
        ]);
        agg.run.status = DagStatus::Succeeded;
        assert!(agg.check_terminal_invariant().is_err());

        agg.nodes[1].status = NodeStatus::Succeeded;
        assert!(agg.check_terminal_invariant().is_ok());
    }

    #[test]
    fn failed_dag_requires_exactly_one_failed_node_and_rest_pending_or_skipped() {
        let mut agg = aggregate_with_statuses(&[
            (NodeName::KnowledgeSeeding, NodeStatus::Succeeded),
            (NodeName::ColumnFeatureExtraction, NodeStatus::Failed),
            (NodeName::TableFeatureExtraction, NodeStatus::Pending),
        ]);
        agg.run.status = DagStatus::Failed;
        assert!(agg.check_terminal_invariant().is_ok());

        agg.nodes[2].status = NodeStatus::Succeeded;
        assert!(agg.check_terminal_invariant().is_err());
    }
}
