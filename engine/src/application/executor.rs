// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Node Executor Framework (spec §4.7)
//!
//! `NodeExecutor` is the contract shared by every pipeline stage. The
//! common machinery — progress reporting, the ontology-id precondition,
//! and the LLM error classification rule — lives on [`ExecutorBase`] so
//! each of the thirteen node implementations in
//! [`crate::application::nodes`] only writes its own `execute`.

use std::sync::Mutex;

use async_trait::async_trait;
use engine_domain::{EngineError, NodeId, NodeName, Progress};

use crate::application::execution_context::ExecutionContext;

#[async_trait]
pub trait NodeExecutor: Send + Sync {
    fn name(&self) -> NodeName;

    /// Runs the stage. Implementations classify failures per spec §4.7:
    /// an `EngineError` for which [`EngineError::is_fatal`] is true aborts
    /// the node; otherwise the caller (the node itself, via
    /// [`ExecutorBase::degrade_or_propagate`]) may degrade instead of
    /// failing.
    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError>;
}

/// Shared state and helpers every concrete node embeds. Not a supertrait of
/// [`NodeExecutor`] — nodes hold one as a field, a common base offering
/// progress-callback plumbing without forcing a single inheritance
/// hierarchy.
pub struct ExecutorBase {
    name: NodeName,
    current_node_id: Mutex<Option<NodeId>>,
}

impl ExecutorBase {
    pub fn new(name: NodeName) -> Self {
        Self { name, current_node_id: Mutex::new(None) }
    }

    pub fn name(&self) -> NodeName {
        self.name
    }

    /// For progress attribution; unset is tolerated (progress reports
    /// become no-ops) per spec §4.7.
    pub fn set_current_node_id(&self, node_id: NodeId) {
        *self.current_node_id.lock().unwrap() = Some(node_id);
    }

    /// Writes progress to the DAG Store. A store failure is logged but
    /// never fails the node (spec §4.7).
    pub async fn report_progress(&self, ctx: &ExecutionContext, current: u64, total: u64, message: impl Into<String>) {
        let message = message.into();
        let Some(node_id) = *self.current_node_id.lock().unwrap() else {
            return;
        };
        tracing::debug!(dag_id = %ctx.dag_id, node = %self.name, current, total, %message, "node progress");
        if let Err(err) = ctx.dag_store.update_node_progress(node_id, Progress::new(current, total, message)).await {
            tracing::warn!(dag_id = %ctx.dag_id, node = %self.name, error = %err, "failed to persist node progress");
        }
    }

    /// spec §4.7: "nodes that need an ontology identifier fail fast with
    /// `ontology-id-required` if the DAG has no ontology ID".
    pub fn require_ontology_id(&self, ctx: &ExecutionContext) -> Result<engine_domain::OntologyId, EngineError> {
        ctx.ontology_id.ok_or(EngineError::OntologyIdRequired)
    }

    /// Applies the LLM error classification rule (spec §4.7): configuration
    /// errors (`endpoint`/`auth`) propagate fatally; every other LLM error
    /// is logged as a degradation and swallowed into `Ok`.
    pub async fn degrade_or_propagate(
        &self,
        ctx: &ExecutionContext,
        result: Result<(), EngineError>,
        degradation_message: &str,
    ) -> Result<(), EngineError> {
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.is_degradable() => {
                tracing::warn!(
                    dag_id = %ctx.dag_id,
                    node = %self.name,
                    degradation_type = "llm_transient",
                    error = %err,
                    "degrading: {degradation_message}"
                );
                self.report_progress(ctx, 0, 0, format!("degraded: {degradation_message}")).await;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ontology_id_required_fails_without_one() {
        let base = ExecutorBase::new(NodeName::RelationshipDiscovery);
        let ctx = crate::application::execution_context::tests::fake_context(None);
        assert!(matches!(base.require_ontology_id(&ctx), Err(EngineError::OntologyIdRequired)));
    }

    #[test]
    fn ontology_id_required_succeeds_with_one() {
        let base = ExecutorBase::new(NodeName::RelationshipDiscovery);
        let id = engine_domain::OntologyId::new();
        let ctx = crate::application::execution_context::tests::fake_context(Some(id));
        assert_eq!(base.require_ontology_id(&ctx).unwrap(), id);
    }
}
