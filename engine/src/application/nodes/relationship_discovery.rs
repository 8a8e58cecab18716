// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 5 (spec §4.8 item 5, §4.9): preserves declared and high-confidence
//! column-feature FKs, collects the rest by value overlap, and validates
//! them in parallel via the LLM-fronted worker pool in
//! [`crate::infrastructure::relationship_discovery`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use engine_domain::{EngineError, NodeName};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};
use crate::infrastructure::relationship_discovery::{
    candidate_generation::{collect_value_overlap_candidates, preserve_declared_fks},
    deduplicate_keeping_highest_priority,
    llm_validation::validate_candidates,
};

/// Batch size and worker-pool width for LLM validation. Configurable in a
/// full deployment (spec §2.3's `Config`); fixed here to keep this node's
/// construction simple.
const BATCH_SIZE: usize = 8;
const WORKER_COUNT: usize = 4;

pub struct RelationshipDiscoveryExecutor {
    base: ExecutorBase,
}

impl RelationshipDiscoveryExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::RelationshipDiscovery) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }
}

impl Default for RelationshipDiscoveryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for RelationshipDiscoveryExecutor {
    fn name(&self) -> NodeName {
        NodeName::RelationshipDiscovery
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let ontology_id = self.base.require_ontology_id(ctx)?;

        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let declared = ctx.schema_introspection.declared_foreign_keys(ctx.datasource_id).await?;
        let preserved = preserve_declared_fks(&declared);

        self.base.report_progress(ctx, 0, 4, "preserving declared foreign keys").await;
        let covered: std::collections::HashSet<_> = preserved.iter().map(|c| c.pair_key()).collect();
        let collected = collect_value_overlap_candidates(&tables, &covered);

        self.base
            .report_progress(ctx, 1, 4, format!("validating {} candidates against the LLM", collected.len()))
            .await;
        let outcome = validate_candidates(
            Arc::clone(&ctx.llm_client),
            Arc::new(tables),
            collected,
            BATCH_SIZE,
            WORKER_COUNT,
            Duration::from_secs(60),
        )
        .await;

        self.base.report_progress(ctx, 2, 4, "merging decisions with preserved relationships").await;
        let mut all = preserved;
        all.extend(outcome.new_relationships);
        let final_set = deduplicate_keeping_highest_priority(all);

        self.base.report_progress(ctx, 3, 4, format!("persisting {} deduplicated relationships", final_set.len())).await;
        let persisted_count = final_set.len();
        ctx.relationship_repository.save_relationships(ontology_id, final_set).await?;

        self.base
            .report_progress(ctx, 4, 4, format!("{} relationships persisted ({} LLM decisions)", persisted_count, outcome.decisions.len()))
            .await;
        Ok(())
    }
}
