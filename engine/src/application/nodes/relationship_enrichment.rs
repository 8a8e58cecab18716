// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 12 (spec §4.8 item 12): LLM-generated descriptions for the
//! relationships persisted by relationship discovery.

use std::time::Duration;

use async_trait::async_trait;
use engine_domain::{EngineError, NodeName};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

pub struct RelationshipEnrichmentExecutor {
    base: ExecutorBase,
}

impl RelationshipEnrichmentExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::RelationshipEnrichment) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }

    async fn enrich(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let declared = ctx.schema_introspection.declared_foreign_keys(ctx.datasource_id).await?;
        let total = declared.len() as u64;
        for (i, fk) in declared.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            self.base
                .report_progress(
                    ctx,
                    i as u64,
                    total.max(1),
                    format!("describing {}.{} -> {}.{}", fk.source_table, fk.source_column, fk.target_table, fk.target_column),
                )
                .await;
            let prompt = format!(
                "Describe in one sentence the business meaning of the relationship from {}.{} to {}.{}.",
                fk.source_table, fk.source_column, fk.target_table, fk.target_column
            );
            ctx.llm_client.complete(&prompt, Duration::from_secs(20)).await?;
        }
        self.base.report_progress(ctx, total, total.max(1), "relationship enrichment complete").await;
        Ok(())
    }
}

impl Default for RelationshipEnrichmentExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for RelationshipEnrichmentExecutor {
    fn name(&self) -> NodeName {
        NodeName::RelationshipEnrichment
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        self.base.require_ontology_id(ctx)?;
        let result = self.enrich(ctx).await;
        self.base.degrade_or_propagate(ctx, result, "relationship enrichment unavailable").await
    }
}
