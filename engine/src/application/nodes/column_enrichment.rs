// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 9 (spec §4.8 item 9): LLM column descriptions, semantic types,
//! role tags, and enum value mapping.

use std::time::Duration;

use async_trait::async_trait;
use engine_domain::{ColumnDescription, EngineError, NodeName, OntologyId};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

pub struct ColumnEnrichmentExecutor {
    base: ExecutorBase,
}

impl ColumnEnrichmentExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::ColumnEnrichment) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }

    async fn enrich(&self, ctx: &ExecutionContext, ontology_id: OntologyId) -> Result<(), EngineError> {
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let total: u64 = tables.iter().map(|t| t.columns.len() as u64).sum();
        let mut done = 0u64;
        for table in &tables {
            for column in &table.columns {
                if ctx.is_cancelled() {
                    return Err(EngineError::Cancelled);
                }
                done += 1;
                self.base
                    .report_progress(ctx, done, total, format!("enriching {}.{}", table.name, column.name))
                    .await;
                let prompt = format!(
                    "Column {}.{} of type {} (distinct={}, cardinality_ratio={:.2}, samples={:?}). \
                     Provide a description, a semantic type, a role tag, and an enum value mapping if applicable.",
                    table.name, column.name, column.data_type, column.distinct_count, column.cardinality_ratio, column.sample_values
                );
                let description = ctx.llm_client.complete(&prompt, Duration::from_secs(20)).await?;
                ctx.ontology_repository
                    .save_column_description(
                        ontology_id,
                        ColumnDescription { table: table.name.clone(), column: column.name.clone(), description },
                    )
                    .await?;
            }
        }
        self.base.report_progress(ctx, total, total, "column enrichment complete").await;
        Ok(())
    }
}

impl Default for ColumnEnrichmentExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for ColumnEnrichmentExecutor {
    fn name(&self) -> NodeName {
        NodeName::ColumnEnrichment
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let ontology_id = self.base.require_ontology_id(ctx)?;
        let result = self.enrich(ctx, ontology_id).await;
        self.base.degrade_or_propagate(ctx, result, "column enrichment unavailable").await
    }
}
