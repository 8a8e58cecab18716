// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 3 (spec §4.8 item 3): one LLM call per table, emitting a
//! description, usage notes, and an ephemerality flag. Per-table progress
//! is reported so "Describing table 3/10" reaches the UI.

use async_trait::async_trait;
use engine_domain::{EngineError, NodeName, OntologyId, TableDescription};
use std::time::Duration;

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

pub struct TableFeatureExtractionExecutor {
    base: ExecutorBase,
}

impl TableFeatureExtractionExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::TableFeatureExtraction) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }

    async fn describe_tables(&self, ctx: &ExecutionContext, ontology_id: OntologyId) -> Result<(), EngineError> {
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let total = tables.len() as u64;
        for (i, table) in tables.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            self.base.report_progress(ctx, i as u64, total, format!("describing table {}", table.name)).await;
            let columns: Vec<String> = table.columns.iter().map(|c| format!("{} {}", c.name, c.data_type)).collect();
            let prompt = format!(
                "Table {} ({} rows), columns: {}. Provide a one-sentence description, usage notes, and whether it looks like an ephemeral/staging table.",
                table.name, table.row_count, columns.join(", ")
            );
            let description = ctx.llm_client.complete(&prompt, Duration::from_secs(30)).await?;
            ctx.ontology_repository
                .save_table_description(ontology_id, TableDescription { table: table.name.clone(), description })
                .await?;
        }
        self.base.report_progress(ctx, total, total, "table feature extraction complete").await;
        Ok(())
    }
}

impl Default for TableFeatureExtractionExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for TableFeatureExtractionExecutor {
    fn name(&self) -> NodeName {
        NodeName::TableFeatureExtraction
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let ontology_id = self.base.require_ontology_id(ctx)?;
        let result = self.describe_tables(ctx, ontology_id).await;
        self.base.degrade_or_propagate(ctx, result, "table description unavailable").await
    }
}
