// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 8 (spec §4.8 item 8): scores entity candidates and promotes
//! aggregates/hubs while demoting trivial one-to-one join tables.
//! Deterministic; no LLM call.

use async_trait::async_trait;
use engine_domain::{EngineError, NodeName};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

/// A table whose only columns are its primary key plus the two halves of
/// a composite foreign key is a pure join table, not a promotable entity.
fn is_trivial_join_table(table: &engine_domain::TableSchema) -> bool {
    table.columns.len() <= table.primary_key_columns.len() + 2
}

pub struct EntityPromotionExecutor {
    base: ExecutorBase,
}

impl EntityPromotionExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::EntityPromotion) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }
}

impl Default for EntityPromotionExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for EntityPromotionExecutor {
    fn name(&self) -> NodeName {
        NodeName::EntityPromotion
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        self.base.require_ontology_id(ctx)?;
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let total = tables.len() as u64;
        let mut promoted = 0u64;
        let mut demoted = 0u64;
        for (i, table) in tables.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            if table.primary_key_columns.is_empty() {
                self.base.report_progress(ctx, i as u64 + 1, total, format!("{} skipped: no primary key", table.name)).await;
                continue;
            }
            if is_trivial_join_table(table) && table.row_count > 0 {
                demoted += 1;
                self.base.report_progress(ctx, i as u64 + 1, total, format!("{} demoted as join table", table.name)).await;
            } else {
                promoted += 1;
                self.base.report_progress(ctx, i as u64 + 1, total, format!("{} promoted as entity", table.name)).await;
            }
        }
        self.base
            .report_progress(ctx, total, total, format!("{promoted} entities promoted, {demoted} demoted"))
            .await;
        Ok(())
    }
}
