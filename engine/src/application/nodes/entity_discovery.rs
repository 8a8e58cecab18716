// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 6 (spec §4.8 item 6): deterministic, derives candidate entities
//! from each table's primary and unique keys.

use async_trait::async_trait;
use engine_domain::{EngineError, NodeName};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

pub struct EntityDiscoveryExecutor {
    base: ExecutorBase,
}

impl EntityDiscoveryExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::EntityDiscovery) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }
}

impl Default for EntityDiscoveryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for EntityDiscoveryExecutor {
    fn name(&self) -> NodeName {
        NodeName::EntityDiscovery
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        self.base.require_ontology_id(ctx)?;
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let total = tables.len() as u64;
        let mut discovered = 0u64;
        for (i, table) in tables.iter().enumerate() {
            if !table.primary_key_columns.is_empty() || !table.unique_key_columns.is_empty() {
                discovered += 1;
            }
            self.base.report_progress(ctx, i as u64 + 1, total, format!("scanning {} for entity keys", table.name)).await;
        }
        self.base.report_progress(ctx, total, total, format!("{discovered} candidate entities discovered")).await;
        Ok(())
    }
}
