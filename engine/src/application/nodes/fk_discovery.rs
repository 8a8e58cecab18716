// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 4 (spec §4.8 item 4): deterministic, reads declared foreign keys
//! from the target database's catalog (glossary: "Declared FK").

use async_trait::async_trait;
use engine_domain::{EngineError, NodeName};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

pub struct FkDiscoveryExecutor {
    base: ExecutorBase,
}

impl FkDiscoveryExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::FkDiscovery) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }
}

impl Default for FkDiscoveryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for FkDiscoveryExecutor {
    fn name(&self) -> NodeName {
        NodeName::FkDiscovery
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let declared = ctx.schema_introspection.declared_foreign_keys(ctx.datasource_id).await?;
        self.base
            .report_progress(ctx, declared.len() as u64, declared.len() as u64, "declared foreign keys discovered")
            .await;
        Ok(())
    }
}
