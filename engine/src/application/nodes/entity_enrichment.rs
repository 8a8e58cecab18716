// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 7 (spec §4.8 item 7): LLM-generated names, descriptions, domains,
//! and key columns per entity, with batch progress reporting.

use std::time::Duration;

use async_trait::async_trait;
use engine_domain::{EngineError, EntityDescription, NodeName, OntologyId};

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

pub struct EntityEnrichmentExecutor {
    base: ExecutorBase,
}

impl EntityEnrichmentExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::EntityEnrichment) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }

    async fn enrich(&self, ctx: &ExecutionContext, ontology_id: OntologyId) -> Result<(), EngineError> {
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let entities: Vec<_> = tables.iter().filter(|t| !t.primary_key_columns.is_empty()).collect();
        let total = entities.len() as u64;
        for (i, table) in entities.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            self.base.report_progress(ctx, i as u64, total, format!("enriching entity {}", table.name)).await;
            let prompt = format!(
                "Entity candidate from table {} with key columns {:?}. Provide a name, description, and business domain.",
                table.name, table.primary_key_columns
            );
            let description = ctx.llm_client.complete(&prompt, Duration::from_secs(30)).await?;
            ctx.ontology_repository
                .save_entity_description(ontology_id, EntityDescription { table: table.name.clone(), description })
                .await?;
        }
        self.base.report_progress(ctx, total, total, "entity enrichment complete").await;
        Ok(())
    }
}

impl Default for EntityEnrichmentExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for EntityEnrichmentExecutor {
    fn name(&self) -> NodeName {
        NodeName::EntityEnrichment
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let ontology_id = self.base.require_ontology_id(ctx)?;
        let result = self.enrich(ctx, ontology_id).await;
        self.base.degrade_or_propagate(ctx, result, "entity enrichment unavailable").await
    }
}
