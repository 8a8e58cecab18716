// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 10 (spec §4.8 item 10): derives candidate business glossary terms
//! from the entities and columns discovered so far.

use std::time::Duration;

use async_trait::async_trait;
use engine_domain::{EngineError, GlossaryTerm, NodeName};
use serde::Deserialize;

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

#[derive(Debug, Deserialize)]
struct GlossaryTermDefinition {
    term: String,
    definition: String,
}

#[derive(Debug, Deserialize, Default)]
struct GlossaryDiscoveryResponse {
    #[serde(default)]
    terms: Vec<GlossaryTermDefinition>,
}

pub struct GlossaryDiscoveryExecutor {
    base: ExecutorBase,
}

impl GlossaryDiscoveryExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::GlossaryDiscovery) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }

    async fn discover(&self, ctx: &ExecutionContext, ontology_id: engine_domain::OntologyId) -> Result<(), EngineError> {
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let table_names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        self.base.report_progress(ctx, 0, 1, "deriving candidate glossary terms").await;
        let prompt = format!(
            "Given the entities {table_names:?}, propose a list of business glossary terms that a domain expert would \
             recognize, each with a short working definition. Respond as strict JSON: \
             {{\"terms\":[{{\"term\":string,\"definition\":string}}]}}"
        );
        let response = ctx.llm_client.complete(&prompt, Duration::from_secs(30)).await?;
        let parsed: GlossaryDiscoveryResponse = serde_json::from_str(&response).unwrap_or_default();
        let terms: Vec<GlossaryTerm> = parsed
            .terms
            .into_iter()
            .map(|t| GlossaryTerm { term: t.term, definition: Some(t.definition), validating_sql: None })
            .collect();
        ctx.ontology_repository.save_glossary_terms(ontology_id, terms).await?;
        self.base.report_progress(ctx, 1, 1, "glossary candidates derived").await;
        Ok(())
    }
}

impl Default for GlossaryDiscoveryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for GlossaryDiscoveryExecutor {
    fn name(&self) -> NodeName {
        NodeName::GlossaryDiscovery
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let ontology_id = self.base.require_ontology_id(ctx)?;
        let result = self.discover(ctx, ontology_id).await;
        self.base.degrade_or_propagate(ctx, result, "glossary discovery unavailable").await
    }
}
