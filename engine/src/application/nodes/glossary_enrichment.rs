// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 11 (spec §4.8 item 11): generates a candidate SQL definition per
//! glossary term and validates it against the target database. A failed
//! validation is logged and the term kept without a validated definition;
//! it never fails the node.

use std::time::Duration;

use async_trait::async_trait;
use engine_domain::{EngineError, GlossaryTerm, NodeName};
use serde::Deserialize;

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

#[derive(Debug, Deserialize)]
struct GlossaryTermSql {
    term: String,
    sql: String,
}

#[derive(Debug, Deserialize, Default)]
struct GlossaryDefinitionResponse {
    #[serde(default)]
    definitions: Vec<GlossaryTermSql>,
}

pub struct GlossaryEnrichmentExecutor {
    base: ExecutorBase,
}

impl GlossaryEnrichmentExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::GlossaryEnrichment) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }

    async fn enrich(&self, ctx: &ExecutionContext, ontology_id: engine_domain::OntologyId) -> Result<(), EngineError> {
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let table_names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        let prompt = format!(
            "For the glossary terms derived from entities {table_names:?}, propose a validating SQL query per term. \
             Respond as strict JSON: {{\"definitions\":[{{\"term\":string,\"sql\":string}}]}}"
        );
        let response = ctx.llm_client.complete(&prompt, Duration::from_secs(30)).await?;
        let parsed: GlossaryDefinitionResponse = serde_json::from_str(&response).unwrap_or_default();

        let total = parsed.definitions.len() as u64;
        let mut validated = 0u64;
        for (i, definition) in parsed.definitions.iter().enumerate() {
            self.base
                .report_progress(ctx, i as u64, total.max(1), format!("validating definition for {}", definition.term))
                .await;
            match ctx.schema_introspection.validate_sql(ctx.datasource_id, &definition.sql).await {
                Ok(true) => {
                    validated += 1;
                    let term = GlossaryTerm {
                        term: definition.term.clone(),
                        definition: None,
                        validating_sql: Some(definition.sql.clone()),
                    };
                    ctx.ontology_repository.save_glossary_terms(ontology_id, vec![term]).await?;
                }
                Ok(false) => {
                    tracing::warn!(dag_id = %ctx.dag_id, term = %definition.term, "glossary definition failed validation");
                }
                Err(err) => {
                    tracing::warn!(dag_id = %ctx.dag_id, term = %definition.term, error = %err, "glossary definition validation errored");
                }
            }
        }
        self.base
            .report_progress(ctx, total, total.max(1), format!("{validated}/{total} glossary definitions validated"))
            .await;
        Ok(())
    }
}

impl Default for GlossaryEnrichmentExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for GlossaryEnrichmentExecutor {
    fn name(&self) -> NodeName {
        NodeName::GlossaryEnrichment
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let ontology_id = self.base.require_ontology_id(ctx)?;
        let result = self.enrich(ctx, ontology_id).await;
        self.base.degrade_or_propagate(ctx, result, "glossary enrichment unavailable").await
    }
}
