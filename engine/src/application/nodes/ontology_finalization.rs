// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 13, the terminal stage (spec §4.8 item 13): aggregates a
//! [`DomainSummary`] (primary domain, naming conventions, free-text
//! summary) from everything discovered upstream.

use std::time::Duration;

use async_trait::async_trait;
use engine_domain::{DomainSummary, EngineError, NodeName};
use serde::Deserialize;

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

#[derive(Debug, Deserialize)]
struct FinalizationResponse {
    primary_domain: String,
    #[serde(default)]
    conventions: Vec<String>,
    summary: String,
}

pub struct OntologyFinalizationExecutor {
    base: ExecutorBase,
}

impl OntologyFinalizationExecutor {
    pub fn new() -> Self {
        Self { base: ExecutorBase::new(NodeName::OntologyFinalization) }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }

    async fn finalize(&self, ctx: &ExecutionContext) -> Result<DomainSummary, EngineError> {
        let tables = ctx.schema_introspection.list_tables(ctx.datasource_id).await?;
        let table_names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        self.base.report_progress(ctx, 0, 1, "summarizing domain and conventions").await;
        let prompt = format!(
            "Given the finalized ontology built over entities {table_names:?}, identify the primary business domain, \
             list observed naming conventions, and write a short summary. Respond as strict JSON: \
             {{\"primary_domain\":string,\"conventions\":[string],\"summary\":string}}"
        );
        let response = ctx.llm_client.complete(&prompt, Duration::from_secs(30)).await?;
        let parsed: FinalizationResponse = serde_json::from_str(&response).map_err(|e| EngineError::Llm {
            kind: engine_domain::LlmErrorKind::Other,
            message: format!("ontology finalization response did not parse: {e}"),
        })?;
        self.base.report_progress(ctx, 1, 1, "ontology finalized").await;
        Ok(DomainSummary { primary_domain: parsed.primary_domain, conventions: parsed.conventions, summary: parsed.summary })
    }
}

impl Default for OntologyFinalizationExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeExecutor for OntologyFinalizationExecutor {
    fn name(&self) -> NodeName {
        NodeName::OntologyFinalization
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let ontology_id = self.base.require_ontology_id(ctx)?;
        let result = self.finalize(ctx).await;
        match result {
            Ok(summary) => {
                tracing::info!(dag_id = %ctx.dag_id, domain = %summary.primary_domain, "ontology finalized");
                ctx.ontology_repository.save_domain_summary(ontology_id, summary).await?;
                Ok(())
            }
            Err(err) => self.base.degrade_or_propagate(ctx, Err(err), "ontology finalization unavailable").await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::execution_context::tests::fake_context;

    #[tokio::test]
    async fn finalization_requires_an_ontology_id() {
        let executor = OntologyFinalizationExecutor::new();
        let ctx = fake_context(None);
        let result = executor.execute(&ctx).await;
        assert!(matches!(result, Err(EngineError::OntologyIdRequired)));
    }
}
