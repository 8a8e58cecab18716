// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 1 (spec §4.8 item 1). Extracts domain facts from an optional
//! project overview via one LLM call — the overview-inferred variant
//! (spec §9 "two `KnowledgeSeeding` node variants exist"); it degrades
//! gracefully on any LLM error except `endpoint`/`auth`, which are
//! configuration errors and therefore fatal.

use async_trait::async_trait;
use engine_domain::{EngineError, NodeName};
use std::time::Duration;

use crate::application::execution_context::ExecutionContext;
use crate::application::executor::{ExecutorBase, NodeExecutor};

pub struct KnowledgeSeedingExecutor {
    base: ExecutorBase,
    project_overview: Option<String>,
}

impl KnowledgeSeedingExecutor {
    pub fn new(project_overview: Option<String>) -> Self {
        Self { base: ExecutorBase::new(NodeName::KnowledgeSeeding), project_overview }
    }

    pub fn base(&self) -> &ExecutorBase {
        &self.base
    }

    async fn seed(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let Some(overview) = &self.project_overview else {
            self.base.report_progress(ctx, 0, 0, "no project overview supplied").await;
            return Ok(());
        };
        self.base.report_progress(ctx, 0, 1, "extracting domain facts from overview").await;
        let prompt = format!(
            "Extract concise domain facts (one per line) from this project overview:\n{overview}"
        );
        let response = ctx.llm_client.complete(&prompt, Duration::from_secs(30)).await?;
        let facts = response.lines().filter(|l| !l.trim().is_empty()).count();
        self.base.report_progress(ctx, 1, 1, format!("seeded {facts} domain facts")).await;
        Ok(())
    }
}

#[async_trait]
impl NodeExecutor for KnowledgeSeedingExecutor {
    fn name(&self) -> NodeName {
        NodeName::KnowledgeSeeding
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), EngineError> {
        let result = self.seed(ctx).await;
        self.base.degrade_or_propagate(ctx, result, "knowledge seeding unavailable").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::execution_context::tests::fake_context;

    #[tokio::test]
    async fn no_overview_reports_zero_work_and_succeeds() {
        let executor = KnowledgeSeedingExecutor::new(None);
        executor.base.set_current_node_id(engine_domain::NodeId::new());
        let ctx = fake_context(None);
        assert!(executor.execute(&ctx).await.is_ok());
    }
}
