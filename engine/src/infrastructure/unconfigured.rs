// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Composition-root placeholders for the two ports whose concrete,
//! network-backed implementations are external collaborators (spec §1):
//! the LLM provider's HTTP client and the target database's schema
//! introspection driver. A deployment wires its own adapter in; until it
//! does, both fail fast with a configuration-classified error rather than
//! silently returning empty data.

use std::time::Duration;

use async_trait::async_trait;

use engine_domain::{ColumnSchema, DatasourceId, EngineError, ForeignKeyConstraint, LlmClient, LlmErrorKind, SchemaIntrospectionService, TableSchema};

pub struct UnconfiguredLlmClient;

#[async_trait]
impl LlmClient for UnconfiguredLlmClient {
    async fn complete(&self, _prompt: &str, _deadline: Duration) -> Result<String, EngineError> {
        Err(EngineError::Llm { kind: LlmErrorKind::Endpoint, message: "no LLM client wired into this deployment".to_string() })
    }
}

pub struct UnconfiguredSchemaIntrospection;

#[async_trait]
impl SchemaIntrospectionService for UnconfiguredSchemaIntrospection {
    async fn list_tables(&self, _datasource_id: DatasourceId) -> Result<Vec<TableSchema>, EngineError> {
        Err(EngineError::Other("no schema introspection driver wired into this deployment".to_string()))
    }

    async fn declared_foreign_keys(&self, _datasource_id: DatasourceId) -> Result<Vec<ForeignKeyConstraint>, EngineError> {
        Err(EngineError::Other("no schema introspection driver wired into this deployment".to_string()))
    }

    async fn validate_sql(&self, _datasource_id: DatasourceId, _sql: &str) -> Result<bool, EngineError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_llm_client_fails_as_an_endpoint_configuration_error() {
        let result = UnconfiguredLlmClient.complete("prompt", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(EngineError::Llm { kind: LlmErrorKind::Endpoint, .. })));
    }
}
