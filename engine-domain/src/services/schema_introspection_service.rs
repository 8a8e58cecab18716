// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Schema Introspection Port
//!
//! The target database's catalog, read by deterministic analyzers (§4.8
//! items 2, 4, 6) and by the relationship discovery core's prompt assembly
//! (§4.9). The concrete database driver is an external collaborator; this
//! crate only shapes what the pipeline needs from it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::value_objects::DatasourceId;
use crate::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub null_percent: f64,
    pub distinct_count: u64,
    pub cardinality_ratio: f64,
    pub sample_values: Vec<String>,
    pub is_primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub row_count: u64,
    pub primary_key_columns: Vec<String>,
    pub unique_key_columns: Vec<Vec<String>>,
    pub columns: Vec<ColumnSchema>,
}

/// A foreign-key constraint as recorded in the catalog (spec §4.8 item 4,
/// glossary "Declared FK").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

#[async_trait]
pub trait SchemaIntrospectionService: Send + Sync {
    async fn list_tables(&self, datasource_id: DatasourceId) -> Result<Vec<TableSchema>, EngineError>;
    async fn declared_foreign_keys(&self, datasource_id: DatasourceId) -> Result<Vec<ForeignKeyConstraint>, EngineError>;
    /// Runs a read-only validation query, used by Glossary Enrichment to
    /// check a generated SQL definition against the live schema (§4.8
    /// item 11). Failures here are logged, never fatal.
    async fn validate_sql(&self, datasource_id: DatasourceId, sql: &str) -> Result<bool, EngineError>;
}
