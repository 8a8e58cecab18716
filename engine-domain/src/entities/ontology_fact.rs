// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// Produced by Table Feature Extraction (spec §4.8 item 3): a table's
/// one-sentence description, usage notes, and ephemerality flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescription {
    pub table: String,
    pub description: String,
}

/// Produced by Column Enrichment (spec §4.8 item 9): a column's
/// description, semantic type, role tag, and enum value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub table: String,
    pub column: String,
    pub description: String,
}

/// Produced by Entity Enrichment (spec §4.8 item 7): an entity's name,
/// description, business domain, and key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescription {
    pub table: String,
    pub description: String,
}

/// Produced by Glossary Discovery and refined by Glossary Enrichment
/// (spec §4.8 items 10-11). `definition` comes from discovery;
/// `validating_sql` is attached once enrichment has generated and
/// validated a SQL definition for the term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: Option<String>,
    pub validating_sql: Option<String>,
}
