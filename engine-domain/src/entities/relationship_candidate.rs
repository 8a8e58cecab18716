// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

use crate::value_objects::{Cardinality, CandidateId, Decision, DetectionMethod};

/// One endpoint (table/column) of a candidate relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
    pub data_type: String,
}

/// Deterministic measurements backing a candidate's confidence (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetrics {
    pub value_match_rate: f64,
    pub join_match_rate: f64,
    pub orphan_rate: f64,
    pub target_coverage: f64,
    pub cardinality: Cardinality,
    pub source_row_count: u64,
    pub target_row_count: u64,
}

/// A potential foreign-key relationship prior to (or after) LLM validation
/// (spec §3 "Relationship Candidate").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipCandidate {
    pub id: CandidateId,
    pub source: ColumnRef,
    pub target: ColumnRef,
    pub detection_method: DetectionMethod,
    pub metrics: Option<CandidateMetrics>,
    pub decision: Option<Decision>,
    pub confidence: Option<f64>,
    pub reasoning: Option<String>,
}

impl RelationshipCandidate {
    pub fn new(source: ColumnRef, target: ColumnRef, detection_method: DetectionMethod) -> Self {
        Self {
            id: CandidateId::new(),
            source,
            target,
            detection_method,
            metrics: None,
            decision: None,
            confidence: None,
            reasoning: None,
        }
    }

    /// The (source_table, source_column, target_table, target_column) key
    /// used to deduplicate candidates keeping the highest-priority
    /// provenance (spec §4.9 "Ordering & tie-breaks").
    pub fn pair_key(&self) -> (String, String, String, String) {
        (
            self.source.table.clone(),
            self.source.column.clone(),
            self.target.table.clone(),
            self.target.column.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(table: &str, column: &str) -> ColumnRef {
        ColumnRef { table: table.to_string(), column: column.to_string(), data_type: "uuid".to_string() }
    }

    #[test]
    fn pair_key_identifies_same_source_target_regardless_of_method() {
        let declared = RelationshipCandidate::new(col("orders", "customer_id"), col("customers", "id"), DetectionMethod::DeclaredFk);
        let overlap = RelationshipCandidate::new(col("orders", "customer_id"), col("customers", "id"), DetectionMethod::ValueMatch);
        assert_eq!(declared.pair_key(), overlap.pair_key());
    }
}
