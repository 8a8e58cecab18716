// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Candidate generation (spec §4.9 steps 1-3): declared FKs and
//! column-feature FKs are preserved outright; everything else collected by
//! pairwise value-overlap becomes a candidate routed through LLM
//! validation.

use engine_domain::{CandidateMetrics, Cardinality, ColumnRef, DetectionMethod, ForeignKeyConstraint, RelationshipCandidate, TableSchema};

/// Confidence floor above which a column-feature-flagged FK is preserved
/// without LLM validation (spec §4.9 step 2, "confidence exceeds a fixed
/// threshold").
pub const COLUMN_FEATURE_FK_THRESHOLD: f64 = 0.85;

/// A column whose name/pattern looks like a foreign key to `target_table`
/// but carries no declared constraint, with the heuristic's confidence.
pub struct ColumnFeatureFkHint {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub confidence: f64,
}

pub fn preserve_declared_fks(declared: &[ForeignKeyConstraint]) -> Vec<RelationshipCandidate> {
    declared
        .iter()
        .map(|fk| {
            RelationshipCandidate::new(
                ColumnRef { table: fk.source_table.clone(), column: fk.source_column.clone(), data_type: String::new() },
                ColumnRef { table: fk.target_table.clone(), column: fk.target_column.clone(), data_type: String::new() },
                DetectionMethod::DeclaredFk,
            )
        })
        .collect()
}

pub fn preserve_column_feature_fks(hints: &[ColumnFeatureFkHint]) -> Vec<RelationshipCandidate> {
    hints
        .iter()
        .filter(|h| h.confidence >= COLUMN_FEATURE_FK_THRESHOLD)
        .map(|h| {
            RelationshipCandidate::new(
                ColumnRef { table: h.source_table.clone(), column: h.source_column.clone(), data_type: String::new() },
                ColumnRef { table: h.target_table.clone(), column: h.target_column.clone(), data_type: String::new() },
                DetectionMethod::ColumnFeatureFk,
            )
        })
        .collect()
}

/// Pairwise value-overlap analysis over datatype-compatible column pairs
/// not already covered by a preserved candidate (spec §4.9 step 3). Exact
/// overlap measurement is an external analyzer concern; this computes the
/// eligible pair set and attaches placeholder metrics for the caller (the
/// relationship discovery core) to refine before LLM validation.
pub fn collect_value_overlap_candidates(
    tables: &[TableSchema],
    already_covered: &std::collections::HashSet<(String, String, String, String)>,
) -> Vec<RelationshipCandidate> {
    let mut candidates = Vec::new();
    for source in tables {
        for source_col in &source.columns {
            if source_col.is_primary_key {
                continue;
            }
            for target in tables {
                if target.name == source.name {
                    continue;
                }
                for target_col in &target.columns {
                    if !target_col.is_primary_key || target_col.data_type != source_col.data_type {
                        continue;
                    }
                    let key = (source.name.clone(), source_col.name.clone(), target.name.clone(), target_col.name.clone());
                    if already_covered.contains(&key) {
                        continue;
                    }
                    let mut candidate = RelationshipCandidate::new(
                        ColumnRef { table: source.name.clone(), column: source_col.name.clone(), data_type: source_col.data_type.clone() },
                        ColumnRef { table: target.name.clone(), column: target_col.name.clone(), data_type: target_col.data_type.clone() },
                        DetectionMethod::ValueMatch,
                    );
                    candidate.metrics = Some(CandidateMetrics {
                        value_match_rate: 0.0,
                        join_match_rate: 0.0,
                        orphan_rate: 0.0,
                        target_coverage: 0.0,
                        cardinality: Cardinality::ManyToOne,
                        source_row_count: source.row_count,
                        target_row_count: target.row_count,
                    });
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_domain::ColumnSchema;

    fn table(name: &str, columns: Vec<ColumnSchema>) -> TableSchema {
        TableSchema { name: name.to_string(), row_count: 100, primary_key_columns: vec![], unique_key_columns: vec![], columns }
    }

    fn column(name: &str, data_type: &str, is_pk: bool) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            data_type: data_type.to_string(),
            nullable: false,
            null_percent: 0.0,
            distinct_count: 100,
            cardinality_ratio: 1.0,
            sample_values: vec![],
            is_primary_key: is_pk,
        }
    }

    #[test]
    fn column_feature_fk_below_threshold_is_not_preserved() {
        let hints = vec![ColumnFeatureFkHint {
            source_table: "orders".to_string(),
            source_column: "customer_id".to_string(),
            target_table: "customers".to_string(),
            target_column: "id".to_string(),
            confidence: 0.5,
        }];
        assert!(preserve_column_feature_fks(&hints).is_empty());
    }

    #[test]
    fn column_feature_fk_above_threshold_is_preserved() {
        let hints = vec![ColumnFeatureFkHint {
            source_table: "orders".to_string(),
            source_column: "customer_id".to_string(),
            target_table: "customers".to_string(),
            target_column: "id".to_string(),
            confidence: 0.9,
        }];
        assert_eq!(preserve_column_feature_fks(&hints).len(), 1);
    }

    #[test]
    fn value_overlap_skips_already_covered_pairs_and_non_pk_targets() {
        let tables = vec![
            table("orders", vec![column("customer_id", "uuid", false)]),
            table("customers", vec![column("id", "uuid", true)]),
        ];
        let mut covered = std::collections::HashSet::new();
        covered.insert(("orders".to_string(), "customer_id".to_string(), "customers".to_string(), "id".to_string()));
        assert!(collect_value_overlap_candidates(&tables, &covered).is_empty());

        let candidates = collect_value_overlap_candidates(&tables, &std::collections::HashSet::new());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].detection_method, DetectionMethod::ValueMatch);
    }
}
