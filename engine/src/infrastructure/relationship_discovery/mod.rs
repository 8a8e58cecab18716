// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Relationship Discovery Core (spec §4.9)

pub mod candidate_generation;
pub mod llm_validation;

use std::collections::HashMap;

use engine_domain::RelationshipCandidate;

/// Deduplicates candidates by (source_table, source_column, target_table,
/// target_column), keeping the highest-priority provenance: declared FK >
/// column-feature FK > LLM-confirmed/value-match (spec §4.9 "Ordering &
/// tie-breaks", using [`engine_domain::DetectionMethod`]'s derived `Ord`).
pub fn deduplicate_keeping_highest_priority(candidates: Vec<RelationshipCandidate>) -> Vec<RelationshipCandidate> {
    let mut by_key: HashMap<(String, String, String, String), RelationshipCandidate> = HashMap::new();
    for candidate in candidates {
        let key = candidate.pair_key();
        match by_key.get(&key) {
            Some(existing) if existing.detection_method >= candidate.detection_method => {}
            _ => {
                by_key.insert(key, candidate);
            }
        }
    }
    by_key.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_domain::{ColumnRef, DetectionMethod};

    fn candidate(method: DetectionMethod) -> RelationshipCandidate {
        RelationshipCandidate::new(
            ColumnRef { table: "orders".to_string(), column: "customer_id".to_string(), data_type: "uuid".to_string() },
            ColumnRef { table: "customers".to_string(), column: "id".to_string(), data_type: "uuid".to_string() },
            method,
        )
    }

    #[test]
    fn declared_fk_wins_over_value_match_for_the_same_pair() {
        let declared = candidate(DetectionMethod::DeclaredFk);
        let value_match = candidate(DetectionMethod::ValueMatch);
        let result = deduplicate_keeping_highest_priority(vec![value_match, declared]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].detection_method, DetectionMethod::DeclaredFk);
    }
}
