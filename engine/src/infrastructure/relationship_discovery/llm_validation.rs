// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Parallel LLM validation of collected candidates (spec §4.9 step 4),
//! driven by a bounded worker pool so a configurable number of requests are
//! ever in flight at once (spec §5 "bounded worker pool... each worker
//! holds one in-flight LLM request").

use std::sync::Arc;
use std::time::Duration;

use engine_domain::{
    CandidateId, Decision, EngineError, LlmClient, LlmDecision, LlmErrorKind, RelationshipCandidate, TableSchema,
};
use futures::stream::{self, StreamExt};
use serde::Deserialize;

/// A `confirm` below this confidence is stored as `needs_review` rather
/// than persisted as authoritative (spec §4.9 "Ordering & tie-breaks").
pub const CONFIRM_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Re-ask bound on JSON parse failure before giving up and treating the
/// batch as `needs_review` (spec §4.9 step 4).
const MAX_REPARSE_ATTEMPTS: u32 = 2;

/// Retry bound for a transient LLM error on a single batch, before falling
/// back to `needs_review` (spec §4.9: "a transient LLM error for one batch
/// retries with exponential backoff").
const MAX_TRANSIENT_RETRIES: u32 = 3;

/// Backoff before the first retry; doubled on each subsequent attempt.
const TRANSIENT_RETRY_BASE_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Debug, Deserialize)]
struct NewRelationship {
    source_table: String,
    source_column: String,
    target_table: String,
    target_column: String,
    confidence: f64,
    reasoning: String,
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    decisions: Vec<LlmDecision>,
    #[serde(default)]
    new_relationships: Vec<NewRelationship>,
}

pub struct ValidationOutcome {
    pub decisions: Vec<LlmDecision>,
    pub new_relationships: Vec<RelationshipCandidate>,
}

fn build_prompt(tables: &[TableSchema], batch: &[RelationshipCandidate]) -> String {
    let mut schema_context = String::new();
    for table in tables {
        schema_context.push_str(&format!("Table {} ({} rows):\n", table.name, table.row_count));
        for column in &table.columns {
            let pk_flag = if column.is_primary_key { " [PK]" } else { "" };
            schema_context.push_str(&format!(
                "  {} {} null={:.1}%{}\n",
                column.name, column.data_type, column.null_percent * 100.0, pk_flag
            ));
        }
    }
    let mut candidate_context = String::new();
    for candidate in batch {
        candidate_context.push_str(&format!(
            "candidate_id={} {}.{} -> {}.{}\n",
            candidate.id, candidate.source.table, candidate.source.column, candidate.target.table, candidate.target.column
        ));
    }
    format!(
        "Schema:\n{schema_context}\nCandidates:\n{candidate_context}\n\
         Respond with strict JSON: {{\"decisions\":[{{\"candidate_id\":string,\"action\":\"confirm\"|\"reject\"|\"needs_review\",\"confidence\":number,\"reasoning\":string}}],\
         \"new_relationships\":[{{\"source_table\":string,\"source_column\":string,\"target_table\":string,\"target_column\":string,\"confidence\":number,\"reasoning\":string}}]}}"
    )
}

fn needs_review(candidate_id: CandidateId, reason: &str) -> LlmDecision {
    LlmDecision { candidate_id, action: Decision::NeedsReview, confidence: 0.0, reasoning: reason.to_string() }
}

async fn validate_batch(
    llm_client: &dyn LlmClient,
    tables: &[TableSchema],
    batch: &[RelationshipCandidate],
    deadline: Duration,
) -> ValidationOutcome {
    let prompt = build_prompt(tables, batch);
    let mut reparse_attempts = 0u32;
    let mut transient_retries = 0u32;
    let mut backoff = TRANSIENT_RETRY_BASE_BACKOFF;
    loop {
        match llm_client.complete(&prompt, deadline).await {
            Ok(response) => match serde_json::from_str::<ValidationResponse>(&response) {
                Ok(parsed) => {
                    let new_relationships = parsed
                        .new_relationships
                        .into_iter()
                        .map(|r| {
                            let mut candidate = RelationshipCandidate::new(
                                engine_domain::ColumnRef { table: r.source_table, column: r.source_column, data_type: String::new() },
                                engine_domain::ColumnRef { table: r.target_table, column: r.target_column, data_type: String::new() },
                                engine_domain::DetectionMethod::ValueMatch,
                            );
                            candidate.confidence = Some(r.confidence);
                            candidate.reasoning = Some(r.reasoning);
                            candidate
                        })
                        .collect();
                    return ValidationOutcome { decisions: parsed.decisions, new_relationships };
                }
                Err(_) => {
                    reparse_attempts += 1;
                    if reparse_attempts > MAX_REPARSE_ATTEMPTS {
                        break;
                    }
                    continue;
                }
            },
            Err(EngineError::Llm { kind: LlmErrorKind::Transient, .. }) if transient_retries < MAX_TRANSIENT_RETRIES => {
                transient_retries += 1;
                tracing::warn!(attempt = transient_retries, "transient LLM error validating batch, retrying after backoff");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }
            Err(err) if matches!(err, EngineError::Llm { .. }) => {
                return ValidationOutcome {
                    decisions: batch.iter().map(|c| needs_review(c.id, "llm call failed")).collect(),
                    new_relationships: vec![],
                };
            }
            Err(_) => break,
        }
    }
    ValidationOutcome {
        decisions: batch.iter().map(|c| needs_review(c.id, "response did not parse as valid JSON")).collect(),
        new_relationships: vec![],
    }
}

/// Validates `candidates` in batches of `batch_size` using up to
/// `worker_count` concurrent in-flight LLM requests.
pub async fn validate_candidates(
    llm_client: Arc<dyn LlmClient>,
    tables: Arc<Vec<TableSchema>>,
    candidates: Vec<RelationshipCandidate>,
    batch_size: usize,
    worker_count: usize,
    deadline: Duration,
) -> ValidationOutcome {
    let batches: Vec<Vec<RelationshipCandidate>> =
        candidates.chunks(batch_size.max(1)).map(|c| c.to_vec()).collect();

    let outcomes: Vec<ValidationOutcome> = stream::iter(batches)
        .map(|batch| {
            let llm_client = Arc::clone(&llm_client);
            let tables = Arc::clone(&tables);
            async move { validate_batch(llm_client.as_ref(), &tables, &batch, deadline).await }
        })
        .buffer_unordered(worker_count.max(1))
        .collect()
        .await;

    let mut decisions = Vec::new();
    let mut new_relationships = Vec::new();
    for outcome in outcomes {
        decisions.extend(outcome.decisions);
        new_relationships.extend(outcome.new_relationships);
    }
    ValidationOutcome { decisions, new_relationships }
}

/// Applies the confidence gate: a `confirm` below
/// [`CONFIRM_CONFIDENCE_THRESHOLD`] is downgraded to `needs_review` (spec
/// §4.9 "Ordering & tie-breaks").
pub fn gate_confidence(decision: &LlmDecision) -> Decision {
    match decision.action {
        Decision::Confirm if decision.confidence < CONFIRM_CONFIDENCE_THRESHOLD => Decision::NeedsReview,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_confidence_confirm_is_downgraded_to_needs_review() {
        let decision = LlmDecision { candidate_id: CandidateId::new(), action: Decision::Confirm, confidence: 0.5, reasoning: String::new() };
        assert_eq!(gate_confidence(&decision), Decision::NeedsReview);
    }

    #[test]
    fn high_confidence_confirm_persists_as_confirm() {
        let decision = LlmDecision { candidate_id: CandidateId::new(), action: Decision::Confirm, confidence: 0.95, reasoning: String::new() };
        assert_eq!(gate_confidence(&decision), Decision::Confirm);
    }

    #[test]
    fn reject_is_unaffected_by_confidence_gate() {
        let decision = LlmDecision { candidate_id: CandidateId::new(), action: Decision::Reject, confidence: 0.1, reasoning: String::new() };
        assert_eq!(gate_confidence(&decision), Decision::Reject);
    }
}
