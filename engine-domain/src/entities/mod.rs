// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod dag_node;
pub mod dag_run;
pub mod domain_summary;
pub mod ontology_fact;
pub mod relationship_candidate;
pub mod token_cache_entry;

pub use dag_node::DagNode;
pub use dag_run::DagRun;
pub use domain_summary::DomainSummary;
pub use ontology_fact::{ColumnDescription, EntityDescription, GlossaryTerm, TableDescription};
pub use relationship_candidate::{CandidateMetrics, ColumnRef, RelationshipCandidate};
pub use token_cache_entry::TokenCacheEntry;
