// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Domain
//!
//! Pure business types and service ports for the ontology construction
//! pipeline engine, free of any infrastructure concern (HTTP, SQL, the LLM
//! wire protocol). `engine` depends on this crate and fulfills its traits;
//! `engine-bootstrap` depends on it only for [`EngineError`].
//!
//! ## Layout
//!
//! - [`value_objects`] — identifiers, claims, statuses, and the other
//!   immutable data carried between layers.
//! - [`entities`] — `DagRun`, `DagNode`, `RelationshipCandidate`, and the
//!   other mutable-over-time records the store persists.
//! - [`aggregates`] — `DagAggregate`, the consistency boundary around a run
//!   and its nodes.
//! - [`repositories`] — the `DagStore`, `OntologyRepository`, and
//!   `RelationshipRepository` ports.
//! - [`services`] — ports for the LLM client, schema introspection,
//!   authorization service, and JWKS key material.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use aggregates::DagAggregate;
pub use entities::{
    CandidateMetrics, ColumnDescription, ColumnRef, DagNode, DagRun, DomainSummary, EntityDescription, GlossaryTerm,
    RelationshipCandidate, TableDescription, TokenCacheEntry,
};
pub use error::{EngineError, LlmErrorKind};
pub use repositories::{DagStore, OntologyRepository, RelationshipRepository};
pub use services::{AuthorizationClient, ColumnSchema, ForeignKeyConstraint, JwksProvider, LlmClient, RefreshedToken, SchemaIntrospectionService, TableSchema};
pub use value_objects::{
    Cardinality, CandidateId, Claims, DagId, DagStatus, DatasourceId, Decision, DetectionMethod, LlmDecision,
    NodeId, NodeName, NodeStatus, OntologyId, ProjectId, Progress, RelationshipId, RelationshipProvenance,
    RequestProvenance, RequestProvenanceSource, UpstreamTokenRef, UserId,
};
