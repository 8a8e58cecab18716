// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ontology Construction Pipeline Engine
//!
//! A durable, resumable, single-leader DAG scheduler that turns a raw
//! relational datasource into an enriched ontology — entities,
//! relationships, a business glossary, and descriptions — by driving a
//! fixed sequence of deterministic analyzers and LLM-backed enrichment
//! stages.
//!
//! ## Layers
//!
//! - [`application`] — the execution context nodes run in, the node
//!   executor framework, the thirteen pipeline stages, the orchestrator
//!   that drives one DAG to completion, and the use cases the presentation
//!   layer and bootstrap CLI call into.
//! - [`infrastructure`] — adapters implementing `engine_domain`'s ports:
//!   JWT-over-JWKS admission, the upstream token cache and fetcher,
//!   credential encryption, durable DAG persistence (in-memory and
//!   SQLite), the relationship discovery worker pool, configuration, and
//!   logging.
//! - [`presentation`] — request admission middleware, typed context keys,
//!   the admission error JSON mapping, and the OAuth discovery helpers.
//!
//! `engine_domain` (a separate crate) holds the types and ports both this
//! crate and `engine_bootstrap` depend on without depending on each other.

pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use engine_domain::{
    Claims, DagId, DagNode, DagRun, DagStatus, DagStore, DatasourceId, EngineError, NodeId, NodeName, NodeStatus, OntologyId,
    ProjectId,
};

pub use crate::application::orchestrator::Orchestrator;
pub use crate::application::use_cases::{create_and_run_dag, get_dag_status, resume_dag, ExecutionContextDeps};
pub use crate::infrastructure::config::Config;
