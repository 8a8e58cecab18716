// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Infrastructure adapters implementing `engine_domain`'s ports: HTTP/JWT
//! admission, the upstream token cache, credential encryption, DAG
//! persistence, relationship discovery's LLM-backed validation, runtime
//! configuration, and logging.

pub mod auth;
pub mod cancellation;
pub mod config;
pub mod dag_store;
pub mod logging;
pub mod ontology_store;
pub mod relationship_discovery;
pub mod token_cache;
pub mod unconfigured;
