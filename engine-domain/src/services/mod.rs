// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod authorization_client;
pub mod jwks_provider;
pub mod llm_client;
pub mod schema_introspection_service;

pub use authorization_client::{AuthorizationClient, RefreshedToken};
pub use jwks_provider::JwksProvider;
pub use llm_client::LlmClient;
pub use schema_introspection_service::{ColumnSchema, ForeignKeyConstraint, SchemaIntrospectionService, TableSchema};
