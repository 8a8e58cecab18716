// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod dag_store;
pub mod ontology_repository;
pub mod relationship_repository;

pub use dag_store::DagStore;
pub use ontology_repository::OntologyRepository;
pub use relationship_repository::RelationshipRepository;
