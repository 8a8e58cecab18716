// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! DAG persistence adapters (spec §4.6): [`in_memory::InMemoryDagStore`] for
//! tests and local runs, [`sqlite_store::SqliteDagStore`] for durable,
//! crash-resumable deployments.

pub mod in_memory;
pub mod sqlite_store;

pub use in_memory::InMemoryDagStore;
pub use sqlite_store::SqliteDagStore;
