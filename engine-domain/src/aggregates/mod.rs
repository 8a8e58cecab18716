// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod dag_aggregate;

pub use dag_aggregate::DagAggregate;
