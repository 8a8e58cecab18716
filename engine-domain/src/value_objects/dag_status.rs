// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// Lifecycle state of a DAG run (spec §3 "DAG Run").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DagStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl DagStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DagStatus::Succeeded | DagStatus::Failed)
    }
}

impl std::fmt::Display for DagStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DagStatus::Pending => "pending",
            DagStatus::Running => "running",
            DagStatus::Succeeded => "succeeded",
            DagStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
