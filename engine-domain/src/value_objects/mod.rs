// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod cardinality;
pub mod claims;
pub mod dag_status;
pub mod decision;
pub mod detection_method;
pub mod ids;
pub mod node_name;
pub mod node_status;
pub mod progress;
pub mod provenance;
pub mod upstream_token_ref;

pub use cardinality::Cardinality;
pub use claims::Claims;
pub use dag_status::DagStatus;
pub use decision::{Decision, LlmDecision};
pub use detection_method::DetectionMethod;
pub use ids::{CandidateId, DagId, DatasourceId, NodeId, OntologyId, ProjectId, RelationshipId, UserId};
pub use node_name::NodeName;
pub use node_status::NodeStatus;
pub use progress::Progress;
pub use provenance::{RelationshipProvenance, RequestProvenance, RequestProvenanceSource};
pub use upstream_token_ref::UpstreamTokenRef;
