// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Type-safe entity identifiers.
//!
//! Each ID is a newtype over `uuid::Uuid` so that a `DagId` cannot be passed
//! where a `NodeId` is expected, while still round-tripping through JSON and
//! SQL as a plain UUID string.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(ProjectId, "Identifies the tenant project a DAG run belongs to.");
uuid_id!(DatasourceId, "Identifies the relational datasource being analyzed.");
uuid_id!(OntologyId, "Identifies the ontology a DAG run populates.");
uuid_id!(DagId, "Identifies one DAG run.");
uuid_id!(NodeId, "Identifies one node within a DAG run.");
uuid_id!(CandidateId, "Identifies one relationship candidate.");
uuid_id!(RelationshipId, "Identifies one persisted relationship.");
uuid_id!(UserId, "Identifies the human or service principal behind a request.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_string() {
        let id = DagId::new();
        let parsed: DagId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn distinct_id_types_do_not_compare() {
        let dag = DagId::new();
        let node = NodeId::new();
        // Different newtypes; only the underlying UUIDs can be compared directly.
        assert_ne!(dag.as_uuid(), node.as_uuid());
    }

    #[test]
    fn serializes_as_plain_uuid_string() {
        let id = ProjectId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
