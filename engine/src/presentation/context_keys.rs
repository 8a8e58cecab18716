// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Typed request-context values (spec §4.1, §9 "Typed context keys").
//!
//! Each value Request Admission injects gets its own newtype so axum's
//! per-type extension map serves as a collision-free key space — two
//! subsystems reaching for a bare `String` extension would
//! silently clobber each other; reaching for `ClaimsContext` cannot collide
//! with anything but another `ClaimsContext`.

use uuid::Uuid;

use engine_domain::{Claims, UpstreamTokenRef};

/// The verified claims for the current request. Written only by the
/// admission middlewares; read anywhere downstream via `Extension`.
#[derive(Debug, Clone)]
pub struct ClaimsContext(pub Claims);

/// The raw bearer token the claims were extracted from, kept around for
/// calls that must forward the caller's own credential upstream (e.g. the
/// token fetcher).
#[derive(Debug, Clone)]
pub struct TokenContext(pub String);

/// Where the token came from — needed by a couple of audit log lines, not
/// by any business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Cookie,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenSourceContext(pub TokenSource);

#[derive(Debug, Clone)]
pub struct UpstreamTokenRefContext(pub UpstreamTokenRef);

/// Attached by the `…WithProvenance` middleware variants once the subject
/// has been confirmed to parse as a user ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvenanceSource {
    Manual,
}

#[derive(Debug, Clone, Copy)]
pub struct Provenance {
    pub source: ProvenanceSource,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Copy)]
pub struct ProvenanceContext(pub Provenance);
