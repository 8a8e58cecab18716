// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Error Taxonomy
//!
//! A single tagged-union error type carries every failure *kind* the system
//! distinguishes, from JWT admission failures through LLM configuration
//! errors. Kinds are grouped by where they surface:
//!
//! - Admission errors short-circuit at the middleware boundary ([`Self::http_status`]).
//! - LLM/node errors drive the classification rule in the node executor
//!   framework ([`Self::is_fatal`], [`Self::is_degradable`]).
//! - Store/cache errors are mostly handled by their callers without ever
//!   becoming a propagated `EngineError` (e.g. a lost ownership CAS returns
//!   `claimed: false`, not an `Err`).

use thiserror::Error;

/// The distinguished LLM failure kind, carried by [`EngineError::Llm`].
///
/// An error wrapping [`LlmErrorKind::Endpoint`] or [`LlmErrorKind::Auth`] is
/// a configuration error and is always fatal to the pipeline: it is
/// diagnostic of a misconfiguration that will trip every subsequent LLM
/// node, so nodes escalate it instead of degrading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// The LLM endpoint could not be reached (DNS, connect, TLS).
    Endpoint,
    /// The LLM rejected the request's credentials.
    Auth,
    /// A transient failure (rate limit, timeout, 5xx) worth retrying.
    Transient,
    /// Any other LLM-side failure (e.g. response did not parse).
    Other,
}

impl LlmErrorKind {
    /// True for [`Self::Endpoint`] and [`Self::Auth`] — see type docs.
    pub fn is_configuration_error(self) -> bool {
        matches!(self, LlmErrorKind::Endpoint | LlmErrorKind::Auth)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    // --- Request admission (§4.3, §7) ---
    #[error("missing authorization")]
    MissingAuthorization,
    #[error("invalid authorization header format")]
    InvalidAuthFormat,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token audience does not include the required value")]
    InvalidAudience,
    #[error("token issuer is not in the configured whitelist")]
    UnauthorizedIssuer,
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("missing project identifier in claims")]
    MissingProject,
    #[error("project identifier is not a valid UUID")]
    InvalidProjectFormat,
    #[error("project ID mismatch between token and URL")]
    ProjectMismatch,
    #[error("caller's roles do not include a required role")]
    InsufficientRole,
    #[error("caller is not the central service")]
    NotCentral,
    #[error("auth_url is not in the issuer whitelist")]
    InvalidAuthUrl,
    #[error("missing user identifier in claims")]
    MissingUser,

    // --- Upstream token cache / fetcher (§4.4, §7) ---
    #[error("upstream token reference not found")]
    UpstreamNotFound,
    #[error("upstream token reference does not belong to caller")]
    UpstreamForbidden,
    #[error("upstream token service error: {0}")]
    UpstreamError(String),
    #[error("upstream token service returned an empty token")]
    EmptyToken,

    // --- LLM-fronted nodes (§4.7, §4.9, §7) ---
    #[error("LLM configuration error: {0}")]
    LlmConfiguration(String),
    #[error("LLM error ({kind:?}): {message}")]
    Llm { kind: LlmErrorKind, message: String },

    // --- Node executor framework (§4.7) ---
    #[error("ontology ID is required for this node")]
    OntologyIdRequired,
    #[error("execution was cancelled")]
    Cancelled,

    // --- Credential encryptor (§4.5, §7) ---
    #[error("decryption failed")]
    DecryptionFailed,
    #[error("invalid encryption key")]
    InvalidKey,

    // --- DAG store (§4.6) ---
    #[error("DAG run {0} not found")]
    DagNotFound(String),
    #[error("DAG node {0} not found")]
    NodeNotFound(String),
    /// Returned by the persistence layer itself (connection errors etc.),
    /// distinct from `claimed = false`, which is the *expected* outcome of a
    /// lost ownership CAS and is never an `Err`.
    #[error("store error: {0}")]
    Store(String),

    #[error("{0}")]
    Other(String),
}

impl EngineError {
    /// HTTP status code for errors surfaced at the admission boundary
    /// (spec.md §7). Errors that never reach an HTTP response return `None`.
    pub fn http_status(&self) -> Option<u16> {
        use EngineError::*;
        Some(match self {
            MissingAuthorization | InvalidAuthFormat | InvalidSignature | InvalidAudience
            | UnauthorizedIssuer | MalformedToken(_) => 401,
            MissingProject | InvalidProjectFormat | InvalidAuthUrl | MissingUser => 400,
            ProjectMismatch | InsufficientRole | NotCentral => 403,
            _ => return None,
        })
    }

    /// The machine-readable error code used in the `{error, message}` JSON
    /// body (spec.md §6).
    pub fn error_code(&self) -> &'static str {
        use EngineError::*;
        match self {
            MissingAuthorization | InvalidAuthFormat | InvalidSignature | InvalidAudience
            | UnauthorizedIssuer | MalformedToken(_) => "unauthorized",
            MissingProject | InvalidProjectFormat | MissingUser => "bad_request",
            InvalidAuthUrl => "invalid_auth_url",
            ProjectMismatch | InsufficientRole | NotCentral => "forbidden",
            _ => "bad_request",
        }
    }

    /// True when this error must abort the owning DAG node and transition
    /// the DAG to `failed` (spec.md §4.7's classification rule).
    pub fn is_fatal(&self) -> bool {
        match self {
            EngineError::Llm { kind, .. } => kind.is_configuration_error(),
            EngineError::LlmConfiguration(_) => true,
            EngineError::Cancelled => true,
            EngineError::OntologyIdRequired => true,
            // Non-LLM errors are fatal by default (§4.7); degradation is an
            // explicit opt-in made by the node, not a property of the error.
            _ => true,
        }
    }

    /// True when a node may log a warning, report zero-work completion, and
    /// return `Ok` instead of propagating this error. Only meaningful for
    /// LLM errors per §4.7 ("all other LLM errors are degradable").
    pub fn is_degradable(&self) -> bool {
        matches!(self, EngineError::Llm { kind, .. } if !kind.is_configuration_error())
    }
}
