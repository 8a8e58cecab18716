// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Request admission building blocks: JWT/JWKS validation (spec §4.2),
//! the upstream authorization HTTP client (spec §4.4), and the credential
//! encryptor (spec §4.5).

pub mod authorization_client_adapter;
pub mod credential_encryptor;
pub mod jwks_validator;

pub use authorization_client_adapter::HttpAuthorizationClient;
pub use jwks_validator::{parse_claims_unverified, JwksValidator};
