// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Structured, `tracing`-based logging for the running engine process
//! (as opposed to `engine_bootstrap::logger`, which covers only the
//! pre-initialization bootstrap phase).

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global `tracing` subscriber honoring `RUST_LOG`, defaulting
/// to `info` when unset. Idempotent-enough for tests: a second call after
/// one subscriber is already installed is a silent no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_does_not_panic_when_called_twice() {
        init_logging();
        init_logging();
    }
}
