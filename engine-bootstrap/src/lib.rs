// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Module
//!
//! The bootstrap crate sits **outside** the domain/application/infrastructure
//! layers in `engine` and `engine-domain` and provides only what the process
//! needs before the application is running:
//!
//! - **Entry point** — parses `std::env::args` and owns `main`'s lifecycle
//! - **CLI** — `serve` / `run-dag` / `show-dag` argument parsing and validation
//! - **Shutdown coordination** — cancellation token shared with the orchestrator
//! - **Exit codes** — maps an `EngineError` to a `sysexits.h`-style process exit
//!
//! Runtime configuration sourcing (env vars, files) and logging initialization
//! live in `engine`'s infrastructure layer next to the things they configure;
//! this crate only accepts a `--config` path and passes it through, and calls
//! `engine::infrastructure::logging::init_logging()` once at process start.

pub mod cli;
pub mod exit_code;
pub mod shutdown;

pub use cli::{parse_and_validate, Cli, Commands, ParseError, ValidatedCli};
pub use exit_code::{map_error_to_exit_code, result_to_exit_code, ExitCode};

/// Parses and validates `std::env::args` for the bootstrap layer.
///
/// Clap handles `--help`/`--version` by exiting the process directly; the
/// caller only observes [`ParseError`] for validation failures past clap's
/// own type checking (e.g. a `--workers` count out of range).
pub fn bootstrap_cli() -> Result<ValidatedCli, cli::ParseError> {
    cli::parse_and_validate()
}
