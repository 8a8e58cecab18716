// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Command-line surface for the engine process.
//!
//! Two entry points matter in production: `serve` starts the admission HTTP
//! layer and a pool of orchestrator workers that claim and drive pending
//! DAGs; `run-dag` drives a single named DAG inline, useful for operators
//! re-running a stuck pipeline by hand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "ontology-engine")]
#[command(about = "Ontology construction pipeline engine")]
#[command(version)]
pub struct Cli {
    /// Path to a configuration file (TOML/YAML/env overrides are external to
    /// this crate; this flag is accepted so callers can still point at one).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the admission HTTP layer and orchestrator worker loop.
    Serve {
        /// Address to bind the admission layer to.
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,

        /// Number of orchestrator workers claiming DAGs concurrently.
        #[arg(long, default_value_t = 4)]
        workers: usize,
    },
    /// Drive a single DAG run to completion (or failure) in this process.
    RunDag {
        /// DAG run identifier to claim and drive.
        dag_id: Uuid,
    },
    /// Print the status of a DAG run and its nodes.
    ShowDag {
        dag_id: Uuid,

        /// Emit machine-readable JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

/// Parses `std::env::args`, exiting the process on `--help`/`--version` or a
/// usage error (clap's own behavior).
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: Commands,
    pub verbose: u8,
    pub config: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid value for --{arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Parses and applies the bootstrap-layer validation every command shares:
/// today that is limited to range checks independent of any particular
/// subcommand (per-subcommand fields are already range-checked by clap's
/// own type system where practical).
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    if let Commands::Serve { workers, .. } = &cli.command {
        if *workers == 0 || *workers > 256 {
            return Err(ParseError::InvalidValue {
                arg: "workers".to_string(),
                reason: "must be between 1 and 256".to_string(),
            });
        }
    }
    Ok(ValidatedCli {
        command: cli.command,
        verbose: cli.verbose,
        config: cli.config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_defaults() {
        let cli = Cli::parse_from(["ontology-engine", "serve"]);
        match cli.command {
            Commands::Serve { bind, workers } => {
                assert_eq!(bind, "0.0.0.0:8080");
                assert_eq!(workers, 4);
            }
            _ => panic!("expected Serve"),
        }
    }

    #[test]
    fn parses_run_dag() {
        let id = Uuid::new_v4();
        let cli = Cli::parse_from(["ontology-engine", "run-dag", &id.to_string()]);
        match cli.command {
            Commands::RunDag { dag_id } => assert_eq!(dag_id, id),
            _ => panic!("expected RunDag"),
        }
    }
}
