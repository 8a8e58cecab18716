// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Process entry point: parse and validate the CLI, wire the composition
//! root, dispatch to the requested subcommand, map the outcome to a
//! `sysexits.h`-style exit code.

use std::process::ExitCode;
use std::sync::Arc;

use engine::infrastructure::cancellation::CancellationToken;
use engine::infrastructure::dag_store::SqliteDagStore;
use engine::infrastructure::ontology_store::InMemoryOntologyStore;
use engine::infrastructure::unconfigured::{UnconfiguredLlmClient, UnconfiguredSchemaIntrospection};
use engine::{get_dag_status, resume_dag, DagStore, EngineError, ExecutionContextDeps};
use engine_bootstrap::shutdown::ShutdownCoordinator;
use engine_bootstrap::{bootstrap_cli, exit_code, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    engine::infrastructure::logging::init_logging();

    let cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            tracing::error!(error = %err, "invalid command line");
            return exit_code::ExitCode::Usage.into();
        }
    };

    let result = run(cli).await;
    exit_code::result_to_exit_code(result)
}

/// Environment variable names for the knobs a deployment must supply;
/// loading configuration from files is out of scope (see
/// [`engine::infrastructure::config`]'s doc comment).
const DATABASE_URL_VAR: &str = "ONTOLOGY_ENGINE_DATABASE_URL";
const OWNER_ID_VAR: &str = "ONTOLOGY_ENGINE_OWNER_ID";

fn database_url() -> String {
    std::env::var(DATABASE_URL_VAR).unwrap_or_else(|_| "sqlite://ontology-engine.db".to_string())
}

fn owner_id() -> String {
    std::env::var(OWNER_ID_VAR).unwrap_or_else(|_| format!("pid-{}", std::process::id()))
}

fn execution_context_deps(cancellation: CancellationToken) -> ExecutionContextDeps {
    let ontology_store = Arc::new(InMemoryOntologyStore::new());
    ExecutionContextDeps {
        cancellation,
        llm_client: Arc::new(UnconfiguredLlmClient),
        schema_introspection: Arc::new(UnconfiguredSchemaIntrospection),
        ontology_repository: ontology_store.clone(),
        relationship_repository: ontology_store,
    }
}

async fn run(cli: engine_bootstrap::ValidatedCli) -> Result<(), EngineError> {
    let store = SqliteDagStore::connect(&database_url()).await?;
    let store: Arc<dyn DagStore> = Arc::new(store);

    match cli.command {
        Commands::Serve { bind, workers } => serve(store, bind, workers).await,
        Commands::RunDag { dag_id } => {
            let shutdown = ShutdownCoordinator::default();
            let cancellation = CancellationToken::new();
            spawn_ctrl_c_forwarder(shutdown.clone(), cancellation.clone());
            let deps = execution_context_deps(cancellation);
            resume_dag(
                store,
                dag_id.into(),
                None,
                deps,
                owner_id(),
                chrono::Duration::seconds(60),
                std::time::Duration::from_secs(15),
            )
            .await
        }
        Commands::ShowDag { dag_id, json } => show_dag(store, dag_id.into(), json).await,
    }
}

fn spawn_ctrl_c_forwarder(shutdown: ShutdownCoordinator, cancellation: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.initiate_shutdown();
            cancellation.cancel();
        }
    });
}

async fn show_dag(store: Arc<dyn DagStore>, dag_id: engine_domain::DagId, json: bool) -> Result<(), EngineError> {
    let (run, nodes) = get_dag_status(store, dag_id).await?;
    if json {
        let body = serde_json::json!({
            "id": run.id.to_string(),
            "status": run.status.to_string(),
            "current_node": run.current_node.map(|n| n.to_string()),
            "nodes": nodes.iter().map(|n| serde_json::json!({
                "name": n.name.to_string(),
                "status": n.status.to_string(),
                "retry_count": n.retry_count,
                "error_message": n.error_message,
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        println!("dag {} — {}", run.id, run.status);
        for node in nodes {
            println!("  {:<28} {}", node.name.to_string(), node.status);
        }
    }
    Ok(())
}

/// Starts the admission HTTP layer. A DAG run is always addressed by ID
/// (spec §4.10 is "drive a single DAG" — there is no modeled "list every
/// pending DAG across every project" operation); in this process model the
/// admission layer's request handlers are what call `create_and_run_dag`
/// or [`resume_dag`] per inbound request, each spawned onto its own task so
/// `workers` DAGs can be in flight concurrently. Wiring the real routes
/// that accept a project/datasource and kick off a run, and the real
/// JWKS/authorization-service adapters those routes authenticate through,
/// is deployment-specific (spec §1's admission/LLM collaborators are
/// interfaces only) — this composition root wires only the health check
/// and the shutdown path all of those routes would share.
async fn serve(_store: Arc<dyn DagStore>, bind: String, workers: usize) -> Result<(), EngineError> {
    tracing::info!(%bind, workers, "starting ontology engine");

    let shutdown = ShutdownCoordinator::default();
    spawn_ctrl_c_forwarder(shutdown.clone(), CancellationToken::new());

    let router = axum::Router::new().route("/healthz", axum::routing::get(|| async { "ok" }));
    let listener = tokio::net::TcpListener::bind(&bind).await.map_err(|e| EngineError::Other(format!("bind failed: {e}")))?;

    let shutdown_signal = shutdown.clone();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown_signal.token().cancelled().await;
    });

    if let Err(err) = server.await {
        tracing::error!(error = %err, "admission server exited with an error");
    }
    shutdown.initiate_shutdown();
    shutdown.complete_shutdown();
    Ok(())
}
