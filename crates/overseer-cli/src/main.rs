//! overseer - HTTP control plane demo host.
//!
//! Serves the instance management API over an in-memory orchestration client,
//! plus `POST /demo/start/{name}` which starts an instance and waits for it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Query, Request, State};
use axum::response::Response;
use axum::routing::post;
use clap::Parser;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::time::{Duration, sleep};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overseer_core::app::response::error_response;
use overseer_core::app::{ApiRequest, ApiResponse, HttpApiBuilder, HttpApiHandler};
use overseer_core::config::HttpApiConfig;
use overseer_core::domain::{ApiError, RuntimeStatus};
use overseer_core::impls::InMemoryOrchestrationClient;

/// Request bodies above this are rejected before reaching the façade.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Parser)]
#[command(name = "overseer", about = "HTTP control plane for orchestration instances")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "OVERSEER_LISTEN", default_value = "127.0.0.1:7071")]
    listen: SocketAddr,

    /// Base webhook URL (overrides OVERSEER_NOTIFICATION_URL).
    #[arg(long)]
    notification_url: Option<String>,

    /// Default task hub (overrides OVERSEER_HUB_NAME).
    #[arg(long)]
    hub_name: Option<String>,

    /// Default connection name (overrides OVERSEER_CONNECTION_NAME).
    #[arg(long)]
    connection_name: Option<String>,

    /// Demo instances complete this many milliseconds after start; never when unset.
    #[arg(long, env = "OVERSEER_COMPLETE_AFTER_MS")]
    complete_after_ms: Option<u64>,
}

impl Args {
    fn config(&self) -> Result<HttpApiConfig> {
        let mut config = HttpApiConfig::from_env()?;
        if let Some(raw) = &self.notification_url {
            config = config.with_notification_url(raw)?;
        }
        if config.notification_url.is_none() {
            let fallback = format!("http://{}/runtime/webhooks/durabletask", self.listen);
            tracing::info!(url = %fallback, "no notification url configured; using local listener");
            config = config.with_notification_url(&fallback)?;
        }
        if let Some(hub) = &self.hub_name {
            config = config.with_hub_name(hub);
        }
        if let Some(connection) = &self.connection_name {
            config = config.with_connection_name(connection);
        }
        Ok(config)
    }
}

#[derive(Clone)]
struct AppState {
    handler: Arc<HttpApiHandler>,
    client: Arc<InMemoryOrchestrationClient>,
    complete_after: Option<Duration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WaitParams {
    timeout_secs: Option<u64>,
    interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.config()?;

    let client = Arc::new(InMemoryOrchestrationClient::new());
    seed_demo_instances(&client).await;

    let handler = HttpApiBuilder::new()
        .config(config)
        .client(client.clone())
        .build()?;

    let state = AppState {
        handler: Arc::new(handler),
        client,
        complete_after: args.complete_after_ms.map(Duration::from_millis),
    };

    let app = Router::new()
        .route("/demo/start/{name}", post(start_and_wait))
        .fallback(facade)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    tracing::info!(addr = %args.listen, "overseer listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await?;
    Ok(())
}

/// A few instances in different states so the API has something to show.
async fn seed_demo_instances(client: &InMemoryOrchestrationClient) {
    let done = client.start_instance("HelloSequence", json!("Tokyo")).await;
    client
        .complete(&done, json!(["Hello Tokyo!", "Hello Seattle!"]))
        .await;

    let running = client.start_instance("Approval", json!({"amount": 1200})).await;
    client.set_status(&running, RuntimeStatus::Running).await;

    let failed = client.start_instance("Import", Value::Null).await;
    client.set_status(&failed, RuntimeStatus::Failed).await;

    tracing::info!(%done, %running, %failed, "seeded demo instances");
}

/// Everything except the demo route goes to the façade.
async fn facade(State(state): State<AppState>, request: Request) -> Response {
    match buffer(request).await {
        Ok(request) => into_axum(state.handler.handle(request).await),
        Err(response) => response,
    }
}

async fn start_and_wait(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<WaitParams>,
    request: Request,
) -> Response {
    let ctx = match buffer(request).await {
        Ok(request) => state.handler.request_context(request),
        Err(response) => return response,
    };

    let input = if ctx.body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&ctx.body) {
            Ok(input) => input,
            Err(e) => {
                let error = ApiError::validation(format!("Invalid JSON content: {e}"));
                return into_axum(error_response(&error));
            }
        }
    };

    let instance_id = state.client.start_instance(&name, input).await;
    if let Some(after) = state.complete_after {
        let client = state.client.clone();
        let id = instance_id.clone();
        tokio::spawn(async move {
            sleep(after).await;
            client.complete(&id, json!({"orchestration": name, "completed": true})).await;
        });
    }

    let timeout = Duration::from_secs(params.timeout_secs.unwrap_or(10));
    let interval = Duration::from_secs(params.interval_secs.unwrap_or(1));
    let response = state
        .handler
        .wait_or_accept(&ctx, &instance_id, timeout, interval)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, %instance_id, "wait failed");
            error_response(&e)
        });
    into_axum(response)
}

async fn buffer(request: Request) -> Result<ApiRequest, Response> {
    let (parts, body) = request.into_parts();
    match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => Ok(ApiRequest::from_parts(parts, bytes.to_vec())),
        Err(e) => {
            let error = ApiError::validation(format!("failed to read request body: {e}"));
            Err(into_axum(error_response(&error)))
        }
    }
}

fn into_axum(response: ApiResponse) -> Response {
    response.map(Body::from)
}
