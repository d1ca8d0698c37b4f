//! reqtrace demo server.
//!
//! Serves the job-submission API with per-request trace correlation: every
//! log line and every response envelope produced while handling a request
//! carries the same identifier, including log lines from background work the
//! request scheduled.
//!
//! # Usage
//!
//! ```bash
//! reqtrace-server --host 0.0.0.0 --port 8080
//! RUST_LOG=debug reqtrace-server
//! ```

use clap::Parser;
use reqtrace_api::{create_router, telemetry, HandlerState};

/// Command-line arguments for the server
#[derive(Parser, Debug)]
#[command(name = "reqtrace-server", version, about = "Trace-correlated demo API server")]
struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "REQTRACE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080, env = "REQTRACE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let args = ServerArgs::parse();
    let addr = format!("{}:{}", args.host, args.port);

    let app = create_router(HandlerState::new());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "reqtrace server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
