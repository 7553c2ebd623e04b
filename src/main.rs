use anyhow::{Context, Result};
use clap::Parser;
use prepnote::rehearsal::{GRACE_SECS, MAX_RECORDING_SECS};
use prepnote::{create_router, AppState, Config, MockScoringService, TracingSink};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Rehearsal timer service
#[derive(Debug, Parser)]
#[command(name = "prepnote", version)]
struct Args {
    /// Config file path (extension optional)
    #[arg(short, long, default_value = "config/prepnote")]
    config: String,

    /// Override the configured HTTP port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("PrepNote v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!(
        "Rehearsal defaults: {} min target, {}s grace, {}s ceiling",
        cfg.rehearsal.target_minutes,
        GRACE_SECS,
        MAX_RECORDING_SECS
    );
    info!("Generation backend: {}", cfg.api.base_url);

    let scorer = MockScoringService::new(Duration::from_millis(cfg.scoring.delay_ms));
    let state = AppState::new(cfg.rehearsal.clone(), Arc::new(scorer), Arc::new(TracingSink));
    let _sweep = state.spawn_eviction(cfg.sessions.idle_ttl(), cfg.sessions.sweep_interval());
    let app = create_router(state);

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}
